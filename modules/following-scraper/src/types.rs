use serde::{Deserialize, Serialize};

/// One followed account, normalized from a raw following node.
///
/// Field order here is the column order of every export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub full_name: String,
    pub is_private: bool,
    pub fbid_v2: Option<i64>,
    pub profile_pic_id: Option<String>,
    pub profile_pic_url: Option<String>,
    pub is_verified: bool,
    pub username: String,
    pub latest_reel_media: Option<i64>,
    /// Username whose following list produced this record.
    pub followed_by: String,
}
