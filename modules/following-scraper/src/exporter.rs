//! JSON / CSV / summary file writers.
//!
//! Every write failure is returned to the caller. A requested export that
//! silently didn't happen is worse than a failed run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::pipeline::Summary;
use crate::types::ProfileRecord;

/// Where each file of a finished export went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub json_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub summary_path: PathBuf,
    pub records: usize,
}

/// CSV output sits next to the JSON output with a `.csv` extension.
pub fn csv_path(output: &Path) -> PathBuf {
    output.with_extension("csv")
}

/// `{stem}_summary.json` in the output's directory.
pub fn summary_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!("{stem}_summary.json"))
}

/// Write the requested formats plus the summary file.
///
/// Returns `Ok(None)` without touching the file system when there is
/// nothing to export.
pub fn export_run(
    records: &[ProfileRecord],
    summary: &Summary,
    output: &Path,
    format: OutputFormat,
) -> anyhow::Result<Option<ExportReport>> {
    if records.is_empty() {
        warn!("No records were fetched, nothing to export");
        return Ok(None);
    }

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let json_path = if format.writes_json() {
        export_json(records, output)
            .with_context(|| format!("Failed to write JSON output to {}", output.display()))?;
        Some(output.to_path_buf())
    } else {
        None
    };

    let csv_path = if format.writes_csv() {
        let path = csv_path(output);
        export_csv(records, &path)
            .with_context(|| format!("Failed to write CSV output to {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    let summary_path = summary_path(output);
    export_summary(summary, &summary_path)
        .with_context(|| format!("Failed to write summary to {}", summary_path.display()))?;

    Ok(Some(ExportReport {
        json_path,
        csv_path,
        summary_path,
        records: records.len(),
    }))
}

/// Pretty-printed UTF-8 JSON array. Non-ASCII is written as-is.
pub fn export_json(records: &[ProfileRecord], path: &Path) -> Result<()> {
    write_pretty_json(records, path)?;
    info!(path = %path.display(), count = records.len(), "JSON output written");
    Ok(())
}

pub fn export_summary(summary: &Summary, path: &Path) -> Result<()> {
    write_pretty_json(summary, path)?;
    info!(path = %path.display(), users = summary.len(), "Summary written");
    Ok(())
}

fn write_pretty_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// CSV with a header inferred from the union of keys across all records,
/// in first-seen order. Missing keys and nulls are empty cells.
pub fn export_csv<T: Serialize>(records: &[T], path: &Path) -> Result<()> {
    if records.is_empty() {
        warn!(path = %path.display(), "No records to export to CSV");
        return Ok(());
    }

    let rows = records
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<Value>, _>>()?;

    let mut header: Vec<&str> = Vec::new();
    for key in rows.iter().filter_map(Value::as_object).flat_map(|obj| obj.keys()) {
        if !header.contains(&key.as_str()) {
            header.push(key);
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(header.iter().map(|key| csv_cell(row.get(*key))))?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = rows.len(), "CSV output written");
    Ok(())
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;
    use serde_json::json;

    #[test]
    fn derived_paths() {
        let output = Path::new("/tmp/out/sample_output.json");
        assert_eq!(csv_path(output), PathBuf::from("/tmp/out/sample_output.csv"));
        assert_eq!(
            summary_path(output),
            PathBuf::from("/tmp/out/sample_output_summary.json")
        );
    }

    #[test]
    fn json_round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut records = vec![record("1", "x", "alice"), record("2", "y", "alice")];
        records[1].fbid_v2 = Some(17_841_400_000_000_001);
        records[1].profile_pic_url = Some("https://cdn.example.com/y.jpg".into());

        export_json(&records, &path).unwrap();

        let parsed: Vec<ProfileRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn json_keeps_field_order_nulls_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut r = record("1", "x", "alice");
        r.full_name = "Zoë 東京".into();

        export_json(&[r], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Zoë 東京"));
        assert!(text.contains("  {\n    \"id\": \"1\","));
        assert!(text.contains("\"fbid_v2\": null"));
        let id_pos = text.find("\"id\"").unwrap();
        let followed_pos = text.find("\"followed_by\"").unwrap();
        assert!(id_pos < followed_pos);
    }

    #[test]
    fn csv_header_and_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut r = record("1", "x", "alice");
        r.is_verified = true;
        r.latest_reel_media = Some(42);

        export_csv(&[r], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,full_name,is_private,fbid_v2,profile_pic_id,profile_pic_url,is_verified,username,latest_reel_media,followed_by"
        );
        assert_eq!(lines.next().unwrap(), "1,x full name,false,,,,true,x,42,alice");
        assert!(lines.next().is_none());
    }

    #[test]
    fn csv_header_is_union_in_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.csv");
        let rows = vec![json!({ "a": 1, "b": "two" }), json!({ "c": true, "a": null })];

        export_csv(&rows, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "a,b,c\n1,two,\n,,true\n");
    }

    #[test]
    fn empty_csv_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        export_csv::<ProfileRecord>(&[], &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn export_run_with_no_records_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("out.json");

        let report = export_run(&[], &Summary::new(), &output, OutputFormat::Both).unwrap();

        assert!(report.is_none());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn export_run_writes_requested_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("out.json");
        let records = vec![record("1", "x", "alice"), record("2", "y", "bob")];
        let summary = crate::pipeline::summarize(&records);

        let report = export_run(&records, &summary, &output, OutputFormat::Csv)
            .unwrap()
            .unwrap();

        assert_eq!(report.json_path, None);
        assert_eq!(report.csv_path, Some(dir.path().join("nested").join("out.csv")));
        assert_eq!(report.records, 2);
        assert!(!output.exists());
        assert!(report.csv_path.as_ref().unwrap().exists());

        let written: Summary =
            serde_json::from_str(&std::fs::read_to_string(&report.summary_path).unwrap()).unwrap();
        assert_eq!(written, summary);
    }

    #[test]
    fn export_run_fails_on_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let output = blocker.join("out.json");

        let err = export_run(
            &[record("1", "x", "alice")],
            &Summary::new(),
            &output,
            OutputFormat::Json,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Failed to create output directory"));
    }
}
