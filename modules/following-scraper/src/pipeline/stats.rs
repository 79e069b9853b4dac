/// Stats from a pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    pub users_processed: usize,
    pub users_failed: usize,
    pub users_empty: usize,
    pub nodes_seen: usize,
    pub nodes_truncated: usize,
    pub nodes_malformed: usize,
    pub records: usize,
}

impl std::fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Following Scrape Complete ===")?;
        writeln!(f, "Users processed:    {}", self.users_processed)?;
        writeln!(f, "Users failed:       {}", self.users_failed)?;
        writeln!(f, "Users w/o follows:  {}", self.users_empty)?;
        writeln!(f, "Nodes seen:         {}", self.nodes_seen)?;
        writeln!(f, "Nodes over cap:     {}", self.nodes_truncated)?;
        writeln!(f, "Nodes malformed:    {}", self.nodes_malformed)?;
        writeln!(f, "Records produced:   {}", self.records)?;
        Ok(())
    }
}
