//! Run reports
//!
//! Per-entry outcomes of a batch run, serializable for `--json` output.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteStats {
    pub matched: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveStats {
    pub matched: usize,
    pub moved: usize,
    /// Messages left in place because UID COPY was refused.
    pub copy_failures: usize,
    /// Whether the server's MOVE extension was used.
    pub native: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadStats {
    pub listed: usize,
    pub downloaded: usize,
    /// Set when the scan stopped at a message already on disk.
    pub stopped_at_existing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "optype", rename_all = "lowercase")]
pub enum Stats {
    Move(MoveStats),
    Delete(DeleteStats),
    Download(DownloadStats),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Applied { stats: Stats },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    #[must_use]
    pub fn applied(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Applied { .. }))
            .count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.entries.len() - self.applied()
    }

    pub(crate) fn push(&mut self, index: usize, outcome: Outcome) {
        self.entries.push(EntryReport { index, outcome });
    }
}
