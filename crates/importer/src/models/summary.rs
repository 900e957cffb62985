use serde::{Deserialize, Serialize};
use std::fmt;

/// Final state of one entry after a pass of the import loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A new record was created with this id
    Imported(i64),
    /// A record for the entry already existed
    Skipped,
    /// The entry could not be imported; the run continued without it
    Failed,
}

/// Per-run outcome counters.
///
/// Contained per-entry failures never abort the run, so the summary is the
/// caller's only aggregate view of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn record(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Imported(_) => self.imported += 1,
            EntryOutcome::Skipped => self.skipped += 1,
            EntryOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.imported + self.skipped + self.failed
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} imported, {} skipped, {} failed",
            self.imported, self.skipped, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut summary = ImportSummary::default();
        summary.record(EntryOutcome::Imported(1));
        summary.record(EntryOutcome::Imported(2));
        summary.record(EntryOutcome::Skipped);
        summary.record(EntryOutcome::Failed);

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.to_string(), "2 imported, 1 skipped, 1 failed");
    }
}
