//! Run counters and the end-of-run summary.

use custsync_core::CustsyncError;
use custsync_core::record::RecordKind;
use custsync_core::session::{DaysRemaining, SessionWarning};
use std::fmt;

use crate::ingestion_pipeline::IngestOutcome;

/// Row tallies for one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub accepted: usize,
    /// Rows whose identity key was already known.
    pub skipped: usize,
    /// Rows with a blank date or postal code.
    pub rejected: usize,
}

/// Counters accumulated by an `IngestionPipeline` over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub trends: KindCounts,
    pub locations: KindCounts,
    /// CSVs whose headers matched neither known shape.
    pub unknown_files: usize,
}

impl RunCounters {
    pub(crate) fn record(&mut self, outcome: &IngestOutcome) {
        let counts = match outcome.kind {
            RecordKind::Trends => &mut self.trends,
            RecordKind::Locations => &mut self.locations,
            RecordKind::Unknown => {
                self.unknown_files += 1;
                return;
            }
        };
        counts.accepted += outcome.accepted;
        counts.skipped += outcome.skipped;
        counts.rejected += outcome.rejected;
    }

    pub fn total_accepted(&self) -> usize {
        self.trends.accepted + self.locations.accepted
    }
}

/// Outcome of a completed run.
///
/// Fatal errors never produce a report; they propagate to the caller.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub store_id: String,
    /// `None` for offline ingestion, where no session was checked.
    pub days_remaining: Option<DaysRemaining>,
    pub session_warning: Option<SessionWarning>,
    pub counters: RunCounters,
    /// Per-CSV download and parse failures, in attempt order.
    pub errors: Vec<CustsyncError>,
    /// Download targets that had no matching control on the page.
    pub missing_targets: Vec<String>,
}

impl RunReport {
    pub fn new(run_id: impl Into<String>, store_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            store_id: store_id.into(),
            days_remaining: None,
            session_warning: None,
            counters: RunCounters::default(),
            errors: Vec::new(),
            missing_targets: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {} for store {}", self.run_id, self.store_id)?;
        if let Some(days) = self.days_remaining {
            writeln!(f, "  session: {} remaining", days)?;
        }
        if let Some(warning) = &self.session_warning {
            writeln!(f, "  warning: {}", warning)?;
        }
        write_counts(f, "trends", &self.counters.trends)?;
        write_counts(f, "locations", &self.counters.locations)?;
        if self.counters.unknown_files > 0 {
            writeln!(f, "  unknown CSVs archived: {}", self.counters.unknown_files)?;
        }
        for target in &self.missing_targets {
            writeln!(f, "  not found: {}", target)?;
        }
        for error in &self.errors {
            writeln!(f, "  error: {}", error)?;
        }
        Ok(())
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, label: &str, counts: &KindCounts) -> fmt::Result {
    write!(f, "  {}: {} accepted, {} skipped", label, counts.accepted, counts.skipped)?;
    if counts.rejected > 0 {
        write!(f, ", {} rejected", counts.rejected)?;
    }
    writeln!(f)
}
