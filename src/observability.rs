//! Observer hooks for the cleaning pipeline.
//!
//! The host decides where cleaning outcomes go (stderr, metrics, alerts); the
//! core only reports them. Wire an observer through
//! [`crate::cleaning::CleaningOptions`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Severity classification for failure callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
}

/// Row accounting for one cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Rows in the raw input table.
    pub rows_in: usize,
    /// Rows removed as exact duplicates.
    pub duplicates_removed: usize,
    /// Rows removed by the outlier denylist.
    pub outliers_removed: usize,
    /// Rows removed because their cuisine was unresolvable.
    pub unresolved_cuisines_removed: usize,
    /// Rows in the cleaned output table.
    pub rows_out: usize,
}

/// Observer interface for cleaning outcomes.
pub trait PipelineObserver: Send + Sync {
    /// Called when cleaning succeeds.
    fn on_cleaned(&self, _stats: &CleaningStats) {}

    /// Called when cleaning fails.
    fn on_failure(&self, _severity: PipelineSeverity, _error: &PipelineError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_cleaned(&self, stats: &CleaningStats) {
        for o in &self.observers {
            o.on_cleaned(stats);
        }
    }

    fn on_failure(&self, severity: PipelineSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(severity, error);
        }
    }
}

/// Logs cleaning events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_cleaned(&self, stats: &CleaningStats) {
        eprintln!(
            "[clean][ok] rows_in={} duplicates={} outliers={} unresolved_cuisines={} rows_out={}",
            stats.rows_in,
            stats.duplicates_removed,
            stats.outliers_removed,
            stats.unresolved_cuisines_removed,
            stats.rows_out
        );
    }

    fn on_failure(&self, severity: PipelineSeverity, error: &PipelineError) {
        eprintln!("[clean][{severity:?}] err={error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        cleaned: Mutex<Vec<CleaningStats>>,
        failures: Mutex<Vec<String>>,
    }

    impl PipelineObserver for Recorder {
        fn on_cleaned(&self, stats: &CleaningStats) {
            self.cleaned.lock().unwrap().push(*stats);
        }

        fn on_failure(&self, _severity: PipelineSeverity, error: &PipelineError) {
            self.failures.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn composite_fans_out_to_every_observer() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let composite = CompositeObserver::new(vec![a.clone(), b.clone()]);

        let stats = CleaningStats {
            rows_in: 10,
            duplicates_removed: 1,
            outliers_removed: 1,
            unresolved_cuisines_removed: 2,
            rows_out: 6,
        };
        composite.on_cleaned(&stats);
        composite.on_failure(
            PipelineSeverity::Error,
            &PipelineError::Schema {
                message: "boom".to_string(),
            },
        );

        for obs in [a, b] {
            assert_eq!(obs.cleaned.lock().unwrap().len(), 1);
            assert_eq!(obs.failures.lock().unwrap().len(), 1);
        }
    }

    #[test]
    fn severity_ordering() {
        assert!(PipelineSeverity::Error > PipelineSeverity::Warning);
        assert!(PipelineSeverity::Warning > PipelineSeverity::Info);
    }
}
