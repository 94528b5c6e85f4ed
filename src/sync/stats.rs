use std::fmt;

/// Share of attempted tasks that must succeed for `MostlySuccess`.
pub const MOSTLY_SUCCESS_RATE: f64 = 0.8;
/// Share of attempted tasks that must succeed for `PartialSuccess`.
pub const PARTIAL_SUCCESS_RATE: f64 = 0.5;

/// Overall outcome of an import run, judged on tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    MostlySuccess,
    PartialSuccess,
    MostlyFailed,
    Failed,
}

impl RunStatus {
    /// Classify from created and failed task counts.
    ///
    /// Nothing created is `Failed`, even when nothing was attempted.
    pub fn classify(created: usize, failed: usize) -> Self {
        if created == 0 {
            return Self::Failed;
        }
        if failed == 0 {
            return Self::Success;
        }
        let rate = created as f64 / (created + failed) as f64;
        if rate >= MOSTLY_SUCCESS_RATE {
            Self::MostlySuccess
        } else if rate >= PARTIAL_SUCCESS_RATE {
            Self::PartialSuccess
        } else {
            Self::MostlyFailed
        }
    }

    /// Whether the run counts as a success for the exit code.
    pub fn is_acceptable(self) -> bool {
        matches!(self, Self::Success | Self::MostlySuccess)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::MostlySuccess => "MOSTLY_SUCCESS",
            Self::PartialSuccess => "PARTIAL_SUCCESS",
            Self::MostlyFailed => "MOSTLY_FAILED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub sprints_processed: usize,
    pub documents_failed: usize,
    pub epics_created: usize,
    pub epics_failed: usize,
    pub tasks_created: usize,
    pub tasks_failed: usize,
    /// Tasks never attempted because their epic failed.
    pub tasks_skipped: usize,
    pub anomalies: usize,
}

impl RunStats {
    pub fn epics_attempted(&self) -> usize {
        self.epics_created + self.epics_failed
    }

    /// Skipped tasks are not attempts.
    pub fn tasks_attempted(&self) -> usize {
        self.tasks_created + self.tasks_failed
    }

    /// Epic success rate in percent; 0 when nothing was attempted.
    pub fn epic_success_rate(&self) -> f64 {
        percent(self.epics_created, self.epics_attempted())
    }

    /// Task success rate in percent; 0 when nothing was attempted.
    pub fn task_success_rate(&self) -> f64 {
        percent(self.tasks_created, self.tasks_attempted())
    }

    pub fn status(&self) -> RunStatus {
        RunStatus::classify(self.tasks_created, self.tasks_failed)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(RunStatus::classify(0, 0), RunStatus::Failed);
        assert_eq!(RunStatus::classify(0, 5), RunStatus::Failed);
        assert_eq!(RunStatus::classify(10, 0), RunStatus::Success);
        assert_eq!(RunStatus::classify(8, 2), RunStatus::MostlySuccess);
        assert_eq!(RunStatus::classify(7, 3), RunStatus::PartialSuccess);
        assert_eq!(RunStatus::classify(5, 5), RunStatus::PartialSuccess);
        assert_eq!(RunStatus::classify(4, 6), RunStatus::MostlyFailed);
        assert_eq!(RunStatus::classify(1, 99), RunStatus::MostlyFailed);
    }

    #[test]
    fn test_acceptable_statuses() {
        assert!(RunStatus::Success.is_acceptable());
        assert!(RunStatus::MostlySuccess.is_acceptable());
        assert!(!RunStatus::PartialSuccess.is_acceptable());
        assert!(!RunStatus::MostlyFailed.is_acceptable());
        assert!(!RunStatus::Failed.is_acceptable());
    }

    #[test]
    fn test_rates_ignore_skipped() {
        let stats = RunStats {
            epics_created: 1,
            epics_failed: 1,
            tasks_created: 3,
            tasks_failed: 1,
            tasks_skipped: 4,
            ..Default::default()
        };
        assert_eq!(stats.tasks_attempted(), 4);
        assert_eq!(stats.task_success_rate(), 75.0);
        assert_eq!(stats.epic_success_rate(), 50.0);
        assert_eq!(stats.status(), RunStatus::PartialSuccess);
    }

    #[test]
    fn test_rates_empty_run() {
        let stats = RunStats::default();
        assert_eq!(stats.task_success_rate(), 0.0);
        assert_eq!(stats.epic_success_rate(), 0.0);
        assert_eq!(stats.status(), RunStatus::Failed);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RunStatus::MostlySuccess.to_string(), "MOSTLY_SUCCESS");
    }
}
