//! Run reports: per-invocation outcomes plus aggregate statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result of one test invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { message: String },
    Skipped,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed { .. } => "failed",
            Outcome::Skipped => "skipped",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// One reported invocation: a test body run once, or once per data row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvocationRecord {
    pub test: String,
    /// Present only for data-driven invocations; indexes the source row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub outcome: Outcome,
}

/// Full account of a fixture run. Every invocation appears exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub fixture: String,
    pub records: Vec<InvocationRecord>,
    /// Set when before-all failed; no test bodies ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
    /// Set when after-all failed; not a test outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_all_failure: Option<String>,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.count_label("passed")
    }

    pub fn failed(&self) -> usize {
        self.count_label("failed")
    }

    pub fn skipped(&self) -> usize {
        self.count_label("skipped")
    }

    fn count_label(&self, label: &str) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome.label() == label)
            .count()
    }

    /// True when the run should be treated as unsuccessful: any failed
    /// invocation, a fatal before-all, or a failed after-all.
    pub fn has_failures(&self) -> bool {
        self.fatal.is_some()
            || self.after_all_failure.is_some()
            || self.records.iter().any(|record| record.outcome.is_failed())
    }

    /// First failure message for a given test, if any.
    pub fn failure_message(&self, test: &str) -> Option<&str> {
        self.records.iter().find_map(|record| match &record.outcome {
            Outcome::Failed { message } if record.test == test => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Aggregated invocation statistics for a fixture run.
#[derive(Debug, Clone, Serialize, Default)]
pub struct RunStats {
    pub total_invocations: u32,
    pub counts: HashMap<String, u32>,
    pub per_test: HashMap<String, u32>,
}

impl RunStats {
    pub fn from_report(report: &RunReport) -> Self {
        let mut counts = HashMap::new();
        let mut per_test = HashMap::new();

        for record in &report.records {
            *counts.entry(record.outcome.label().to_string()).or_default() += 1;
            *per_test.entry(record.test.clone()).or_default() += 1;
        }

        let total_invocations = counts.values().copied().sum::<u32>();

        Self {
            total_invocations,
            counts,
            per_test,
        }
    }

    pub fn count_for(&self, label: &str) -> u32 {
        *self.counts.get(label).unwrap_or(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(test: &str, row: Option<usize>, outcome: Outcome) -> InvocationRecord {
        InvocationRecord {
            test: test.to_string(),
            row,
            outcome,
        }
    }

    fn sample_report() -> RunReport {
        RunReport {
            fixture: "suite".to_string(),
            records: vec![
                record("first", None, Outcome::Passed),
                record(
                    "second",
                    None,
                    Outcome::Failed {
                        message: "boom".to_string(),
                    },
                ),
                record("rows", Some(0), Outcome::Passed),
                record("rows", Some(1), Outcome::Passed),
                record("disabled", None, Outcome::Skipped),
            ],
            fatal: None,
            after_all_failure: None,
        }
    }

    #[test]
    fn report_counts_outcomes() {
        let report = sample_report();
        assert_eq!(report.passed(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(report.has_failures());
        assert_eq!(report.failure_message("second"), Some("boom"));
        assert_eq!(report.failure_message("first"), None);
    }

    #[test]
    fn stats_capture_per_test_invocations() {
        let stats = RunStats::from_report(&sample_report());
        assert_eq!(stats.total_invocations, 5);
        assert_eq!(stats.count_for("passed"), 3);
        assert_eq!(stats.count_for("failed"), 1);
        assert_eq!(stats.count_for("skipped"), 1);
        assert_eq!(stats.per_test.get("rows"), Some(&2));
    }

    #[test]
    fn fatal_report_is_a_failure_even_without_failed_records() {
        let report = RunReport {
            fixture: "suite".to_string(),
            records: vec![record("first", None, Outcome::Skipped)],
            fatal: Some("setup exploded".to_string()),
            after_all_failure: None,
        };
        assert!(report.has_failures());
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn outcome_serialization_is_snake_case() {
        let json = serde_json::to_value(Outcome::Failed {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["detail"]["message"], "boom");

        let json = serde_json::to_value(Outcome::Skipped).unwrap();
        assert_eq!(json["status"], "skipped");
    }
}
