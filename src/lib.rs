// Fixture Harness - declarative test lifecycle runner
// Explicit hook/test registration with sequential, outcome-isolating execution

// Module declarations
pub mod check;
pub mod config;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod plan;
pub mod report;
pub mod runner;

// Re-exports for convenience
pub use check::{CheckFailure, CheckResult};
pub use config::{ExecutionConfig, HarnessConfig};
pub use events::{EventLog, EventSink, LogSink, NullSink, RecordingSink, RunEvent};
pub use plan::{DataRow, FixturePlan, HookPhase, PlanBuilder, TestDescriptor};
pub use report::{InvocationRecord, Outcome, RunReport, RunStats};
pub use runner::Runner;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;

    #[test]
    fn minimal_plan_runs_end_to_end() {
        let mut plan = PlanBuilder::new("smoke")
            .test("only", 1, |_: &mut ()| Ok(()))
            .build()
            .unwrap();
        let report = Runner::new().execute(&mut plan, &mut (), &NullSink);
        assert_eq!(report.passed(), 1);
        assert!(!report.has_failures());
    }
}
