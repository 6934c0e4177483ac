//! Sequential execution of a fixture plan.
//!
//! The runner owns the lifecycle contract: before-all brackets the whole
//! run, every enabled invocation is wrapped by exactly one before-each /
//! after-each pair regardless of its outcome, disabled tests are skipped
//! without touching the per-test hooks, and data-driven tests expand into
//! one independently reported invocation per row. Execution is strictly
//! sequential and synchronous.

use log::{info, warn};

use crate::check::CheckResult;
use crate::config::ExecutionConfig;
use crate::events::{EventSink, RunEvent};
use crate::plan::{FixturePlan, Hooks, TestBody, TestCase};
use crate::report::{InvocationRecord, Outcome, RunReport};

/// Drives a [`FixturePlan`] against caller-supplied state and event sink.
pub struct Runner {
    after_all_on_fatal: bool,
    log_invocations: bool,
}

impl Runner {
    pub fn new() -> Self {
        Self::with_config(&ExecutionConfig::default())
    }

    pub fn with_config(config: &ExecutionConfig) -> Self {
        Self {
            after_all_on_fatal: config.after_all_on_fatal,
            log_invocations: config.log_invocations,
        }
    }

    /// Execute the plan once and report every invocation exactly once.
    ///
    /// A before-all failure is fatal: no test body runs and every declared
    /// test is recorded as skipped. The after-all hook still runs in that
    /// case (cleanup guarantee) unless `after_all_on_fatal` was disabled.
    /// An after-all failure lands on the report, not on any test outcome.
    pub fn execute<S>(
        &self,
        plan: &mut FixturePlan<S>,
        state: &mut S,
        sink: &dyn EventSink,
    ) -> RunReport {
        let fixture = plan.id().to_string();
        let order = plan.execution_order();
        sink.publish(RunEvent::RunStarted {
            fixture: fixture.clone(),
        });

        let hooks = &mut plan.hooks;
        let tests = &mut plan.tests;

        let mut records = Vec::new();
        let mut fatal = None;

        if let Some(hook) = hooks.before_all.as_mut() {
            let result = hook(state);
            sink.publish(RunEvent::BeforeAll {
                ok: result.is_ok(),
            });
            if let Err(failure) = result {
                fatal = Some(failure.message);
            }
        }

        match &fatal {
            Some(message) => {
                warn!("[Runner] before_all failed, skipping every test: {message}");
                for test in tests.iter() {
                    records.push(skip_test(&test.descriptor.name, sink));
                }
            }
            None => {
                for index in order {
                    let TestCase { descriptor, body } = &mut tests[index];
                    if !descriptor.enabled {
                        records.push(skip_test(&descriptor.name, sink));
                        continue;
                    }

                    match body {
                        TestBody::Simple(run) => {
                            records.push(self.run_invocation(
                                hooks,
                                state,
                                sink,
                                &descriptor.name,
                                None,
                                |s| run(s),
                            ));
                        }
                        TestBody::DataDriven { rows, body: run } => {
                            for (row_index, row) in rows.iter().enumerate() {
                                records.push(self.run_invocation(
                                    hooks,
                                    state,
                                    sink,
                                    &descriptor.name,
                                    Some(row_index),
                                    |s| run(s, row),
                                ));
                            }
                        }
                    }
                }
            }
        }

        let mut after_all_failure = None;
        if fatal.is_none() || self.after_all_on_fatal {
            if let Some(hook) = hooks.after_all.as_mut() {
                let result = hook(state);
                sink.publish(RunEvent::AfterAll {
                    ok: result.is_ok(),
                });
                if let Err(failure) = result {
                    after_all_failure = Some(failure.message);
                }
            }
        }

        let report = RunReport {
            fixture,
            records,
            fatal,
            after_all_failure,
        };
        sink.publish(RunEvent::RunFinished {
            passed: report.passed(),
            failed: report.failed(),
            skipped: report.skipped(),
        });
        report
    }

    /// One invocation: before-each, body, after-each. The pair always runs
    /// exactly once; the first failure message becomes the outcome. A
    /// failed before-each skips the body but still runs after-each.
    fn run_invocation<S>(
        &self,
        hooks: &mut Hooks<S>,
        state: &mut S,
        sink: &dyn EventSink,
        test: &str,
        row: Option<usize>,
        body: impl FnOnce(&mut S) -> CheckResult,
    ) -> InvocationRecord {
        let mut failure: Option<String> = None;

        if let Some(hook) = hooks.before_each.as_mut() {
            let result = hook(state);
            sink.publish(RunEvent::BeforeEach {
                test: test.to_string(),
                row,
                ok: result.is_ok(),
            });
            if let Err(f) = result {
                failure = Some(f.message);
            }
        }

        if failure.is_none() {
            sink.publish(RunEvent::TestStarted {
                test: test.to_string(),
                row,
            });
            if let Err(f) = body(state) {
                failure = Some(f.message);
            }
        }

        if let Some(hook) = hooks.after_each.as_mut() {
            let result = hook(state);
            sink.publish(RunEvent::AfterEach {
                test: test.to_string(),
                row,
                ok: result.is_ok(),
            });
            if let Err(f) = result {
                failure.get_or_insert(f.message);
            }
        }

        let outcome = match failure {
            None => Outcome::Passed,
            Some(message) => Outcome::Failed { message },
        };
        sink.publish(RunEvent::TestFinished {
            test: test.to_string(),
            row,
            outcome: outcome.clone(),
        });
        if self.log_invocations {
            info!("[Runner] {test}{}: {}", row_suffix(row), outcome.label());
        }

        InvocationRecord {
            test: test.to_string(),
            row,
            outcome,
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

fn skip_test(name: &str, sink: &dyn EventSink) -> InvocationRecord {
    sink.publish(RunEvent::TestSkipped {
        test: name.to_string(),
    });
    InvocationRecord {
        test: name.to_string(),
        row: None,
        outcome: Outcome::Skipped,
    }
}

fn row_suffix(row: Option<usize>) -> String {
    row.map(|index| format!(" [row {index}]")).unwrap_or_default()
}

#[cfg(test)]
mod tests;
