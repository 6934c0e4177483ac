use serde_json::json;

use super::*;
use crate::check::ensure_eq;
use crate::check::ensure_true;
use crate::events::{NullSink, RecordingSink};
use crate::plan::{DataRow, PlanBuilder, TestDescriptor};

/// Shared state counting hook/body activity per run.
#[derive(Default)]
struct Trace {
    before_each: u32,
    after_each: u32,
    bodies: Vec<String>,
    after_all_ran: bool,
}

fn counting_plan(builder: PlanBuilder<Trace>) -> PlanBuilder<Trace> {
    builder
        .before_each(|trace: &mut Trace| {
            trace.before_each += 1;
            Ok(())
        })
        .after_each(|trace: &mut Trace| {
            trace.after_each += 1;
            Ok(())
        })
        .after_all(|trace: &mut Trace| {
            trace.after_all_ran = true;
            Ok(())
        })
}

#[test]
fn hooks_pair_exactly_once_even_when_body_fails() {
    let mut plan = counting_plan(PlanBuilder::new("suite"))
        .test("failing", 1, |trace: &mut Trace| {
            trace.bodies.push("failing".to_string());
            ensure_true(false, "forced failure")
        })
        .test("passing", 2, |trace: &mut Trace| {
            trace.bodies.push("passing".to_string());
            Ok(())
        })
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);

    assert_eq!(trace.before_each, 2);
    assert_eq!(trace.after_each, 2);
    assert_eq!(trace.bodies, vec!["failing", "passing"]);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.passed(), 1);
    assert_eq!(report.failure_message("failing"), Some("forced failure"));
}

#[test]
fn tests_run_in_ascending_priority_order() {
    let mut plan = counting_plan(PlanBuilder::new("suite"))
        .test("third", 3, |trace: &mut Trace| {
            trace.bodies.push("third".to_string());
            Ok(())
        })
        .test("first", 1, |trace: &mut Trace| {
            trace.bodies.push("first".to_string());
            Ok(())
        })
        .test("second", 2, |trace: &mut Trace| {
            trace.bodies.push("second".to_string());
            Ok(())
        })
        .build()
        .unwrap();

    let mut trace = Trace::default();
    Runner::new().execute(&mut plan, &mut trace, &NullSink);
    assert_eq!(trace.bodies, vec!["first", "second", "third"]);
}

#[test]
fn disabled_tests_never_execute_and_never_trigger_hooks() {
    let mut plan = counting_plan(PlanBuilder::new("suite"))
        .test_with(
            TestDescriptor::new("dormant", 1).disabled(),
            |trace: &mut Trace| {
                trace.bodies.push("dormant".to_string());
                Ok(())
            },
        )
        .test("active", 2, |trace: &mut Trace| {
            trace.bodies.push("active".to_string());
            Ok(())
        })
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);

    assert_eq!(trace.bodies, vec!["active"]);
    assert_eq!(trace.before_each, 1);
    assert_eq!(trace.after_each, 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.passed(), 1);
}

#[test]
fn fatal_before_all_skips_everything_but_still_cleans_up() {
    let mut plan = counting_plan(PlanBuilder::new("suite"))
        .before_all(|_: &mut Trace| ensure_true(false, "resource unavailable"))
        .test("never", 1, |trace: &mut Trace| {
            trace.bodies.push("never".to_string());
            Ok(())
        })
        .test("also_never", 2, |trace: &mut Trace| {
            trace.bodies.push("also_never".to_string());
            Ok(())
        })
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);

    assert!(trace.bodies.is_empty());
    assert_eq!(trace.before_each, 0);
    assert_eq!(trace.after_each, 0);
    assert!(trace.after_all_ran, "after_all is a cleanup guarantee");
    assert_eq!(report.skipped(), 2);
    assert_eq!(report.fatal.as_deref(), Some("resource unavailable"));
    assert!(report.has_failures());
}

#[test]
fn fatal_cleanup_policy_can_be_disabled() {
    let mut plan = counting_plan(PlanBuilder::new("suite"))
        .before_all(|_: &mut Trace| ensure_true(false, "boom"))
        .test("never", 1, |_: &mut Trace| Ok(()))
        .build()
        .unwrap();

    let config = ExecutionConfig {
        after_all_on_fatal: false,
        log_invocations: false,
    };
    let mut trace = Trace::default();
    Runner::with_config(&config).execute(&mut plan, &mut trace, &NullSink);
    assert!(!trace.after_all_ran);
}

#[test]
fn data_driven_test_expands_one_invocation_per_row() {
    let rows = vec![
        DataRow::new(vec![json!(1), json!(2)], json!(3)),
        DataRow::new(vec![json!(5), json!(10)], json!(15)),
        DataRow::new(vec![json!(100), json!(200)], json!(301)),
    ];
    let mut plan = counting_plan(PlanBuilder::new("suite"))
        .data_driven(
            TestDescriptor::new("sum_rows", 1),
            rows,
            |_: &mut Trace, row| {
                let sum = row.input_i64(0)? + row.input_i64(1)?;
                ensure_eq(&sum, &row.expected_i64()?, "sum should match row")
            },
        )
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);

    assert_eq!(report.records.len(), 3);
    assert_eq!(trace.before_each, 3);
    assert_eq!(trace.after_each, 3);
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.records[2].row, Some(2));
    assert!(report.records[2].outcome.is_failed());
}

#[test]
fn failed_before_each_skips_body_but_runs_after_each() {
    let mut plan = PlanBuilder::new("suite")
        .before_each(|_: &mut Trace| ensure_true(false, "per-test setup broke"))
        .after_each(|trace: &mut Trace| {
            trace.after_each += 1;
            Ok(())
        })
        .test("victim", 1, |trace: &mut Trace| {
            trace.bodies.push("victim".to_string());
            Ok(())
        })
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);

    assert!(trace.bodies.is_empty());
    assert_eq!(trace.after_each, 1);
    assert_eq!(
        report.failure_message("victim"),
        Some("per-test setup broke")
    );
}

#[test]
fn failed_after_each_fails_an_otherwise_passing_invocation() {
    let mut plan = PlanBuilder::new("suite")
        .after_each(|_: &mut Trace| ensure_true(false, "teardown broke"))
        .test("victim", 1, |_: &mut Trace| Ok(()))
        .test("sibling", 2, |trace: &mut Trace| {
            trace.bodies.push("sibling".to_string());
            Ok(())
        })
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);

    assert_eq!(report.failure_message("victim"), Some("teardown broke"));
    // Sibling invocations are unaffected by a per-test hook failure.
    assert_eq!(trace.bodies, vec!["sibling"]);
}

#[test]
fn body_failure_message_wins_over_after_each_failure() {
    let mut plan = PlanBuilder::new("suite")
        .after_each(|_: &mut Trace| ensure_true(false, "teardown broke"))
        .test("victim", 1, |_: &mut Trace| ensure_true(false, "body broke"))
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);
    assert_eq!(report.failure_message("victim"), Some("body broke"));
}

#[test]
fn after_all_failure_lands_on_the_report_not_a_test() {
    let mut plan = PlanBuilder::new("suite")
        .after_all(|_: &mut Trace| ensure_true(false, "suite teardown broke"))
        .test("only", 1, |_: &mut Trace| Ok(()))
        .build()
        .unwrap();

    let mut trace = Trace::default();
    let report = Runner::new().execute(&mut plan, &mut trace, &NullSink);

    assert_eq!(report.passed(), 1);
    assert_eq!(report.failed(), 0);
    assert_eq!(
        report.after_all_failure.as_deref(),
        Some("suite teardown broke")
    );
    assert!(report.has_failures());
}

#[test]
fn event_stream_orders_lifecycle_boundaries() {
    let mut plan = PlanBuilder::new("suite")
        .before_all(|_: &mut Trace| Ok(()))
        .before_each(|_: &mut Trace| Ok(()))
        .after_each(|_: &mut Trace| Ok(()))
        .after_all(|_: &mut Trace| Ok(()))
        .test("only", 1, |_: &mut Trace| Ok(()))
        .build()
        .unwrap();

    let sink = RecordingSink::new();
    let mut trace = Trace::default();
    Runner::new().execute(&mut plan, &mut trace, &sink);

    let kinds: Vec<&'static str> = sink
        .snapshot()
        .iter()
        .map(|event| match event {
            RunEvent::RunStarted { .. } => "run_started",
            RunEvent::BeforeAll { .. } => "before_all",
            RunEvent::TestSkipped { .. } => "test_skipped",
            RunEvent::BeforeEach { .. } => "before_each",
            RunEvent::TestStarted { .. } => "test_started",
            RunEvent::TestFinished { .. } => "test_finished",
            RunEvent::AfterEach { .. } => "after_each",
            RunEvent::AfterAll { .. } => "after_all",
            RunEvent::RunFinished { .. } => "run_finished",
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "run_started",
            "before_all",
            "before_each",
            "test_started",
            "after_each",
            "test_finished",
            "after_all",
            "run_finished",
        ]
    );
}
