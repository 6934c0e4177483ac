//! Bundled demonstration fixture.
//!
//! A three-test suite exercising the whole lifecycle surface: one hook per
//! phase, ascending priorities, a before-all side effect observed by a test
//! body, and a disabled data-driven test whose rows therefore never run.

use log::info;
use serde_json::json;

use crate::check::{ensure_eq, ensure_not_empty, ensure_some};
use crate::error::PlanError;
use crate::plan::{DataRow, FixturePlan, PlanBuilder, TestDescriptor};

/// Suite-level state threaded through hooks and test bodies.
#[derive(Debug, Default)]
pub struct SampleState {
    /// Resource initialized by before-all; visible to every invocation.
    pub greeting: Option<String>,
    /// Bumped by before-each; counts wrapped invocations.
    pub invocations_seen: u32,
}

impl SampleState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Data table for the disabled sum test: (a, b, expected).
pub fn sum_rows() -> Vec<DataRow> {
    vec![
        DataRow::new(vec![json!(1), json!(2)], json!(3)),
        DataRow::new(vec![json!(5), json!(10)], json!(15)),
        DataRow::new(vec![json!(100), json!(200)], json!(300)),
    ]
}

/// Build the demonstration plan.
pub fn sample_plan() -> Result<FixturePlan<SampleState>, PlanError> {
    PlanBuilder::new("sample-suite")
        .before_all(|state: &mut SampleState| {
            info!("=== suite setup ===");
            state.greeting = Some("Hello TestNG".to_string());
            Ok(())
        })
        .after_all(|_: &mut SampleState| {
            info!("=== suite teardown ===");
            Ok(())
        })
        .before_each(|state: &mut SampleState| {
            state.invocations_seen += 1;
            info!("--- before test ---");
            Ok(())
        })
        .after_each(|_: &mut SampleState| {
            info!("--- after test ---");
            Ok(())
        })
        .test_with(
            TestDescriptor::new("string_equals", 1).describe("verifies string equality"),
            |state: &mut SampleState| {
                ensure_some(&state.greeting, "greeting should be initialised by before_all")?;
                let actual = state.greeting.clone().unwrap_or_default();
                ensure_eq(&actual.as_str(), &"Hello TestNG", "strings should be equal")
            },
        )
        .test_with(
            TestDescriptor::new("number_sum", 2).describe("verifies numeric calculation"),
            |_: &mut SampleState| {
                let a = 10;
                let b = 20;
                let sum = a + b;
                ensure_eq(&sum, &30, "result should equal 30")
            },
        )
        .test_with(
            TestDescriptor::new("array_not_empty", 3).describe("verifies array is not empty"),
            |_: &mut SampleState| {
                let items = vec!["元素1", "元素2", "元素3"];
                ensure_not_empty(&items, "array should contain elements")
            },
        )
        .data_driven(
            TestDescriptor::new("data_driven_sum", 4)
                .disabled()
                .describe("data-driven sum example"),
            sum_rows(),
            |_: &mut SampleState, row| {
                let a = row.input_i64(0)?;
                let b = row.input_i64(1)?;
                let expected = row.expected_i64()?;
                ensure_eq(
                    &(a + b),
                    &expected,
                    &format!("{a} + {b} should equal {expected}"),
                )
            },
        )
        .build()
}
