// Plan registration error types and constants

use crate::error::ErrorCode;
use crate::plan::HookPhase;
use log::error;
use std::fmt;

/// Plan error code constants
///
/// These constants provide a single source of truth for error codes
/// reported by plan construction and validation.
///
/// Error code range: 2001-2006
pub struct PlanErrorCodes {}

impl PlanErrorCodes {
    /// Fixture identifier was empty or whitespace
    pub const EMPTY_FIXTURE_ID: i32 = 2001;

    /// A test was registered with an empty name
    pub const EMPTY_TEST_NAME: i32 = 2002;

    /// Two tests share the same name
    pub const DUPLICATE_TEST: i32 = 2003;

    /// A lifecycle hook was registered twice for the same phase
    pub const DUPLICATE_HOOK: i32 = 2004;

    /// A data-driven test declared an empty data table
    pub const EMPTY_DATA_TABLE: i32 = 2005;

    /// The plan declared no tests at all
    pub const NO_TESTS: i32 = 2006;
}

/// Log a plan error with structured context
///
/// Logs plan errors with the numeric code and the registration step the
/// error surfaced in. Non-blocking and will not panic on failure.
pub fn log_plan_error(err: &PlanError, context: &str) {
    error!(
        "Plan error in {}: code={}, component=PlanBuilder, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors surfaced while building or validating a fixture plan
///
/// These errors cover declarative registration: fixture identity, test
/// naming, hook uniqueness per phase, and data table shape.
///
/// Error code range: 2001-2006
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Fixture identifier was empty or whitespace
    EmptyFixtureId,

    /// A test was registered with an empty name
    EmptyTestName,

    /// Two tests share the same name
    DuplicateTest { name: String },

    /// A lifecycle hook was registered twice for the same phase
    DuplicateHook { phase: HookPhase },

    /// A data-driven test declared an empty data table
    EmptyDataTable { test: String },

    /// The plan declared no tests at all
    NoTests,
}

impl ErrorCode for PlanError {
    fn code(&self) -> i32 {
        match self {
            PlanError::EmptyFixtureId => PlanErrorCodes::EMPTY_FIXTURE_ID,
            PlanError::EmptyTestName => PlanErrorCodes::EMPTY_TEST_NAME,
            PlanError::DuplicateTest { .. } => PlanErrorCodes::DUPLICATE_TEST,
            PlanError::DuplicateHook { .. } => PlanErrorCodes::DUPLICATE_HOOK,
            PlanError::EmptyDataTable { .. } => PlanErrorCodes::EMPTY_DATA_TABLE,
            PlanError::NoTests => PlanErrorCodes::NO_TESTS,
        }
    }

    fn message(&self) -> String {
        match self {
            PlanError::EmptyFixtureId => "Fixture id cannot be empty".to_string(),
            PlanError::EmptyTestName => "Test name cannot be empty".to_string(),
            PlanError::DuplicateTest { name } => {
                format!("Duplicate test name registered: {}", name)
            }
            PlanError::DuplicateHook { phase } => {
                format!("Hook for phase {} registered more than once", phase)
            }
            PlanError::EmptyDataTable { test } => {
                format!("Data-driven test {} declared an empty data table", test)
            }
            PlanError::NoTests => "Plan must declare at least one test".to_string(),
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PlanError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for PlanError {}
