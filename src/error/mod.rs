// Error types for the fixture harness
//
// This module defines structured error types for plan registration and
// validation, providing error codes suitable for programmatic handling.

mod plan;

pub use plan::{log_plan_error, PlanError, PlanErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the harness surface.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
