//! Value-level assertions for hook and test bodies.
//!
//! A failed check is a value, not a panic: helpers return [`CheckFailure`]
//! so a `?` inside a test body aborts only that invocation's remaining
//! statements. Sibling invocations and the fixture itself keep running.

use std::fmt;

/// Outcome of a single check or of a whole hook/test body.
pub type CheckResult = Result<(), CheckFailure>;

/// Descriptive failure raised by an assertion helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    pub message: String,
}

impl CheckFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "check failed: {}", self.message)
    }
}

impl std::error::Error for CheckFailure {}

/// Compare actual against expected, failing with the supplied message plus
/// both values on mismatch.
pub fn ensure_eq<T>(actual: &T, expected: &T, message: &str) -> CheckResult
where
    T: PartialEq + fmt::Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(CheckFailure::new(format!(
            "{} (expected {:?}, got {:?})",
            message, expected, actual
        )))
    }
}

/// Fail with the supplied message unless the condition holds.
pub fn ensure_true(condition: bool, message: &str) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(CheckFailure::new(message))
    }
}

/// Fail unless the option carries a value.
pub fn ensure_some<T>(value: &Option<T>, message: &str) -> CheckResult {
    if value.is_some() {
        Ok(())
    } else {
        Err(CheckFailure::new(message))
    }
}

/// Fail unless the slice contains at least one element.
pub fn ensure_not_empty<T>(items: &[T], message: &str) -> CheckResult {
    if items.is_empty() {
        Err(CheckFailure::new(format!("{} (slice was empty)", message)))
    } else {
        Ok(())
    }
}
