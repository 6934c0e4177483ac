//! Declarative fixture plans: lifecycle hooks plus prioritized tests.
//!
//! A plan replaces annotation scanning with explicit registration: the
//! fixture author hands a [`PlanBuilder`] one hook per lifecycle phase and
//! an ordered list of test functions, each carrying a [`TestDescriptor`]
//! with its priority and enabled flag. `build()` validates the declaration
//! the same way a catalog load would: identity, name uniqueness, hook
//! uniqueness per phase, and data table shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::check::{CheckFailure, CheckResult};
use crate::error::PlanError;

/// Lifecycle phases a hook can bind to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    BeforeAll,
    AfterAll,
    BeforeEach,
    AfterEach,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HookPhase::BeforeAll => "before_all",
            HookPhase::AfterAll => "after_all",
            HookPhase::BeforeEach => "before_each",
            HookPhase::AfterEach => "after_each",
        };
        f.write_str(label)
    }
}

/// Immutable metadata identifying one test operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestDescriptor {
    pub name: String,
    /// Lower priorities run first; declaration order breaks ties.
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl TestDescriptor {
    pub fn new(name: impl Into<String>, priority: i32) -> Self {
        Self {
            name: name.into(),
            priority,
            enabled: true,
            description: None,
        }
    }

    /// Mark the test as declared-but-skipped.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Attach a human-readable description.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

fn default_enabled() -> bool {
    true
}

/// One parameter tuple driving a single invocation of a data-driven test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataRow {
    pub inputs: Vec<Value>,
    pub expected: Value,
}

impl DataRow {
    pub fn new(inputs: Vec<Value>, expected: Value) -> Self {
        Self { inputs, expected }
    }

    /// Read an input as i64, failing the invocation on absence or wrong type.
    pub fn input_i64(&self, index: usize) -> Result<i64, CheckFailure> {
        self.inputs
            .get(index)
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                CheckFailure::new(format!("data row input {} is not an integer", index))
            })
    }

    /// Read the expected value as i64.
    pub fn expected_i64(&self) -> Result<i64, CheckFailure> {
        self.expected.as_i64().ok_or_else(|| {
            CheckFailure::new("data row expected value is not an integer".to_string())
        })
    }
}

/// Hook function bound to one lifecycle phase.
pub type HookFn<S> = Box<dyn FnMut(&mut S) -> CheckResult>;

/// Body of a registered test.
pub enum TestBody<S> {
    /// Single invocation per run.
    Simple(Box<dyn FnMut(&mut S) -> CheckResult>),
    /// One invocation per data row, each with its own outcome.
    DataDriven {
        rows: Vec<DataRow>,
        body: Box<dyn FnMut(&mut S, &DataRow) -> CheckResult>,
    },
}

/// Descriptor plus executable body.
pub struct TestCase<S> {
    pub descriptor: TestDescriptor,
    pub body: TestBody<S>,
}

/// At most one hook per phase.
pub struct Hooks<S> {
    pub before_all: Option<HookFn<S>>,
    pub after_all: Option<HookFn<S>>,
    pub before_each: Option<HookFn<S>>,
    pub after_each: Option<HookFn<S>>,
}

/// Validated, immutable declaration of a fixture run.
pub struct FixturePlan<S> {
    id: String,
    pub(crate) hooks: Hooks<S>,
    pub(crate) tests: Vec<TestCase<S>>,
}

impl<S> fmt::Debug for FixturePlan<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixturePlan")
            .field("id", &self.id)
            .field("tests", &self.tests.len())
            .finish_non_exhaustive()
    }
}

impl<S> FixturePlan<S> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TestDescriptor> {
        self.tests.iter().map(|test| &test.descriptor)
    }

    /// Indices into `tests` in execution order: ascending priority, stable
    /// on ties so declaration order wins.
    pub(crate) fn execution_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.tests.len()).collect();
        order.sort_by_key(|&index| self.tests[index].descriptor.priority);
        order
    }
}

/// Builder collecting declarative registrations before validation.
pub struct PlanBuilder<S> {
    id: String,
    hooks: Hooks<S>,
    tests: Vec<TestCase<S>>,
    duplicate_hook: Option<HookPhase>,
}

impl<S> PlanBuilder<S> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hooks: Hooks {
                before_all: None,
                after_all: None,
                before_each: None,
                after_each: None,
            },
            tests: Vec::new(),
            duplicate_hook: None,
        }
    }

    pub fn before_all(self, hook: impl FnMut(&mut S) -> CheckResult + 'static) -> Self {
        self.register_hook(HookPhase::BeforeAll, Box::new(hook))
    }

    pub fn after_all(self, hook: impl FnMut(&mut S) -> CheckResult + 'static) -> Self {
        self.register_hook(HookPhase::AfterAll, Box::new(hook))
    }

    pub fn before_each(self, hook: impl FnMut(&mut S) -> CheckResult + 'static) -> Self {
        self.register_hook(HookPhase::BeforeEach, Box::new(hook))
    }

    pub fn after_each(self, hook: impl FnMut(&mut S) -> CheckResult + 'static) -> Self {
        self.register_hook(HookPhase::AfterEach, Box::new(hook))
    }

    fn register_hook(mut self, phase: HookPhase, hook: HookFn<S>) -> Self {
        let slot = match phase {
            HookPhase::BeforeAll => &mut self.hooks.before_all,
            HookPhase::AfterAll => &mut self.hooks.after_all,
            HookPhase::BeforeEach => &mut self.hooks.before_each,
            HookPhase::AfterEach => &mut self.hooks.after_each,
        };
        if slot.is_some() {
            self.duplicate_hook.get_or_insert(phase);
        } else {
            *slot = Some(hook);
        }
        self
    }

    /// Register an enabled test with default metadata.
    pub fn test(
        self,
        name: impl Into<String>,
        priority: i32,
        body: impl FnMut(&mut S) -> CheckResult + 'static,
    ) -> Self {
        self.test_with(TestDescriptor::new(name, priority), body)
    }

    /// Register a test with full descriptor control (disabled, description).
    pub fn test_with(
        mut self,
        descriptor: TestDescriptor,
        body: impl FnMut(&mut S) -> CheckResult + 'static,
    ) -> Self {
        self.tests.push(TestCase {
            descriptor,
            body: TestBody::Simple(Box::new(body)),
        });
        self
    }

    /// Register a data-driven test expanded into one invocation per row.
    pub fn data_driven(
        mut self,
        descriptor: TestDescriptor,
        rows: Vec<DataRow>,
        body: impl FnMut(&mut S, &DataRow) -> CheckResult + 'static,
    ) -> Self {
        self.tests.push(TestCase {
            descriptor,
            body: TestBody::DataDriven {
                rows,
                body: Box::new(body),
            },
        });
        self
    }

    /// Validate the declaration and freeze it into a runnable plan.
    pub fn build(self) -> Result<FixturePlan<S>, PlanError> {
        if self.id.trim().is_empty() {
            return Err(PlanError::EmptyFixtureId);
        }
        if let Some(phase) = self.duplicate_hook {
            return Err(PlanError::DuplicateHook { phase });
        }
        if self.tests.is_empty() {
            return Err(PlanError::NoTests);
        }

        let mut seen = HashSet::new();
        for test in &self.tests {
            let name = test.descriptor.name.trim();
            if name.is_empty() {
                return Err(PlanError::EmptyTestName);
            }
            if !seen.insert(name.to_string()) {
                return Err(PlanError::DuplicateTest {
                    name: name.to_string(),
                });
            }
            if let TestBody::DataDriven { rows, .. } = &test.body {
                if rows.is_empty() {
                    return Err(PlanError::EmptyDataTable {
                        test: name.to_string(),
                    });
                }
            }
        }

        Ok(FixturePlan {
            id: self.id,
            hooks: self.hooks,
            tests: self.tests,
        })
    }
}
