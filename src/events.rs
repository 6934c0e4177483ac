//! Structured lifecycle events emitted by the runner.
//!
//! Every lifecycle boundary publishes a [`RunEvent`] to an injected
//! [`EventSink`], so ordering can be asserted in tests instead of scraped
//! from text output. [`EventLog`] retains a bounded history of events with
//! a serializable snapshot for CLI reporting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use log::info;
use serde::{Deserialize, Serialize};

use crate::report::Outcome;

/// Lifecycle and test boundary events, in publication order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted {
        fixture: String,
    },
    BeforeAll {
        ok: bool,
    },
    TestSkipped {
        test: String,
    },
    BeforeEach {
        test: String,
        row: Option<usize>,
        ok: bool,
    },
    TestStarted {
        test: String,
        row: Option<usize>,
    },
    TestFinished {
        test: String,
        row: Option<usize>,
        outcome: Outcome,
    },
    AfterEach {
        test: String,
        row: Option<usize>,
        ok: bool,
    },
    AfterAll {
        ok: bool,
    },
    RunFinished {
        passed: usize,
        failed: usize,
        skipped: usize,
    },
}

impl RunEvent {
    /// Single-line rendering for log sinks.
    pub fn describe(&self) -> String {
        fn slot(row: &Option<usize>) -> String {
            row.map(|index| format!("[row {index}]")).unwrap_or_default()
        }

        match self {
            RunEvent::RunStarted { fixture } => format!("run started: {fixture}"),
            RunEvent::BeforeAll { ok } => format!("before_all ok={ok}"),
            RunEvent::TestSkipped { test } => format!("skipped {test}"),
            RunEvent::BeforeEach { test, row, ok } => {
                format!("before_each {test}{} ok={ok}", slot(row))
            }
            RunEvent::TestStarted { test, row } => format!("running {test}{}", slot(row)),
            RunEvent::TestFinished { test, row, outcome } => {
                format!("finished {test}{}: {}", slot(row), outcome.label())
            }
            RunEvent::AfterEach { test, row, ok } => {
                format!("after_each {test}{} ok={ok}", slot(row))
            }
            RunEvent::AfterAll { ok } => format!("after_all ok={ok}"),
            RunEvent::RunFinished {
                passed,
                failed,
                skipped,
            } => format!("run finished: {passed} passed, {failed} failed, {skipped} skipped"),
        }
    }
}

/// Consumer of lifecycle events. Publication is synchronous and must not
/// fail; sinks swallow their own delivery problems.
pub trait EventSink {
    fn publish(&self, event: RunEvent);
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: RunEvent) {}
}

/// In-memory sink capturing events in publication order, for assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<RunEvent> {
        self.events.lock().expect("event capture poisoned").clone()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: RunEvent) {
        self.events
            .lock()
            .expect("event capture poisoned")
            .push(event);
    }
}

/// Sink forwarding each event to the `log` facade.
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: RunEvent) {
        info!("[Fixture] {}", event.describe());
    }
}

/// Snapshot of event log state for CLI reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogSnapshot {
    pub recent: Vec<RunEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Sink retaining a bounded history of events.
pub struct EventLog {
    history: Mutex<VecDeque<RunEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl EventLog {
    pub fn new(history_capacity: usize) -> Self {
        // A zero capacity would never hit the eviction check and grow
        // without bound; retain at least one event.
        let history_capacity = history_capacity.max(1);
        Self {
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> EventLogSnapshot {
        let history = self.history.lock().expect("history poisoned");
        EventLogSnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventSink for EventLog {
    fn publish(&self, event: RunEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        let mut history = self.history.lock().expect("history poisoned");
        if history.len() == self.history_capacity {
            history.pop_front();
            self.dropped_history.fetch_add(1, Ordering::Relaxed);
        }
        history.push_back(event);
    }
}
