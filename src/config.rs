//! Configuration for event retention and execution policy
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling policy adjustments without recompilation: event history size,
//! the after-all-on-fatal cleanup policy, and per-invocation logging.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub events: EventLogConfig,
    pub execution: ExecutionConfig,
}

/// Event log retention parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogConfig {
    /// Bounded history capacity for the event log sink
    pub history_capacity: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            history_capacity: 256,
        }
    }
}

/// Runner execution policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Run the after-all hook even when before-all failed fatally
    pub after_all_on_fatal: bool,
    /// Log each invocation outcome through the `log` facade
    pub log_invocations: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            after_all_on_fatal: true,
            log_invocations: true,
        }
    }
}

impl Default for HarnessConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            events: EventLogConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from JSON file
    ///
    /// Returns the parsed configuration, or the defaults when the file is
    /// missing or fails to parse (the problem is logged either way).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Could not read {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
