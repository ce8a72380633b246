//! Inputs to and outputs from the view reducer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    /// User picked a metric control
    Select { id: String },
    /// Post-mount reveal timer fired
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

/// Side effects requested by the reducer, executed by the session runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fire `ViewEvent::Revealed` once after `delay_ms`
    ScheduleReveal { delay_ms: u64 },
    Log { level: LogLevel, msg: String },
}
