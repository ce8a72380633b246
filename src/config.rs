use std::path::PathBuf;
use std::time::Duration;

use crate::session::SessionLimits;
use crate::view::ViewConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub plots_dir: PathBuf,
    /// Readiness trends CSV; `/api/summary` and `/api/trend` are off without it
    pub data_csv: Option<PathBuf>,
    pub reveal_delay_ms: u64,
    pub session_idle_secs: u64,
    /// Minimum idle time before a session may be evicted at capacity
    pub session_grace_secs: u64,
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8765".to_string(),
            plots_dir: PathBuf::from("plots"),
            data_csv: None,
            reveal_delay_ms: 50,
            session_idle_secs: 3600,
            session_grace_secs: 60,
            max_sessions: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            bind: std::env::var("DASH_BIND").unwrap_or(d.bind),
            plots_dir: std::env::var("PLOTS_DIR").map(PathBuf::from).unwrap_or(d.plots_dir),
            data_csv: std::env::var("DATA_CSV").ok().filter(|v| !v.is_empty()).map(PathBuf::from),
            reveal_delay_ms: std::env::var("REVEAL_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.reveal_delay_ms),
            session_idle_secs: std::env::var("SESSION_IDLE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.session_idle_secs),
            session_grace_secs: std::env::var("SESSION_GRACE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.session_grace_secs),
            max_sessions: std::env::var("MAX_SESSIONS").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(d.max_sessions),
        }
    }

    pub fn limits(&self) -> SessionLimits {
        SessionLimits {
            idle: Duration::from_secs(self.session_idle_secs),
            grace: Duration::from_secs(self.session_grace_secs),
            max_sessions: self.max_sessions,
        }
    }

    pub fn view(&self) -> ViewConfig {
        ViewConfig {
            reveal_delay_ms: self.reveal_delay_ms,
        }
    }
}
