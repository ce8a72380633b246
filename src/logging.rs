//! Structured logging for the dashboard service.
//!
//! Every record is one JSON line on stdout. When `LOG_DIR` is set, records are
//! also appended to `LOG_DIR/<run_id>/events.jsonl` (info and above) and
//! `trace.jsonl` (trace/debug), next to a `manifest.json` describing the run.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use crate::view::LogLevel;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or(Level::Info)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Http,    // Requests, responses
    View,    // Reducer commands
    Session, // Session lifecycle, reveal timer
    Assets,  // Chart asset lookups
    Summary, // Readiness data loading
    Generate, // Synthetic dataset output
    System,  // Startup, shutdown
    Profile, // Timing scopes
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Http => "http",
            Domain::View => "view",
            Domain::Session => "session",
            Domain::Assets => "assets",
            Domain::Summary => "summary",
            Domain::Generate => "generate",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static PROFILE_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
    trace: Option<Mutex<BufWriter<File>>>,
}

fn open_log(path: PathBuf) -> Option<Mutex<BufWriter<File>>> {
    match File::create(&path) {
        Ok(f) => Some(Mutex::new(BufWriter::new(f))),
        Err(err) => {
            eprintln!("[log] failed to create {}: {}", path.display(), err);
            None
        }
    }
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("d-{}-{}", ts_epoch_ms(), process::id()));

        let Ok(base) = std::env::var("LOG_DIR") else {
            return RunContext {
                run_id,
                events: None,
                trace: None,
            };
        };

        let run_dir = PathBuf::from(base).join(&run_id);
        if let Err(err) = create_dir_all(&run_dir) {
            eprintln!("[log] failed to create run dir: {}", err);
            return RunContext {
                run_id,
                events: None,
                trace: None,
            };
        }

        let _ = std::fs::write(
            run_dir.join("manifest.json"),
            json!({
                "run_id": run_id,
                "ts": ts_now(),
                "pid": process::id(),
                "log_dir": run_dir.to_string_lossy(),
            })
            .to_string(),
        );

        RunContext {
            events: open_log(run_dir.join("events.jsonl")),
            trace: open_log(run_dir.join("trace.jsonl")),
            run_id,
        }
    })
}

fn sanitize_fields(mut fields: Map<String, Value>) -> Map<String, Value> {
    let redacted = Value::String("[REDACTED]".to_string());
    for key in ["cookie", "Cookie", "set-cookie", "session_id"] {
        if fields.contains_key(key) {
            fields.insert(key.to_string(), redacted.clone());
        }
    }
    fields
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["method", "path", "status", "metric_id", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn write_line(writer: &Option<Mutex<BufWriter<File>>>, line: &str) {
    if let Some(writer) = writer {
        if let Ok(mut w) = writer.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Epoch milliseconds
pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    let min_level = Level::from_env();
    if level < min_level || !domain.is_enabled() {
        return;
    }

    emit_record(level, domain.as_str(), event, fields);
}

fn build_record(
    run_id: &str,
    seq: u64,
    level: Level,
    component: &str,
    event: &str,
    fields: Map<String, Value>,
) -> Value {
    let fields = sanitize_fields(fields);
    let (mut top, data) = split_fields(fields);

    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(seq));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry)
}

fn emit_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let line = build_record(&ctx.run_id, next_seq(), level, component, event, fields).to_string();
    match level {
        Level::Trace | Level::Debug => write_line(&ctx.trace, &line),
        _ => write_line(&ctx.events, &line),
    }
    println!("{}", line);
}

// =============================================================================
// Domain helpers
// =============================================================================

pub fn log_request(method: &str, path: &str, status: u16, elapsed_ms: f64) {
    let level = if status >= 500 {
        Level::Error
    } else if status >= 400 {
        Level::Warn
    } else {
        Level::Info
    };
    log(
        level,
        Domain::Http,
        "request",
        obj(&[
            ("method", v_str(method)),
            ("path", v_str(path)),
            ("status", json!(status)),
            ("elapsed_ms", v_num(elapsed_ms)),
        ]),
    );
}

pub fn log_selection(metric_id: &str, state_hash: u64) {
    log(
        Level::Info,
        Domain::View,
        "select",
        obj(&[
            ("metric_id", v_str(metric_id)),
            ("state_hash", v_str(&format!("{:016x}", state_hash))),
        ]),
    );
}

/// Reducer `Command::Log` passthrough
pub fn log_view(level: LogLevel, msg: &str) {
    log(level.into(), Domain::View, "reducer", obj(&[("msg", v_str(msg))]));
}

pub fn log_asset_miss(path: &str, reason: &str) {
    log(
        Level::Warn,
        Domain::Assets,
        "asset_miss",
        obj(&[("path", v_str(path)), ("reason", v_str(reason))]),
    );
}

// =============================================================================
// Field helpers
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits structured timing on drop.
pub struct ProfileScope {
    label: &'static str,
    context: Option<Map<String, Value>>,
    started: Instant,
    enabled: bool,
}

impl ProfileScope {
    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        let enabled = Self::should_sample();
        Self {
            label,
            context: if enabled { Some(obj(fields)) } else { None },
            started: Instant::now(),
            enabled,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn should_sample() -> bool {
        std::env::var("PROFILE_SAMPLE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .map(sample_bucket)
            .unwrap_or(true)
    }
}

fn sample_bucket(p: f64) -> bool {
    if p >= 1.0 {
        true
    } else if p <= 0.0 {
        false
    } else {
        let seq = PROFILE_SEQ.fetch_add(1, Ordering::SeqCst);
        let bucket = (seq % 10_000) as f64 / 10_000.0;
        bucket < p
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if !self.enabled {
            return;
        }
        let mut fields = self.context.take().unwrap_or_default();
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(self.elapsed_ms()));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}

// =============================================================================
// Tests
// =============================================================================
