//! Session runtime: owns a [`ViewState`] and executes reducer commands.
//!
//! The reducer stays pure; this module is where the one-shot reveal timer is
//! actually scheduled. Each session serializes its transitions behind its own
//! lock, so a selection made before the reveal fires is kept.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::time::Instant;

use crate::catalog::Catalog;
use crate::error::{DashboardError, Result};
use crate::logging::{log, log_selection, log_view, obj, v_num, v_str, Domain, Level};
use crate::view::{initialize, reduce, Command, ReducerOutput, ViewConfig, ViewEvent, ViewState};

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "dash_session";

#[derive(Debug)]
struct SessionInner {
    id: String,
    catalog: Arc<Catalog>,
    state: Mutex<ViewState>,
    last_seen: Mutex<Instant>,
}

#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Initialize the view and run its startup commands.
    pub fn start(id: String, catalog: Arc<Catalog>, cfg: &ViewConfig) -> Self {
        let (state, commands) = initialize(&catalog, cfg);
        let session = Self {
            inner: Arc::new(SessionInner {
                id,
                catalog,
                state: Mutex::new(state),
                last_seen: Mutex::new(Instant::now()),
            }),
        };
        session.execute(commands);
        session
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn snapshot(&self) -> ViewState {
        match self.inner.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply one event and execute the resulting commands.
    pub fn dispatch(&self, event: ViewEvent) -> ReducerOutput {
        let is_select = matches!(event, ViewEvent::Select { .. });
        let output = {
            let mut state = match self.inner.state.lock() {
                Ok(s) => s,
                Err(poisoned) => poisoned.into_inner(),
            };
            let output = reduce(&state, event, &self.inner.catalog);
            *state = output.state.clone();
            output
        };
        if is_select {
            log_selection(&output.state.selected_metric_id, output.state_hash);
        }
        self.execute(output.commands.clone());
        output
    }

    pub fn touch(&self) {
        if let Ok(mut seen) = self.inner.last_seen.lock() {
            *seen = Instant::now();
        }
    }

    pub fn idle_for(&self) -> Duration {
        match self.inner.last_seen.lock() {
            Ok(seen) => seen.elapsed(),
            Err(poisoned) => poisoned.into_inner().elapsed(),
        }
    }

    fn execute(&self, commands: Vec<Command>) {
        for cmd in commands {
            match cmd {
                Command::ScheduleReveal { delay_ms } => self.schedule_reveal(delay_ms),
                Command::Log { level, msg } => log_view(level, &msg),
            }
        }
    }

    fn schedule_reveal(&self, delay_ms: u64) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let session = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    session.dispatch(ViewEvent::Revealed);
                    log(
                        Level::Debug,
                        Domain::Session,
                        "revealed",
                        obj(&[("delay_ms", v_num(delay_ms as f64))]),
                    );
                });
            }
            Err(_) => {
                // No runtime to defer onto: reveal right away.
                self.dispatch(ViewEvent::Revealed);
            }
        }
    }
}

fn new_session_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// Bounds on the live session set.
#[derive(Debug, Clone)]
pub struct SessionLimits {
    /// Sessions idle longer than this are pruned
    pub idle: Duration,
    /// At capacity, only sessions idle at least this long may be evicted
    pub grace: Duration,
    pub max_sessions: usize,
}

/// Live sessions keyed by id.
///
/// Only state-changing requests create sessions; reads without a known id
/// see [`SessionStore::fresh_state`] and never touch the store.
#[derive(Debug)]
pub struct SessionStore {
    catalog: Arc<Catalog>,
    view_cfg: ViewConfig,
    limits: SessionLimits,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(catalog: Arc<Catalog>, view_cfg: ViewConfig, limits: SessionLimits) -> Self {
        Self {
            catalog,
            view_cfg,
            limits: SessionLimits {
                max_sessions: limits.max_sessions.max(1),
                ..limits
            },
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Initial view for callers without a session.
    pub fn fresh_state(&self) -> ViewState {
        initialize(&self.catalog, &self.view_cfg).0
    }

    /// Start and register a session. At capacity the most idle session is
    /// evicted if it is past the grace period; otherwise the store is full.
    pub fn create(&self) -> Result<Session> {
        let mut sessions = match self.sessions.write() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        if sessions.len() >= self.limits.max_sessions {
            let evictable = sessions
                .values()
                .map(|s| (s.idle_for(), s.id().to_string()))
                .max()
                .filter(|(idle, _)| *idle >= self.limits.grace);
            match evictable {
                Some((_, id)) => {
                    sessions.remove(&id);
                    log(Level::Debug, Domain::Session, "evicted", obj(&[("reason", v_str("capacity"))]));
                }
                None => {
                    log(
                        Level::Warn,
                        Domain::Session,
                        "full",
                        obj(&[("live", v_num(sessions.len() as f64))]),
                    );
                    return Err(DashboardError::SessionsFull(sessions.len()));
                }
            }
        }

        let session = Session::start(new_session_id(), self.catalog.clone(), &self.view_cfg);
        sessions.insert(session.id().to_string(), session.clone());
        log(
            Level::Debug,
            Domain::Session,
            "created",
            obj(&[("live", v_num(sessions.len() as f64))]),
        );
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        let sessions = match self.sessions.read() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        let session = sessions.get(id).cloned()?;
        session.touch();
        Some(session)
    }

    /// Existing session for `id`, or a fresh one. The flag is true when created.
    pub fn get_or_create(&self, id: Option<&str>) -> Result<(Session, bool)> {
        if let Some(session) = id.and_then(|id| self.get(id)) {
            return Ok((session, false));
        }
        Ok((self.create()?, true))
    }

    /// Drop sessions idle longer than the configured limit.
    pub fn prune(&self) -> usize {
        let mut sessions = match self.sessions.write() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = sessions.len();
        sessions.retain(|_, s| s.idle_for() <= self.limits.idle);
        let removed = before - sessions.len();
        if removed > 0 {
            log(
                Level::Info,
                Domain::Session,
                "pruned",
                obj(&[
                    ("removed", v_num(removed as f64)),
                    ("live", v_num(sessions.len() as f64)),
                ]),
            );
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
