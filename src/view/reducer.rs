//! Pure reducer: (ViewState, ViewEvent) -> (ViewState, Vec<Command>)
//!
//! All view transitions happen here. The session runtime only executes the
//! returned commands.

use super::events::*;
use super::state::*;
use crate::catalog::{Catalog, MetricDescriptor};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Delay between first display and the reveal transition
    pub reveal_delay_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { reveal_delay_ms: 50 }
    }
}

/// Result of processing an event
#[derive(Debug)]
pub struct ReducerOutput {
    pub state: ViewState,
    pub commands: Vec<Command>,
    pub state_hash: u64,
}

impl ReducerOutput {
    fn new(state: ViewState, commands: Vec<Command>) -> Self {
        let state_hash = state.hash();
        Self {
            state,
            commands,
            state_hash,
        }
    }
}

/// Initial state plus the one-shot reveal schedule.
pub fn initialize(catalog: &Catalog, cfg: &ViewConfig) -> (ViewState, Vec<Command>) {
    let state = ViewState::new(catalog.first().id);
    let commands = vec![Command::ScheduleReveal {
        delay_ms: cfg.reveal_delay_ms,
    }];
    (state, commands)
}

/// Checked selection. Selecting the current metric returns an equal state.
pub fn select_metric(state: &ViewState, catalog: &Catalog, id: &str) -> Result<ViewState> {
    let entry = catalog
        .find(id)
        .ok_or_else(|| DashboardError::UnknownMetric(id.to_string()))?;
    Ok(ViewState {
        selected_metric_id: entry.id.to_string(),
        revealed: state.revealed,
    })
}

/// Catalog entry for the current selection.
pub fn current_descriptor<'a>(state: &ViewState, catalog: &'a Catalog) -> Result<&'a MetricDescriptor> {
    catalog
        .find(&state.selected_metric_id)
        .ok_or_else(|| DashboardError::InconsistentState(state.selected_metric_id.clone()))
}

/// Pure reducer function
pub fn reduce(state: &ViewState, event: ViewEvent, catalog: &Catalog) -> ReducerOutput {
    match event {
        ViewEvent::Select { id } => handle_select(state, id, catalog),
        ViewEvent::Revealed => handle_revealed(state),
    }
}

fn handle_select(state: &ViewState, id: String, catalog: &Catalog) -> ReducerOutput {
    // Controls only exist for catalog entries; a foreign id is a caller bug.
    debug_assert!(catalog.contains(&id), "unknown metric: {}", id);

    if id == state.selected_metric_id {
        return ReducerOutput::new(state.clone(), Vec::new());
    }

    match select_metric(state, catalog, &id) {
        Ok(next) => {
            let commands = vec![Command::Log {
                level: LogLevel::Debug,
                msg: format!("selected {} (was {})", next.selected_metric_id, state.selected_metric_id),
            }];
            ReducerOutput::new(next, commands)
        }
        Err(err) => {
            let commands = vec![Command::Log {
                level: LogLevel::Warn,
                msg: format!("selection ignored: {}", err),
            }];
            ReducerOutput::new(state.clone(), commands)
        }
    }
}

fn handle_revealed(state: &ViewState) -> ReducerOutput {
    if state.revealed {
        return ReducerOutput::new(state.clone(), Vec::new());
    }
    let mut next = state.clone();
    next.revealed = true;
    ReducerOutput::new(next, Vec::new())
}
