//! Dashboard view state machine.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Controls   │────►│  ViewEvent   │────►│   Reducer    │
//! │  (buttons)   │     │ Select/Reveal│     │  (pure fn)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                                                  │
//!                                                  ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │   Commands   │◄────│  ViewState   │
//!                      │ (reveal/log) │     │  (hashed)    │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! Everything the page shows (active control, chart source, heading and
//! description) derives from [`state::ViewState`]; there is no second copy
//! of the selection to keep in sync.

pub mod events;
pub mod state;
pub mod reducer;

pub use events::{Command, LogLevel, ViewEvent};
pub use reducer::{current_descriptor, initialize, reduce, select_metric, ReducerOutput, ViewConfig};
pub use state::ViewState;
