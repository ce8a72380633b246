//! AI readiness dashboard: pick one of a fixed set of metrics and view its
//! pre-rendered chart with a short description.
//!
//! The view logic ([`view`]) is a pure reducer over an immutable
//! [`view::ViewState`]; [`session`] executes its commands, [`render`] turns a
//! state into a page and [`server`] exposes it over HTTP.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generate;
pub mod logging;
pub mod render;
pub mod server;
pub mod session;
pub mod summary;
pub mod view;

pub use error::{DashboardError, Result};
