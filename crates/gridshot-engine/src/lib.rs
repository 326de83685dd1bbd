//! # Gridshot Engine
//!
//! Headless driver for the Gridshot simulation.
//!
//! This crate wires the simulation core to the outside world:
//! - TOML configuration with defaults and clamping
//! - Fixed-step tick pacing
//! - A scripted autopilot that plays a level through the public API
//! - JSON and CSV high-score stores

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod score_store;
pub mod timing;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::app::*;
    pub use crate::config::*;
    pub use crate::score_store::*;
    pub use crate::timing::*;
}

pub use prelude::*;
