//! flightpad-core: Shared types, configuration, and error definitions.
//!
//! This crate holds everything the protocol engine and its callers agree
//! on without pulling in any I/O: the error taxonomy, the consolidated
//! [`ControlConfig`] value object, and the [`ClientEvent`] notification
//! enum.
//!
//! # Key types
//!
//! - [`ControlConfig`] -- the one explicit configuration object
//! - [`ClientEvent`] -- liveness and discovery change notifications
//! - [`Error`] / [`Result`] -- error handling

pub mod config;
pub mod error;
pub mod events;

// Re-export key types at crate root for ergonomic `use flightpad_core::*`.
pub use config::{AxisTuning, ControlBindings, ControlConfig, ControlToggles};
pub use error::{Error, Result};
pub use events::ClientEvent;
