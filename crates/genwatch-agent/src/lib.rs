//! # Genwatch Agent
//!
//! Long-running integration for one standby generator controller.
//!
//! ## Lifecycle
//!
//! 1. **Setup**: both coordinators complete a first refresh, otherwise the
//!    integration is not ready and nothing is created
//! 2. **Run**: status and settings are polled on a fixed interval; every
//!    completed refresh logs the current entity states
//! 3. **Unload**: poll tasks are stopped and the coordinators dropped

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod runtime;

pub use config::AgentConfig;
pub use runtime::{Integration, IntegrationError};
