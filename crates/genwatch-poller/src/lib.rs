//! # Genwatch Poller
//!
//! Poll coordinators for the generator controller.
//!
//! ## Coordinators
//!
//! Two independent coordinators run against the same device:
//! - **status**: `/index_data.html` (telemetry and the `lcd_status` register)
//! - **settings**: `/loads.html`, `/loads_data.html`, `/exercise.html`
//!
//! Each keeps the last good snapshot, refreshes on a fixed 30 second
//! interval, and coalesces concurrent refresh requests into a single
//! in-flight fetch. A failed refresh keeps serving the previous snapshot
//! while reporting the coordinator as unavailable.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod sources;

pub use coordinator::{Coordinator, PollTask, RefreshFailed, SetupError, POLL_INTERVAL};
pub use sources::{SettingsSource, SnapshotSource, SourceError, StatusSource};
