//! # Genwatch Entities
//!
//! Thin read/write projections of coordinator data for a host automation
//! platform:
//!
//! - [`Sensor`]: a snapshot field read verbatim
//! - [`BinarySensor`]: one bit-flag of the `lcd_status` register
//! - [`Select`]: an enumerated setting, readable and writable
//! - [`Button`]: a momentary action, write only
//!
//! Every reading adapter reports unavailable while its coordinator's last
//! refresh failed, even when a stale value is cached. Coordinators and the
//! command sender are handed in explicitly; there is no global registry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binary_sensor;
pub mod button;
pub mod catalog;
pub mod device;
pub mod select;
pub mod sensor;

#[cfg(test)]
pub(crate) mod testing;

pub use binary_sensor::BinarySensor;
pub use button::Button;
pub use catalog::{Entities, EntityState};
pub use device::{DeviceClass, DeviceInfo, Entity, Platform};
pub use select::{Select, SelectError};
pub use sensor::Sensor;
