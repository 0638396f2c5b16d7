//! Device identity and the common entity surface.

use serde::Serialize;

/// Manufacturer reported for every entity.
pub const MANUFACTURER: &str = "Cummins";
/// Device display name.
pub const DEVICE_NAME: &str = "Cummins Generator";
/// Device model.
pub const MODEL: &str = "Generator";

/// Device registry information shared by every entity of one controller.
///
/// The host address is the only device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Host address
    pub identifier: String,
    /// Display name
    pub name: &'static str,
    /// Manufacturer
    pub manufacturer: &'static str,
    /// Model
    pub model: &'static str,
}

impl DeviceInfo {
    /// Device info for the controller at `host`.
    #[must_use]
    pub fn for_host(host: &str) -> Self {
        Self {
            identifier: host.to_string(),
            name: DEVICE_NAME,
            manufacturer: MANUFACTURER,
            model: MODEL,
        }
    }
}

/// Presentation hint for the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Electrical potential
    Voltage,
    /// AC frequency
    Frequency,
    /// Elapsed time
    Duration,
    /// Power presence
    Power,
    /// Something is running
    Running,
    /// Something needs attention
    Problem,
}

/// Host platform an entity registers under.
///
/// Keys are only unique within a platform: the `load_1` percentage sensor and
/// the `load_1` connection select share a unique id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Continuous readouts
    Sensor,
    /// Boolean flags
    BinarySensor,
    /// Enumerated settings
    Select,
    /// Momentary actions
    Button,
}

impl Platform {
    /// Platform name as the host platform spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::BinarySensor => "binary_sensor",
            Self::Select => "select",
            Self::Button => "button",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What every adapter exposes to the host platform.
///
/// Identity is the pair of [`Entity::platform`] and [`Entity::unique_id`].
pub trait Entity {
    /// Platform the entity registers under.
    fn platform(&self) -> Platform;

    /// Stable key within the device.
    fn key(&self) -> &'static str;

    /// Short name without the device prefix.
    fn short_name(&self) -> &'static str;

    /// Host of the owning device.
    fn host(&self) -> &str;

    /// Whether the current state can be trusted.
    fn available(&self) -> bool;

    /// Current state rendered as text, `None` if unknown.
    fn state(&self) -> Option<String>;

    /// Unique id within the platform, `<host>_<key>`.
    fn unique_id(&self) -> String {
        format!("{}_{}", self.host(), self.key())
    }

    /// Display name, `Cummins Generator <name>`.
    fn name(&self) -> String {
        format!("{DEVICE_NAME} {}", self.short_name())
    }

    /// Device the entity belongs to.
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo::for_host(self.host())
    }
}
