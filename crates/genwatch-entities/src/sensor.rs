//! Continuous readouts.

use crate::device::{DeviceClass, Entity, Platform};
use genwatch_core::FieldValue;
use genwatch_poller::Coordinator;

/// Static description of a status readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescription {
    /// Snapshot field
    pub key: &'static str,
    /// Short name
    pub name: &'static str,
    /// Unit of measurement
    pub unit: Option<&'static str>,
    /// Presentation hint
    pub device_class: Option<DeviceClass>,
    /// Suggested decimals when displayed
    pub display_precision: Option<u8>,
}

const fn readout(
    key: &'static str,
    name: &'static str,
    unit: Option<&'static str>,
    device_class: Option<DeviceClass>,
) -> SensorDescription {
    SensorDescription {
        key,
        name,
        unit,
        device_class,
        display_precision: None,
    }
}

/// Readouts of the status coordinator.
pub const SENSORS: [SensorDescription; 7] = [
    readout("status", "Status", None, None),
    SensorDescription {
        display_precision: Some(1),
        ..readout("battery_voltage", "Battery Voltage", Some("V"), Some(DeviceClass::Voltage))
    },
    readout("output_voltage", "Output Voltage", Some("V"), Some(DeviceClass::Voltage)),
    readout("frequency", "Frequency", Some("Hz"), Some(DeviceClass::Frequency)),
    readout("engine_hours", "Engine Hours", Some("h"), Some(DeviceClass::Duration)),
    readout("load_1", "Load Line 1", Some("%"), None),
    readout("load_2", "Load Line 2", Some("%"), None),
];

/// A snapshot field exposed verbatim.
#[derive(Clone)]
pub struct Sensor {
    description: SensorDescription,
    coordinator: Coordinator,
}

impl Sensor {
    /// Bind a description to a coordinator.
    #[must_use]
    pub fn new(description: SensorDescription, coordinator: Coordinator) -> Self {
        Self {
            description,
            coordinator,
        }
    }

    /// Static description.
    #[must_use]
    pub fn description(&self) -> &SensorDescription {
        &self.description
    }

    /// Current value, `None` before the first success or if the field is absent.
    #[must_use]
    pub fn value(&self) -> Option<FieldValue> {
        self.coordinator
            .data()
            .and_then(|snapshot| snapshot.get(self.description.key).cloned())
    }

    /// Ask the coordinator for fresh data.
    pub async fn update(&self) {
        self.coordinator.request_refresh().await;
    }
}

impl Entity for Sensor {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn key(&self) -> &'static str {
        self.description.key
    }

    fn short_name(&self) -> &'static str {
        self.description.name
    }

    fn host(&self) -> &str {
        self.coordinator.host()
    }

    fn available(&self) -> bool {
        self.coordinator.last_update_succeeded()
    }

    fn state(&self) -> Option<String> {
        let value = self.value()?;
        Some(match (&value, self.description.display_precision) {
            (FieldValue::Number(v), Some(precision)) => {
                format!("{:.*}", usize::from(precision), v)
            }
            _ => value.to_string(),
        })
    }
}
