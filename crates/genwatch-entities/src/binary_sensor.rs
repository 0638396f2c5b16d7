//! Boolean flags from the `lcd_status` register.

use crate::device::{DeviceClass, Entity, Platform};
use genwatch_core::LcdFlag;
use genwatch_poller::Coordinator;

/// One bit-flag of the status register.
#[derive(Clone)]
pub struct BinarySensor {
    flag: LcdFlag,
    coordinator: Coordinator,
}

impl BinarySensor {
    /// Bind a flag to the status coordinator.
    #[must_use]
    pub fn new(flag: LcdFlag, coordinator: Coordinator) -> Self {
        Self { flag, coordinator }
    }

    /// Decoded flag.
    #[must_use]
    pub fn flag(&self) -> LcdFlag {
        self.flag
    }

    /// Presentation hint.
    #[must_use]
    pub fn device_class(&self) -> Option<DeviceClass> {
        match self.flag {
            LcdFlag::UtilityPresent => Some(DeviceClass::Power),
            LcdFlag::GensetRunning => Some(DeviceClass::Running),
            LcdFlag::ActionRequired => Some(DeviceClass::Problem),
            LcdFlag::UtilityConnected | LcdFlag::StandbyDisabled => None,
        }
    }

    /// Whether the flag is set. Off when no snapshot or register is cached.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.coordinator
            .data()
            .is_some_and(|snapshot| self.flag.read(&snapshot))
    }

    /// Ask the coordinator for fresh data.
    pub async fn update(&self) {
        self.coordinator.request_refresh().await;
    }
}

impl Entity for BinarySensor {
    fn platform(&self) -> Platform {
        Platform::BinarySensor
    }

    fn key(&self) -> &'static str {
        self.flag.key()
    }

    fn short_name(&self) -> &'static str {
        self.flag.name()
    }

    fn host(&self) -> &str {
        self.coordinator.host()
    }

    fn available(&self) -> bool {
        self.coordinator.last_update_succeeded()
    }

    fn state(&self) -> Option<String> {
        Some(if self.is_on() { "on" } else { "off" }.to_string())
    }
}
