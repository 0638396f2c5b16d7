//! `lcd_status` bit-flag register.

use crate::snapshot::Snapshot;

/// Snapshot field holding the register.
pub const LCD_STATUS_FIELD: &str = "lcd_status";

/// Conditions encoded in the `lcd_status` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LcdFlag {
    /// Utility power is present
    UtilityPresent,
    /// Transfer switch is on utility
    UtilityConnected,
    /// Genset is running
    GensetRunning,
    /// Automatic standby is disabled
    StandbyDisabled,
    /// Operator attention required
    ActionRequired,
}

impl LcdFlag {
    /// All known flags.
    pub const ALL: [Self; 5] = [
        Self::UtilityPresent,
        Self::UtilityConnected,
        Self::GensetRunning,
        Self::StandbyDisabled,
        Self::ActionRequired,
    ];

    /// Bitmask tested against the register.
    #[must_use]
    pub const fn mask(self) -> i64 {
        match self {
            Self::UtilityPresent => 0x01,
            Self::UtilityConnected => 0x02,
            Self::GensetRunning => 0x0C,
            Self::StandbyDisabled => 0x10,
            Self::ActionRequired => 0x60,
        }
    }

    /// Stable key used in entity identifiers.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::UtilityPresent => "utility_present",
            Self::UtilityConnected => "utility_connected",
            Self::GensetRunning => "genset_running",
            Self::StandbyDisabled => "standby_disabled",
            Self::ActionRequired => "action_required",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UtilityPresent => "Utility Present",
            Self::UtilityConnected => "Utility Connected",
            Self::GensetRunning => "Genset Running",
            Self::StandbyDisabled => "Standby Disabled",
            Self::ActionRequired => "Action Required",
        }
    }

    /// Read this flag from a snapshot. A missing register reads as off.
    #[must_use]
    pub fn read(self, snapshot: &Snapshot) -> bool {
        let register = snapshot
            .get(LCD_STATUS_FIELD)
            .and_then(crate::snapshot::FieldValue::as_integer);
        decode(register, self.mask())
    }
}

/// Test a register against a mask. Any overlapping bit sets the flag.
#[must_use]
pub fn decode(register: Option<i64>, mask: i64) -> bool {
    register.is_some_and(|r| r & mask != 0)
}
