//! `wr_logical.cgi` command catalog.
//!
//! Every write is a single GET of `/wr_logical.cgi?@<register>=<value>`.
//! Register numbers and value encodings are fixed by the controller firmware.

use std::fmt;

/// Path of the write endpoint.
pub const WRITE_PATH: &str = "/wr_logical.cgi";

/// Engine control register (1 stop, 2 start, 3 exercise now).
pub const REG_ENGINE: u16 = 242;
/// Standby register (0 disable, 1 enable).
pub const REG_STANDBY: u16 = 385;
/// Load management register.
pub const REG_LOADS: u16 = 426;
/// Exercise frequency register.
pub const REG_EXERCISE_FREQUENCY: u16 = 425;
/// Exercise day register.
pub const REG_EXERCISE_DAY: u16 = 391;
/// Exercise hour register.
pub const REG_EXERCISE_HOUR: u16 = 392;
/// Exercise minute register.
pub const REG_EXERCISE_MINUTE: u16 = 393;

/// A device parameter assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    register: u16,
    value: String,
}

impl Command {
    /// Assign `value` to `register`.
    #[must_use]
    pub fn new(register: u16, value: impl Into<String>) -> Self {
        Self {
            register,
            value: value.into(),
        }
    }

    /// Target register.
    #[must_use]
    pub fn register(&self) -> u16 {
        self.register
    }

    /// Literal value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Query string sent to the write endpoint, e.g. `@426=2`.
    #[must_use]
    pub fn query(&self) -> String {
        format!("@{}={}", self.register, self.value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}={}", self.register, self.value)
    }
}

/// Momentary actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Start the genset
    Start,
    /// Stop the genset
    Stop,
    /// Enable automatic standby
    EnableStandby,
    /// Disable automatic standby
    DisableStandby,
    /// Run an exercise cycle now
    ExerciseNow,
}

impl Action {
    /// All known actions.
    pub const ALL: [Self; 5] = [
        Self::Start,
        Self::Stop,
        Self::EnableStandby,
        Self::DisableStandby,
        Self::ExerciseNow,
    ];

    /// Stable key used in entity identifiers.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::EnableStandby => "enable_standby",
            Self::DisableStandby => "disable_standby",
            Self::ExerciseNow => "exercise_now",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "Start Genset",
            Self::Stop => "Stop Genset",
            Self::EnableStandby => "Enable Standby",
            Self::DisableStandby => "Disable Standby",
            Self::ExerciseNow => "Exercise Now",
        }
    }

    /// Look up an action by key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }

    /// Command issued when the action is triggered.
    #[must_use]
    pub fn command(self) -> Command {
        match self {
            Self::Stop => Command::new(REG_ENGINE, "1"),
            Self::Start => Command::new(REG_ENGINE, "2"),
            Self::ExerciseNow => Command::new(REG_ENGINE, "3"),
            Self::DisableStandby => Command::new(REG_STANDBY, "0"),
            Self::EnableStandby => Command::new(REG_STANDBY, "1"),
        }
    }
}

const LOAD_MODE_OPTIONS: &[&str] = &["Manual", "Automatic"];
const LOAD_OPTIONS: &[&str] = &["Disconnected", "Connected"];
/// Exercise frequency labels, indexed by device value.
pub const FREQUENCY_OPTIONS: &[&str] = &["Never", "Weekly", "Bimonthly", "Monthly"];
/// Exercise day labels, indexed by device value.
pub const DAY_OPTIONS: &[&str] = &[
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
/// Exercise hour labels in 24-hour form.
pub const HOUR_OPTIONS: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
    "17", "18", "19", "20", "21", "22", "23",
];
/// Exercise minute labels, indexed by device value.
pub const MINUTE_OPTIONS: &[&str] = &["00", "15", "30", "45"];

/// Enumerated device settings with a fixed option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// Load management mode
    LoadMode,
    /// Load line 1 connection
    Load1,
    /// Load line 2 connection
    Load2,
    /// Exercise frequency
    ExerciseFrequency,
    /// Exercise day of week
    ExerciseDay,
    /// Exercise start hour
    ExerciseHour,
    /// Exercise start minute
    ExerciseMinute,
}

impl Setting {
    /// All known settings.
    pub const ALL: [Self; 7] = [
        Self::LoadMode,
        Self::Load1,
        Self::Load2,
        Self::ExerciseFrequency,
        Self::ExerciseDay,
        Self::ExerciseHour,
        Self::ExerciseMinute,
    ];

    /// Snapshot field and entity key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LoadMode => "load_mode",
            Self::Load1 => "load_1",
            Self::Load2 => "load_2",
            Self::ExerciseFrequency => "exercise_frequency",
            Self::ExerciseDay => "exercise_day",
            Self::ExerciseHour => "exercise_hour",
            Self::ExerciseMinute => "exercise_minute",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoadMode => "Load Mode",
            Self::Load1 => "Load 1",
            Self::Load2 => "Load 2",
            Self::ExerciseFrequency => "Exercise Frequency",
            Self::ExerciseDay => "Exercise Day",
            Self::ExerciseHour => "Exercise Hour",
            Self::ExerciseMinute => "Exercise Minute",
        }
    }

    /// Look up a setting by key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Options in display order.
    #[must_use]
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            Self::LoadMode => LOAD_MODE_OPTIONS,
            Self::Load1 | Self::Load2 => LOAD_OPTIONS,
            Self::ExerciseFrequency => FREQUENCY_OPTIONS,
            Self::ExerciseDay => DAY_OPTIONS,
            Self::ExerciseHour => HOUR_OPTIONS,
            Self::ExerciseMinute => MINUTE_OPTIONS,
        }
    }

    /// Encode a selected option as a device command.
    ///
    /// Returns `None` if `option` is not one of [`Self::options`].
    #[must_use]
    pub fn command(self, option: &str) -> Option<Command> {
        let index = self.options().iter().position(|o| *o == option)?;
        let command = match self {
            // Manual/Automatic, Disconnected/Connected: consecutive codes per pair
            Self::LoadMode => Command::new(REG_LOADS, (index + 1).to_string()),
            Self::Load1 => Command::new(REG_LOADS, (index + 3).to_string()),
            Self::Load2 => Command::new(REG_LOADS, (index + 5).to_string()),
            Self::ExerciseFrequency => Command::new(REG_EXERCISE_FREQUENCY, index.to_string()),
            Self::ExerciseDay => Command::new(REG_EXERCISE_DAY, index.to_string()),
            Self::ExerciseHour => Command::new(REG_EXERCISE_HOUR, option),
            Self::ExerciseMinute => Command::new(REG_EXERCISE_MINUTE, option),
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_catalog() {
        let queries: Vec<(&str, String)> = Action::ALL
            .iter()
            .map(|a| (a.key(), a.command().query()))
            .collect();
        assert_eq!(
            queries,
            vec![
                ("start", "@242=2".to_string()),
                ("stop", "@242=1".to_string()),
                ("enable_standby", "@385=1".to_string()),
                ("disable_standby", "@385=0".to_string()),
                ("exercise_now", "@242=3".to_string()),
            ]
        );
    }

    #[test]
    fn load_encodings() {
        let query = |s: Setting, o: &str| s.command(o).map(|c| c.query());
        assert_eq!(query(Setting::LoadMode, "Manual").as_deref(), Some("@426=1"));
        assert_eq!(query(Setting::LoadMode, "Automatic").as_deref(), Some("@426=2"));
        assert_eq!(query(Setting::Load1, "Disconnected").as_deref(), Some("@426=3"));
        assert_eq!(query(Setting::Load1, "Connected").as_deref(), Some("@426=4"));
        assert_eq!(query(Setting::Load2, "Disconnected").as_deref(), Some("@426=5"));
        assert_eq!(query(Setting::Load2, "Connected").as_deref(), Some("@426=6"));
    }

    #[test]
    fn exercise_encodings() {
        let query = |s: Setting, o: &str| s.command(o).map(|c| c.query());
        assert_eq!(
            query(Setting::ExerciseFrequency, "Bimonthly").as_deref(),
            Some("@425=2")
        );
        assert_eq!(query(Setting::ExerciseDay, "Saturday").as_deref(), Some("@391=6"));
        assert_eq!(query(Setting::ExerciseHour, "17").as_deref(), Some("@392=17"));
        assert_eq!(query(Setting::ExerciseMinute, "00").as_deref(), Some("@393=00"));
        assert_eq!(query(Setting::ExerciseMinute, "45").as_deref(), Some("@393=45"));
    }

    #[test]
    fn unknown_option_has_no_command() {
        assert!(Setting::LoadMode.command("Auto").is_none());
        assert!(Setting::ExerciseHour.command("24").is_none());
        assert!(Setting::ExerciseMinute.command("10").is_none());
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(Action::from_key("exercise_now"), Some(Action::ExerciseNow));
        assert_eq!(Action::from_key("reboot"), None);
        assert_eq!(Setting::from_key("exercise_day"), Some(Setting::ExerciseDay));
        assert_eq!(HOUR_OPTIONS.len(), 24);
    }
}
