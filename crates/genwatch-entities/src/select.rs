//! Enumerated settings.

use crate::device::{Entity, Platform};
use genwatch_adapter_http::CommandSender;
use genwatch_core::Setting;
use genwatch_poller::Coordinator;

/// A readable and writable setting with a fixed option list.
#[derive(Clone)]
pub struct Select {
    setting: Setting,
    coordinator: Coordinator,
    sender: CommandSender,
}

impl Select {
    /// Bind a setting to the settings coordinator and a command sender.
    #[must_use]
    pub fn new(setting: Setting, coordinator: Coordinator, sender: CommandSender) -> Self {
        Self {
            setting,
            coordinator,
            sender,
        }
    }

    /// Underlying setting.
    #[must_use]
    pub fn setting(&self) -> Setting {
        self.setting
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &'static [&'static str] {
        self.setting.options()
    }

    /// Currently selected option, `None` if unknown.
    #[must_use]
    pub fn current_option(&self) -> Option<String> {
        let snapshot = self.coordinator.data()?;
        snapshot
            .get(self.setting.key())
            .and_then(|value| value.as_text())
            .map(str::to_string)
    }

    /// Write a new option, then refresh the coordinator if the device accepted it.
    ///
    /// Returns whether the device accepted the command. Device failures are
    /// logged by the sender and never raised.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidOption`] if `option` is not in
    /// [`Self::options`]; nothing is sent in that case.
    pub async fn select_option(&self, option: &str) -> Result<bool, SelectError> {
        let command = self
            .setting
            .command(option)
            .ok_or_else(|| SelectError::InvalidOption {
                setting: self.setting.key(),
                option: option.to_string(),
            })?;

        let accepted = self.sender.send(&command).await;
        if accepted {
            self.coordinator.request_refresh().await;
        } else {
            tracing::error!(entity = %self.name(), option, "Failed to set option");
        }
        Ok(accepted)
    }

    /// Ask the coordinator for fresh data.
    pub async fn update(&self) {
        self.coordinator.request_refresh().await;
    }
}

impl Entity for Select {
    fn platform(&self) -> Platform {
        Platform::Select
    }

    fn key(&self) -> &'static str {
        self.setting.key()
    }

    fn short_name(&self) -> &'static str {
        self.setting.name()
    }

    fn host(&self) -> &str {
        self.coordinator.host()
    }

    fn available(&self) -> bool {
        self.coordinator.last_update_succeeded()
    }

    fn state(&self) -> Option<String> {
        self.current_option()
    }
}

/// Errors that can occur when selecting an option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// Option is not one of the setting's options
    #[error("{option:?} is not an option of {setting}")]
    InvalidOption {
        /// Setting key
        setting: &'static str,
        /// Rejected option
        option: String,
    },
}
