//! Momentary actions.

use crate::device::{Entity, Platform};
use genwatch_adapter_http::CommandSender;
use genwatch_core::Action;
use genwatch_poller::Coordinator;

/// Write-only trigger for one [`Action`].
#[derive(Clone)]
pub struct Button {
    action: Action,
    sender: CommandSender,
    coordinator: Coordinator,
}

impl Button {
    /// Bind an action to a sender. `coordinator` is refreshed after an accepted press.
    #[must_use]
    pub fn new(action: Action, sender: CommandSender, coordinator: Coordinator) -> Self {
        Self {
            action,
            sender,
            coordinator,
        }
    }

    /// Underlying action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Send the action's command. Returns whether the device accepted it.
    pub async fn press(&self) -> bool {
        let accepted = self.sender.send(&self.action.command()).await;
        if accepted {
            self.coordinator.request_refresh().await;
        } else {
            tracing::error!(entity = %self.name(), "Failed to execute action");
        }
        accepted
    }
}

impl Entity for Button {
    fn platform(&self) -> Platform {
        Platform::Button
    }

    fn key(&self) -> &'static str {
        self.action.key()
    }

    fn short_name(&self) -> &'static str {
        self.action.name()
    }

    fn host(&self) -> &str {
        self.sender.host()
    }

    fn available(&self) -> bool {
        true
    }

    fn state(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::running_device;

    #[tokio::test]
    async fn press_sends_then_refreshes_status() {
        let device = running_device();
        let coordinator = Coordinator::status(device.clone());
        let button = Button::new(Action::Stop, CommandSender::new(device.clone()), coordinator);

        assert!(button.press().await);
        assert_eq!(
            device.requests(),
            ["/wr_logical.cgi?@242=1", "/index_data.html"]
        );
        assert_eq!(button.unique_id(), "192.168.1.50_stop");
        assert_eq!(button.name(), "Cummins Generator Stop Genset");
    }

    #[tokio::test]
    async fn unreachable_device_is_swallowed() {
        let device = running_device();
        device.set_offline(true);
        let coordinator = Coordinator::status(device.clone());
        let button = Button::new(
            Action::EnableStandby,
            CommandSender::new(device.clone()),
            coordinator,
        );

        assert!(!button.press().await);
        assert_eq!(device.requests(), ["/wr_logical.cgi?@385=1"]);
        assert!(button.available());
    }
}
