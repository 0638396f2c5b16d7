//! Full entity set of one controller.

use crate::binary_sensor::BinarySensor;
use crate::button::Button;
use crate::device::{Entity, Platform};
use crate::select::Select;
use crate::sensor::{Sensor, SENSORS};
use genwatch_adapter_http::CommandSender;
use genwatch_core::{Action, LcdFlag, Setting};
use genwatch_poller::Coordinator;
use serde::Serialize;

/// Every adapter for one device, wired to its coordinators.
#[derive(Clone)]
pub struct Entities {
    /// Status readouts
    pub sensors: Vec<Sensor>,
    /// Status register flags
    pub binary_sensors: Vec<BinarySensor>,
    /// Load and exercise settings
    pub selects: Vec<Select>,
    /// Momentary actions
    pub buttons: Vec<Button>,
}

/// Point-in-time view of one entity.
///
/// `(platform, unique_id)` identifies the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityState {
    /// Platform the entity registers under
    pub platform: Platform,
    /// Key within the device
    pub key: &'static str,
    /// `<host>_<key>`
    pub unique_id: String,
    /// Display name
    pub name: String,
    /// Rendered state
    pub state: Option<String>,
    /// Availability
    pub available: bool,
}

impl EntityState {
    fn of(entity: &impl Entity) -> Self {
        Self {
            platform: entity.platform(),
            key: entity.key(),
            unique_id: entity.unique_id(),
            name: entity.name(),
            state: entity.state(),
            available: entity.available(),
        }
    }
}

impl Entities {
    /// Build the catalog.
    ///
    /// Sensors, flags, and buttons hang off `status`; selects off `settings`.
    #[must_use]
    pub fn build(status: &Coordinator, settings: &Coordinator, sender: &CommandSender) -> Self {
        Self {
            sensors: SENSORS
                .iter()
                .map(|description| Sensor::new(*description, status.clone()))
                .collect(),
            binary_sensors: LcdFlag::ALL
                .into_iter()
                .map(|flag| BinarySensor::new(flag, status.clone()))
                .collect(),
            selects: Setting::ALL
                .into_iter()
                .map(|setting| Select::new(setting, settings.clone(), sender.clone()))
                .collect(),
            buttons: Action::ALL
                .into_iter()
                .map(|action| Button::new(action, sender.clone(), status.clone()))
                .collect(),
        }
    }

    /// Button for an action key.
    #[must_use]
    pub fn button(&self, key: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.key() == key)
    }

    /// Select for a setting key.
    #[must_use]
    pub fn select(&self, key: &str) -> Option<&Select> {
        self.selects.iter().find(|s| s.key() == key)
    }

    /// Current state of every reading entity.
    #[must_use]
    pub fn states(&self) -> Vec<EntityState> {
        let mut states = Vec::new();
        states.extend(self.sensors.iter().map(EntityState::of));
        states.extend(self.binary_sensors.iter().map(EntityState::of));
        states.extend(self.selects.iter().map(EntityState::of));
        states
    }

    /// Current state of the reading entity with `key` on `platform`.
    #[must_use]
    pub fn state(&self, platform: Platform, key: &str) -> Option<EntityState> {
        self.states()
            .into_iter()
            .find(|s| s.platform == platform && s.key == key)
    }

    /// `(platform, unique_id)` of every entity, buttons included.
    #[must_use]
    pub fn identities(&self) -> Vec<(Platform, String)> {
        let mut ids = Vec::with_capacity(self.len());
        ids.extend(self.sensors.iter().map(|e| (e.platform(), e.unique_id())));
        ids.extend(self.binary_sensors.iter().map(|e| (e.platform(), e.unique_id())));
        ids.extend(self.selects.iter().map(|e| (e.platform(), e.unique_id())));
        ids.extend(self.buttons.iter().map(|e| (e.platform(), e.unique_id())));
        ids
    }

    /// Number of entities of all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensors.len() + self.binary_sensors.len() + self.selects.len() + self.buttons.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{running_device, status_feed};
    use std::collections::HashSet;

    fn state(entities: &Entities, platform: Platform, key: &str) -> EntityState {
        entities
            .state(platform, key)
            .unwrap_or_else(|| panic!("no {platform} entity {key}"))
    }

    #[tokio::test]
    async fn end_to_end_running_genset() {
        let device = running_device();
        device.serve("/index_data.html", 200, &status_feed("4", "12"));
        let status = Coordinator::status(device.clone());
        let settings = Coordinator::settings(device.clone());
        status.first_refresh().await.unwrap();
        settings.first_refresh().await.unwrap();

        let entities = Entities::build(&status, &settings, &CommandSender::new(device));
        assert_eq!(entities.len(), 7 + 5 + 7 + 5);

        assert_eq!(
            state(&entities, Platform::Sensor, "status").state.as_deref(),
            Some("Running")
        );
        assert_eq!(
            state(&entities, Platform::BinarySensor, "genset_running").state.as_deref(),
            Some("on")
        );
        assert_eq!(
            state(&entities, Platform::BinarySensor, "utility_present").state.as_deref(),
            Some("off")
        );
        assert_eq!(
            state(&entities, Platform::Select, "load_mode").state.as_deref(),
            Some("Manual")
        );
        assert!(entities.states().iter().all(|s| s.available));
    }

    #[tokio::test]
    async fn shared_keys_resolve_per_platform() {
        let device = running_device();
        device.serve("/loads_data.html", 200, "0\n0\n1\n");
        let status = Coordinator::status(device.clone());
        let settings = Coordinator::settings(device.clone());
        status.first_refresh().await.unwrap();
        settings.first_refresh().await.unwrap();
        let entities = Entities::build(&status, &settings, &CommandSender::new(device));

        let sensor = state(&entities, Platform::Sensor, "load_2");
        let select = state(&entities, Platform::Select, "load_2");
        assert_eq!(sensor.unique_id, select.unique_id);
        assert_eq!(sensor.state.as_deref(), Some("35"));
        assert_eq!(select.state.as_deref(), Some("Disconnected"));
    }

    #[test]
    fn identities_are_distinct() {
        let device = running_device();
        let entities = Entities::build(
            &Coordinator::status(device.clone()),
            &Coordinator::settings(device.clone()),
            &CommandSender::new(device),
        );

        let ids = entities.identities();
        let distinct: HashSet<_> = ids.iter().cloned().collect();
        assert_eq!(ids.len(), entities.len());
        assert_eq!(distinct.len(), ids.len());
    }

    #[tokio::test]
    async fn coordinators_fail_independently() {
        let device = running_device();
        let status = Coordinator::status(device.clone());
        let settings = Coordinator::settings(device.clone());
        status.first_refresh().await.unwrap();
        settings.first_refresh().await.unwrap();
        let entities = Entities::build(&status, &settings, &CommandSender::new(device.clone()));

        device.serve("/index_data.html", 500, "");
        status.request_refresh().await;

        assert!(!state(&entities, Platform::Sensor, "frequency").available);
        assert!(!state(&entities, Platform::BinarySensor, "action_required").available);
        assert!(state(&entities, Platform::Select, "exercise_day").available);
    }

    #[tokio::test]
    async fn lookups() {
        let device = running_device();
        let entities = Entities::build(
            &Coordinator::status(device.clone()),
            &Coordinator::settings(device.clone()),
            &CommandSender::new(device),
        );

        assert_eq!(
            entities.button("exercise_now").map(Button::action),
            Some(Action::ExerciseNow)
        );
        assert_eq!(
            entities.select("load_2").map(Select::setting),
            Some(Setting::Load2)
        );
        assert!(entities.button("load_2").is_none());
    }
}
