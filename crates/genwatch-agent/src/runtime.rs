//! Integration lifecycle: setup, polling, teardown.

use crate::config::AgentConfig;
use anyhow::Result;
use genwatch_adapter_http::{CommandSender, HttpTransport, Transport, TransportError};
use genwatch_entities::Entities;
use genwatch_poller::{Coordinator, PollTask, SetupError, POLL_INTERVAL};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// One configured controller with its coordinators, entities, and poll loops.
pub struct Integration {
    status: Coordinator,
    settings: Coordinator,
    entities: Entities,
    tasks: Vec<PollTask>,
}

impl Integration {
    /// Set up the controller described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the host is invalid or either first refresh fails.
    pub async fn setup(config: &AgentConfig) -> Result<Self, IntegrationError> {
        let transport = Arc::new(HttpTransport::new(&config.device)?);
        Self::setup_with(transport, POLL_INTERVAL).await
    }

    /// Set up over an existing transport with a given poll period.
    ///
    /// Both coordinators complete a refresh before any entity exists.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::NotReady`] if either first refresh fails.
    pub async fn setup_with(
        transport: Arc<dyn Transport>,
        period: Duration,
    ) -> Result<Self, IntegrationError> {
        let host = transport.host().to_string();

        let status = Coordinator::status(Arc::clone(&transport));
        status.first_refresh().await?;

        let settings = Coordinator::settings(Arc::clone(&transport));
        settings.first_refresh().await?;

        let sender = CommandSender::new(transport);
        let entities = Entities::build(&status, &settings, &sender);

        let tasks = vec![status.start(period), settings.start(period)];

        tracing::info!(host = %host, entities = entities.len(), ?period, "Generator set up");

        Ok(Self {
            status,
            settings,
            entities,
            tasks,
        })
    }

    /// Status coordinator.
    #[must_use]
    pub fn status(&self) -> &Coordinator {
        &self.status
    }

    /// Settings coordinator.
    #[must_use]
    pub fn settings(&self) -> &Coordinator {
        &self.settings
    }

    /// Entity catalog.
    #[must_use]
    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    /// Stop polling and release the coordinators.
    pub fn unload(self) {
        let host = self.status.host().to_string();
        for task in self.tasks {
            task.stop();
        }
        tracing::info!(host = %host, "Generator unloaded");
    }

    /// Log entity states after every refresh until `shutdown` resolves, then unload.
    ///
    /// # Errors
    ///
    /// Returns error if state serialization fails.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let mut status_updates = self.status.subscribe();
        let mut settings_updates = self.settings.subscribe();
        tokio::pin!(shutdown);

        self.log_states()?;

        loop {
            tokio::select! {
                changed = status_updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.log_states()?;
                }
                changed = settings_updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.log_states()?;
                }
                () = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        self.unload();
        Ok(())
    }

    fn log_states(&self) -> Result<()> {
        let states = self.entities.states();
        let unavailable = states.iter().filter(|s| !s.available).count();

        for state in &states {
            tracing::debug!(
                platform = %state.platform,
                entity = %state.name,
                state = state.state.as_deref().unwrap_or("unknown"),
                available = state.available,
                "Entity state"
            );
        }
        tracing::debug!(states = %serde_json::to_string(&states)?, "Entity snapshot");
        tracing::info!(
            host = %self.status.host(),
            entities = states.len(),
            unavailable,
            "Entities updated"
        );

        Ok(())
    }
}

/// Errors that abort setup.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IntegrationError {
    /// Host or client configuration is unusable
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The controller did not answer the first refresh
    #[error(transparent)]
    NotReady(#[from] SetupError),
}
