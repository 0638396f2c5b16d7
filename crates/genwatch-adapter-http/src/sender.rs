//! Fire-and-forget device commands.

use crate::transport::Transport;
use genwatch_core::commands::WRITE_PATH;
use genwatch_core::Command;
use std::sync::Arc;

/// Sends `wr_logical.cgi` commands.
///
/// Failures are logged and reported as `false`; they never propagate. Callers
/// that want to observe the effect request a coordinator refresh afterwards.
#[derive(Clone)]
pub struct CommandSender {
    transport: Arc<dyn Transport>,
}

impl CommandSender {
    /// Create a sender over a shared transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Host the commands go to.
    #[must_use]
    pub fn host(&self) -> &str {
        self.transport.host()
    }

    /// Send one command. Returns whether the controller answered 200.
    pub async fn send(&self, command: &Command) -> bool {
        let query = command.query();
        tracing::debug!(host = %self.host(), command = %query, "Sending command");

        match self.transport.fetch(WRITE_PATH, Some(&query)).await {
            Ok(response) if response.is_ok() => {
                tracing::info!(host = %self.host(), command = %query, "Command accepted");
                true
            }
            Ok(response) => {
                tracing::error!(
                    host = %self.host(),
                    command = %query,
                    status = response.status_code,
                    "Command rejected"
                );
                false
            }
            Err(err) => {
                tracing::error!(host = %self.host(), command = %query, error = %err, "Command failed");
                false
            }
        }
    }
}
