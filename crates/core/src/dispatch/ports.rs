//! Port interfaces for remote-response batches

use async_trait::async_trait;
use proxyfleet_domain::{BatchSession, BearerToken, CommandAck, Result};

/// Remote-response batch endpoint
#[async_trait]
pub trait RemoteResponder: Send + Sync {
    /// Open one batch session over `host_ids`
    ///
    /// With `queue_offline` set, commands for hosts that are offline are
    /// queued server-side. Hosts the server cannot reach at all are left out
    /// of the returned session.
    async fn open_batch(
        &self,
        token: &BearerToken,
        host_ids: &[String],
        queue_offline: bool,
    ) -> Result<BatchSession>;

    /// Submit one command against an open batch
    ///
    /// Returns the raw status and body; only transport failures are errors.
    async fn submit_command(
        &self,
        token: &BearerToken,
        batch_id: &str,
        base_command: &str,
        command_line: &str,
    ) -> Result<CommandAck>;
}
