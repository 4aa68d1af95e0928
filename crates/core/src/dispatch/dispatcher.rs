//! Batch command dispatcher

use std::sync::Arc;

use proxyfleet_domain::{
    BatchSession, BearerToken, CommandAck, HostIdSet, ProxyFleetError, RemoteCommand, Result,
    StorePlan,
};
use tracing::{error, info, instrument, warn};

use super::ports::RemoteResponder;

/// Progress of a dispatch, reported whether or not it completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands the server acknowledged with "created"
    pub acknowledged: usize,
    /// Stores whose every command was acknowledged
    pub stores_completed: usize,
    /// First rejection or transport failure, which stopped the dispatch
    pub failure: Option<ProxyFleetError>,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Opens a batch and feeds it commands one at a time
pub struct BatchDispatcher {
    responder: Arc<dyn RemoteResponder>,
}

impl BatchDispatcher {
    pub fn new(responder: Arc<dyn RemoteResponder>) -> Self {
        Self { responder }
    }

    /// Open a batch over `hosts`, queueing commands for offline hosts
    ///
    /// # Errors
    /// Returns `ProxyFleetError::BatchOpen` if the server did not hand out a
    /// batch id, or the transport error.
    #[instrument(skip(self, token, hosts), fields(hosts = hosts.len()))]
    pub async fn open_batch(&self, token: &BearerToken, hosts: &HostIdSet) -> Result<BatchSession> {
        let session = self.responder.open_batch(token, hosts.as_slice(), true).await?;

        if session.batch_id.trim().is_empty() {
            return Err(ProxyFleetError::BatchOpen {
                status: 0,
                body: "batch id was empty".to_string(),
            });
        }

        info!(
            batch_id = %session.batch_id,
            requested = session.requested_hosts,
            included = session.included_hosts.len(),
            "Initiated batch session"
        );
        if session.excluded_count() > 0 {
            warn!(
                excluded = session.excluded_count(),
                "Some requested hosts were not included in the batch session"
            );
        }

        Ok(session)
    }

    /// Submit one command
    ///
    /// # Errors
    /// Returns `ProxyFleetError::CommandRejected` carrying the store, key, and
    /// raw status when the server answers anything but 201.
    pub async fn submit(
        &self,
        token: &BearerToken,
        batch: &BatchSession,
        command: &RemoteCommand,
    ) -> Result<CommandAck> {
        let ack = self
            .responder
            .submit_command(
                token,
                &batch.batch_id,
                command.kind.base_command(),
                &command.command_line,
            )
            .await?;

        if !ack.is_accepted() {
            error!(
                store = %command.store,
                key = %command.key,
                status = ack.status,
                body = %ack.body,
                "Command rejected"
            );
            return Err(ProxyFleetError::CommandRejected {
                store: command.store.clone(),
                key: command.key.clone(),
                status: ack.status,
                body: ack.body,
            });
        }

        info!(kind = %command.kind, key = %command.key, store = %command.store, "Issued command");
        Ok(ack)
    }

    /// Submit the plan store by store, stopping at the first failure
    ///
    /// Commands already accepted are left in place; acceptance only means the
    /// server queued the command for the hosts.
    #[instrument(skip_all, fields(batch_id = %batch.batch_id, stores = plan.len()))]
    pub async fn dispatch(
        &self,
        token: &BearerToken,
        batch: &BatchSession,
        plan: &[StorePlan],
    ) -> DispatchReport {
        let mut report = DispatchReport { acknowledged: 0, stores_completed: 0, failure: None };

        for store in plan {
            for command in &store.commands {
                match self.submit(token, batch, command).await {
                    Ok(_) => report.acknowledged += 1,
                    Err(err) => {
                        report.failure = Some(err);
                        return report;
                    }
                }
            }
            report.stores_completed += 1;
            info!(store = %store.store, "All commands acknowledged for store");
        }

        report
    }
}
