//! Rollout runner - drives one run from authentication to report

use std::sync::Arc;
use std::time::Duration;

use proxyfleet_domain::{Config, ProxyFleetError, Result, RunReport, RunState, Scope, StorePlan};
use tracing::{info, instrument};

use super::state::RunTracker;
use crate::auth::{Authenticator, IdentityProvider, TokenStore};
use crate::dispatch::{build_plan, BatchDispatcher, RemoteResponder};
use crate::hosts::{HostDirectory, HostEnumerator};

/// Adapters the runner talks to
#[derive(Clone)]
pub struct RolloutPorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub token_store: Arc<dyn TokenStore>,
    pub directory: Arc<dyn HostDirectory>,
    pub responder: Arc<dyn RemoteResponder>,
}

/// Runs authenticate -> enumerate -> open batch -> dispatch, once
pub struct RolloutRunner {
    authenticator: Authenticator,
    enumerator: HostEnumerator,
    dispatcher: BatchDispatcher,
    scope: Scope,
    max_age: Duration,
    plan: Vec<StorePlan>,
}

impl RolloutRunner {
    /// Wire the runner from validated configuration
    ///
    /// # Errors
    /// Returns `ProxyFleetError::Config` if the configuration is invalid.
    pub fn new(config: &Config, ports: RolloutPorts) -> Result<Self> {
        config.validate()?;

        let authenticator =
            Authenticator::new(ports.identity, ports.token_store, &config.credentials)?;

        Ok(Self {
            authenticator,
            enumerator: HostEnumerator::new(ports.directory),
            dispatcher: BatchDispatcher::new(ports.responder),
            scope: config.scope.clone(),
            max_age: config.token_cache.max_age(),
            plan: build_plan(&config.stores, &config.proxy),
        })
    }

    /// Override the host query page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.enumerator = self.enumerator.with_page_size(page_size);
        self
    }

    /// Commands this runner will submit, in order
    pub fn plan(&self) -> &[StorePlan] {
        &self.plan
    }

    /// Execute the run
    ///
    /// Never returns an error: failures end the run in `Aborted` and are
    /// carried in the report.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub async fn run(&self) -> RunReport {
        let mut run = RunTracker::new();

        match self.execute(&mut run).await {
            Ok(()) => run.finish(),
            Err(err) => run.abort(err),
        }
    }

    async fn execute(&self, run: &mut RunTracker) -> Result<()> {
        let token = self.authenticator.get_token(self.max_age).await?;
        run.advance(RunState::Authenticated)?;

        let hosts = self.enumerator.enumerate(&token, &self.scope).await?;
        run.hosts_enumerated = hosts.len();
        run.advance(RunState::HostsEnumerated)?;

        if hosts.is_empty() {
            return Err(ProxyFleetError::NoTargets(format!("{} matched no hosts", self.scope)));
        }

        let batch = self.dispatcher.open_batch(&token, &hosts).await?;
        run.batch_id = Some(batch.batch_id.clone());
        run.hosts_in_session = batch.included_hosts.len();
        run.advance(RunState::BatchOpen)?;

        run.advance(RunState::Dispatching)?;
        let report = self.dispatcher.dispatch(&token, &batch, &self.plan).await;
        run.commands_acknowledged = report.acknowledged;
        if let Some(err) = report.failure {
            return Err(err);
        }

        info!(
            commands = report.acknowledged,
            batch_id = %batch.batch_id,
            "Finished launching commands, check progress in the remote audit logs"
        );
        run.advance(RunState::Done)
    }
}
