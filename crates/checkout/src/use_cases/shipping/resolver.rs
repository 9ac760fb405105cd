//! Chain resolver - drives a selection chain against an option provider.
//!
//! One tokio task owns the [`SelectionChain`]. It handles consumer commands
//! and provider completions one at a time, so chain state needs no locks.
//! Completions are drained before commands; a response that lost a race is
//! recognised by the chain and dropped.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tokio::sync::{mpsc, oneshot, watch};

use storefront_domain::{
    ChainId, ChainSnapshot, ChainView, FetchOutcome, FetchRequest, OptionKey, SelectionChain,
    SelectionError, SelectionOption, StageId, StageView,
};

use crate::infrastructure::ports::{OptionProviderPort, ProviderError};

/// Pending consumer commands per chain.
const COMMAND_BUFFER: usize = 32;

type FetchResult = (FetchRequest, Result<Vec<SelectionOption>, ProviderError>);

/// Errors returned by a [`ChainHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("Resolver for chain {0} has stopped")]
    Closed(ChainId),
}

impl ResolverError {
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Selection(e) if e.is_incomplete())
    }
}

enum ResolverCommand {
    Select {
        stage: StageId,
        key: OptionKey,
        reply: oneshot::Sender<Result<(), ResolverError>>,
    },
    Retry {
        stage: StageId,
        reply: oneshot::Sender<Result<(), ResolverError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Result<ChainSnapshot, ResolverError>>,
    },
    StageView {
        stage: StageId,
        reply: oneshot::Sender<Result<StageView, ResolverError>>,
    },
}

/// Task that owns one selection chain.
pub struct ChainResolver {
    chain: SelectionChain,
    provider: Arc<dyn OptionProviderPort>,
    in_flight: FuturesUnordered<BoxFuture<'static, FetchResult>>,
    views: watch::Sender<ChainView>,
}

impl ChainResolver {
    /// Start `chain` on a new task and return a handle to it.
    ///
    /// Every stage is already `Loading` in the first published view, and the
    /// first stage has been requested. Must be called within a tokio runtime.
    pub fn spawn(mut chain: SelectionChain, provider: Arc<dyn OptionProviderPort>) -> ChainHandle {
        let chain_id = chain.id();
        let first = chain.start();

        let (views, view_rx) = watch::channel(chain.view());
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);

        let mut resolver = Self {
            chain,
            provider,
            in_flight: FuturesUnordered::new(),
            views,
        };
        resolver.dispatch(first);
        tokio::spawn(resolver.run(command_rx));

        ChainHandle {
            chain_id,
            commands,
            views: view_rx,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<ResolverCommand>) {
        let chain_id = self.chain.id();
        tracing::info!(%chain_id, stages = self.chain.len(), "Selection chain started");

        loop {
            tokio::select! {
                biased;

                Some((request, result)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.on_fetch_complete(request, result);
                }
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
            }
        }

        tracing::info!(
            %chain_id,
            abandoned = self.in_flight.len(),
            "Selection chain closed"
        );
    }

    fn on_command(&mut self, command: ResolverCommand) {
        match command {
            ResolverCommand::Select { stage, key, reply } => {
                tracing::debug!(chain_id = %self.chain.id(), stage = %stage, key = %key, "Stage changed");
                let result = match self.chain.select(&stage, key) {
                    Ok(next) => {
                        if let Some(next) = next {
                            self.dispatch(next);
                        }
                        self.publish();
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            ResolverCommand::Retry { stage, reply } => {
                let result = match self.chain.retry(&stage) {
                    Ok(request) => {
                        tracing::info!(chain_id = %self.chain.id(), stage = %stage, "Retrying stage");
                        self.dispatch(request);
                        self.publish();
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                };
                let _ = reply.send(result);
            }
            ResolverCommand::Snapshot { reply } => {
                let _ = reply.send(self.chain.snapshot().map_err(Into::into));
            }
            ResolverCommand::StageView { stage, reply } => {
                let _ = reply.send(self.chain.stage_view(&stage).map_err(Into::into));
            }
        }
    }

    fn on_fetch_complete(
        &mut self,
        request: FetchRequest,
        result: Result<Vec<SelectionOption>, ProviderError>,
    ) {
        let outcome = self
            .chain
            .apply_fetch(&request, result.map_err(|e| e.to_string()));

        match &outcome {
            FetchOutcome::Stale { stage, seq } => {
                tracing::debug!(chain_id = %request.chain_id, stage = %stage, seq, "Discarded stale options");
                return;
            }
            FetchOutcome::Cascaded { stage, selected, .. } => {
                tracing::debug!(chain_id = %request.chain_id, stage = %stage, selected = %selected, "Stage ready, cascading");
            }
            FetchOutcome::Completed { stage, selected } => {
                tracing::info!(chain_id = %request.chain_id, stage = %stage, selected = %selected, "Selection chain complete");
            }
            FetchOutcome::Exhausted { stage } => {
                tracing::info!(chain_id = %request.chain_id, stage = %stage, "Stage has no options");
            }
            FetchOutcome::Failed { stage, error } => {
                tracing::warn!(chain_id = %request.chain_id, stage = %stage, seq = request.seq, error = %error, "Stage failed");
            }
        }

        if let Some(next) = outcome.into_next_request() {
            self.dispatch(next);
        }
        self.publish();
    }

    fn dispatch(&mut self, request: FetchRequest) {
        tracing::debug!(
            chain_id = %request.chain_id,
            stage = %request.stage,
            seq = request.seq,
            context_len = request.context.len(),
            "Requesting stage options"
        );

        let provider = Arc::clone(&self.provider);
        self.in_flight.push(
            async move {
                let result = provider.fetch_options(&request.stage, &request.context).await;
                (request, result)
            }
            .boxed(),
        );
    }

    fn publish(&self) {
        self.views.send_replace(self.chain.view());
    }
}

/// Consumer side of a running chain.
///
/// Cloneable; the chain task stops once every handle is dropped, abandoning
/// any fetch still in flight.
#[derive(Clone)]
pub struct ChainHandle {
    chain_id: ChainId,
    commands: mpsc::Sender<ResolverCommand>,
    views: watch::Receiver<ChainView>,
}

impl ChainHandle {
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The user picked `key` at `stage`.
    ///
    /// When this returns, every downstream stage is already `Loading` in
    /// [`ChainHandle::view`].
    ///
    /// # Errors
    ///
    /// - `Selection(UnknownStage | InvalidSelection)` for a bad stage or key
    /// - `Closed` if the chain task has stopped
    pub async fn on_stage_changed(
        &self,
        stage: impl Into<StageId>,
        key: impl Into<OptionKey>,
    ) -> Result<(), ResolverError> {
        let stage = stage.into();
        let key = key.into();
        self.request(|reply| ResolverCommand::Select { stage, key, reply })
            .await
    }

    /// Re-request a failed or empty stage.
    pub async fn retry(&self, stage: impl Into<StageId>) -> Result<(), ResolverError> {
        let stage = stage.into();
        self.request(|reply| ResolverCommand::Retry { stage, reply })
            .await
    }

    /// Ordered selections of a complete chain.
    ///
    /// # Errors
    ///
    /// `Selection(IncompleteChain)` naming the first unresolved stage.
    pub async fn snapshot(&self) -> Result<ChainSnapshot, ResolverError> {
        self.request(|reply| ResolverCommand::Snapshot { reply })
            .await
    }

    pub async fn stage_view(&self, stage: impl Into<StageId>) -> Result<StageView, ResolverError> {
        let stage = stage.into();
        self.request(|reply| ResolverCommand::StageView { stage, reply })
            .await
    }

    /// Latest published view.
    pub fn view(&self) -> ChainView {
        self.views.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ChainView> {
        self.views.clone()
    }

    /// Wait until no stage is `Loading` and return that view.
    pub async fn wait_until_settled(&self) -> Result<ChainView, ResolverError> {
        let mut views = self.views.clone();
        let view = views
            .wait_for(ChainView::is_settled)
            .await
            .map_err(|_| ResolverError::Closed(self.chain_id))?;
        Ok(view.clone())
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T, ResolverError>>) -> ResolverCommand,
    ) -> Result<T, ResolverError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| ResolverError::Closed(self.chain_id))?;
        response
            .await
            .map_err(|_| ResolverError::Closed(self.chain_id))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockOptionProviderPort;
    use crate::test_fixtures::{
        shipping_chain, us_ca_scenario_provider, GatedProvider, StageFixtures,
    };
    use storefront_domain::StageStatus;

    fn keys(view: &StageView) -> Vec<&str> {
        view.options.iter().map(|o| o.key.as_str()).collect()
    }

    #[tokio::test]
    async fn default_cascade_resolves_us_california() {
        let handle = ChainResolver::spawn(shipping_chain(), Arc::new(us_ca_scenario_provider()));

        let view = handle.wait_until_settled().await.unwrap();

        assert!(view.complete);
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(
            serde_json::to_string(&snapshot).unwrap(),
            r#"{"country":"US","subdivision":"CA","shipping":"std"}"#
        );
    }

    #[tokio::test]
    async fn first_view_is_already_loading() {
        let (provider, _calls) = GatedProvider::new();
        let handle = ChainResolver::spawn(shipping_chain(), provider);

        let view = handle.view();
        assert!(!view.is_settled());
        assert!(view
            .stages
            .iter()
            .all(|stage| stage.status == StageStatus::Loading));
    }

    #[tokio::test]
    async fn country_change_reloads_downstream_stages() {
        let (provider, mut calls) = GatedProvider::new();
        let handle = ChainResolver::spawn(shipping_chain(), provider);

        calls.next().await.respond(StageFixtures::countries());
        calls.next().await.respond(StageFixtures::us_subdivisions());
        calls.next().await.respond(StageFixtures::shipping());
        assert!(handle.wait_until_settled().await.unwrap().complete);

        handle.on_stage_changed("country", "CA").await.unwrap();

        let view = handle.view();
        assert_eq!(view.stage("country").unwrap().selected, Some(OptionKey::from("CA")));
        for id in ["subdivision", "shipping"] {
            let stage = view.stage(id).unwrap();
            assert_eq!(stage.status, StageStatus::Loading, "{id}");
            assert!(stage.options.is_empty(), "{id}");
            assert_eq!(stage.selected, None, "{id}");
        }

        let subdivisions = calls.next().await;
        assert_eq!(subdivisions.stage.as_str(), "subdivision");
        assert_eq!(
            subdivisions.context.get_str("country"),
            Some(&OptionKey::from("CA"))
        );
        subdivisions.respond(StageFixtures::ca_subdivisions());

        let shipping = calls.next().await;
        assert_eq!(shipping.context.get_str("subdivision"), Some(&OptionKey::from("ON")));
        shipping.respond(StageFixtures::shipping());

        let view = handle.wait_until_settled().await.unwrap();
        assert!(view.complete);
        assert_eq!(keys(view.stage("subdivision").unwrap()), vec!["ON", "QC"]);

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(
            snapshot.to_pairs(),
            vec![
                ("country".to_string(), "CA".to_string()),
                ("subdivision".to_string(), "ON".to_string()),
                ("shipping".to_string(), "std".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn late_response_for_superseded_country_is_ignored() {
        let (provider, mut calls) = GatedProvider::new();
        let handle = ChainResolver::spawn(shipping_chain(), provider);

        calls.next().await.respond(StageFixtures::countries());
        let us_subdivisions = calls.next().await;

        handle.on_stage_changed("country", "CA").await.unwrap();
        calls.next().await.respond(StageFixtures::ca_subdivisions());
        calls.next().await.respond(StageFixtures::shipping());
        handle.wait_until_settled().await.unwrap();

        us_subdivisions.respond(StageFixtures::us_subdivisions());

        // The completion is drained before this command is handled.
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.get("subdivision"), Some(&OptionKey::from("ON")));
        assert_eq!(keys(&handle.view().stages[1]), vec!["ON", "QC"]);
        assert!(calls.is_idle());
    }

    #[tokio::test]
    async fn deep_cascade_in_flight_is_retired_by_upstream_change() {
        let (provider, mut calls) = GatedProvider::new();
        let handle = ChainResolver::spawn(shipping_chain(), provider);

        calls.next().await.respond(StageFixtures::countries());
        calls.next().await.respond(StageFixtures::us_subdivisions());
        let us_shipping = calls.next().await;

        handle.on_stage_changed("country", "CA").await.unwrap();
        us_shipping.respond(StageFixtures::shipping());

        let view = handle.stage_view("shipping").await.unwrap();
        assert_eq!(view.status, StageStatus::Loading);
        assert!(view.options.is_empty());

        calls.next().await.respond(StageFixtures::ca_subdivisions());
        calls.next().await.respond(StageFixtures::shipping());
        assert!(handle.wait_until_settled().await.unwrap().complete);
    }

    #[tokio::test]
    async fn failed_stage_recovers_on_retry() {
        let (provider, mut calls) = GatedProvider::new();
        let handle = ChainResolver::spawn(shipping_chain(), provider);

        calls.next().await.respond(StageFixtures::countries());
        calls
            .next()
            .await
            .fail(ProviderError::unavailable("connection reset"));

        let view = handle.wait_until_settled().await.unwrap();
        let subdivision = view.stage("subdivision").unwrap();
        assert_eq!(subdivision.status, StageStatus::Failed);
        assert_eq!(
            subdivision.error.as_deref(),
            Some("Option provider unavailable: connection reset")
        );
        assert_eq!(view.stage("shipping").unwrap().status, StageStatus::Idle);

        let err = handle.snapshot().await.unwrap_err();
        assert!(err.is_incomplete());

        handle.retry("subdivision").await.unwrap();
        let retried = calls.next().await;
        assert_eq!(retried.context.get_str("country"), Some(&OptionKey::from("US")));
        retried.respond(StageFixtures::us_subdivisions());
        calls.next().await.respond(StageFixtures::shipping());

        assert!(handle.wait_until_settled().await.unwrap().complete);
    }

    #[tokio::test]
    async fn empty_option_list_leaves_chain_incomplete() {
        let (provider, mut calls) = GatedProvider::new();
        let handle = ChainResolver::spawn(shipping_chain(), provider);

        calls.next().await.respond(StageFixtures::countries());
        calls.next().await.respond(Vec::new());

        let view = handle.wait_until_settled().await.unwrap();
        assert!(!view.complete);
        assert_eq!(view.stage("subdivision").unwrap().status, StageStatus::Ready);
        assert_eq!(view.stage("shipping").unwrap().status, StageStatus::Idle);

        let err = handle.snapshot().await.unwrap_err();
        assert_eq!(
            err,
            ResolverError::Selection(SelectionError::incomplete(&StageId::from("subdivision")))
        );
        assert!(calls.is_idle());
    }

    #[tokio::test]
    async fn invalid_selection_is_reported_without_state_change() {
        let handle = ChainResolver::spawn(shipping_chain(), Arc::new(us_ca_scenario_provider()));
        let before = handle.wait_until_settled().await.unwrap();

        let err = handle.on_stage_changed("country", "XX").await.unwrap_err();

        assert_eq!(
            err,
            ResolverError::Selection(SelectionError::invalid_selection(
                &StageId::from("country"),
                &OptionKey::from("XX")
            ))
        );
        assert_eq!(handle.view(), before);
    }

    #[tokio::test]
    async fn retry_of_ready_stage_is_rejected() {
        let handle = ChainResolver::spawn(shipping_chain(), Arc::new(us_ca_scenario_provider()));
        handle.wait_until_settled().await.unwrap();

        let err = handle.retry("country").await.unwrap_err();
        assert!(matches!(
            err,
            ResolverError::Selection(SelectionError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn subscribers_see_every_transition() {
        let mut provider = MockOptionProviderPort::new();
        provider
            .expect_fetch_options()
            .returning(|_, _| Ok(vec![SelectionOption::new("only", "Only option")]));
        let handle = ChainResolver::spawn(shipping_chain(), Arc::new(provider));
        let mut views = handle.subscribe();

        let settled = views.wait_for(ChainView::is_settled).await.unwrap().clone();

        assert!(settled.complete);
        assert_eq!(settled.chain_id, handle.chain_id());
    }
}
