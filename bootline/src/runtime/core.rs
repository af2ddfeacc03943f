//! High-level orchestrator.

use crate::boot::{BootContext, BootCtx, BootSequencer, BootState};
use crate::registry::UnitCatalog;
use crate::runtime::rt_impl::{OrchestratorInner, OrchestratorInnerImpl};
use crate::settings::SettingsStore;
use crate::stage::{StageId, StageLoader, TransitionOptions};
use crate::transition::{LoadingIndicator, TransitionGate};
use bootline_shared::{BootlineError, BootlineResult};
use std::sync::Arc;
use std::sync::atomic::Ordering;

/// Orchestrator is the composition root for boot and stage transitions.
///
/// It owns the process-lifetime boot state and indicator gate; nothing is
/// kept in statics. Create one per process and share it by cloning.
///
/// **Cloning**: cheap via `Arc`, all clones share the same state.
///
/// # Example
///
/// ```ignore
/// let orchestrator = Orchestrator::builder(settings, loader)
///     .indicator(indicator)
///     .build();
///
/// orchestrator.launch().await?;
/// orchestrator.go_to("Game").await?;
/// ```
#[derive(Clone)]
pub struct Orchestrator {
    inner: OrchestratorInner,
}

impl Orchestrator {
    pub fn builder(
        settings: Arc<dyn SettingsStore>,
        loader: Arc<dyn StageLoader>,
    ) -> OrchestratorBuilder {
        OrchestratorBuilder {
            settings,
            loader,
            catalog: None,
            indicator: None,
            ctx: None,
        }
    }

    /// Run boot, then reload the active stage through a normal transition.
    ///
    /// Only the first call does anything. If boot was already triggered
    /// through [`boot`](Self::boot), this waits for it to finish and fails if
    /// it ended `Failed`. The active stage is not reloaded if the loader
    /// reports none, or if it is the holding stage itself.
    pub async fn launch(&self) -> BootlineResult<()> {
        if self.inner.launched.swap(true, Ordering::SeqCst) {
            tracing::debug!("Orchestrator already launched");
            return Ok(());
        }

        self.inner.boot.run_once().await?;
        let state = self.inner.boot.wait_terminal().await;
        if state != BootState::Ready {
            return Err(BootlineError::NotReady(state.to_string()));
        }

        let holding = self.inner.settings.holding_stage();
        match self.inner.loader.active_stage() {
            Some(active) if active != holding => {
                tracing::info!(stage = %active, "Reloading active stage after boot");
                self.inner.stages.go_to(active).await
            }
            active => {
                tracing::debug!(active = ?active, "No stage to reload after boot");
                Ok(())
            }
        }
    }

    pub async fn go_to(&self, stage: impl Into<StageId>) -> BootlineResult<()> {
        self.inner.stages.go_to(stage).await
    }

    pub async fn go_to_with(
        &self,
        stage: impl Into<StageId>,
        options: TransitionOptions,
    ) -> BootlineResult<()> {
        self.inner.stages.go_to_with(stage, options).await
    }

    pub fn is_ready(&self) -> bool {
        self.inner.boot.is_ready()
    }

    pub fn require_ready(&self) -> BootlineResult<()> {
        self.inner.boot.require_ready()
    }

    pub fn state(&self) -> BootState {
        self.inner.boot.state()
    }

    pub async fn wait_terminal(&self) -> BootState {
        self.inner.boot.wait_terminal().await
    }

    pub fn boot(&self) -> &Arc<BootSequencer> {
        &self.inner.boot
    }

    pub fn gate(&self) -> &Arc<TransitionGate> {
        &self.inner.gate
    }

    pub fn context(&self) -> &BootCtx {
        &self.inner.ctx
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.inner.boot.state())
            .field("gate", &self.inner.gate)
            .finish()
    }
}

/// Builds an [`Orchestrator`].
///
/// Defaults: units come from [`UnitCatalog::from_inventory`], no indicator,
/// and a fresh [`BootContext`].
pub struct OrchestratorBuilder {
    settings: Arc<dyn SettingsStore>,
    loader: Arc<dyn StageLoader>,
    catalog: Option<UnitCatalog>,
    indicator: Option<Arc<dyn LoadingIndicator>>,
    ctx: Option<BootCtx>,
}

impl OrchestratorBuilder {
    pub fn catalog(mut self, catalog: UnitCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn indicator(mut self, indicator: Arc<dyn LoadingIndicator>) -> Self {
        self.indicator = Some(indicator);
        self
    }

    pub fn context(mut self, ctx: BootCtx) -> Self {
        self.ctx = Some(ctx);
        self
    }

    pub fn build(self) -> Orchestrator {
        let catalog = self.catalog.unwrap_or_else(UnitCatalog::from_inventory);
        let ctx = self.ctx.unwrap_or_else(|| Arc::new(BootContext::new()));
        Orchestrator {
            inner: OrchestratorInnerImpl::new(
                self.settings,
                catalog,
                self.indicator,
                self.loader,
                ctx,
            ),
        }
    }
}

// Compile-time assertion: the orchestrator is shared across tasks.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<Orchestrator>;
};
