//! Stage transitions gated behind boot readiness.
//!
//! ## Transition sequence
//!
//! ```text
//! require_ready
//!   → gate.acquire            (show indicator)
//!   → load holding stage      (skipped if already active)
//!   → load target stage
//!   → run target's StageBoot  (skipped if absent)
//!   → gate.release            (always, even after a failure)
//! ```

mod loader;

pub use loader::{BoxedStageBoot, StageBoot, StageId, StageLoader};

use crate::boot::{BootCtx, BootSequencer};
use crate::settings::SettingsStore;
use crate::transition::TransitionGate;
use bootline_shared::{BootlineError, BootlineResult};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::Instrument;
use ulid::Ulid;

/// Per-transition options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionOptions {
    /// Show the indicator without waiting for its animation.
    pub skip_animation: bool,
}

impl TransitionOptions {
    pub fn skip_animation(mut self, skip: bool) -> Self {
        self.skip_animation = skip;
        self
    }
}

/// Drives stage transitions.
///
/// Many transitions may be in flight at once; they share the indicator
/// through the [`TransitionGate`] and rely on the loader to serialize the
/// actual loads.
pub struct StageSequencer {
    boot: Arc<BootSequencer>,
    gate: Arc<TransitionGate>,
    loader: Arc<dyn StageLoader>,
    settings: Arc<dyn SettingsStore>,
    ctx: BootCtx,
}

impl StageSequencer {
    pub fn new(
        boot: Arc<BootSequencer>,
        gate: Arc<TransitionGate>,
        loader: Arc<dyn StageLoader>,
        settings: Arc<dyn SettingsStore>,
        ctx: BootCtx,
    ) -> Self {
        Self {
            boot,
            gate,
            loader,
            settings,
            ctx,
        }
    }

    /// Transition to `stage` using the configured default options.
    pub async fn go_to(&self, stage: impl Into<StageId>) -> BootlineResult<()> {
        let options =
            TransitionOptions::default().skip_animation(self.settings.skip_show_animation());
        self.go_to_with(stage, options).await
    }

    /// Transition to `stage`.
    ///
    /// Fails with `NotReady` before doing anything if boot has not completed.
    /// A load or stage boot failure aborts the transition after the gate
    /// reference has been released.
    pub async fn go_to_with(
        &self,
        stage: impl Into<StageId>,
        options: TransitionOptions,
    ) -> BootlineResult<()> {
        self.boot.require_ready()?;

        let stage = stage.into();
        let transition_id = Ulid::new();
        let span = tracing::info_span!("transition", transition_id = %transition_id, stage = %stage);

        async {
            self.gate.acquire(options.skip_animation).await;
            let acquired_at = Instant::now();

            let result = self.run_steps(&stage).await;

            self.gate
                .release(
                    self.settings.min_loading_screen_time(),
                    acquired_at.elapsed(),
                )
                .await;

            match &result {
                Ok(()) => tracing::info!(
                    duration_ms = acquired_at.elapsed().as_millis(),
                    "Stage transition complete"
                ),
                Err(e) => tracing::error!(error = %e, "Stage transition aborted"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_steps(&self, stage: &StageId) -> BootlineResult<()> {
        let holding = self.settings.holding_stage();
        if self.loader.active_stage().as_ref() != Some(&holding) {
            tracing::info!(holding_stage = %holding, "Loading holding stage");
            self.load(&holding).await?;
        }

        tracing::info!("Loading target stage");
        self.load(stage).await?;
        tracing::info!("Target stage loaded");

        self.run_stage_boot(stage).await
    }

    async fn load(&self, stage: &StageId) -> BootlineResult<()> {
        self.loader.load_stage(stage).await.map_err(|e| match e {
            BootlineError::StageLoad { .. } => e,
            other => BootlineError::StageLoad {
                stage: stage.to_string(),
                reason: other.to_string(),
            },
        })
    }

    async fn run_stage_boot(&self, stage: &StageId) -> BootlineResult<()> {
        let Some(hook) = self.loader.stage_boot(stage) else {
            tracing::warn!("No stage boot found on loaded stage");
            return Ok(());
        };

        let name = hook.name().to_string();
        let start = Instant::now();
        tracing::info!(stage_boot = %name, "Running stage boot");

        hook.run(Arc::clone(&self.ctx))
            .await
            .map_err(|e| BootlineError::StageBoot {
                stage: stage.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            stage_boot = %name,
            duration_ms = start.elapsed().as_millis(),
            "Stage boot finished"
        );
        Ok(())
    }
}
