//! Boot sequencing.
//!
//! ## Lifecycle
//!
//! ```text
//! NotStarted ──run_once──→ Running ──all units ok──→ Ready
//!                             │
//!                             └──unit error/panic──→ Failed
//!
//! disabled: NotStarted → Running → Ready, no unit instantiated
//! ```
//!
//! `run_once` claims the `NotStarted → Running` transition atomically, so
//! duplicate or concurrent triggers collapse into a single execution.
//! `require_ready` is a synchronous check and never waits.

mod context;
mod state;

pub use context::{BootContext, BootCtx};
pub use state::{BootState, BootStatus};

use crate::pipeline::{BootMetrics, PipelineExecutor};
use crate::registry::{UnitCatalog, UnitRegistry};
use crate::settings::SettingsStore;
use bootline_shared::{BootlineError, BootlineResult};
use parking_lot::Mutex;
use std::sync::Arc;

/// Runs the registered boot units once per process and exposes readiness.
pub struct BootSequencer {
    settings: Arc<dyn SettingsStore>,
    catalog: Arc<UnitCatalog>,
    ctx: BootCtx,
    status: BootStatus,
    metrics: Mutex<Option<BootMetrics>>,
}

impl BootSequencer {
    pub fn new(settings: Arc<dyn SettingsStore>, catalog: Arc<UnitCatalog>, ctx: BootCtx) -> Self {
        Self {
            settings,
            catalog,
            ctx,
            status: BootStatus::new(),
            metrics: Mutex::new(None),
        }
    }

    /// Run every registered unit, in priority order, exactly once.
    ///
    /// Only the first call does anything; later calls return `Ok(())`
    /// immediately, whether or not the first run has finished. A unit failure
    /// moves the state to `Failed` and is returned to the caller.
    pub async fn run_once(&self) -> BootlineResult<()> {
        if !self.status.try_begin() {
            tracing::debug!(state = %self.status.get(), "Boot already triggered, ignoring");
            return Ok(());
        }

        if !self.settings.is_enabled() {
            tracing::info!("Boot sequence disabled, skipping all units");
            self.status.finish(BootState::Ready);
            return Ok(());
        }

        tracing::info!("Boot sequence starting");

        let descriptors = self.settings.unit_descriptors();
        let plan = UnitRegistry::new(&self.catalog).plan(&descriptors);
        tracing::debug!(units = ?plan.names(), "Boot plan");

        match PipelineExecutor::execute(plan, Arc::clone(&self.ctx)).await {
            Ok(metrics) => {
                metrics.log_summary();
                *self.metrics.lock() = Some(metrics);
                self.status.finish(BootState::Ready);
                tracing::info!("All boot units executed");
                Ok(())
            }
            Err(e) => {
                self.status.finish(BootState::Failed);
                tracing::error!(error = %e, "Boot sequence failed");
                Err(e)
            }
        }
    }

    pub fn state(&self) -> BootState {
        self.status.get()
    }

    pub fn is_ready(&self) -> bool {
        self.status.get() == BootState::Ready
    }

    /// Fail fast with `NotReady` unless boot has completed successfully.
    pub fn require_ready(&self) -> BootlineResult<()> {
        match self.status.get() {
            BootState::Ready => Ok(()),
            other => Err(BootlineError::NotReady(other.to_string())),
        }
    }

    /// Wait until boot reaches `Ready` or `Failed`.
    pub async fn wait_terminal(&self) -> BootState {
        self.status.wait_terminal().await
    }

    /// Timing of the completed boot. `None` until boot is `Ready`, and stays
    /// `None` when boot was disabled.
    pub fn metrics(&self) -> Option<BootMetrics> {
        self.metrics.lock().clone()
    }

    pub fn context(&self) -> &BootCtx {
        &self.ctx
    }
}

impl std::fmt::Debug for BootSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootSequencer")
            .field("state", &self.status.get())
            .finish()
    }
}
