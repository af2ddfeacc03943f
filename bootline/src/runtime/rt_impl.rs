use crate::boot::{BootCtx, BootSequencer};
use crate::registry::UnitCatalog;
use crate::settings::SettingsStore;
use crate::stage::{StageLoader, StageSequencer};
use crate::transition::{LoadingIndicator, TransitionGate};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared orchestrator state.
///
/// **Shared via Arc**: clones of [`Orchestrator`](super::Orchestrator) all point here.
pub type OrchestratorInner = Arc<OrchestratorInnerImpl>;

/// Orchestrator inner implementation.
///
/// Every field is immutable after construction or internally synchronized:
/// - `boot`: owns the boot state (watch channel)
/// - `gate`: owns the indicator ref count (parking_lot mutex)
/// - `launched`: lock-free launch guard
pub struct OrchestratorInnerImpl {
    pub(crate) settings: Arc<dyn SettingsStore>,
    pub(crate) ctx: BootCtx,
    pub(crate) boot: Arc<BootSequencer>,
    pub(crate) gate: Arc<TransitionGate>,
    pub(crate) loader: Arc<dyn StageLoader>,
    pub(crate) stages: StageSequencer,
    pub(crate) launched: AtomicBool,
}

impl OrchestratorInnerImpl {
    /// Wire components together. Boot and gate are shared with the stage
    /// sequencer, which only ever reads boot state.
    pub(crate) fn new(
        settings: Arc<dyn SettingsStore>,
        catalog: UnitCatalog,
        indicator: Option<Arc<dyn LoadingIndicator>>,
        loader: Arc<dyn StageLoader>,
        ctx: BootCtx,
    ) -> OrchestratorInner {
        let boot = Arc::new(BootSequencer::new(
            Arc::clone(&settings),
            Arc::new(catalog),
            Arc::clone(&ctx),
        ));
        let gate = Arc::new(TransitionGate::new(indicator));
        let stages = StageSequencer::new(
            Arc::clone(&boot),
            Arc::clone(&gate),
            Arc::clone(&loader),
            Arc::clone(&settings),
            Arc::clone(&ctx),
        );

        tracing::debug!(
            has_indicator = gate.has_indicator(),
            holding_stage = %settings.holding_stage(),
            "initialized orchestrator"
        );

        Arc::new(Self {
            settings,
            ctx,
            boot,
            gate,
            loader,
            stages,
            launched: AtomicBool::new(false),
        })
    }
}
