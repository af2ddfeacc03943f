//! Bootline: ordered one-shot boot and gated stage transitions.
//!
//! A process registers boot units (at link time via [`inventory`] or
//! explicitly through [`UnitCatalog::register`]), lists the ones to run in
//! [`BootSettings`], and hands both to an [`Orchestrator`]. Boot runs every
//! unit once, in priority order. Stage transitions are refused until boot is
//! `Ready`, and overlapping transitions share a single loading indicator.
//!
//! ```ignore
//! struct AudioUnit;
//!
//! #[async_trait::async_trait]
//! impl BootUnit for AudioUnit {
//!     async fn run(self: Box<Self>, ctx: BootCtx) -> BootlineResult<()> {
//!         ctx.provide(AudioDevice::open()?);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "audio"
//!     }
//! }
//!
//! bootline::inventory::submit! {
//!     UnitRegistration::new("game::AudioUnit", Some(10), || Ok(Box::new(AudioUnit) as BoxedUnit))
//! }
//! ```

pub mod boot;
pub mod pipeline;
pub mod registry;
pub mod settings;
pub mod stage;
pub mod transition;

mod logging;
mod runtime;

#[cfg(test)]
mod testing;

pub use boot::{BootContext, BootCtx, BootSequencer, BootState};
pub use bootline_shared::{BootlineError, BootlineResult};
pub use logging::{LOG_ENV, init_logging, init_logging_for};
pub use pipeline::{BootMetrics, BootUnit, BoxedUnit, UnitMetrics};
pub use registry::{UnitCatalog, UnitDescriptor, UnitRegistration, UnitRegistry};
pub use runtime::{Orchestrator, OrchestratorBuilder};
pub use settings::{BootSettings, SettingsStore};
pub use stage::{BoxedStageBoot, StageBoot, StageId, StageLoader, StageSequencer, TransitionOptions};
pub use transition::{LoadingIndicator, ShowCompletion, TransitionGate};

pub use inventory;
