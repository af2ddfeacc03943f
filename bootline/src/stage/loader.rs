//! Stage loading capabilities driven by the stage sequencer.

use crate::boot::BootCtx;
use async_trait::async_trait;
use bootline_shared::BootlineResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a presentation stage (a screen or scene).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Activates stages. Implementations serialize concurrent loads themselves.
#[async_trait]
pub trait StageLoader: Send + Sync {
    /// Resolves once `stage` is the active stage.
    async fn load_stage(&self, stage: &StageId) -> BootlineResult<()>;

    fn active_stage(&self) -> Option<StageId>;

    /// Hand out the local boot hook of `stage`, if it has one.
    ///
    /// Called after `stage` finished loading. Another transition may already
    /// have activated a different stage by then, so implementations must look
    /// the hook up by `stage` rather than by the active stage.
    fn stage_boot(&self, stage: &StageId) -> Option<BoxedStageBoot>;
}

/// Stage-scoped initialization run after the stage is loaded.
///
/// The future returned by `run` resolving is the "finished" signal. A hook
/// that never resolves holds its transition (and the loading indicator)
/// indefinitely; there is no timeout.
#[async_trait]
pub trait StageBoot: Send {
    fn name(&self) -> &str;

    async fn run(self: Box<Self>, ctx: BootCtx) -> BootlineResult<()>;
}

pub type BoxedStageBoot = Box<dyn StageBoot>;
