//! Boot unit trait for pipeline execution.

use crate::boot::BootCtx;
use async_trait::async_trait;
use bootline_shared::BootlineResult;

/// A self-contained startup task run once during boot.
///
/// Units are created fresh from their registration right before they run and
/// are consumed by `run`, so no unit instance outlives its own execution.
/// Units that publish services for later units do so through the shared
/// [`BootContext`](crate::boot::BootContext).
#[async_trait]
pub trait BootUnit: Send + Sync {
    /// Execute the unit. An error aborts the whole boot sequence.
    async fn run(self: Box<Self>, ctx: BootCtx) -> BootlineResult<()>;

    /// Get human-readable unit name for logging.
    fn name(&self) -> &str;
}

pub type BoxedUnit = Box<dyn BootUnit>;
