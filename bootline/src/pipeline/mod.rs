//! Sequential boot pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ExecutionPlan → PlannedUnit → BootUnit
//!
//! - ExecutionPlan: units ordered by ascending priority (stable)
//! - PlannedUnit: a freshly instantiated unit plus its effective priority
//! - BootUnit: atomic unit of startup work
//! ```
//!
//! Units always run sequentially. There is no parallel mode: a unit may rely
//! on services configured by any unit before it.

mod metrics;
#[allow(clippy::module_inception)]
mod pipeline;
mod stage;
mod task;

pub use metrics::{BootMetrics, UnitMetrics};
pub use pipeline::PipelineExecutor;
pub(crate) use pipeline::panic_message;
pub use stage::{ExecutionPlan, PlannedUnit};
pub use task::{BootUnit, BoxedUnit};
