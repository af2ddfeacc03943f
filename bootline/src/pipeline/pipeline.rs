//! Sequential pipeline executor for boot units.

use super::metrics::{BootMetrics, UnitMetrics};
use super::stage::ExecutionPlan;
use crate::boot::BootCtx;
use bootline_shared::{BootlineError, BootlineResult};
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Pipeline executor.
///
/// Runs every unit of a plan strictly one after another: a unit starts only
/// after the previous one has fully completed, since later units may depend
/// on side effects of earlier ones.
pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Execute a plan.
    ///
    /// Fail-fast: the first unit error (or panic) stops the pipeline and is
    /// returned as `UnitExecution`; no further unit is started.
    pub async fn execute(plan: ExecutionPlan, ctx: BootCtx) -> BootlineResult<BootMetrics> {
        let total_start = Instant::now();
        let mut unit_metrics = Vec::with_capacity(plan.len());

        for planned in plan.units() {
            let name = planned.name().to_string();
            let priority = planned.priority;
            let started_at = Utc::now();
            let unit_start = Instant::now();

            tracing::info!(unit = %name, priority = ?priority, "Running boot unit");

            let outcome = AssertUnwindSafe(planned.unit.run(Arc::clone(&ctx)))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(BootlineError::Internal(format!(
                        "unit panicked: {}",
                        panic_message(panic.as_ref())
                    )))
                });

            if let Err(e) = outcome {
                tracing::error!(unit = %name, error = %e, "Boot unit failed");
                return Err(BootlineError::UnitExecution {
                    unit: name,
                    source: Box::new(e),
                });
            }

            let duration_ms = unit_start.elapsed().as_millis();
            tracing::info!(unit = %name, duration_ms, "Boot unit executed");

            unit_metrics.push(UnitMetrics {
                name,
                priority,
                started_at,
                duration_ms,
            });
        }

        Ok(BootMetrics {
            total_duration_ms: total_start.elapsed().as_millis(),
            units: unit_metrics,
        })
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
