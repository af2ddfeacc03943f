//! Boot unit registry.
//!
//! Resolves the persisted [`UnitDescriptor`] list against a [`UnitCatalog`]
//! (the table of unit types compiled into the program) and produces freshly
//! instantiated units ready for the pipeline.
//!
//! A single bad entry never blocks boot: unknown type ids and failing
//! factories are logged and skipped.

mod catalog;
mod discovery;

pub use catalog::{UnitCatalog, UnitFactory, UnitRegistration};
pub use discovery::{discover, sync_descriptors};

use crate::pipeline::{ExecutionPlan, PlannedUnit, panic_message};
use bootline_shared::{BootlineError, BootlineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifies one boot unit in the persisted registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    /// Stable type identifier, matched against catalog registrations.
    pub type_id: String,
    /// Lower runs first. `None` falls back to the registration's priority,
    /// and sorts last if that is missing too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl UnitDescriptor {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Instantiates units from descriptors.
pub struct UnitRegistry<'a> {
    catalog: &'a UnitCatalog,
}

impl<'a> UnitRegistry<'a> {
    pub fn new(catalog: &'a UnitCatalog) -> Self {
        Self { catalog }
    }

    /// Instantiate every resolvable descriptor and order them into a plan.
    pub fn plan(&self, descriptors: &[UnitDescriptor]) -> ExecutionPlan {
        ExecutionPlan::new(self.instantiate(descriptors))
    }

    /// Instantiate every resolvable descriptor, in discovery order.
    ///
    /// Duplicate type ids after the first occurrence are skipped.
    pub fn instantiate(&self, descriptors: &[UnitDescriptor]) -> Vec<PlannedUnit> {
        let mut seen = HashSet::new();
        let mut units = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if !seen.insert(descriptor.type_id.as_str()) {
                tracing::warn!(type_id = %descriptor.type_id, "Duplicate boot unit entry, skipping");
                continue;
            }

            match self.resolve(descriptor) {
                Ok(unit) => units.push(unit),
                Err(e) => {
                    tracing::warn!(type_id = %descriptor.type_id, error = %e, "Skipping boot unit");
                }
            }
        }

        tracing::debug!(
            requested = descriptors.len(),
            resolved = units.len(),
            "Boot units instantiated"
        );

        units
    }

    fn resolve(&self, descriptor: &UnitDescriptor) -> BootlineResult<PlannedUnit> {
        let entry = self.catalog.get(&descriptor.type_id).ok_or_else(|| {
            BootlineError::UnitResolution {
                type_id: descriptor.type_id.clone(),
                reason: "type is not registered".into(),
            }
        })?;

        let unit = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| entry.instantiate()))
            .unwrap_or_else(|panic| {
                Err(BootlineError::Internal(format!(
                    "factory panicked: {}",
                    panic_message(panic.as_ref())
                )))
            })
            .map_err(|e| BootlineError::UnitResolution {
                type_id: descriptor.type_id.clone(),
                reason: e.to_string(),
            })?;

        Ok(PlannedUnit::new(
            unit,
            descriptor.priority.or(entry.priority()),
        ))
    }
}
