//! Execution plan for the boot pipeline.

use super::task::BoxedUnit;

/// A unit scheduled for execution together with its effective priority.
///
/// `None` means the unit declared no priority and runs after every unit that did.
pub struct PlannedUnit {
    pub unit: BoxedUnit,
    pub priority: Option<i32>,
}

impl PlannedUnit {
    pub fn new(unit: BoxedUnit, priority: Option<i32>) -> Self {
        Self { unit, priority }
    }

    pub fn name(&self) -> &str {
        self.unit.name()
    }

    /// Sort key placing missing priorities after every explicit one.
    pub(crate) fn order_key(&self) -> (u8, i32) {
        self.priority.map_or((1, 0), |priority| (0, priority))
    }
}

impl std::fmt::Debug for PlannedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedUnit")
            .field("name", &self.unit.name())
            .field("priority", &self.priority)
            .finish()
    }
}

/// Ordered list of units to run one after another.
#[derive(Debug, Default)]
pub struct ExecutionPlan {
    units: Vec<PlannedUnit>,
}

impl ExecutionPlan {
    /// Build a plan, ordering units by ascending priority.
    ///
    /// The sort is stable: units with equal or missing priority keep the order
    /// they were given in.
    pub fn new(mut units: Vec<PlannedUnit>) -> Self {
        units.sort_by_key(PlannedUnit::order_key);
        Self { units }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(PlannedUnit::name).collect()
    }

    pub fn units(self) -> Vec<PlannedUnit> {
        self.units
    }
}
