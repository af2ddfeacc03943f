use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UnitMetrics {
    pub name: String,
    pub priority: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Default)]
pub struct BootMetrics {
    pub total_duration_ms: u128,
    pub units: Vec<UnitMetrics>,
}

impl BootMetrics {
    pub fn unit_duration_ms(&self, name: &str) -> Option<u128> {
        self.units
            .iter()
            .find(|unit| unit.name == name)
            .map(|unit| unit.duration_ms)
    }

    /// Names of executed units, in execution order.
    pub fn executed(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.name.as_str()).collect()
    }

    pub fn log_summary(&self) {
        for unit in &self.units {
            tracing::debug!(
                unit = %unit.name,
                priority = ?unit.priority,
                started_at = %unit.started_at.to_rfc3339(),
                duration_ms = unit.duration_ms,
                "Boot unit timing"
            );
        }
        tracing::info!(
            units = self.units.len(),
            total_duration_ms = self.total_duration_ms,
            "Boot sequence timing"
        );
    }
}
