//! Boot settings.
//!
//! The orchestrator only reads settings at runtime through [`SettingsStore`].
//! [`BootSettings`] is the JSON-backed implementation; tooling rewrites its
//! unit list with [`sync_descriptors`](crate::registry::sync_descriptors).

use crate::registry::UnitDescriptor;
use crate::stage::StageId;
use bootline_shared::{BootlineError, BootlineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Stage shown while a heavier target stage loads.
pub const DEFAULT_HOLDING_STAGE: &str = "Intermediate";

/// Read-only view of boot settings.
pub trait SettingsStore: Send + Sync {
    /// Persisted unit descriptors, in discovery order.
    fn unit_descriptors(&self) -> Vec<UnitDescriptor>;

    /// When false, boot completes immediately without running any unit.
    fn is_enabled(&self) -> bool;

    /// Minimum time the loading indicator stays visible once shown.
    fn min_loading_screen_time(&self) -> Duration;

    fn holding_stage(&self) -> StageId;

    /// Default for transitions that do not choose explicitly.
    fn skip_show_animation(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootSettings {
    pub enabled: bool,
    pub units: Vec<UnitDescriptor>,
    pub min_loading_screen_ms: u64,
    pub holding_stage: String,
    pub skip_show_animation: bool,
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            units: Vec::new(),
            min_loading_screen_ms: 0,
            holding_stage: DEFAULT_HOLDING_STAGE.to_string(),
            skip_show_animation: false,
        }
    }
}

impl BootSettings {
    /// Load and validate settings from a JSON file.
    pub fn load(path: &Path) -> BootlineResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BootlineError::Config(format!(
                "Failed to read settings at {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings = Self::from_json(&raw)?;
        tracing::debug!(
            path = %path.display(),
            units = settings.units.len(),
            enabled = settings.enabled,
            "Loaded boot settings"
        );
        Ok(settings)
    }

    pub fn from_json(raw: &str) -> BootlineResult<Self> {
        let settings: Self = serde_json::from_str(raw)?;
        settings.sanitize()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> BootlineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> BootlineResult<()> {
        self.sanitize()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), "Saved boot settings");
        Ok(())
    }

    /// Validate invariants: unique unit type ids and a non-empty holding stage.
    pub fn sanitize(&self) -> BootlineResult<()> {
        let mut seen = HashSet::new();
        for descriptor in &self.units {
            if descriptor.type_id.trim().is_empty() {
                return Err(BootlineError::Config("unit type_id must not be empty".into()));
            }
            if !seen.insert(descriptor.type_id.as_str()) {
                return Err(BootlineError::Config(format!(
                    "duplicate unit type_id: {}",
                    descriptor.type_id
                )));
            }
        }

        if self.holding_stage.trim().is_empty() {
            return Err(BootlineError::Config("holding_stage must not be empty".into()));
        }

        Ok(())
    }
}

impl SettingsStore for BootSettings {
    fn unit_descriptors(&self) -> Vec<UnitDescriptor> {
        self.units.clone()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn min_loading_screen_time(&self) -> Duration {
        Duration::from_millis(self.min_loading_screen_ms)
    }

    fn holding_stage(&self) -> StageId {
        StageId::new(self.holding_stage.clone())
    }

    fn skip_show_animation(&self) -> bool {
        self.skip_show_animation
    }
}
