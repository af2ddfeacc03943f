//! Error taxonomy for boot sequencing and stage transitions.

use thiserror::Error;

/// Result alias used across Bootline.
pub type BootlineResult<T> = Result<T, BootlineError>;

#[derive(Debug, Error)]
pub enum BootlineError {
    /// Settings are malformed or violate an invariant (duplicate unit ids, empty holding stage).
    #[error("configuration error: {0}")]
    Config(String),

    /// A registry entry could not be resolved or instantiated. Non-fatal to boot.
    #[error("unit '{type_id}' could not be resolved: {reason}")]
    UnitResolution { type_id: String, reason: String },

    /// A unit's run failed. Fatal to the boot sequence.
    #[error("boot unit '{unit}' failed: {source}")]
    UnitExecution {
        unit: String,
        #[source]
        source: Box<BootlineError>,
    },

    /// A gated operation was invoked before boot reached `Ready`.
    #[error("boot is not ready (state: {0})")]
    NotReady(String),

    /// The stage loader failed to activate a stage.
    #[error("failed to load stage '{stage}': {reason}")]
    StageLoad { stage: String, reason: String },

    /// A stage-local boot hook reported failure.
    #[error("stage boot for '{stage}' failed: {reason}")]
    StageBoot { stage: String, reason: String },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BootlineError {
    /// True for errors that leave the boot sequence in a terminal failed state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BootlineError::UnitExecution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_execution_keeps_source() {
        let err = BootlineError::UnitExecution {
            unit: "audio".into(),
            source: Box::new(BootlineError::Internal("device busy".into())),
        };

        assert!(err.is_fatal());
        assert!(err.to_string().contains("audio"));
        assert!(err.to_string().contains("device busy"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_ready_is_not_fatal() {
        let err = BootlineError::NotReady("Running".into());
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "boot is not ready (state: Running)");
    }
}
