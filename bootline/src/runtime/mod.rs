//! Process-level composition of boot, gate and stage sequencing.

mod core;
mod rt_impl;

pub use self::core::{Orchestrator, OrchestratorBuilder};
