//! Loading indicator coordination for overlapping stage transitions.

mod gate;
mod indicator;

pub use gate::TransitionGate;
pub use indicator::{LoadingIndicator, ShowCompletion};
