//! Types shared between the Bootline core and crates that plug into it.

pub mod errors;

pub use errors::{BootlineError, BootlineResult};
