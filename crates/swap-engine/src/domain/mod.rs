//! Domain layer: pure exchange logic with no storage or transport concerns.

pub mod config;
pub mod conflicts;

pub use config::*;
pub use conflicts::*;
