//! Adapters layer: concrete implementations of the outbound ports.

pub mod memory;

pub use memory::*;
