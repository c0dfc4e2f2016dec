//! Ports layer: the engine's boundary traits.
//!
//! `inbound` is what callers drive; `outbound` is what the engine requires.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
