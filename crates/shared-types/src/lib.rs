//! # Shared Types Crate
//!
//! Domain vocabulary shared by every crate in the workspace: identifier
//! newtypes, the `Slot` and `ExchangeRequest` entities with their status
//! state machines, and the `SwapError` taxonomy surfaced to callers.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-crate types are defined here.
//! - **Closed State Machines**: slot and request statuses are tagged enums;
//!   invalid states are unrepresentable and transitions are methods that
//!   refuse illegal moves instead of trusting callers.
//! - **Stable Error Kinds**: every `SwapError` variant maps onto exactly one
//!   `ErrorKind`, so transports can translate errors without string matching.

pub mod entities;
pub mod errors;
pub mod ids;

pub use entities::*;
pub use errors::*;
pub use ids::*;
