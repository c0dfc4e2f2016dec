//! HTTP handlers, grouped by resource.

pub mod slots;
pub mod swaps;
