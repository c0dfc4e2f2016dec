//! # SlotSwapper Test Suite
//!
//! Unified test crate covering what per-crate unit tests cannot: protocol
//! choreography across crates, true multi-threaded races against one shared
//! storage backend, fault injection through the whole coordinator stack, and
//! the HTTP surface end to end.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── exchange_flows.rs   # Propose/respond/cancel choreography
//!     ├── concurrency.rs      # Thread races on shared storage
//!     ├── fault_injection.rs  # Commit failures mid-protocol
//!     └── gateway_http.rs     # REST routing, identity, error mapping
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p swap-tests
//!
//! # By category
//! cargo test -p swap-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p swap-tests
//! ```
