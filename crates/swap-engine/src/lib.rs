//! # Swap Engine
//!
//! Transaction engine for one-to-one calendar slot exchanges. Owners mark
//! slots they are willing to give up as `Swappable`; the engine negotiates
//! ownership transfers through a propose / respond / cancel protocol in
//! which every transition is applied atomically or not at all.
//!
//! ## Exchange Protocol
//!
//! ```text
//!                     propose(offered, requested)
//!   [SWAPPABLE x2] ─────────────────────────────→ [SWAP_PENDING x2]
//!                                                   + PENDING request
//!          │                                              │
//!          │              accept: owners trade, both BUSY │
//!          │              reject: both back to SWAPPABLE  │ respond
//!          │              cancel: both back to SWAPPABLE, │ / cancel
//!          │                      request removed         │
//!          └──────────────────────────────────────────────┘
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | A slot never sits in two live negotiations | `Slot::enter_pending` requires `Swappable`; slots park as `SwapPending` for the lifetime of their request |
//! | At most one `Pending` request per slot pair, either orientation | conflict guard in `propose` plus the pair uniqueness index checked at commit |
//! | Resolving a request settles both slots in the same commit | coordinator stages all three records in one `TransactionContext` |
//! | A request is resolved at most once | `ExchangeRequest::resolve` refuses terminal statuses |
//! | No partial state is ever observable | optimistic commit validates every point read and applies all writes or none |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  adapters/  - in-memory versioned storage backend              │
//! └────────────────────────────────────────────────────────────────┘
//!                        ↑ implements ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - SwapApi trait, SlotPatch                  │
//! │  ports/outbound.rs - SwapStorage, TransactionContext, clock    │
//! └────────────────────────────────────────────────────────────────┘
//!                           ↑ uses ↑
//! ┌────────────────────────────────────────────────────────────────┐
//! │  service/  - SwapService coordinator with commit retry         │
//! │  domain/   - conflict guard, engine configuration              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entities and the error taxonomy live in the `shared-types` crate so the
//! gateway can speak the same vocabulary without depending on the engine
//! internals.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod test_utils;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::SwapService;
