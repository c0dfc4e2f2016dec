//! # Swap Gateway
//!
//! HTTP face of the slot exchange engine. A thin `axum` layer translates
//! REST calls into invocations of the engine's inbound port:
//!
//! ```text
//! x-user-id header ──→ CallerId ──┐
//!                                 ├──→ SwapApi ──→ swap-engine ──→ storage
//! JSON bodies ──────→ DTOs ───────┘
//! ```
//!
//! The gateway authenticates nothing. It reads the caller's id from a
//! header, hands it to the engine as-is, and maps `SwapError` kinds onto
//! HTTP statuses (400/403/404/409/503). All state lives behind the engine's
//! storage port, so the router itself is stateless and freely cloneable.

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod service;

pub use config::{ConfigError, GatewayConfig};
pub use error::{ApiError, ApiResult};
pub use extract::CallerId;
pub use service::{build_router, serve, AppState};
