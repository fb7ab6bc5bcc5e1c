//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the request gate.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{GateState, require_identity};
pub use router::auth_router;
