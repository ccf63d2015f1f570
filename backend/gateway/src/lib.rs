//! cc-switch settings service
//!
//! Local HTTP API for reading and switching the active provider, previewing the
//! derived environment and listing launched processes.

pub mod api;
pub mod error;
pub mod server;
pub mod views;

pub use error::ApiError;
pub use server::{bind_listener, build_router, serve, GatewayState};
pub use views::StateView;
