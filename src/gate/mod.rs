//! HTTP transport around the dispatcher

pub mod config;
pub mod handlers;
pub mod server;

pub use config::GatewayConfig;
pub use server::{build_router, build_state, start_server};
