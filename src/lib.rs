//! Gateway request authorizer: bearer token verification and access-policy synthesis.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
