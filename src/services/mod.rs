pub mod auth;
pub mod secrets;
