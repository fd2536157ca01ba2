#[allow(clippy::module_inception)]
pub mod auth;
pub mod handlers;
pub mod jwt;
