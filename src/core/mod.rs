//! Core business logic - framework-agnostic services over the repository traits.

/// Email/password registration, login and bearer tokens
pub mod auth;
/// Append-only public greeting log
pub mod greeting;
/// Lixi configuration validation and the active-configuration transition
pub mod lixi;
