//! Request-scoped orchestration shared by several handlers.
//!
//! Handlers stay thin: they parse input, check ownership and call into these
//! helpers, which combine repositories, core rules and provider clients.

pub mod bootstrap;
pub mod credits;
pub mod notify;
pub mod otp;
pub mod profile;
pub mod sessions;
