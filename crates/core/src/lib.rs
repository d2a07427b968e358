//! Domain rules for the Influx marketplace.
//!
//! This crate has no I/O. Handlers and repositories load rows, map them into
//! the fact structs defined here, and call the pure evaluation functions.

pub mod accounts;
pub mod campaign;
pub mod credits;
pub mod eligibility;
pub mod error;
pub mod otp;
pub mod pro;
pub mod profile_completion;
pub mod referral;
pub mod review;
pub mod types;
pub mod upload;
pub mod validation;
