//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches where the table has one

pub mod admin;
pub mod application;
pub mod brand;
pub mod campaign;
pub mod credit_transaction;
pub mod experience;
pub mod influencer;
pub mod invitation;
pub mod lookup;
pub mod notification;
pub mod otp;
pub mod pro_subscription;
pub mod profile_review;
pub mod session;
pub mod upi;
