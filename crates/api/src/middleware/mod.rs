//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated account from a JWT Bearer token.
//! - [`rbac::RequireInfluencer`], [`rbac::RequireBrand`], [`rbac::RequireAdmin`]
//!   -- Require a specific account kind.

pub mod auth;
pub mod rbac;
