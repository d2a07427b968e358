//! Account kinds carried in the JWT `role` claim.
//!
//! Influencers, brands, and admins live in separate tables, so a token
//! subject id is only meaningful together with its account kind.

use serde::{Deserialize, Serialize};

pub const ACCOUNT_INFLUENCER: &str = "influencer";
pub const ACCOUNT_BRAND: &str = "brand";
pub const ACCOUNT_ADMIN: &str = "admin";

/// All valid account kind strings.
pub const VALID_ACCOUNT_KINDS: &[&str] = &[ACCOUNT_INFLUENCER, ACCOUNT_BRAND, ACCOUNT_ADMIN];

/// The kind of account a session or token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Influencer,
    Brand,
    Admin,
}

impl AccountKind {
    /// Convert from the stored / claim string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ACCOUNT_INFLUENCER => Ok(Self::Influencer),
            ACCOUNT_BRAND => Ok(Self::Brand),
            ACCOUNT_ADMIN => Ok(Self::Admin),
            _ => Err(format!(
                "Invalid account kind '{s}'. Must be one of: {}",
                VALID_ACCOUNT_KINDS.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Influencer => ACCOUNT_INFLUENCER,
            Self::Brand => ACCOUNT_BRAND,
            Self::Admin => ACCOUNT_ADMIN,
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
