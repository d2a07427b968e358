//! Referral codes and reward ledger rules.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reward credited to a referrer when the referred influencer is verified.
pub const REFERRAL_REWARD_AMOUNT: i64 = 50;

/// Smallest pending balance that can be redeemed in one payout.
pub const MIN_REDEMPTION_AMOUNT: i64 = 100;

/// Characters taken from the influencer's name for the code prefix.
const PREFIX_LEN: usize = 4;

/// Random alphanumeric characters appended after the prefix.
const SUFFIX_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Ledger vocabulary
// ---------------------------------------------------------------------------

pub const TXN_REFERRAL_REWARD: &str = "referral_reward";
pub const TXN_REDEMPTION: &str = "redemption";

pub const TXN_PENDING: &str = "pending";
pub const TXN_REDEEMED: &str = "redeemed";
pub const TXN_PROCESSING: &str = "processing";
pub const TXN_PAID: &str = "paid";
pub const TXN_FAILED: &str = "failed";

/// Admin outcome for a redemption payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutOutcome {
    Paid,
    Failed,
}

impl PayoutOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => TXN_PAID,
            Self::Failed => TXN_FAILED,
        }
    }
}

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Generate a referral code such as `ASHA7K2Q` from a display name.
///
/// The prefix is the first four ASCII letters or digits of the name,
/// uppercased and padded with `X`. Uniqueness is enforced by the database;
/// callers retry on conflict.
pub fn generate_referral_code(name: &str) -> String {
    let mut prefix: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(PREFIX_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while prefix.len() < PREFIX_LEN {
        prefix.push('X');
    }

    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();

    format!("{prefix}{suffix}")
}

/// Normalize a user-supplied code for lookup.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// Redemption
// ---------------------------------------------------------------------------

/// Sum pending reward amounts and check the redemption threshold.
pub fn redemption_total(pending_amounts: &[i64]) -> Result<i64, String> {
    let total: i64 = pending_amounts.iter().sum();
    if pending_amounts.is_empty() || total <= 0 {
        return Err("No pending referral rewards to redeem".to_string());
    }
    if total < MIN_REDEMPTION_AMOUNT {
        return Err(format!(
            "Minimum redemption is {MIN_REDEMPTION_AMOUNT}; you have {total} pending"
        ));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_uses_name_prefix() {
        let code = generate_referral_code("asha rao");
        assert_eq!(code.len(), PREFIX_LEN + SUFFIX_LEN);
        assert!(code.starts_with("ASHA"));
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(code, code.to_ascii_uppercase());
    }

    #[test]
    fn short_or_non_ascii_names_are_padded() {
        let code = generate_referral_code("Jo");
        assert!(code.starts_with("JOXX"));

        let code = generate_referral_code("अनु");
        assert!(code.starts_with("XXXX"));
    }

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize_code("  asha7k2q "), "ASHA7K2Q");
    }

    #[test]
    fn redemption_requires_minimum() {
        assert!(redemption_total(&[]).is_err());
        assert!(redemption_total(&[50]).unwrap_err().contains("Minimum redemption"));
        assert_eq!(redemption_total(&[50, 50]), Ok(100));
        assert_eq!(redemption_total(&[50, 50, 50]), Ok(150));
    }
}
