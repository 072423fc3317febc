//! Premium calculator
//!
//! Pure and deterministic: quotes, purchases and renewals all go through
//! [`calculate_premium`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{apply_bps, InputError, ProfileId, Result};

use crate::profile::RiskProfile;

/// Premium for `coverage` under `profile`.
///
/// Fails with `InvalidCoverageAmount` when coverage is outside the profile's
/// `[min_coverage, max_coverage]`.
pub fn calculate_premium(profile: &RiskProfile, coverage: Decimal) -> Result<Decimal> {
    if !profile.covers(coverage) {
        return Err(InputError::InvalidCoverageAmount {
            amount: coverage,
            min: profile.min_coverage,
            max: profile.max_coverage,
        }
        .into());
    }
    apply_bps(coverage, profile.rate_bps())
}

/// Priced quote with its inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumQuote {
    pub profile_id: ProfileId,
    pub coverage: Decimal,
    pub base_rate_bps: u32,
    pub risk_factor_bps: u32,
    pub premium: Decimal,
}

impl PremiumQuote {
    pub fn for_profile(profile: &RiskProfile, coverage: Decimal) -> Result<Self> {
        Ok(Self {
            profile_id: profile.profile_id,
            coverage,
            base_rate_bps: profile.base_rate_bps,
            risk_factor_bps: profile.risk_factor_bps,
            premium: calculate_premium(profile, coverage)?,
        })
    }
}
