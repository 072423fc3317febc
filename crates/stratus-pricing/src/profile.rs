//! Risk profile catalog
//!
//! Profiles are pricing and coverage-bound templates. They are immutable once
//! created.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{
    ensure_positive, BlockHeight, InputError, NotFoundError, ProfileId, Result, StateError,
};
use tracing::info;

use crate::premium::{calculate_premium, PremiumQuote};

/// Pricing and coverage template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub profile_id: ProfileId,
    pub name: String,
    /// Base premium rate in basis points of coverage
    pub base_rate_bps: u32,
    /// Additional risk loading in basis points of coverage
    pub risk_factor_bps: u32,
    /// Informational; not part of the premium formula
    pub coverage_multiplier: u32,
    pub min_coverage: Decimal,
    pub max_coverage: Decimal,
    pub description: String,
    pub created_at: BlockHeight,
}

impl RiskProfile {
    /// Combined premium rate in basis points
    #[inline]
    pub fn rate_bps(&self) -> u32 {
        self.base_rate_bps.saturating_add(self.risk_factor_bps)
    }

    pub fn covers(&self, amount: Decimal) -> bool {
        amount >= self.min_coverage && amount <= self.max_coverage
    }
}

/// Profile definition supplied by the admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRiskProfile {
    pub profile_id: ProfileId,
    pub name: String,
    pub base_rate_bps: u32,
    pub risk_factor_bps: u32,
    pub coverage_multiplier: u32,
    pub min_coverage: Decimal,
    pub max_coverage: Decimal,
    pub description: String,
}

impl NewRiskProfile {
    fn validate(&self) -> Result<()> {
        if self.max_coverage <= self.min_coverage {
            return Err(InputError::InvalidProfileBounds {
                min: self.min_coverage,
                max: self.max_coverage,
            }
            .into());
        }
        if self.coverage_multiplier == 0 {
            return Err(InputError::ZeroCoverageMultiplier.into());
        }
        ensure_positive(self.min_coverage)
    }
}

/// Profiles keyed by admin-chosen id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskProfileCatalog {
    profiles: BTreeMap<ProfileId, RiskProfile>,
}

impl RiskProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, new: NewRiskProfile, height: BlockHeight) -> Result<&RiskProfile> {
        new.validate()?;
        if self.profiles.contains_key(&new.profile_id) {
            return Err(StateError::ProfileAlreadyExists(new.profile_id).into());
        }

        let profile = RiskProfile {
            profile_id: new.profile_id,
            name: new.name,
            base_rate_bps: new.base_rate_bps,
            risk_factor_bps: new.risk_factor_bps,
            coverage_multiplier: new.coverage_multiplier,
            min_coverage: new.min_coverage,
            max_coverage: new.max_coverage,
            description: new.description,
            created_at: height,
        };

        info!(
            profile_id = profile.profile_id,
            rate_bps = profile.rate_bps(),
            "Risk profile created"
        );
        Ok(self.profiles.entry(profile.profile_id).or_insert(profile))
    }

    pub fn get(&self, profile_id: ProfileId) -> Option<&RiskProfile> {
        self.profiles.get(&profile_id)
    }

    pub fn require(&self, profile_id: ProfileId) -> Result<&RiskProfile> {
        self.profiles
            .get(&profile_id)
            .ok_or_else(|| NotFoundError::Profile(profile_id).into())
    }

    /// Premium for `coverage` under `profile_id`
    pub fn calculate_premium(&self, profile_id: ProfileId, coverage: Decimal) -> Result<Decimal> {
        calculate_premium(self.require(profile_id)?, coverage)
    }

    pub fn quote(&self, profile_id: ProfileId, coverage: Decimal) -> Result<PremiumQuote> {
        PremiumQuote::for_profile(self.require(profile_id)?, coverage)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stratus_common::StratusError;

    fn drought_profile() -> NewRiskProfile {
        NewRiskProfile {
            profile_id: 1,
            name: "Drought - East Africa".to_string(),
            base_rate_bps: 500,
            risk_factor_bps: 200,
            coverage_multiplier: 1,
            min_coverage: dec!(1000),
            max_coverage: dec!(100000),
            description: "Seasonal rainfall shortfall".to_string(),
        }
    }

    #[test]
    fn test_create_profile() {
        let mut catalog = RiskProfileCatalog::new();
        let profile = catalog.create(drought_profile(), 5).unwrap();
        assert_eq!(profile.rate_bps(), 700);
        assert_eq!(profile.created_at, 5);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let mut catalog = RiskProfileCatalog::new();
        let mut new = drought_profile();
        new.max_coverage = new.min_coverage;

        let result = catalog.create(new, 5);
        assert!(matches!(
            result,
            Err(StratusError::InvalidInput(InputError::InvalidProfileBounds { .. }))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_rejects_zero_multiplier() {
        let mut catalog = RiskProfileCatalog::new();
        let mut new = drought_profile();
        new.coverage_multiplier = 0;

        assert!(matches!(
            catalog.create(new, 5),
            Err(StratusError::InvalidInput(InputError::ZeroCoverageMultiplier))
        ));
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut catalog = RiskProfileCatalog::new();
        catalog.create(drought_profile(), 5).unwrap();
        assert!(matches!(
            catalog.create(drought_profile(), 6),
            Err(StratusError::InvalidState(StateError::ProfileAlreadyExists(1)))
        ));
    }

    #[test]
    fn test_missing_profile() {
        let catalog = RiskProfileCatalog::new();
        assert!(matches!(
            catalog.calculate_premium(9, dec!(5000)),
            Err(StratusError::NotFound(NotFoundError::Profile(9)))
        ));
    }
}
