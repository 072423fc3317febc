//! Read-only queries and derived predicates
//!
//! Queries never fail on a missing entity; they report absence. Predicates
//! that depend on time take the height to evaluate at.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{
    apply_bps, BlockHeight, ClaimId, NotFoundError, PolicyId, Principal, ProfileId, Result,
};
use stratus_oracle::{OracleDataPoint, OracleRegistration};
use stratus_pricing::{PremiumQuote, RiskProfile};

use crate::claim::Claim;
use crate::condition::PolicyCondition;
use crate::engine::Engine;
use crate::host::SettlementLedger;
use crate::policy::Policy;
use crate::treasury::TreasuryState;

/// Aggregate contract statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStats {
    pub owner: Principal,
    pub paused: bool,
    pub next_policy_id: PolicyId,
    pub next_claim_id: ClaimId,
    pub total_policies: u64,
    pub total_claims: u64,
    pub total_profiles: usize,
    pub total_oracles: usize,
    pub treasury: TreasuryState,
}

impl<L: SettlementLedger> Engine<L> {
    pub fn owner(&self) -> &Principal {
        &self.state.admin.owner
    }

    pub fn is_paused(&self) -> bool {
        self.state.admin.paused
    }

    pub fn oracle(&self, oracle_id: &str) -> Option<&OracleRegistration> {
        self.state.oracles.get(oracle_id)
    }

    pub fn data_point(&self, oracle_id: &str, height: BlockHeight) -> Option<&OracleDataPoint> {
        self.state.feed.at(oracle_id, height)
    }

    /// Point published by `oracle_id` at the current `height`, if any
    pub fn latest(&self, oracle_id: &str, height: BlockHeight) -> Option<&OracleDataPoint> {
        self.state.feed.latest(oracle_id, height)
    }

    pub fn profile(&self, profile_id: ProfileId) -> Option<&RiskProfile> {
        self.state.profiles.get(profile_id)
    }

    pub fn quote_premium(&self, profile_id: ProfileId, coverage: Decimal) -> Result<PremiumQuote> {
        self.state.profiles.quote(profile_id, coverage)
    }

    pub fn policy(&self, policy_id: PolicyId) -> Option<&Policy> {
        self.state.policies.get(&policy_id)
    }

    pub fn condition(&self, policy_id: PolicyId) -> Option<&PolicyCondition> {
        self.state.conditions.get(&policy_id)
    }

    pub fn claim(&self, claim_id: ClaimId) -> Option<&Claim> {
        self.state.claims.get(&claim_id)
    }

    pub fn claim_for_policy(&self, policy_id: PolicyId) -> Option<&Claim> {
        self.state.claim_for_policy(policy_id)
    }

    pub fn user_policies(&self, holder: &Principal) -> &[PolicyId] {
        self.state
            .user_policies
            .get(holder)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn user_policy_count(&self, holder: &Principal) -> usize {
        self.user_policies(holder).len()
    }

    pub fn user_policy_at(&self, holder: &Principal, index: usize) -> Option<PolicyId> {
        self.user_policies(holder).get(index).copied()
    }

    pub fn is_active(&self, policy_id: PolicyId, height: BlockHeight) -> bool {
        self.policy(policy_id)
            .is_some_and(|policy| policy.is_active(height))
    }

    /// Whether the holder could submit a claim at `height`
    pub fn is_claimable(&self, policy_id: PolicyId, height: BlockHeight) -> bool {
        !self.is_paused()
            && self.is_active(policy_id, height)
            && self.condition(policy_id).is_some()
            && !self.state.policy_claims.contains_key(&policy_id)
    }

    pub fn is_renewable(&self, policy_id: PolicyId, height: BlockHeight) -> bool {
        self.policy(policy_id)
            .is_some_and(|policy| policy.is_renewable(height, self.config.renewal_window))
    }

    pub fn time_remaining(&self, policy_id: PolicyId, height: BlockHeight) -> Option<u64> {
        self.policy(policy_id)
            .map(|policy| policy.time_remaining(height))
    }

    /// Payout the policy's condition would produce if triggered
    pub fn potential_claim_amount(&self, policy_id: PolicyId) -> Result<Decimal> {
        let policy = self.state.policy(policy_id)?;
        let condition = self
            .condition(policy_id)
            .ok_or(NotFoundError::Condition(policy_id))?;
        apply_bps(policy.coverage_amount, condition.payout_bps)
    }

    pub fn treasury(&self) -> &TreasuryState {
        &self.state.treasury
    }

    pub fn stats(&self) -> ContractStats {
        let state = &self.state;
        ContractStats {
            owner: state.admin.owner.clone(),
            paused: state.admin.paused,
            next_policy_id: state.next_policy_id,
            next_claim_id: state.next_claim_id,
            total_policies: state.next_policy_id.saturating_sub(1),
            total_claims: state.next_claim_id.saturating_sub(1),
            total_profiles: state.profiles.len(),
            total_oracles: state.oracles.len(),
            treasury: state.treasury.clone(),
        }
    }
}
