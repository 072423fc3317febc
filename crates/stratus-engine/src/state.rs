//! Engine state
//!
//! Every mapping the engine persists between calls. The host's storage layer
//! keeps a serialized copy; the engine only ever replaces it wholesale on
//! commit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stratus_common::{
    ClaimId, NotFoundError, PolicyId, Principal, Result,
};
use stratus_oracle::{FeedStore, OracleDirectory};
use stratus_pricing::RiskProfileCatalog;

use crate::admin::AdminState;
use crate::claim::Claim;
use crate::condition::PolicyCondition;
use crate::policy::Policy;
use crate::treasury::TreasuryState;

/// Persisted engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub(crate) admin: AdminState,
    pub(crate) treasury: TreasuryState,
    pub(crate) oracles: OracleDirectory,
    pub(crate) feed: FeedStore,
    pub(crate) profiles: RiskProfileCatalog,
    pub(crate) policies: BTreeMap<PolicyId, Policy>,
    /// Single condition slot per policy
    pub(crate) conditions: BTreeMap<PolicyId, PolicyCondition>,
    pub(crate) claims: BTreeMap<ClaimId, Claim>,
    /// Single claim slot per policy
    pub(crate) policy_claims: BTreeMap<PolicyId, ClaimId>,
    /// Append-only, in purchase order
    pub(crate) user_policies: BTreeMap<Principal, Vec<PolicyId>>,
    pub(crate) next_policy_id: PolicyId,
    pub(crate) next_claim_id: ClaimId,
}

impl EngineState {
    pub fn new(owner: Principal) -> Self {
        Self {
            admin: AdminState::new(owner),
            treasury: TreasuryState::default(),
            oracles: OracleDirectory::new(),
            feed: FeedStore::new(),
            profiles: RiskProfileCatalog::new(),
            policies: BTreeMap::new(),
            conditions: BTreeMap::new(),
            claims: BTreeMap::new(),
            policy_claims: BTreeMap::new(),
            user_policies: BTreeMap::new(),
            next_policy_id: 1,
            next_claim_id: 1,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub(crate) fn policy(&self, policy_id: PolicyId) -> Result<&Policy> {
        self.policies
            .get(&policy_id)
            .ok_or_else(|| NotFoundError::Policy(policy_id).into())
    }

    pub(crate) fn policy_mut(&mut self, policy_id: PolicyId) -> Result<&mut Policy> {
        self.policies
            .get_mut(&policy_id)
            .ok_or_else(|| NotFoundError::Policy(policy_id).into())
    }

    pub(crate) fn condition(&self, policy_id: PolicyId) -> Result<&PolicyCondition> {
        self.conditions
            .get(&policy_id)
            .ok_or_else(|| NotFoundError::Condition(policy_id).into())
    }

    pub(crate) fn claim(&self, claim_id: ClaimId) -> Result<&Claim> {
        self.claims
            .get(&claim_id)
            .ok_or_else(|| NotFoundError::Claim(claim_id).into())
    }

    pub(crate) fn claim_mut(&mut self, claim_id: ClaimId) -> Result<&mut Claim> {
        self.claims
            .get_mut(&claim_id)
            .ok_or_else(|| NotFoundError::Claim(claim_id).into())
    }

    pub(crate) fn claim_for_policy(&self, policy_id: PolicyId) -> Option<&Claim> {
        self.policy_claims
            .get(&policy_id)
            .and_then(|claim_id| self.claims.get(claim_id))
    }
}
