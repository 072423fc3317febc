//! Condition registry - the single payout trigger of a policy

use serde::{Deserialize, Serialize};
use stratus_common::{
    ensure_text, AuthError, InputError, PolicyId, Result, StateError, MAX_PAYOUT_BPS,
};
use tracing::info;

use crate::events::EngineEvent;
use crate::host::SettlementLedger;
use crate::uow::UnitOfWork;

/// Policies carry exactly one condition, always at this index
pub const CONDITION_INDEX: u8 = 0;

/// Trigger: `oracle value <operator> threshold` pays `payout_bps` of coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCondition {
    pub policy_id: PolicyId,
    pub condition_index: u8,
    pub weather_type: String,
    /// Comparator code as attached; see [`stratus_oracle::Comparator`]
    pub operator: u8,
    pub threshold: i64,
    pub payout_bps: u32,
    pub oracle_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCondition {
    pub weather_type: String,
    pub operator: u8,
    pub threshold: i64,
    pub payout_bps: u32,
    pub oracle_id: String,
}

impl<L: SettlementLedger> UnitOfWork<'_, L> {
    /// Attach (or replace) the policy's condition
    pub(crate) fn add_condition(&mut self, policy_id: PolicyId, request: NewCondition) -> Result<()> {
        let height = self.height();
        let caller = self.caller();

        let policy = self.state.policy(policy_id)?;
        if &policy.holder != caller {
            return Err(AuthError::NotPolicyHolder {
                caller: caller.clone(),
                policy_id,
            }
            .into());
        }
        if !policy.is_active(height) {
            return Err(StateError::PolicyNotActive(policy_id).into());
        }
        if request.payout_bps > MAX_PAYOUT_BPS {
            return Err(InputError::InvalidPayoutBps(request.payout_bps).into());
        }
        ensure_text("weather_type", &request.weather_type, self.config().max_id_len)?;
        self.state.oracles.require_active(&request.oracle_id)?;

        // The claim amount is fixed from this condition at submission
        if self.state.policy_claims.contains_key(&policy_id) {
            return Err(StateError::AlreadyClaimed(policy_id).into());
        }

        let condition = PolicyCondition {
            policy_id,
            condition_index: CONDITION_INDEX,
            weather_type: request.weather_type,
            operator: request.operator,
            threshold: request.threshold,
            payout_bps: request.payout_bps,
            oracle_id: request.oracle_id,
        };

        info!(
            policy_id,
            oracle_id = %condition.oracle_id,
            operator = condition.operator,
            threshold = condition.threshold,
            payout_bps = condition.payout_bps,
            "Condition attached"
        );
        self.emit(EngineEvent::ConditionAttached {
            policy_id,
            oracle_id: condition.oracle_id.clone(),
            payout_bps: condition.payout_bps,
        });
        self.state.conditions.insert(policy_id, condition);
        Ok(())
    }
}
