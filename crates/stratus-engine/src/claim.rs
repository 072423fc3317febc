//! Claim evaluation - submission against a published measurement, then
//! automated settlement
//!
//! ```text
//! Pending ──condition holds, treasury solvent──▶ Paid      (policy → Claimed)
//!    └─────condition does not hold──────────────▶ Rejected  (policy untouched)
//! ```
//!
//! Both outcomes are terminal. A policy's claim slot stays occupied after
//! either outcome, so each policy is claimed at most once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{
    apply_bps, AuthError, BlockHeight, ClaimId, DataMismatchError, PolicyId, Principal, Result,
    StateError,
};
use stratus_oracle::evaluate;
use tracing::{debug, info};

use crate::condition::CONDITION_INDEX;
use crate::events::EngineEvent;
use crate::host::SettlementLedger;
use crate::policy::PolicyStatus;
use crate::treasury::Outflow;
use crate::uow::UnitOfWork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Pending,
    /// Reserved; automated settlement goes straight to `Paid` or `Rejected`
    Approved,
    Rejected,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: ClaimId,
    pub policy_id: PolicyId,
    pub claimant: Principal,
    pub status: ClaimStatus,
    /// Fixed at submission: coverage × payout_bps / 10000
    pub claim_amount: Decimal,
    pub weather_event_type: String,
    pub weather_event_value: i64,
    pub condition_index: u8,
    /// Oracle whose point at `oracle_data_height` this claim is bound to
    pub oracle_id: String,
    pub oracle_data_height: BlockHeight,
    pub submitted_at: BlockHeight,
    pub processed_at: Option<BlockHeight>,
    pub paid_at: Option<BlockHeight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClaim {
    pub policy_id: PolicyId,
    pub weather_event_type: String,
    pub weather_event_value: i64,
    pub oracle_data_height: BlockHeight,
}

/// Result of settling a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub status: ClaimStatus,
    pub payout: Decimal,
}

impl<L: SettlementLedger> UnitOfWork<'_, L> {
    pub(crate) fn submit_claim(&mut self, request: NewClaim) -> Result<ClaimId> {
        self.require_not_paused()?;

        let height = self.height();
        let caller = self.caller();
        let policy_id = request.policy_id;

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
        if self.state.policy_claims.contains_key(&policy_id) {
            return Err(StateError::AlreadyClaimed(policy_id).into());
        }

        let condition = self.state.condition(policy_id)?;
        if condition.weather_type != request.weather_event_type {
            return Err(DataMismatchError::WeatherTypeMismatch {
                expected: condition.weather_type.clone(),
                actual: request.weather_event_type,
            }
            .into());
        }

        let point = self
            .state
            .feed
            .at(&condition.oracle_id, request.oracle_data_height)
            .ok_or_else(|| DataMismatchError::DataPointMissing {
                oracle_id: condition.oracle_id.clone(),
                height: request.oracle_data_height,
            })?;
        if point.weather_type != request.weather_event_type {
            return Err(DataMismatchError::WeatherTypeMismatch {
                expected: point.weather_type.clone(),
                actual: request.weather_event_type,
            }
            .into());
        }
        if point.value != request.weather_event_value {
            return Err(DataMismatchError::ValueMismatch {
                expected: point.value,
                actual: request.weather_event_value,
            }
            .into());
        }

        let claim_amount = apply_bps(policy.coverage_amount, condition.payout_bps)?;
        let oracle_id = condition.oracle_id.clone();

        let claim_id = self.state.next_claim_id;
        self.state.next_claim_id += 1;

        let claim = Claim {
            claim_id,
            policy_id,
            claimant: caller.clone(),
            status: ClaimStatus::Pending,
            claim_amount,
            weather_event_type: request.weather_event_type,
            weather_event_value: request.weather_event_value,
            condition_index: CONDITION_INDEX,
            oracle_id,
            oracle_data_height: request.oracle_data_height,
            submitted_at: height,
            processed_at: None,
            paid_at: None,
        };
        self.state.claims.insert(claim_id, claim);
        self.state.policy_claims.insert(policy_id, claim_id);

        info!(claim_id, policy_id, %claim_amount, "Claim submitted");
        self.emit(EngineEvent::ClaimSubmitted {
            claim_id,
            policy_id,
            claim_amount,
        });
        Ok(claim_id)
    }

    /// Settle a pending claim. Open to any caller.
    pub(crate) fn process_claim(&mut self, claim_id: ClaimId) -> Result<ClaimOutcome> {
        let height = self.height();

        let claim = self.state.claim(claim_id)?;
        if claim.status != ClaimStatus::Pending {
            return Err(StateError::ClaimNotPending(claim_id).into());
        }
        let policy_id = claim.policy_id;

        let condition = self.state.condition(policy_id)?;
        let point = self
            .state
            .feed
            .at(&claim.oracle_id, claim.oracle_data_height)
            .ok_or_else(|| DataMismatchError::DataPointMissing {
                oracle_id: claim.oracle_id.clone(),
                height: claim.oracle_data_height,
            })?;

        let triggered = evaluate(condition.operator, point.value, condition.threshold);
        debug!(
            claim_id,
            operator = condition.operator,
            actual = point.value,
            threshold = condition.threshold,
            triggered,
            "Condition evaluated"
        );

        if !triggered {
            let claim = self.state.claim_mut(claim_id)?;
            claim.status = ClaimStatus::Rejected;
            claim.processed_at = Some(height);

            info!(claim_id, policy_id, "Claim rejected");
            self.emit(EngineEvent::ClaimRejected {
                claim_id,
                policy_id,
            });
            return Ok(ClaimOutcome {
                status: ClaimStatus::Rejected,
                payout: Decimal::ZERO,
            });
        }

        let amount = claim.claim_amount;
        let claimant = claim.claimant.clone();
        self.pay_out(&claimant, amount, Outflow::ClaimPayout)?;

        let claim = self.state.claim_mut(claim_id)?;
        claim.status = ClaimStatus::Paid;
        claim.processed_at = Some(height);
        claim.paid_at = Some(height);

        let policy = self.state.policy_mut(policy_id)?;
        policy.status = PolicyStatus::Claimed;
        policy.last_updated = height;

        info!(claim_id, policy_id, %amount, %claimant, "Claim paid");
        self.emit(EngineEvent::ClaimPaid {
            claim_id,
            policy_id,
            amount,
        });
        Ok(ClaimOutcome {
            status: ClaimStatus::Paid,
            payout: amount,
        })
    }
}
