//! Policy lifecycle - purchase, renewal, cancellation
//!
//! ```text
//! Active ──cancel──▶ Canceled
//!   │ ╲
//!   │  ╲──paid claim──▶ Claimed
//!   ▼
//! (past end_height: reads as Expired) ──renew──▶ Active
//! ```
//!
//! Expiry is never stored. A policy is active while its stored status is
//! `Active` and the current height lies in `[start_height, end_height]`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{
    apply_bps, ensure_text, AuthError, BlockHeight, InputError, PolicyId, Principal, ProfileId,
    Result, StateError, BPS_DENOMINATOR,
};
use tracing::info;

use crate::claim::ClaimStatus;
use crate::events::EngineEvent;
use crate::host::SettlementLedger;
use crate::treasury::Outflow;
use crate::uow::UnitOfWork;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    Active,
    /// Derived only; see [`Policy::effective_status`]
    Expired,
    Canceled,
    Claimed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: PolicyId,
    pub holder: Principal,
    pub risk_profile_id: ProfileId,
    pub coverage_amount: Decimal,
    /// Premium paid for the current term
    pub premium_amount: Decimal,
    pub start_height: BlockHeight,
    pub end_height: BlockHeight,
    pub status: PolicyStatus,
    pub renewal_count: u32,
    pub auto_renew: bool,
    pub location: String,
    pub created_at: BlockHeight,
    pub last_updated: BlockHeight,
}

impl Policy {
    pub fn is_active(&self, height: BlockHeight) -> bool {
        self.status == PolicyStatus::Active
            && height >= self.start_height
            && height <= self.end_height
    }

    /// Stored status, with `Active` reported as `Expired` past the end height
    pub fn effective_status(&self, height: BlockHeight) -> PolicyStatus {
        match self.status {
            PolicyStatus::Active if height > self.end_height => PolicyStatus::Expired,
            status => status,
        }
    }

    pub fn duration(&self) -> u64 {
        self.end_height - self.start_height
    }

    pub fn time_remaining(&self, height: BlockHeight) -> u64 {
        if self.status != PolicyStatus::Active {
            return 0;
        }
        self.end_height.saturating_sub(height)
    }

    /// Expired, or ending within `window` heights
    pub fn in_renewal_window(&self, height: BlockHeight, window: u64) -> bool {
        height > self.end_height || self.end_height - height <= window
    }

    pub fn is_renewable(&self, height: BlockHeight, window: u64) -> bool {
        self.status == PolicyStatus::Active && self.in_renewal_window(height, window)
    }

    /// Refund owed if canceled at `height`.
    ///
    /// `refund_bps` of the premium when strictly more than `threshold_bps` of
    /// the term remains, otherwise nothing.
    pub fn cancellation_refund(
        &self,
        height: BlockHeight,
        threshold_bps: u32,
        refund_bps: u32,
    ) -> Result<Decimal> {
        let remaining = self.end_height.saturating_sub(height) as u128;
        let duration = self.duration() as u128;

        if remaining * BPS_DENOMINATOR as u128 > duration * threshold_bps as u128 {
            apply_bps(self.premium_amount, refund_bps)
        } else {
            Ok(Decimal::ZERO)
        }
    }

    fn ensure_holder(&self, caller: &Principal) -> Result<()> {
        if &self.holder != caller {
            return Err(AuthError::NotPolicyHolder {
                caller: caller.clone(),
                policy_id: self.policy_id,
            }
            .into());
        }
        Ok(())
    }
}

/// Purchase request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPolicy {
    pub profile_id: ProfileId,
    pub coverage_amount: Decimal,
    pub duration: u64,
    pub auto_renew: bool,
    pub location: String,
}

fn end_height(start: BlockHeight, duration: u64) -> Result<BlockHeight> {
    if duration == 0 {
        return Err(InputError::InvalidDuration.into());
    }
    start
        .checked_add(duration)
        .ok_or_else(|| InputError::Overflow.into())
}

impl<L: SettlementLedger> UnitOfWork<'_, L> {
    pub(crate) fn create_policy(&mut self, request: NewPolicy) -> Result<PolicyId> {
        self.require_not_paused()?;
        ensure_text("location", &request.location, self.config().max_location_len)?;

        let height = self.height();
        let end = end_height(height, request.duration)?;
        let premium = self
            .state
            .profiles
            .calculate_premium(request.profile_id, request.coverage_amount)?;

        let holder = self.caller();
        self.collect_premium(holder, premium)?;

        let policy_id = self.state.next_policy_id;
        self.state.next_policy_id += 1;

        let policy = Policy {
            policy_id,
            holder: holder.clone(),
            risk_profile_id: request.profile_id,
            coverage_amount: request.coverage_amount,
            premium_amount: premium,
            start_height: height,
            end_height: end,
            status: PolicyStatus::Active,
            renewal_count: 0,
            auto_renew: request.auto_renew,
            location: request.location,
            created_at: height,
            last_updated: height,
        };
        self.state.policies.insert(policy_id, policy);
        self.state
            .user_policies
            .entry(holder.clone())
            .or_default()
            .push(policy_id);

        info!(policy_id, %holder, %premium, end_height = end, "Policy created");
        self.emit(EngineEvent::PolicyCreated {
            policy_id,
            holder: holder.clone(),
            premium,
            end_height: end,
        });
        Ok(policy_id)
    }

    /// Renew for `duration` heights from now; returns the premium charged
    pub(crate) fn renew_policy(&mut self, policy_id: PolicyId, duration: u64) -> Result<Decimal> {
        let height = self.height();
        let window = self.config().renewal_window;
        let caller = self.caller();

        let policy = self.state.policy(policy_id)?;
        policy.ensure_holder(caller)?;
        if !policy.is_renewable(height, window) {
            return Err(StateError::NotRenewable(policy_id).into());
        }

        let end = end_height(height, duration)?;
        let premium = self
            .state
            .profiles
            .calculate_premium(policy.risk_profile_id, policy.coverage_amount)?;

        self.collect_premium(caller, premium)?;

        let policy = self.state.policy_mut(policy_id)?;
        policy.premium_amount = premium;
        policy.start_height = height;
        policy.end_height = end;
        policy.renewal_count += 1;
        policy.status = PolicyStatus::Active;
        policy.last_updated = height;
        let renewal_count = policy.renewal_count;

        info!(policy_id, %premium, end_height = end, renewal_count, "Policy renewed");
        self.emit(EngineEvent::PolicyRenewed {
            policy_id,
            premium,
            end_height: end,
            renewal_count,
        });
        Ok(premium)
    }

    /// Cancel a policy that has not yet expired; returns the refund paid
    pub(crate) fn cancel_policy(&mut self, policy_id: PolicyId) -> Result<Decimal> {
        let height = self.height();
        let caller = self.caller();
        let config = self.config();

        let policy = self.state.policy(policy_id)?;
        policy.ensure_holder(caller)?;
        // Expired policies can only be renewed
        if policy.effective_status(height) != PolicyStatus::Active {
            return Err(StateError::PolicyNotActive(policy_id).into());
        }
        if self
            .state
            .claim_for_policy(policy_id)
            .is_some_and(|claim| claim.status == ClaimStatus::Pending)
        {
            return Err(StateError::ClaimPending(policy_id).into());
        }

        let refund =
            policy.cancellation_refund(height, config.refund_threshold_bps, config.refund_bps)?;
        if !refund.is_zero() {
            self.pay_out(caller, refund, Outflow::Refund)?;
        }

        let policy = self.state.policy_mut(policy_id)?;
        policy.status = PolicyStatus::Canceled;
        policy.last_updated = height;

        info!(policy_id, %refund, "Policy canceled");
        self.emit(EngineEvent::PolicyCanceled { policy_id, refund });
        Ok(refund)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn policy(start: BlockHeight, end: BlockHeight) -> Policy {
        Policy {
            policy_id: 1,
            holder: Principal::new("farmer"),
            risk_profile_id: 1,
            coverage_amount: dec!(10000),
            premium_amount: dec!(700),
            start_height: start,
            end_height: end,
            status: PolicyStatus::Active,
            renewal_count: 0,
            auto_renew: false,
            location: "Nairobi".to_string(),
            created_at: start,
            last_updated: start,
        }
    }

    #[test]
    fn test_active_window_is_inclusive() {
        let p = policy(100, 200);
        assert!(p.is_active(100));
        assert!(p.is_active(200));
        assert!(!p.is_active(201));
        assert_eq!(p.effective_status(201), PolicyStatus::Expired);
        assert_eq!(p.effective_status(150), PolicyStatus::Active);
    }

    #[test]
    fn test_status_gates_activity() {
        let mut p = policy(100, 200);
        p.status = PolicyStatus::Canceled;
        assert!(!p.is_active(150));
        assert_eq!(p.time_remaining(150), 0);
        assert_eq!(p.effective_status(500), PolicyStatus::Canceled);
    }

    #[test]
    fn test_renewal_window() {
        let p = policy(0, 1000);
        assert!(!p.is_renewable(899, 100));
        assert!(p.is_renewable(900, 100));
        assert!(p.is_renewable(1000, 100));
        assert!(p.is_renewable(5000, 100));

        let mut claimed = policy(0, 1000);
        claimed.status = PolicyStatus::Claimed;
        assert!(!claimed.is_renewable(950, 100));
    }

    #[test]
    fn test_cancellation_refund_threshold() {
        let p = policy(0, 1000);
        // 30% elapsed
        assert_eq!(p.cancellation_refund(300, 5000, 5000).unwrap(), dec!(350));
        // exactly half remaining is not "more than half"
        assert_eq!(p.cancellation_refund(500, 5000, 5000).unwrap(), Decimal::ZERO);
        // 80% elapsed
        assert_eq!(p.cancellation_refund(800, 5000, 5000).unwrap(), Decimal::ZERO);
        // past the end
        assert_eq!(p.cancellation_refund(1200, 5000, 5000).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_end_height_validation() {
        assert_eq!(end_height(10, 5).unwrap(), 15);
        assert!(end_height(10, 0).is_err());
        assert!(end_height(u64::MAX, 1).is_err());
    }

    proptest! {
        #[test]
        fn prop_refund_is_half_or_nothing(duration in 1u64..100_000, elapsed_pct in 0u64..=150) {
            let p = policy(0, duration);
            let height = duration * elapsed_pct / 100;
            let refund = p.cancellation_refund(height, 5000, 5000).unwrap();

            let remaining = duration.saturating_sub(height);
            if remaining * 2 > duration {
                prop_assert_eq!(refund, dec!(350));
            } else {
                prop_assert_eq!(refund, Decimal::ZERO);
            }
        }
    }
}
