//! Engine facade - the boundary surface exposed to the host
//!
//! Each mutating entry point is one atomic call: it runs inside a
//! [`UnitOfWork`] and either commits fully or leaves the engine untouched.

use rust_decimal::Decimal;
use stratus_common::{CallContext, ClaimId, PolicyId, Principal, Result};
use stratus_oracle::DataSubmission;
use stratus_pricing::NewRiskProfile;
use tracing::{debug, instrument, warn};

use crate::claim::{ClaimOutcome, NewClaim};
use crate::condition::NewCondition;
use crate::config::EngineConfig;
use crate::events::RecordedEvent;
use crate::host::SettlementLedger;
use crate::policy::NewPolicy;
use crate::state::EngineState;
use crate::uow::UnitOfWork;

/// Parametric insurance engine over a host settlement ledger
pub struct Engine<L: SettlementLedger> {
    pub(crate) config: EngineConfig,
    /// Account holding pooled treasury funds on the host ledger
    pub(crate) treasury_account: Principal,
    pub(crate) state: EngineState,
    ledger: L,
    outbox: Vec<RecordedEvent>,
}

impl<L: SettlementLedger> Engine<L> {
    /// Fresh engine administered by `owner`
    pub fn new(config: EngineConfig, owner: Principal, treasury_account: Principal, ledger: L) -> Self {
        Self::restore(config, treasury_account, EngineState::new(owner), ledger)
    }

    /// Resume from a persisted state snapshot
    pub fn restore(
        config: EngineConfig,
        treasury_account: Principal,
        state: EngineState,
        ledger: L,
    ) -> Self {
        Self {
            config,
            treasury_account,
            state,
            ledger,
            outbox: Vec::new(),
        }
    }

    /// Committed state, for persistence
    pub fn snapshot(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn treasury_account(&self) -> &Principal {
        &self.treasury_account
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Take the events of all calls committed since the last drain
    pub fn drain_events(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.outbox)
    }

    #[instrument(
        name = "engine_call",
        skip(self, ctx, f),
        fields(caller = %ctx.caller, height = ctx.height)
    )]
    fn transact<T>(
        &mut self,
        ctx: &CallContext,
        op: &'static str,
        f: impl FnOnce(&mut UnitOfWork<'_, L>) -> Result<T>,
    ) -> Result<T> {
        let mut uow = UnitOfWork::begin(
            ctx,
            &self.config,
            &self.treasury_account,
            self.state.clone(),
            &mut self.ledger,
        );

        match f(&mut uow) {
            Ok(value) => {
                let (state, events) = uow.commit();
                self.state = state;
                self.outbox.extend(events);
                debug!("Call committed");
                Ok(value)
            }
            Err(e) => {
                uow.rollback();
                warn!(kind = %e.kind(), error = %e, "Call rejected");
                Err(e)
            }
        }
    }

    // Administrative entry points

    pub fn pause(&mut self, ctx: &CallContext) -> Result<()> {
        self.transact(ctx, "pause", |uow| uow.set_paused(true))
    }

    pub fn unpause(&mut self, ctx: &CallContext) -> Result<()> {
        self.transact(ctx, "unpause", |uow| uow.set_paused(false))
    }

    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Principal) -> Result<()> {
        self.transact(ctx, "transfer_ownership", |uow| {
            uow.transfer_contract_ownership(new_owner)
        })
    }

    pub fn emergency_withdraw(&mut self, ctx: &CallContext, amount: Decimal) -> Result<()> {
        self.transact(ctx, "emergency_withdraw", |uow| uow.emergency_withdraw(amount))
    }

    pub fn fund_treasury(&mut self, ctx: &CallContext, amount: Decimal) -> Result<()> {
        self.transact(ctx, "fund_treasury", |uow| uow.fund_treasury(amount))
    }

    pub fn register_oracle(
        &mut self,
        ctx: &CallContext,
        oracle_id: &str,
        name: &str,
        oracle_type: &str,
    ) -> Result<()> {
        self.transact(ctx, "register_oracle", |uow| {
            uow.register_oracle(oracle_id, name, oracle_type)
        })
    }

    pub fn deactivate_oracle(&mut self, ctx: &CallContext, oracle_id: &str) -> Result<()> {
        self.transact(ctx, "deactivate_oracle", |uow| {
            uow.set_oracle_active(oracle_id, false)
        })
    }

    pub fn reactivate_oracle(&mut self, ctx: &CallContext, oracle_id: &str) -> Result<()> {
        self.transact(ctx, "reactivate_oracle", |uow| {
            uow.set_oracle_active(oracle_id, true)
        })
    }

    pub fn update_oracle_info(
        &mut self,
        ctx: &CallContext,
        oracle_id: &str,
        name: &str,
        oracle_type: &str,
    ) -> Result<()> {
        self.transact(ctx, "update_oracle_info", |uow| {
            uow.update_oracle_info(oracle_id, name, oracle_type)
        })
    }

    /// Callable only by the oracle's current controller
    pub fn transfer_oracle_ownership(
        &mut self,
        ctx: &CallContext,
        oracle_id: &str,
        new_controller: Principal,
    ) -> Result<()> {
        self.transact(ctx, "transfer_oracle_ownership", |uow| {
            uow.transfer_oracle_ownership(oracle_id, new_controller)
        })
    }

    pub fn create_profile(&mut self, ctx: &CallContext, profile: NewRiskProfile) -> Result<()> {
        self.transact(ctx, "create_profile", |uow| uow.create_profile(profile))
    }

    // Oracle entry points

    pub fn submit_data(
        &mut self,
        ctx: &CallContext,
        oracle_id: &str,
        submission: DataSubmission,
    ) -> Result<()> {
        self.transact(ctx, "submit_data", |uow| uow.submit_data(oracle_id, submission))
    }

    // Policyholder entry points

    pub fn create_policy(&mut self, ctx: &CallContext, request: NewPolicy) -> Result<PolicyId> {
        self.transact(ctx, "create_policy", |uow| uow.create_policy(request))
    }

    /// Returns the premium charged for the new term
    pub fn renew_policy(&mut self, ctx: &CallContext, policy_id: PolicyId, duration: u64) -> Result<Decimal> {
        self.transact(ctx, "renew_policy", |uow| uow.renew_policy(policy_id, duration))
    }

    /// Returns the refund paid
    pub fn cancel_policy(&mut self, ctx: &CallContext, policy_id: PolicyId) -> Result<Decimal> {
        self.transact(ctx, "cancel_policy", |uow| uow.cancel_policy(policy_id))
    }

    pub fn add_condition(
        &mut self,
        ctx: &CallContext,
        policy_id: PolicyId,
        condition: NewCondition,
    ) -> Result<()> {
        self.transact(ctx, "add_condition", |uow| uow.add_condition(policy_id, condition))
    }

    pub fn submit_claim(&mut self, ctx: &CallContext, request: NewClaim) -> Result<ClaimId> {
        self.transact(ctx, "submit_claim", |uow| uow.submit_claim(request))
    }

    // Public settlement trigger

    pub fn process_claim(&mut self, ctx: &CallContext, claim_id: ClaimId) -> Result<ClaimOutcome> {
        self.transact(ctx, "process_claim", |uow| uow.process_claim(claim_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{InMemoryLedger, MockSettlementLedger};
    use crate::policy::PolicyStatus;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;
    use stratus_common::{ErrorKind, SettlementError, StateError, StratusError};

    const ADMIN: &str = "admin";
    const FARMER: &str = "farmer";
    const TREASURY: &str = "treasury";

    fn drought_profile() -> NewRiskProfile {
        NewRiskProfile {
            profile_id: 1,
            name: "Drought".to_string(),
            base_rate_bps: 500,
            risk_factor_bps: 200,
            coverage_multiplier: 1,
            min_coverage: dec!(1000),
            max_coverage: dec!(100000),
            description: String::new(),
        }
    }

    fn new_policy() -> NewPolicy {
        NewPolicy {
            profile_id: 1,
            coverage_amount: dec!(10000),
            duration: 1000,
            auto_renew: false,
            location: "Nairobi".to_string(),
        }
    }

    fn engine_with<L: SettlementLedger>(ledger: L) -> Engine<L> {
        let mut engine = Engine::new(
            EngineConfig::default(),
            Principal::new(ADMIN),
            Principal::new(TREASURY),
            ledger,
        );
        engine
            .create_profile(&CallContext::new(ADMIN, 1), drought_profile())
            .unwrap();
        engine
    }

    #[test]
    fn test_failed_transfer_leaves_no_trace() {
        let mut ledger = MockSettlementLedger::new();
        ledger
            .expect_transfer()
            .with(eq(dec!(700)), eq(Principal::new(FARMER)), eq(Principal::new(TREASURY)))
            .times(1)
            .returning(|_, _, _| Err(SettlementError::Rejected("account frozen".to_string())));

        let mut engine = engine_with(ledger);
        engine.drain_events();

        let result = engine.create_policy(&CallContext::new(FARMER, 10), new_policy());
        assert!(matches!(result, Err(StratusError::Settlement(_))));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidState);

        assert!(engine.policy(1).is_none());
        assert_eq!(engine.treasury().balance, Decimal::ZERO);
        assert_eq!(engine.user_policy_count(&Principal::new(FARMER)), 0);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_rollback_reverses_settled_transfers() {
        let mut ledger = MockSettlementLedger::new();
        let mut seq = mockall::Sequence::new();
        ledger
            .expect_transfer()
            .with(eq(dec!(700)), eq(Principal::new(FARMER)), eq(Principal::new(TREASURY)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        ledger
            .expect_transfer()
            .with(eq(dec!(700)), eq(Principal::new(TREASURY)), eq(Principal::new(FARMER)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let mut engine = engine_with(ledger);
        let ctx = CallContext::new(FARMER, 10);

        let result = engine.transact(&ctx, "create_then_fail", |uow| {
            uow.create_policy(new_policy())?;
            Err::<(), _>(StateError::Paused.into())
        });

        assert!(result.is_err());
        assert!(engine.policy(1).is_none());
        assert_eq!(engine.treasury().total_premiums_collected, Decimal::ZERO);
    }

    #[test]
    fn test_committed_events_carry_call_context() {
        let ledger = InMemoryLedger::new().with_balance(FARMER, dec!(1000));
        let mut engine = engine_with(ledger);
        engine.drain_events();

        let policy_id = engine
            .create_policy(&CallContext::new(FARMER, 10), new_policy())
            .unwrap();
        assert_eq!(engine.policy(policy_id).unwrap().status, PolicyStatus::Active);

        let events = engine.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].height, 10);
        assert_eq!(events[0].caller, Principal::new(FARMER));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let ledger = InMemoryLedger::new().with_balance(FARMER, dec!(1000));
        let mut engine = engine_with(ledger.clone());
        engine
            .create_policy(&CallContext::new(FARMER, 10), new_policy())
            .unwrap();

        let json = engine.snapshot().to_json().unwrap();
        let state = EngineState::from_json(&json).unwrap();
        let restored = Engine::restore(
            EngineConfig::default(),
            Principal::new(TREASURY),
            state,
            ledger,
        );

        assert_eq!(restored.snapshot(), engine.snapshot());
        assert_eq!(restored.treasury().balance, dec!(700));
        assert_eq!(restored.user_policies(&Principal::new(FARMER)), &[1]);
    }
}
