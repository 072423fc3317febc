//! Unit of work - one atomic engine call
//!
//! A call runs against a private copy of [`EngineState`]. Transfers go to the
//! host ledger as soon as they are requested and are journaled. On success the
//! copy and the call's events are committed; on failure the copy is dropped
//! and journaled transfers are reversed newest first, so a rejected call leaves
//! no trace in state or balances.

use rust_decimal::Decimal;
use stratus_common::{BlockHeight, CallContext, Principal, Result};
use tracing::{debug, error};

use crate::config::EngineConfig;
use crate::events::{EngineEvent, RecordedEvent};
use crate::host::{SettlementLedger, Transfer};
use crate::state::EngineState;

pub struct UnitOfWork<'a, L: SettlementLedger> {
    ctx: &'a CallContext,
    config: &'a EngineConfig,
    treasury_account: &'a Principal,
    pub(crate) state: EngineState,
    ledger: &'a mut L,
    journal: Vec<Transfer>,
    events: Vec<EngineEvent>,
}

impl<'a, L: SettlementLedger> UnitOfWork<'a, L> {
    pub(crate) fn begin(
        ctx: &'a CallContext,
        config: &'a EngineConfig,
        treasury_account: &'a Principal,
        state: EngineState,
        ledger: &'a mut L,
    ) -> Self {
        Self {
            ctx,
            config,
            treasury_account,
            state,
            ledger,
            journal: Vec::new(),
            events: Vec::new(),
        }
    }

    pub(crate) fn caller(&self) -> &'a Principal {
        &self.ctx.caller
    }

    pub(crate) fn height(&self) -> BlockHeight {
        self.ctx.height
    }

    pub(crate) fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub(crate) fn treasury_account(&self) -> &'a Principal {
        self.treasury_account
    }

    /// Move value through the host ledger. Zero amounts are a no-op.
    pub(crate) fn transfer(&mut self, amount: Decimal, from: &Principal, to: &Principal) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }

        self.ledger.transfer(amount, from, to)?;
        debug!(%amount, %from, %to, "Transfer settled");
        self.journal.push(Transfer {
            amount,
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    pub(crate) fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub(crate) fn commit(self) -> (EngineState, Vec<RecordedEvent>) {
        let height = self.ctx.height;
        let caller = &self.ctx.caller;
        let events = self
            .events
            .into_iter()
            .map(|event| RecordedEvent {
                height,
                caller: caller.clone(),
                event,
            })
            .collect();
        (self.state, events)
    }

    pub(crate) fn rollback(self) {
        for transfer in self.journal.into_iter().rev() {
            if let Err(e) = self
                .ledger
                .transfer(transfer.amount, &transfer.to, &transfer.from)
            {
                error!(
                    amount = %transfer.amount,
                    from = %transfer.from,
                    to = %transfer.to,
                    error = %e,
                    "Failed to reverse transfer during rollback"
                );
            }
        }
    }
}
