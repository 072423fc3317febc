//! Administrative control - owner identity, pause switch, emergency exit
//!
//! Pausing blocks policy creation and claim submission only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{ensure_positive, AuthError, Principal, Result, StateError};
use tracing::{info, warn};

use crate::events::EngineEvent;
use crate::host::SettlementLedger;
use crate::treasury::Outflow;
use crate::uow::UnitOfWork;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminState {
    pub owner: Principal,
    pub paused: bool,
}

impl AdminState {
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            paused: false,
        }
    }
}

impl<L: SettlementLedger> UnitOfWork<'_, L> {
    pub(crate) fn require_owner(&self) -> Result<()> {
        if self.caller() != &self.state.admin.owner {
            return Err(AuthError::NotOwner {
                caller: self.caller().clone(),
            }
            .into());
        }
        Ok(())
    }

    pub(crate) fn require_not_paused(&self) -> Result<()> {
        if self.state.admin.paused {
            return Err(StateError::Paused.into());
        }
        Ok(())
    }

    pub(crate) fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.require_owner()?;
        self.state.admin.paused = paused;

        info!(paused, "Pause switch changed");
        self.emit(EngineEvent::PauseChanged { paused });
        Ok(())
    }

    pub(crate) fn transfer_contract_ownership(&mut self, new_owner: Principal) -> Result<()> {
        self.require_owner()?;

        info!(from = %self.state.admin.owner, to = %new_owner, "Contract ownership transferred");
        self.state.admin.owner = new_owner.clone();
        self.emit(EngineEvent::OwnershipTransferred { new_owner });
        Ok(())
    }

    /// Drain `amount` from the treasury to the owner
    pub(crate) fn emergency_withdraw(&mut self, amount: Decimal) -> Result<()> {
        self.require_owner()?;
        ensure_positive(amount)?;

        let owner = self.state.admin.owner.clone();
        self.pay_out(&owner, amount, Outflow::EmergencyWithdrawal)?;

        warn!(%amount, "Emergency withdrawal executed");
        self.emit(EngineEvent::EmergencyWithdrawal { amount });
        Ok(())
    }
}
