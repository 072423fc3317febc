//! Treasury ledger - pooled premiums and payout solvency
//!
//! Inflows: premiums and capital deposits. Outflows: claim payouts, refunds
//! and emergency withdrawals. Every outflow checks solvency, then transfers,
//! then books; a failed transfer leaves the books untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{ensure_positive, InputError, Principal, Result, StratusError};
use tracing::info;

use crate::events::EngineEvent;
use crate::host::SettlementLedger;
use crate::uow::UnitOfWork;

/// Aggregate treasury bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryState {
    pub balance: Decimal,
    pub total_premiums_collected: Decimal,
    pub total_claims_paid: Decimal,
    pub total_refunds_paid: Decimal,
    pub total_withdrawn: Decimal,
}

/// Reason value leaves the treasury
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outflow {
    ClaimPayout,
    Refund,
    EmergencyWithdrawal,
}

impl TreasuryState {
    pub fn ensure_solvent(&self, amount: Decimal) -> Result<()> {
        if amount > self.balance {
            return Err(StratusError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    fn credit(&mut self, amount: Decimal, premium: bool) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(InputError::Overflow)?;
        if premium {
            self.total_premiums_collected = self
                .total_premiums_collected
                .checked_add(amount)
                .ok_or(InputError::Overflow)?;
        }
        Ok(())
    }

    fn debit(&mut self, amount: Decimal, kind: Outflow) -> Result<()> {
        self.ensure_solvent(amount)?;
        self.balance -= amount;

        let counter = match kind {
            Outflow::ClaimPayout => &mut self.total_claims_paid,
            Outflow::Refund => &mut self.total_refunds_paid,
            Outflow::EmergencyWithdrawal => &mut self.total_withdrawn,
        };
        *counter = counter.checked_add(amount).ok_or(InputError::Overflow)?;
        Ok(())
    }
}

impl<L: SettlementLedger> UnitOfWork<'_, L> {
    /// Move a premium from `payer` into the treasury
    pub(crate) fn collect_premium(&mut self, payer: &Principal, amount: Decimal) -> Result<()> {
        let treasury = self.treasury_account();
        self.transfer(amount, payer, treasury)?;
        self.state.treasury.credit(amount, true)
    }

    /// Pay `amount` out of the treasury to `recipient`
    pub(crate) fn pay_out(&mut self, recipient: &Principal, amount: Decimal, kind: Outflow) -> Result<()> {
        self.state.treasury.ensure_solvent(amount)?;

        let treasury = self.treasury_account();
        self.transfer(amount, treasury, recipient)?;
        self.state.treasury.debit(amount, kind)?;

        info!(%amount, %recipient, ?kind, balance = %self.state.treasury.balance, "Treasury outflow");
        Ok(())
    }

    /// Capital deposit from the caller; not counted as premium
    pub(crate) fn fund_treasury(&mut self, amount: Decimal) -> Result<()> {
        ensure_positive(amount)?;

        let caller = self.caller();
        let treasury = self.treasury_account();
        self.transfer(amount, caller, treasury)?;
        self.state.treasury.credit(amount, false)?;

        self.emit(EngineEvent::TreasuryFunded { amount });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_and_debit() {
        let mut treasury = TreasuryState::default();
        treasury.credit(dec!(700), true).unwrap();
        treasury.credit(dec!(5000), false).unwrap();
        assert_eq!(treasury.balance, dec!(5700));
        assert_eq!(treasury.total_premiums_collected, dec!(700));

        treasury.debit(dec!(350), Outflow::Refund).unwrap();
        treasury.debit(dec!(5000), Outflow::ClaimPayout).unwrap();
        assert_eq!(treasury.balance, dec!(350));
        assert_eq!(treasury.total_refunds_paid, dec!(350));
        assert_eq!(treasury.total_claims_paid, dec!(5000));
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let mut treasury = TreasuryState::default();
        treasury.credit(dec!(100), true).unwrap();

        let result = treasury.debit(dec!(101), Outflow::EmergencyWithdrawal);
        assert!(matches!(result, Err(StratusError::InsufficientFunds { .. })));
        assert_eq!(treasury.balance, dec!(100));
        assert_eq!(treasury.total_withdrawn, Decimal::ZERO);
    }
}
