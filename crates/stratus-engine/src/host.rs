//! Host ledger seam
//!
//! The settlement layer that actually moves value is supplied by the host.
//! A transfer either fully succeeds or fully fails.

use std::collections::HashMap;

use rust_decimal::Decimal;
use stratus_common::{Principal, SettlementError};

/// Atomic value transfer supplied by the host ledger
#[cfg_attr(test, mockall::automock)]
pub trait SettlementLedger {
    fn transfer(
        &mut self,
        amount: Decimal,
        from: &Principal,
        to: &Principal,
    ) -> Result<(), SettlementError>;
}

/// A transfer that completed inside the current call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transfer {
    pub amount: Decimal,
    pub from: Principal,
    pub to: Principal,
}

/// Account balances held in memory
///
/// Reference settlement layer for tests and embedded hosts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    accounts: HashMap<Principal, Decimal>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into `account`, saturating at `Decimal::MAX`
    pub fn deposit(&mut self, account: &Principal, amount: Decimal) {
        let balance = self.accounts.entry(account.clone()).or_insert(Decimal::ZERO);
        *balance = balance.saturating_add(amount);
    }

    pub fn with_balance(mut self, account: impl Into<Principal>, amount: Decimal) -> Self {
        self.deposit(&account.into(), amount);
        self
    }

    pub fn balance_of(&self, account: &Principal) -> Decimal {
        self.accounts.get(account).copied().unwrap_or(Decimal::ZERO)
    }
}

impl SettlementLedger for InMemoryLedger {
    fn transfer(
        &mut self,
        amount: Decimal,
        from: &Principal,
        to: &Principal,
    ) -> Result<(), SettlementError> {
        if amount <= Decimal::ZERO {
            return Err(SettlementError::Rejected(format!(
                "non-positive amount {}",
                amount
            )));
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(SettlementError::InsufficientBalance {
                account: from.clone(),
                required: amount,
                available,
            });
        }

        let to_balance = if from == to {
            available - amount
        } else {
            self.balance_of(to)
        };
        let credited = to_balance.checked_add(amount).ok_or_else(|| {
            SettlementError::Rejected(format!("balance overflow on {}", to))
        })?;

        self.accounts.insert(from.clone(), available - amount);
        self.accounts.insert(to.clone(), credited);
        Ok(())
    }
}
