//! Amount math in basis points
//!
//! All percentage math in Stratus is expressed in basis points and rounds
//! toward zero, so a quote, a payout and a refund computed from the same inputs
//! always agree.

use rust_decimal::Decimal;

use crate::error::{InputError, Result};

/// 100% in basis points
pub const BPS_DENOMINATOR: u32 = 10_000;

/// `floor(amount × bps / 10000)`
pub fn apply_bps(amount: Decimal, bps: u32) -> Result<Decimal> {
    let scaled = amount
        .checked_mul(Decimal::from(bps))
        .ok_or(InputError::Overflow)?;
    let share = scaled
        .checked_div(Decimal::from(BPS_DENOMINATOR))
        .ok_or(InputError::Overflow)?;
    Ok(share.floor())
}

/// Reject zero and negative amounts
pub fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(InputError::InvalidAmount.into());
    }
    Ok(())
}
