//! # Stratus Common
//!
//! Shared types, errors, and amount math for the Stratus parametric insurance
//! engine.
//!
//! ## Core Types
//!
//! - [`Principal`]: verified caller identity supplied by the host ledger
//! - [`CallContext`]: caller plus current block height for one call
//! - [`StratusError`]: typed rejection with a fixed [`ErrorKind`] taxonomy
//!
//! ## Amounts
//!
//! - [`apply_bps`]: `floor(amount × bps / 10000)`, used for premiums, payouts
//!   and refunds alike

pub mod error;
pub mod telemetry;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    AuthError, DataMismatchError, ErrorKind, InputError, NotFoundError, Result, SettlementError,
    StateError, StratusError,
};
pub use types::{
    amount::{apply_bps, ensure_positive, BPS_DENOMINATOR},
    identity::{BlockHeight, CallContext, ClaimId, PolicyId, Principal, ProfileId},
    text::ensure_text,
};

/// Stratus version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum payout share of a condition (100%)
pub const MAX_PAYOUT_BPS: u32 = BPS_DENOMINATOR;
