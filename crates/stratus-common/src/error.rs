//! Error types for the Stratus engine
//!
//! Every rejected call carries exactly one discriminant from a fixed taxonomy
//! ([`ErrorKind`]); the nested enums carry the detail.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::identity::{BlockHeight, ClaimId, PolicyId, Principal, ProfileId};

/// Result type alias using StratusError
pub type Result<T> = std::result::Result<T, StratusError>;

/// Flat rejection taxonomy reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    InvalidState,
    InvalidInput,
    InsufficientFunds,
    DataMismatch,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::InvalidState => write!(f, "INVALID_STATE"),
            ErrorKind::InvalidInput => write!(f, "INVALID_INPUT"),
            ErrorKind::InsufficientFunds => write!(f, "INSUFFICIENT_FUNDS"),
            ErrorKind::DataMismatch => write!(f, "DATA_MISMATCH"),
        }
    }
}

/// Unified error type for Stratus operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StratusError {
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),

    #[error("Invalid state: {0}")]
    InvalidState(#[from] StateError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Insufficient treasury funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Oracle data mismatch: {0}")]
    DataMismatch(#[from] DataMismatchError),

    #[error("Settlement failed: {0}")]
    Settlement(#[from] SettlementError),
}

impl StratusError {
    /// Taxonomy discriminant for this rejection
    pub fn kind(&self) -> ErrorKind {
        match self {
            StratusError::Unauthorized(_) => ErrorKind::Unauthorized,
            StratusError::NotFound(_) => ErrorKind::NotFound,
            StratusError::InvalidState(_) => ErrorKind::InvalidState,
            StratusError::InvalidInput(_) => ErrorKind::InvalidInput,
            StratusError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            StratusError::DataMismatch(_) => ErrorKind::DataMismatch,
            StratusError::Settlement(SettlementError::InsufficientBalance { .. }) => {
                ErrorKind::InsufficientFunds
            }
            StratusError::Settlement(SettlementError::Rejected(_)) => ErrorKind::InvalidState,
        }
    }
}

/// Caller identity does not hold the required role
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("{caller} is not the contract owner")]
    NotOwner { caller: Principal },

    #[error("{caller} is not the holder of policy {policy_id}")]
    NotPolicyHolder { caller: Principal, policy_id: PolicyId },

    #[error("{caller} does not control oracle {oracle_id}")]
    NotOracleController { caller: Principal, oracle_id: String },
}

/// Referenced entity does not exist
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NotFoundError {
    #[error("policy {0}")]
    Policy(PolicyId),

    #[error("claim {0}")]
    Claim(ClaimId),

    #[error("risk profile {0}")]
    Profile(ProfileId),

    #[error("oracle {0}")]
    Oracle(String),

    #[error("condition for policy {0}")]
    Condition(PolicyId),
}

/// Requested transition is not allowed from the current state
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("contract is paused")]
    Paused,

    #[error("oracle {0} is already registered")]
    OracleAlreadyRegistered(String),

    #[error("risk profile {0} already exists")]
    ProfileAlreadyExists(ProfileId),

    #[error("oracle {0} is not active")]
    OracleInactive(String),

    #[error("policy {0} is not active")]
    PolicyNotActive(PolicyId),

    #[error("policy {0} already has a claim")]
    AlreadyClaimed(PolicyId),

    #[error("policy {0} has a pending claim")]
    ClaimPending(PolicyId),

    #[error("claim {0} is not pending")]
    ClaimNotPending(ClaimId),

    #[error("policy {0} is not renewable")]
    NotRenewable(PolicyId),
}

/// Caller-supplied arguments are out of range or malformed
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("coverage {amount} outside [{min}, {max}]")]
    InvalidCoverageAmount {
        amount: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("max coverage {max} must exceed min coverage {min}")]
    InvalidProfileBounds { min: Decimal, max: Decimal },

    #[error("coverage multiplier must be non-zero")]
    ZeroCoverageMultiplier,

    #[error("payout {0} bps exceeds 10000")]
    InvalidPayoutBps(u32),

    #[error("duration must be positive")]
    InvalidDuration,

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{field} longer than {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("amount calculation overflow")]
    Overflow,
}

/// Claim does not match the published oracle measurement
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataMismatchError {
    #[error("no data from oracle {oracle_id} at height {height}")]
    DataPointMissing { oracle_id: String, height: BlockHeight },

    #[error("weather type {actual} does not match {expected}")]
    WeatherTypeMismatch { expected: String, actual: String },

    #[error("value {actual} does not match {expected}")]
    ValueMismatch { expected: i64, actual: i64 },
}

/// Failure reported by the host value-transfer primitive
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettlementError {
    #[error("{account} holds {available}, needs {required}")]
    InsufficientBalance {
        account: Principal,
        required: Decimal,
        available: Decimal,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = StratusError::from(NotFoundError::Oracle("noaa-01".to_string()));
        assert!(err.to_string().contains("noaa-01"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_settlement_kind_mapping() {
        let err = StratusError::from(SettlementError::InsufficientBalance {
            account: Principal::new("alice"),
            required: dec!(10),
            available: dec!(2),
        });
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

        let err = StratusError::from(SettlementError::Rejected("frozen".to_string()));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_coverage_error() {
        let err = StratusError::from(InputError::InvalidCoverageAmount {
            amount: dec!(5),
            min: dec!(1000),
            max: dec!(100000),
        });
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("[1000, 100000]"));
    }
}
