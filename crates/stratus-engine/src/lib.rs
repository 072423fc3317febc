//! # Stratus Engine
//!
//! Parametric weather insurance: policies pay out automatically when a
//! trusted oracle measurement satisfies the policy's condition.
//!
//! ## Lifecycle
//!
//! ```text
//! create_profile ─▶ create_policy ─▶ add_condition ─▶ submit_claim ─▶ process_claim
//!                     │  premium ▲                                      │ payout
//!                     ▼          │                                      ▼
//!                  holder ─────▶ treasury ◀──────────────────────────── claimant
//! ```
//!
//! ## Components
//!
//! - [`Engine`]: the boundary surface; every mutating call is atomic
//! - [`SettlementLedger`]: host-supplied value transfer
//! - [`EngineState`]: everything persisted between calls
//! - [`EngineEvent`]: state transitions published per committed call
//!
//! The host supplies caller identity and height per call through
//! [`stratus_common::CallContext`].

pub mod admin;
pub mod claim;
pub mod condition;
pub mod config;
pub mod engine;
pub mod events;
pub mod host;
mod oracles;
pub mod policy;
mod profiles;
pub mod queries;
pub mod state;
pub mod treasury;
mod uow;

pub use admin::AdminState;
pub use claim::{Claim, ClaimOutcome, ClaimStatus, NewClaim};
pub use condition::{NewCondition, PolicyCondition, CONDITION_INDEX};
pub use config::EngineConfig;
pub use engine::Engine;
pub use events::{EngineEvent, RecordedEvent};
pub use host::{InMemoryLedger, SettlementLedger};
pub use policy::{NewPolicy, Policy, PolicyStatus};
pub use queries::ContractStats;
pub use state::EngineState;
pub use treasury::TreasuryState;

/// Heights before expiry during which a policy may be renewed
pub const DEFAULT_RENEWAL_WINDOW: u64 = 100;
