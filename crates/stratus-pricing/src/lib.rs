//! # Stratus Pricing
//!
//! Admin-defined risk profiles and the premium formula.
//!
//! ## Premium Formula
//!
//! ```text
//! premium = floor(coverage × (base_rate_bps + risk_factor_bps) / 10000)
//! ```
//!
//! The same function prices quotes, new policies and renewals.

pub mod premium;
pub mod profile;

pub use premium::{calculate_premium, PremiumQuote};
pub use profile::{NewRiskProfile, RiskProfile, RiskProfileCatalog};
