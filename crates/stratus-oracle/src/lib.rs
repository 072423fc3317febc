//! # Stratus Oracle
//!
//! Trusted weather data providers and the measurements they publish.
//!
//! ## Components
//!
//! - **Directory**: registered oracles, their controlling identity and activation
//! - **Feed**: one measurement per (oracle, height), read back by exact height
//! - **Comparator**: the operator table shared by condition attachment and
//!   claim evaluation
//!
//! ```text
//! admin ──register──▶ OracleDirectory ◀──controller check── submit
//!                                                            │
//!                                      FeedStore[(oracle, height)] ◀─┘
//! ```

pub mod comparator;
pub mod directory;
pub mod feed;

pub use comparator::{evaluate, Comparator};
pub use directory::{OracleDirectory, OracleRegistration};
pub use feed::{DataSubmission, FeedStore, OracleDataPoint};
