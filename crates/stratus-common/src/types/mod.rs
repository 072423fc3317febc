//! Core data types shared across Stratus crates

pub mod amount;
pub mod identity;
pub mod text;
