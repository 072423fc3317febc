//! Caller identity and logical clock supplied by the host ledger

use serde::{Deserialize, Serialize};

/// Host ledger's monotonic logical clock
pub type BlockHeight = u64;

/// Sequential policy identifier
pub type PolicyId = u64;

/// Sequential claim identifier
pub type ClaimId = u64;

/// Admin-chosen risk profile identifier
pub type ProfileId = u64;

/// Verified account identity on the host ledger
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Per-call context handed in by the host
///
/// The caller is authenticated by the host and cannot be forged; the height is
/// read once at the start of the call and stays fixed for its duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Principal,
    pub height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, height: BlockHeight) -> Self {
        Self {
            caller: caller.into(),
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_context_from_str() {
        let ctx = CallContext::new("alice", 42);
        assert_eq!(ctx.caller, Principal::new("alice"));
        assert_eq!(ctx.caller.to_string(), "alice");
        assert_eq!(ctx.height, 42);
    }
}
