//! Trigger comparators
//!
//! Conditions store the raw operator code they were attached with. Evaluation
//! goes through [`evaluate`], which treats any code outside the table as a
//! condition that never holds.

use serde::{Deserialize, Serialize};

/// Comparison applied as `actual <op> threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Comparator {
    Gt,
    Lt,
    Eq,
    Ge,
    Le,
}

impl Comparator {
    pub const ALL: [Comparator; 5] = [
        Comparator::Gt,
        Comparator::Lt,
        Comparator::Eq,
        Comparator::Ge,
        Comparator::Le,
    ];

    /// Wire code stored on a condition
    pub fn code(self) -> u8 {
        match self {
            Comparator::Gt => 1,
            Comparator::Lt => 2,
            Comparator::Eq => 3,
            Comparator::Ge => 4,
            Comparator::Le => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    #[inline]
    pub fn holds(self, actual: i64, threshold: i64) -> bool {
        match self {
            Comparator::Gt => actual > threshold,
            Comparator::Lt => actual < threshold,
            Comparator::Eq => actual == threshold,
            Comparator::Ge => actual >= threshold,
            Comparator::Le => actual <= threshold,
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Comparator::Gt => ">",
            Comparator::Lt => "<",
            Comparator::Eq => "==",
            Comparator::Ge => ">=",
            Comparator::Le => "<=",
        };
        f.write_str(symbol)
    }
}

/// Evaluate `actual <op> threshold` for a stored operator code.
///
/// Unknown codes evaluate to `false`.
pub fn evaluate(code: u8, actual: i64, threshold: i64) -> bool {
    Comparator::from_code(code).map_or(false, |op| op.holds(actual, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table() {
        assert!(evaluate(Comparator::Gt.code(), 60, 50));
        assert!(!evaluate(Comparator::Gt.code(), 50, 50));
        assert!(evaluate(Comparator::Lt.code(), 40, 50));
        assert!(evaluate(Comparator::Eq.code(), 50, 50));
        assert!(evaluate(Comparator::Ge.code(), 50, 50));
        assert!(evaluate(Comparator::Le.code(), -3, -3));
        assert!(!evaluate(Comparator::Le.code(), 4, 3));
    }

    #[test]
    fn test_code_roundtrip() {
        for op in Comparator::ALL {
            assert_eq!(Comparator::from_code(op.code()), Some(op));
        }
        assert_eq!(Comparator::from_code(0), None);
    }

    proptest! {
        #[test]
        fn prop_unknown_code_is_false(code in 6u8.., actual: i64, threshold: i64) {
            prop_assert!(!evaluate(code, actual, threshold));
        }

        #[test]
        fn prop_matches_std_ordering(actual: i64, threshold: i64) {
            prop_assert_eq!(evaluate(1, actual, threshold), actual > threshold);
            prop_assert_eq!(evaluate(2, actual, threshold), actual < threshold);
            prop_assert_eq!(evaluate(3, actual, threshold), actual == threshold);
            prop_assert_eq!(evaluate(4, actual, threshold), actual >= threshold);
            prop_assert_eq!(evaluate(5, actual, threshold), actual <= threshold);
            prop_assert!(!evaluate(0, actual, threshold));
        }
    }
}
