//! Engine events
//!
//! Each committed call publishes the events it produced, stamped with the
//! call's height and caller. Events of a rejected call are discarded together
//! with its state changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stratus_common::{BlockHeight, ClaimId, PolicyId, Principal, ProfileId};

/// State transition published by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineEvent {
    OracleRegistered {
        oracle_id: String,
        controller: Principal,
    },
    OracleStatusChanged {
        oracle_id: String,
        active: bool,
    },
    OracleUpdated {
        oracle_id: String,
        name: String,
        oracle_type: String,
    },
    OracleOwnershipTransferred {
        oracle_id: String,
        new_controller: Principal,
    },
    DataSubmitted {
        oracle_id: String,
        weather_type: String,
        value: i64,
    },
    ProfileCreated {
        profile_id: ProfileId,
    },
    PolicyCreated {
        policy_id: PolicyId,
        holder: Principal,
        premium: Decimal,
        end_height: BlockHeight,
    },
    PolicyRenewed {
        policy_id: PolicyId,
        premium: Decimal,
        end_height: BlockHeight,
        renewal_count: u32,
    },
    PolicyCanceled {
        policy_id: PolicyId,
        refund: Decimal,
    },
    ConditionAttached {
        policy_id: PolicyId,
        oracle_id: String,
        payout_bps: u32,
    },
    ClaimSubmitted {
        claim_id: ClaimId,
        policy_id: PolicyId,
        claim_amount: Decimal,
    },
    ClaimPaid {
        claim_id: ClaimId,
        policy_id: PolicyId,
        amount: Decimal,
    },
    ClaimRejected {
        claim_id: ClaimId,
        policy_id: PolicyId,
    },
    TreasuryFunded {
        amount: Decimal,
    },
    EmergencyWithdrawal {
        amount: Decimal,
    },
    PauseChanged {
        paused: bool,
    },
    OwnershipTransferred {
        new_owner: Principal,
    },
}

/// Event with the context of the call that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub height: BlockHeight,
    pub caller: Principal,
    pub event: EngineEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_encoding() {
        let event = EngineEvent::PauseChanged { paused: true };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PauseChanged");
        assert_eq!(json["data"]["paused"], true);
    }
}
