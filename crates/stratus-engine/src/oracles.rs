//! Oracle administration and data submission
//!
//! Registration, activation and metadata changes are owner-only. Submissions
//! come from the oracle's controller and stay open while paused.

use stratus_common::{ensure_text, Principal, Result};
use stratus_oracle::DataSubmission;

use crate::events::EngineEvent;
use crate::host::SettlementLedger;
use crate::uow::UnitOfWork;

impl<L: SettlementLedger> UnitOfWork<'_, L> {
    /// Register an oracle controlled by the registering owner
    pub(crate) fn register_oracle(&mut self, oracle_id: &str, name: &str, oracle_type: &str) -> Result<()> {
        self.require_owner()?;
        self.validate_oracle_info(oracle_id, name, oracle_type)?;

        let controller = self.caller().clone();
        let height = self.height();
        self.state
            .oracles
            .register(oracle_id, controller.clone(), name, oracle_type, height)?;

        self.emit(EngineEvent::OracleRegistered {
            oracle_id: oracle_id.to_string(),
            controller,
        });
        Ok(())
    }

    pub(crate) fn set_oracle_active(&mut self, oracle_id: &str, active: bool) -> Result<()> {
        self.require_owner()?;
        self.state.oracles.set_active(oracle_id, active)?;

        self.emit(EngineEvent::OracleStatusChanged {
            oracle_id: oracle_id.to_string(),
            active,
        });
        Ok(())
    }

    pub(crate) fn update_oracle_info(&mut self, oracle_id: &str, name: &str, oracle_type: &str) -> Result<()> {
        self.require_owner()?;
        self.validate_oracle_info(oracle_id, name, oracle_type)?;
        self.state.oracles.update_info(oracle_id, name, oracle_type)?;

        self.emit(EngineEvent::OracleUpdated {
            oracle_id: oracle_id.to_string(),
            name: name.to_string(),
            oracle_type: oracle_type.to_string(),
        });
        Ok(())
    }

    pub(crate) fn transfer_oracle_ownership(&mut self, oracle_id: &str, new_controller: Principal) -> Result<()> {
        let caller = self.caller();
        self.state
            .oracles
            .transfer_ownership(caller, oracle_id, new_controller.clone())?;

        self.emit(EngineEvent::OracleOwnershipTransferred {
            oracle_id: oracle_id.to_string(),
            new_controller,
        });
        Ok(())
    }

    pub(crate) fn submit_data(&mut self, oracle_id: &str, submission: DataSubmission) -> Result<()> {
        let config = self.config();
        ensure_text("weather_type", &submission.weather_type, config.max_id_len)?;
        ensure_text("location", &submission.location, config.max_location_len)?;

        let caller = self.caller();
        let height = self.height();
        let state = &mut self.state;
        let point = state
            .feed
            .submit(&mut state.oracles, caller, oracle_id, height, submission)?;

        let event = EngineEvent::DataSubmitted {
            oracle_id: point.oracle_id.clone(),
            weather_type: point.weather_type.clone(),
            value: point.value,
        };
        self.emit(event);
        Ok(())
    }

    fn validate_oracle_info(&self, oracle_id: &str, name: &str, oracle_type: &str) -> Result<()> {
        let config = self.config();
        ensure_text("oracle_id", oracle_id, config.max_id_len)?;
        ensure_text("name", name, config.max_name_len)?;
        ensure_text("oracle_type", oracle_type, config.max_name_len)
    }
}
