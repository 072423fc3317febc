//! Oracle directory - trusted weather data providers
//!
//! Role checks against the contract owner happen in the engine; the directory
//! itself only enforces controller identity on ownership transfer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stratus_common::{
    AuthError, BlockHeight, NotFoundError, Principal, Result, StateError,
};
use tracing::info;

/// Registered oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRegistration {
    pub oracle_id: String,

    /// Identity allowed to publish data and hand over control
    pub controller: Principal,

    pub name: String,

    /// Free-form provider category (e.g. "weather-station", "satellite")
    pub oracle_type: String,

    pub active: bool,

    pub registered_at: BlockHeight,

    pub total_submissions: u64,

    pub last_submission_height: Option<BlockHeight>,
}

/// All registered oracles keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleDirectory {
    oracles: BTreeMap<String, OracleRegistration>,
}

impl OracleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new oracle, active immediately
    pub fn register(
        &mut self,
        oracle_id: &str,
        controller: Principal,
        name: &str,
        oracle_type: &str,
        height: BlockHeight,
    ) -> Result<&OracleRegistration> {
        if self.oracles.contains_key(oracle_id) {
            return Err(StateError::OracleAlreadyRegistered(oracle_id.to_string()).into());
        }

        let registration = OracleRegistration {
            oracle_id: oracle_id.to_string(),
            controller,
            name: name.to_string(),
            oracle_type: oracle_type.to_string(),
            active: true,
            registered_at: height,
            total_submissions: 0,
            last_submission_height: None,
        };

        info!(oracle_id, height, "Oracle registered");
        Ok(self
            .oracles
            .entry(oracle_id.to_string())
            .or_insert(registration))
    }

    /// Flip the activation flag; historical data points are unaffected
    pub fn set_active(&mut self, oracle_id: &str, active: bool) -> Result<()> {
        let oracle = self.get_mut(oracle_id)?;
        oracle.active = active;
        info!(oracle_id, active, "Oracle activation changed");
        Ok(())
    }

    pub fn update_info(&mut self, oracle_id: &str, name: &str, oracle_type: &str) -> Result<()> {
        let oracle = self.get_mut(oracle_id)?;
        oracle.name = name.to_string();
        oracle.oracle_type = oracle_type.to_string();
        Ok(())
    }

    /// Hand control to `new_controller`. Only the current controller may call.
    pub fn transfer_ownership(
        &mut self,
        caller: &Principal,
        oracle_id: &str,
        new_controller: Principal,
    ) -> Result<()> {
        let oracle = self.get_mut(oracle_id)?;
        if &oracle.controller != caller {
            return Err(AuthError::NotOracleController {
                caller: caller.clone(),
                oracle_id: oracle_id.to_string(),
            }
            .into());
        }

        info!(oracle_id, from = %oracle.controller, to = %new_controller, "Oracle control transferred");
        oracle.controller = new_controller;
        Ok(())
    }

    pub fn get(&self, oracle_id: &str) -> Option<&OracleRegistration> {
        self.oracles.get(oracle_id)
    }

    /// Fetch an oracle that exists and is active
    pub fn require_active(&self, oracle_id: &str) -> Result<&OracleRegistration> {
        let oracle = self
            .oracles
            .get(oracle_id)
            .ok_or_else(|| NotFoundError::Oracle(oracle_id.to_string()))?;
        if !oracle.active {
            return Err(StateError::OracleInactive(oracle_id.to_string()).into());
        }
        Ok(oracle)
    }

    pub(crate) fn record_submission(&mut self, oracle_id: &str, height: BlockHeight) -> Result<()> {
        let oracle = self.get_mut(oracle_id)?;
        oracle.total_submissions += 1;
        oracle.last_submission_height = Some(height);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OracleRegistration> {
        self.oracles.values()
    }

    fn get_mut(&mut self, oracle_id: &str) -> Result<&mut OracleRegistration> {
        self.oracles
            .get_mut(oracle_id)
            .ok_or_else(|| NotFoundError::Oracle(oracle_id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_common::StratusError;

    fn directory_with(oracle_id: &str) -> OracleDirectory {
        let mut dir = OracleDirectory::new();
        dir.register(oracle_id, Principal::new("admin"), "NOAA Station 7", "station", 10)
            .unwrap();
        dir
    }

    #[test]
    fn test_register() {
        let dir = directory_with("noaa-7");
        let oracle = dir.get("noaa-7").unwrap();
        assert!(oracle.active);
        assert_eq!(oracle.registered_at, 10);
        assert_eq!(oracle.controller, Principal::new("admin"));
        assert_eq!(oracle.total_submissions, 0);
    }

    #[test]
    fn test_duplicate_registration() {
        let mut dir = directory_with("noaa-7");
        let result = dir.register("noaa-7", Principal::new("admin"), "again", "station", 11);
        assert!(matches!(
            result,
            Err(StratusError::InvalidState(StateError::OracleAlreadyRegistered(_)))
        ));
        assert_eq!(dir.get("noaa-7").unwrap().name, "NOAA Station 7");
    }

    #[test]
    fn test_deactivate_and_reactivate() {
        let mut dir = directory_with("noaa-7");
        dir.set_active("noaa-7", false).unwrap();
        assert!(matches!(
            dir.require_active("noaa-7"),
            Err(StratusError::InvalidState(StateError::OracleInactive(_)))
        ));

        dir.set_active("noaa-7", true).unwrap();
        assert!(dir.require_active("noaa-7").is_ok());
        assert!(matches!(
            dir.set_active("missing", true),
            Err(StratusError::NotFound(NotFoundError::Oracle(_)))
        ));
    }

    #[test]
    fn test_transfer_ownership_requires_controller() {
        let mut dir = directory_with("noaa-7");

        let result = dir.transfer_ownership(&Principal::new("mallory"), "noaa-7", Principal::new("mallory"));
        assert!(matches!(
            result,
            Err(StratusError::Unauthorized(AuthError::NotOracleController { .. }))
        ));

        dir.transfer_ownership(&Principal::new("admin"), "noaa-7", Principal::new("station-key"))
            .unwrap();
        assert_eq!(dir.get("noaa-7").unwrap().controller, Principal::new("station-key"));

        // The previous controller has lost control
        assert!(dir
            .transfer_ownership(&Principal::new("admin"), "noaa-7", Principal::new("admin"))
            .is_err());
    }

    #[test]
    fn test_update_info() {
        let mut dir = directory_with("noaa-7");
        dir.update_info("noaa-7", "NOAA Station 7b", "satellite").unwrap();
        let oracle = dir.get("noaa-7").unwrap();
        assert_eq!(oracle.name, "NOAA Station 7b");
        assert_eq!(oracle.oracle_type, "satellite");
    }
}
