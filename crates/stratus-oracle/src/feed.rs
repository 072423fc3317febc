//! Oracle feed store
//!
//! One measurement per (oracle, height). A second submission from the same
//! oracle in the same height replaces the first; points at earlier heights
//! are never touched again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stratus_common::{AuthError, BlockHeight, Principal, Result};
use tracing::debug;

use crate::directory::OracleDirectory;

/// Published weather measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleDataPoint {
    pub oracle_id: String,
    pub height: BlockHeight,
    pub weather_type: String,
    pub location: String,
    pub value: i64,
    /// Measurement time as reported by the oracle
    pub timestamp: u64,
}

/// Measurement as submitted by an oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSubmission {
    pub weather_type: String,
    pub location: String,
    pub value: i64,
    pub timestamp: u64,
}

/// Feed points keyed by oracle, then height
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedStore {
    points: BTreeMap<String, BTreeMap<BlockHeight, OracleDataPoint>>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a measurement at `height` on behalf of `caller`.
    ///
    /// The oracle must be registered and active and `caller` must be its
    /// controller.
    pub fn submit(
        &mut self,
        directory: &mut OracleDirectory,
        caller: &Principal,
        oracle_id: &str,
        height: BlockHeight,
        submission: DataSubmission,
    ) -> Result<&OracleDataPoint> {
        let oracle = directory.require_active(oracle_id)?;
        if &oracle.controller != caller {
            return Err(AuthError::NotOracleController {
                caller: caller.clone(),
                oracle_id: oracle_id.to_string(),
            }
            .into());
        }
        directory.record_submission(oracle_id, height)?;

        let point = OracleDataPoint {
            oracle_id: oracle_id.to_string(),
            height,
            weather_type: submission.weather_type,
            location: submission.location,
            value: submission.value,
            timestamp: submission.timestamp,
        };

        let by_height = self.points.entry(oracle_id.to_string()).or_default();
        if by_height.contains_key(&height) {
            debug!(oracle_id, height, "Replacing data point at current height");
        }
        by_height.insert(height, point);

        // Entry was inserted just above
        Ok(&by_height[&height])
    }

    /// Point published by `oracle_id` at exactly `height`
    pub fn at(&self, oracle_id: &str, height: BlockHeight) -> Option<&OracleDataPoint> {
        self.points.get(oracle_id).and_then(|by_height| by_height.get(&height))
    }

    /// Point published at the current height only; no historical scan
    pub fn latest(&self, oracle_id: &str, current_height: BlockHeight) -> Option<&OracleDataPoint> {
        self.at(oracle_id, current_height)
    }

    pub fn count_for(&self, oracle_id: &str) -> usize {
        self.points.get(oracle_id).map_or(0, |by_height| by_height.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_common::{NotFoundError, StateError, StratusError};

    fn rainfall(value: i64) -> DataSubmission {
        DataSubmission {
            weather_type: "rainfall".to_string(),
            location: "Nairobi".to_string(),
            value,
            timestamp: 1_700_000_000,
        }
    }

    fn setup() -> (OracleDirectory, FeedStore, Principal) {
        let mut dir = OracleDirectory::new();
        let station = Principal::new("station-key");
        dir.register("noaa-7", station.clone(), "NOAA Station 7", "station", 1)
            .unwrap();
        (dir, FeedStore::new(), station)
    }

    #[test]
    fn test_submit_and_read_back() {
        let (mut dir, mut feed, station) = setup();
        feed.submit(&mut dir, &station, "noaa-7", 20, rainfall(60)).unwrap();

        let point = feed.at("noaa-7", 20).unwrap();
        assert_eq!(point.value, 60);
        assert_eq!(point.weather_type, "rainfall");
        assert!(feed.at("noaa-7", 19).is_none());

        let oracle = dir.get("noaa-7").unwrap();
        assert_eq!(oracle.total_submissions, 1);
        assert_eq!(oracle.last_submission_height, Some(20));
    }

    #[test]
    fn test_latest_is_current_height_only() {
        let (mut dir, mut feed, station) = setup();
        feed.submit(&mut dir, &station, "noaa-7", 20, rainfall(60)).unwrap();

        assert!(feed.latest("noaa-7", 20).is_some());
        assert!(feed.latest("noaa-7", 21).is_none());
    }

    #[test]
    fn test_same_height_overwrites() {
        let (mut dir, mut feed, station) = setup();
        feed.submit(&mut dir, &station, "noaa-7", 20, rainfall(60)).unwrap();
        feed.submit(&mut dir, &station, "noaa-7", 20, rainfall(45)).unwrap();

        assert_eq!(feed.at("noaa-7", 20).unwrap().value, 45);
        assert_eq!(feed.count_for("noaa-7"), 1);
    }

    #[test]
    fn test_submit_requires_controller() {
        let (mut dir, mut feed, _) = setup();
        let result = feed.submit(&mut dir, &Principal::new("mallory"), "noaa-7", 20, rainfall(60));
        assert!(matches!(
            result,
            Err(StratusError::Unauthorized(AuthError::NotOracleController { .. }))
        ));
        assert!(feed.at("noaa-7", 20).is_none());
    }

    #[test]
    fn test_submit_requires_active_oracle() {
        let (mut dir, mut feed, station) = setup();
        dir.set_active("noaa-7", false).unwrap();

        let result = feed.submit(&mut dir, &station, "noaa-7", 20, rainfall(60));
        assert!(matches!(
            result,
            Err(StratusError::InvalidState(StateError::OracleInactive(_)))
        ));

        let result = feed.submit(&mut dir, &station, "unknown", 20, rainfall(60));
        assert!(matches!(
            result,
            Err(StratusError::NotFound(NotFoundError::Oracle(_)))
        ));
    }

    #[test]
    fn test_store_serializes_with_height_keys() {
        let (mut dir, mut feed, station) = setup();
        feed.submit(&mut dir, &station, "noaa-7", 20, rainfall(60)).unwrap();

        let json = serde_json::to_string(&feed).unwrap();
        let restored: FeedStore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, feed);
    }
}
