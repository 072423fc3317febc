//! Engine configuration

use anyhow::{ensure, Context, Result};
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use stratus_common::BPS_DENOMINATOR;

/// Stratus engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Heights before `end_height` during which a policy may be renewed
    pub renewal_window: u64,
    /// Cancellation refunds only when strictly more than this share of the
    /// duration remains (basis points)
    pub refund_threshold_bps: u32,
    /// Share of the premium refunded on an early cancellation (basis points)
    pub refund_bps: u32,
    /// Limits for identifiers (oracle ids, weather types)
    pub max_id_len: usize,
    /// Limits for names and oracle types
    pub max_name_len: usize,
    pub max_location_len: usize,
    pub max_description_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            renewal_window: crate::DEFAULT_RENEWAL_WINDOW,
            refund_threshold_bps: 5_000,
            refund_bps: 5_000,
            max_id_len: 64,
            max_name_len: 64,
            max_location_len: 100,
            max_description_len: 256,
        }
    }
}

impl EngineConfig {
    /// Load from `.env`, an optional `stratus.toml` and `STRATUS_*` variables
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let builder = Config::builder()
            .add_source(File::with_name("stratus").required(false))
            .add_source(Environment::with_prefix("STRATUS").try_parsing(true));

        Self::from_builder(builder)
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg: EngineConfig = builder
            .build()
            .context("Failed to read engine configuration")?
            .try_deserialize()
            .context("Failed to parse engine configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.refund_threshold_bps <= BPS_DENOMINATOR,
            "refund_threshold_bps {} exceeds {}",
            self.refund_threshold_bps,
            BPS_DENOMINATOR
        );
        ensure!(
            self.refund_bps <= BPS_DENOMINATOR,
            "refund_bps {} exceeds {}",
            self.refund_bps,
            BPS_DENOMINATOR
        );
        ensure!(
            self.max_id_len > 0
                && self.max_name_len > 0
                && self.max_location_len > 0
                && self.max_description_len > 0,
            "text length limits must be positive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.renewal_window, 100);
        assert_eq!(cfg.refund_bps, 5_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let builder = Config::builder().add_source(File::from_str(
            "renewal_window = 144\nrefund_bps = 2500\n",
            FileFormat::Toml,
        ));
        let cfg = EngineConfig::from_builder(builder).unwrap();
        assert_eq!(cfg.renewal_window, 144);
        assert_eq!(cfg.refund_bps, 2_500);
        assert_eq!(cfg.refund_threshold_bps, 5_000);
        assert_eq!(cfg.max_id_len, 64);
    }

    #[test]
    fn test_rejects_out_of_range_bps() {
        let builder = Config::builder()
            .add_source(File::from_str("refund_bps = 12000\n", FileFormat::Toml));
        assert!(EngineConfig::from_builder(builder).is_err());
    }
}
