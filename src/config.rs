/// Service configuration loader - parses hidromon.toml
///
/// Separates deployment settings (store URL, reach geometry, poll cadence,
/// threshold overrides) from code, so a reach can be re-tuned without
/// recompiling the service. The store API key is deliberately not part of
/// the TOML file: it comes from the environment (`.env` in development).

use serde::Deserialize;
use std::env;
use std::fs;

use crate::alert::severity::SeverityThresholds;
use crate::analysis::ReachProfile;

/// Environment variable holding the record store API key.
pub const STORE_KEY_ENV: &str = "HIDROMON_STORE_KEY";

// ---------------------------------------------------------------------------
// Configuration structure
// ---------------------------------------------------------------------------

/// Root configuration loaded from hidromon.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct HidromonConfig {
    pub store: StoreSettings,
    #[serde(default)]
    pub reach: ReachProfile,
    #[serde(default)]
    pub daemon: DaemonSettings,
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

/// Remote record store connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the hosted store, e.g. "https://project.supabase.co".
    pub base_url: String,
    /// Table holding the hydrological readings.
    pub table: String,
}

/// Poll loop settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    /// How often to poll the store. The gateway uploads every 5 minutes,
    /// so polling faster than that only re-reads identical data.
    pub poll_interval_minutes: u64,
    /// Maximum age of the newest reading before the feed counts as stale.
    pub staleness_threshold_minutes: u64,
    /// How many readings to fetch per refresh (most-recent-first).
    pub fetch_limit: usize,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            poll_interval_minutes: 5,
            staleness_threshold_minutes: 30,
            fetch_limit: 50,
        }
    }
}

/// Optional per-deployment overrides for the severity thresholds.
///
/// Any value left out keeps the production default from
/// `SeverityThresholds::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdOverrides {
    pub level_high_m: Option<f64>,
    pub projection_high_m: Option<f64>,
    pub ror_high_m_per_h: Option<f64>,
    pub persistence_high: Option<u32>,
    pub level_medium_m: Option<f64>,
    pub persistence_medium: Option<u32>,
}

impl ThresholdOverrides {
    /// Applies the overrides on top of the default thresholds.
    pub fn resolve(&self) -> SeverityThresholds {
        let defaults = SeverityThresholds::default();
        SeverityThresholds {
            level_high_m: self.level_high_m.unwrap_or(defaults.level_high_m),
            projection_high_m: self.projection_high_m.unwrap_or(defaults.projection_high_m),
            ror_high_m_per_h: self.ror_high_m_per_h.unwrap_or(defaults.ror_high_m_per_h),
            persistence_high: self.persistence_high.unwrap_or(defaults.persistence_high),
            level_medium_m: self.level_medium_m.unwrap_or(defaults.level_medium_m),
            persistence_medium: self.persistence_medium.unwrap_or(defaults.persistence_medium),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads service configuration from hidromon.toml.
///
/// # Panics
/// Panics if the configuration file is missing or malformed. This is
/// intentional — the service cannot operate without knowing where the
/// record store lives.
///
/// # File Location
/// Expects `hidromon.toml` in the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> HidromonConfig {
    let config_path = "hidromon.toml";

    let contents = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

    parse_config(&contents)
}

/// Parses configuration from a TOML string. Panics on malformed input,
/// matching `load_config`.
pub fn parse_config(contents: &str) -> HidromonConfig {
    toml::from_str(contents).unwrap_or_else(|e| panic!("Failed to parse hidromon.toml: {}", e))
}

/// Reads the store API key from the environment (loading `.env` first).
/// Returns `None` when unset — public read-only stores need no key.
pub fn store_api_key() -> Option<String> {
    dotenv::dotenv().ok();
    env::var(STORE_KEY_ENV).ok().filter(|k| !k.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_succeeds() {
        let config = load_config();
        assert!(config.store.base_url.starts_with("http"));
        assert_eq!(config.store.table, "mediciones_hidrologicas");
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config(
            r#"
            [store]
            base_url = "https://example.supabase.co"
            table = "mediciones_hidrologicas"
            "#,
        );
        assert_eq!(config.daemon.poll_interval_minutes, 5);
        assert_eq!(config.daemon.fetch_limit, 50);
        assert_eq!(config.reach, ReachProfile::default());
        assert_eq!(config.thresholds.resolve(), SeverityThresholds::default());
    }

    #[test]
    fn test_threshold_overrides_apply_on_top_of_defaults() {
        let config = parse_config(
            r#"
            [store]
            base_url = "https://example.supabase.co"
            table = "mediciones_hidrologicas"

            [thresholds]
            level_high_m = 0.8
            persistence_high = 5
            "#,
        );
        let thresholds = config.thresholds.resolve();
        assert_eq!(thresholds.level_high_m, 0.8);
        assert_eq!(thresholds.persistence_high, 5);
        // Untouched values keep their defaults.
        assert_eq!(thresholds.projection_high_m, 0.6);
        assert_eq!(thresholds.persistence_medium, 2);
    }

    #[test]
    fn test_reach_section_overrides_geometry() {
        let config = parse_config(
            r#"
            [store]
            base_url = "https://example.supabase.co"
            table = "mediciones_hidrologicas"

            [reach]
            upstream_elevation_m = 100.0
            downstream_elevation_m = 90.0
            reach_length_m = 1000.0
            "#,
        );
        assert_eq!(config.reach.upstream_elevation_m, 100.0);
        assert_eq!(config.reach.reach_length_m, 1000.0);
    }

    #[test]
    #[should_panic(expected = "Failed to parse")]
    fn test_malformed_config_panics() {
        parse_config("[store]\nbase_url = 42\n");
    }
}
