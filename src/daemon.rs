/// Core daemon implementation for the flood-alert monitoring service.
///
/// The main loop:
/// 1. Verifies the remote record store answers on startup
/// 2. Polls the store for the latest readings on a fixed cadence
/// 3. Validates and classifies each reading
/// 4. Logs every critical reading and a per-cycle summary
/// 5. Tracks feed staleness so an upstream outage is visible
///
/// The daemon stores nothing and dispatches no notifications — the
/// authoritative alert pipeline runs server-side at the store; this service
/// is the monitoring view over it.

use crate::alert::severity::SeverityThresholds;
use crate::config::HidromonConfig;
use crate::ingest::store::StoreClient;
use crate::logging::{self, Source};
use crate::model::SeverityLevel;
use crate::report::{self, AlertRow};
use chrono::{DateTime, Duration, Utc};
use std::error::Error;

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

pub struct Daemon {
    poll_interval_minutes: u64,
    staleness_threshold_minutes: u64,
    fetch_limit: usize,
    store: StoreClient,
    thresholds: SeverityThresholds,
}

impl Daemon {
    /// Builds a daemon from loaded configuration.
    pub fn from_config(config: &HidromonConfig) -> Self {
        Self {
            poll_interval_minutes: config.daemon.poll_interval_minutes,
            staleness_threshold_minutes: config.daemon.staleness_threshold_minutes,
            fetch_limit: config.daemon.fetch_limit,
            store: StoreClient::from_settings(&config.store),
            thresholds: config.thresholds.resolve(),
        }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    pub fn thresholds(&self) -> &SeverityThresholds {
        &self.thresholds
    }

    /// Verifies the store answers before entering the poll loop.
    pub fn initialize(&self) -> Result<(), Box<dyn Error>> {
        self.store.fetch_latest(1)?;
        Ok(())
    }

    /// Age of the newest reading in the store. `None` when the table is
    /// empty or the newest row has no parseable timestamp — both count as
    /// maximum staleness for the caller.
    pub fn check_staleness(&self) -> Result<Option<Duration>, Box<dyn Error>> {
        let latest = self.store.fetch_latest(1)?;

        let newest_ts = latest
            .first()
            .and_then(|r| r.ts.as_deref())
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(newest_ts.map(|dt| Utc::now() - dt))
    }

    /// One poll cycle: fetch, validate, classify, log.
    pub fn refresh(&self) -> Result<Vec<AlertRow>, Box<dyn Error>> {
        let readings = self.store.load_readings(self.fetch_limit)?;
        let rows = report::build_rows(&readings, &self.thresholds);

        for row in &rows {
            if row.severity == SeverityLevel::High {
                logging::warn(
                    Source::Alert,
                    &format!("Lectura crítica #{} ({}): {}", row.id, row.ts, row.description),
                );
            }
        }

        let (low, medium, high) = count_by_severity(&rows);
        logging::info(
            Source::Daemon,
            &format!(
                "Refresh: {} lecturas ({} alta, {} media, {} baja)",
                rows.len(),
                high,
                medium,
                low
            ),
        );

        Ok(rows)
    }

    /// Endless poll loop. Errors are logged and the loop continues — a
    /// transient store outage must not kill the daemon.
    pub fn run(&self) -> Result<(), Box<dyn Error>> {
        loop {
            match self.refresh() {
                Ok(_) => {
                    match self.check_staleness() {
                        Ok(Some(age)) if age.num_minutes() > self.staleness_threshold_minutes as i64 => {
                            logging::warn(
                                Source::Daemon,
                                &format!(
                                    "Feed is stale: newest reading is {} minutes old",
                                    age.num_minutes()
                                ),
                            );
                        }
                        Ok(Some(_)) => {}
                        Ok(None) => logging::warn(Source::Daemon, "Feed is empty"),
                        Err(e) => logging::log_store_failure("staleness check", e.as_ref()),
                    }
                }
                Err(e) => logging::log_store_failure("refresh", e.as_ref()),
            }

            std::thread::sleep(std::time::Duration::from_secs(self.poll_interval_minutes * 60));
        }
    }
}

/// Counts rows per severity, in ascending order (low, medium, high).
pub fn count_by_severity(rows: &[AlertRow]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for row in rows {
        match row.severity {
            SeverityLevel::Low => counts.0 += 1,
            SeverityLevel::Medium => counts.1 += 1,
            SeverityLevel::High => counts.2 += 1,
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn test_config() -> HidromonConfig {
        parse_config(
            r#"
            [store]
            base_url = "https://example.supabase.co"
            table = "mediciones_hidrologicas"

            [daemon]
            poll_interval_minutes = 1
            fetch_limit = 10
            "#,
        )
    }

    #[test]
    fn test_daemon_wires_settings_from_config() {
        let daemon = Daemon::from_config(&test_config());
        assert_eq!(daemon.fetch_limit, 10);
        assert_eq!(daemon.poll_interval_minutes, 1);
        assert_eq!(daemon.store().table, "mediciones_hidrologicas");
        assert_eq!(*daemon.thresholds(), SeverityThresholds::default());
    }

    #[test]
    fn test_count_by_severity() {
        let row = |id, severity| AlertRow {
            id,
            ts: "2025-11-01T14:30:25+00:00".to_string(),
            severity,
            description: String::new(),
            nivel_m: 0.0,
            lluvia_mm: 0.0,
        };
        let rows = vec![
            row(1, SeverityLevel::High),
            row(2, SeverityLevel::Low),
            row(3, SeverityLevel::Low),
            row(4, SeverityLevel::Medium),
        ];
        assert_eq!(count_by_severity(&rows), (2, 1, 1));
    }
}
