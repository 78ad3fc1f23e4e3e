/// Remote record store client.
///
/// The readings live in a hosted PostgREST-style table
/// (`/rest/v1/{table}`). This module handles URL construction, the
/// authenticated GET, JSON parsing into wire records, and boundary
/// validation into `HydrologicalReading`s. Batches are always requested
/// most-recent-first; the classifier downstream never cares about order,
/// but the alert feed does.

use crate::config::{self, StoreSettings};
use crate::logging::{self, Source};
use crate::model::{HydrologicalReading, RawMedicion, ReadingError};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Connection handle for the record store. Cheap to clone; holds no socket.
#[derive(Debug, Clone)]
pub struct StoreClient {
    pub base_url: String,
    pub table: String,
    /// API key for the hosted store. `None` for public read-only stores.
    pub api_key: Option<String>,
}

impl StoreClient {
    /// Builds a client from config settings, picking up the API key from
    /// the environment.
    pub fn from_settings(settings: &StoreSettings) -> StoreClient {
        StoreClient {
            base_url: settings.base_url.clone(),
            table: settings.table.clone(),
            api_key: config::store_api_key(),
        }
    }

    /// URL for the latest `limit` readings, most-recent-first.
    ///
    /// PostgREST ordering syntax: `order=ts.desc`. The order value goes
    /// through percent-encoding in case a deployment uses a column name
    /// with characters outside the unreserved set.
    pub fn latest_url(&self, limit: usize) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order={}&limit={}",
            self.base_url.trim_end_matches('/'),
            self.table,
            urlencoding::encode("ts.desc"),
            limit
        )
    }

    /// Fetches the latest `limit` wire records from the store.
    pub fn fetch_latest(&self, limit: usize) -> Result<Vec<RawMedicion>, ReadingError> {
        let url = self.latest_url(limit);

        let client = reqwest::blocking::Client::new();
        let mut request = client.get(&url);
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .map_err(|e| ReadingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReadingError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| ReadingError::Transport(e.to_string()))?;

        parse_store_response(&body)
    }

    /// Fetches and validates the latest readings.
    ///
    /// Malformed rows are logged and skipped rather than failing the whole
    /// batch: one bad row in the store must not blind the service to the
    /// remaining readings.
    pub fn load_readings(&self, limit: usize) -> Result<Vec<HydrologicalReading>, ReadingError> {
        let raw = self.fetch_latest(limit)?;

        let mut readings = Vec::with_capacity(raw.len());
        for record in raw {
            match record.validate() {
                Ok(reading) => readings.push(reading),
                Err(e) => logging::warn(Source::Store, &format!("Dropping row: {}", e)),
            }
        }
        Ok(readings)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses a store response body (a JSON array of rows) into wire records.
pub fn parse_store_response(body: &str) -> Result<Vec<RawMedicion>, ReadingError> {
    serde_json::from_str(body).map_err(|e| ReadingError::ParseError(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
