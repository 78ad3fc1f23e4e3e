/// Core data types for the community flood-alert monitoring service.
///
/// This module defines the shared domain model imported by all other modules:
/// the wire-level record shape used by the remote store, the validated
/// reading type the classifier operates on, the severity enumeration, and
/// the error type for store access and malformed records.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Flood severity level derived per reading, in ascending order of severity.
///
/// Severity is never persisted — it is recomputed from the reading on every
/// refresh. The serde tags match the Spanish severity values used by the
/// dashboard and its query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityLevel {
    #[serde(rename = "baja")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl SeverityLevel {
    /// Severity tag as it appears in query strings and CSV exports.
    pub fn as_tag(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "baja",
            SeverityLevel::Medium => "media",
            SeverityLevel::High => "alta",
        }
    }

    /// Parses a severity tag. Returns `None` for anything other than the
    /// three known tags — callers treat unknown tags as "no filter".
    pub fn from_tag(tag: &str) -> Option<SeverityLevel> {
        match tag {
            "baja" => Some(SeverityLevel::Low),
            "media" => Some(SeverityLevel::Medium),
            "alta" => Some(SeverityLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// One validated hydrological measurement from the remote store.
///
/// All required numeric fields are guaranteed present; the three optional
/// derived figures stay `Option` because the upstream processor cannot
/// compute them for the first sample of a series. Timestamps are kept as
/// ISO 8601 strings and parsed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrologicalReading {
    pub id: i64,
    pub timestamp: String, // ISO 8601, e.g. "2025-11-01T14:30:25+00:00"
    pub level_m: f64,
    pub rain_mm: f64,
    pub base_level_m: f64,
    pub delta_h_m: f64,
    pub rate_of_rise_m_per_h: Option<f64>,
    pub rain_intensity_mm_per_h: Option<f64>,
    pub projection_30min_m: Option<f64>,
    pub hydraulic_slope: f64,
    pub persistence_count: u32,
    pub processed_at: Option<String>,
    pub recorded_at: Option<String>,
}

/// Wire-level record from the `mediciones_hidrologicas` table.
///
/// Column names are the store's Spanish names. Every field is optional at
/// this level so that a partially-populated row deserializes instead of
/// failing the whole batch; `validate` is where required fields are
/// enforced.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMedicion {
    pub id: Option<i64>,
    pub ts: Option<String>,
    pub nivel_m: Option<f64>,
    pub lluvia_mm: Option<f64>,
    pub base_level: Option<f64>,
    pub delta_h: Option<f64>,
    pub ror: Option<f64>,
    pub intensidad_lluvia: Option<f64>,
    pub proyeccion_30min: Option<f64>,
    pub pendiente_hidraulica: Option<f64>,
    pub persistencia: Option<i64>,
    pub procesado_en: Option<String>,
    pub created_at: Option<String>,
}

impl RawMedicion {
    /// Converts a wire record into a validated reading.
    ///
    /// Fails fast with `ReadingError::MissingField` naming the first absent
    /// required column. Silently defaulting a missing `nivel_m` to 0 would
    /// misclassify severity and suppress a real alert, so malformed rows are
    /// surfaced to the caller instead.
    pub fn validate(self) -> Result<HydrologicalReading, ReadingError> {
        fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ReadingError> {
            value.ok_or(ReadingError::MissingField { field })
        }

        let persistencia = required(self.persistencia, "persistencia")?;
        if persistencia < 0 {
            return Err(ReadingError::MissingField { field: "persistencia" });
        }

        Ok(HydrologicalReading {
            id: required(self.id, "id")?,
            timestamp: required(self.ts, "ts")?,
            level_m: required(self.nivel_m, "nivel_m")?,
            rain_mm: required(self.lluvia_mm, "lluvia_mm")?,
            base_level_m: required(self.base_level, "base_level")?,
            delta_h_m: required(self.delta_h, "delta_h")?,
            rate_of_rise_m_per_h: self.ror,
            rain_intensity_mm_per_h: self.intensidad_lluvia,
            projection_30min_m: self.proyeccion_30min,
            hydraulic_slope: required(self.pendiente_hidraulica, "pendiente_hidraulica")?,
            persistence_count: persistencia as u32,
            processed_at: self.procesado_en,
            recorded_at: self.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or validating store records.
#[derive(Debug, PartialEq)]
pub enum ReadingError {
    /// A required column was absent (or invalid) on a store row.
    MissingField { field: &'static str },
    /// Non-2xx HTTP response from the record store.
    HttpStatus(u16),
    /// The request could not be sent or the response body not read.
    Transport(String),
    /// The response body could not be deserialized.
    ParseError(String),
}

impl std::fmt::Display for ReadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingError::MissingField { field } => {
                write!(f, "Malformed reading: missing required field '{}'", field)
            }
            ReadingError::HttpStatus(code) => write!(f, "HTTP error: {}", code),
            ReadingError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ReadingError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ReadingError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
