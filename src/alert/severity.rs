//! Severity classification for hydrological readings.
//!
//! `classify` maps one reading to a severity level; `describe` builds the
//! human-readable explanation shown next to it. Both share the same
//! threshold constants but evaluate their conditions independently: the
//! description re-checks the four HIGH conditions on its own, so it can
//! mention a threshold that did not drive the severity level (e.g. the
//! persistence fragment appears even when level alone forced HIGH). That
//! mirrors the dashboard's historical behavior and is kept on purpose.

use crate::model::{HydrologicalReading, SeverityLevel};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Threshold constants shared by `classify` and `describe`.
///
/// `Default` gives the production values for the monitored reach. The
/// `[thresholds]` section of `hidromon.toml` may override individual
/// values; see `config::ThresholdOverrides`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityThresholds {
    /// Level above which a reading is critical on its own, meters.
    pub level_high_m: f64,
    /// 30-minute projected level above which a reading is critical, meters.
    pub projection_high_m: f64,
    /// Rate of rise above which a reading is critical, meters per hour.
    pub ror_high_m_per_h: f64,
    /// Consecutive above-watch readings at which a reading is critical.
    pub persistence_high: u32,
    /// Level above which a reading is at least elevated, meters.
    pub level_medium_m: f64,
    /// Consecutive above-watch readings at which a reading is elevated.
    pub persistence_medium: u32,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            level_high_m: 0.5,
            projection_high_m: 0.6,
            ror_high_m_per_h: 0.1,
            persistence_high: 3,
            level_medium_m: 0.3,
            persistence_medium: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies one reading into a severity level.
///
/// The rule is a first-match OR chain, not a scored model:
///
/// 1. HIGH if level > 0.5 m, OR projection (when present) > 0.6 m, OR
///    rate of rise (when present) > 0.1 m/h, OR persistence >= 3.
/// 2. else MEDIUM if level > 0.3 m OR persistence >= 2.
/// 3. else LOW.
///
/// Comparisons are strict (`>`) except the two persistence checks (`>=`).
/// Absent optional figures never contribute — they are not treated as zero.
/// Pure and deterministic: no I/O, no state, safe to call concurrently.
pub fn classify(reading: &HydrologicalReading, thresholds: &SeverityThresholds) -> SeverityLevel {
    let t = thresholds;

    let critical = reading.level_m > t.level_high_m
        || reading.projection_30min_m.is_some_and(|p| p > t.projection_high_m)
        || reading.rate_of_rise_m_per_h.is_some_and(|r| r > t.ror_high_m_per_h)
        || reading.persistence_count >= t.persistence_high;
    if critical {
        return SeverityLevel::High;
    }

    if reading.level_m > t.level_medium_m || reading.persistence_count >= t.persistence_medium {
        return SeverityLevel::Medium;
    }

    SeverityLevel::Low
}

/// Builds the human-readable explanation for a reading.
///
/// Checks the four critical thresholds in fixed order, emits one fragment
/// per exceeded threshold, and joins them with `" | "`. When none match,
/// falls back to a plain level-and-rainfall summary. The fixed-point
/// precisions (2, 2, 4, and 2 decimals) match the dashboard's display and
/// must not change without updating its golden rows.
pub fn describe(reading: &HydrologicalReading, thresholds: &SeverityThresholds) -> String {
    let t = thresholds;
    let mut fragments: Vec<String> = Vec::new();

    if reading.level_m > t.level_high_m {
        fragments.push(format!("Nivel crítico: {:.2}m", reading.level_m));
    }
    if let Some(projection) = reading.projection_30min_m {
        if projection > t.projection_high_m {
            fragments.push(format!("Proyección a 30min: {:.2}m", projection));
        }
    }
    if let Some(ror) = reading.rate_of_rise_m_per_h {
        if ror > t.ror_high_m_per_h {
            fragments.push(format!("RoR alto: {:.4} m/h", ror));
        }
    }
    if reading.persistence_count >= t.persistence_high {
        fragments.push(format!(
            "Persistencia: {} lecturas consecutivas",
            reading.persistence_count
        ));
    }

    if fragments.is_empty() {
        return format!(
            "Nivel: {:.2}m, Lluvia: {:.2}mm",
            reading.level_m, reading.rain_mm
        );
    }

    fragments.join(" | ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal reading with every optional figure absent.
    fn reading(level_m: f64, persistence_count: u32) -> HydrologicalReading {
        HydrologicalReading {
            id: 1,
            timestamp: "2025-11-01T14:30:25+00:00".to_string(),
            level_m,
            rain_mm: 0.0,
            base_level_m: level_m,
            delta_h_m: 0.0,
            rate_of_rise_m_per_h: None,
            rain_intensity_mm_per_h: None,
            projection_30min_m: None,
            hydraulic_slope: 0.0018,
            persistence_count,
            processed_at: None,
            recorded_at: None,
        }
    }

    fn defaults() -> SeverityThresholds {
        SeverityThresholds::default()
    }

    // --- classify: level rule ------------------------------------------------

    #[test]
    fn test_level_above_half_meter_is_high() {
        assert_eq!(classify(&reading(0.6, 0), &defaults()), SeverityLevel::High);
    }

    #[test]
    fn test_level_exactly_half_meter_is_medium_not_high() {
        // Strict comparison: 0.5 does not trigger the critical level check,
        // but falls through to the elevated check (0.5 > 0.3).
        assert_eq!(classify(&reading(0.5, 0), &defaults()), SeverityLevel::Medium);
    }

    #[test]
    fn test_level_between_thresholds_is_medium() {
        assert_eq!(classify(&reading(0.4, 1), &defaults()), SeverityLevel::Medium);
    }

    #[test]
    fn test_level_exactly_medium_threshold_is_low() {
        assert_eq!(classify(&reading(0.3, 0), &defaults()), SeverityLevel::Low);
    }

    #[test]
    fn test_quiet_reading_is_low() {
        assert_eq!(classify(&reading(0.2, 0), &defaults()), SeverityLevel::Low);
        assert_eq!(classify(&reading(0.0, 1), &defaults()), SeverityLevel::Low);
    }

    // --- classify: optional figures ------------------------------------------

    #[test]
    fn test_projection_above_threshold_is_high() {
        let mut r = reading(0.1, 0);
        r.projection_30min_m = Some(0.65);
        assert_eq!(classify(&r, &defaults()), SeverityLevel::High);
    }

    #[test]
    fn test_projection_at_threshold_does_not_trigger() {
        let mut r = reading(0.1, 0);
        r.projection_30min_m = Some(0.6);
        assert_eq!(classify(&r, &defaults()), SeverityLevel::Low);
    }

    #[test]
    fn test_rate_of_rise_above_threshold_is_high() {
        let mut r = reading(0.1, 0);
        r.rate_of_rise_m_per_h = Some(0.15);
        assert_eq!(classify(&r, &defaults()), SeverityLevel::High);
    }

    #[test]
    fn test_absent_optionals_do_not_contribute() {
        // Absent is "not contributing", not zero — and certainly not
        // an implicit trigger.
        let r = reading(0.2, 0);
        assert!(r.projection_30min_m.is_none() && r.rate_of_rise_m_per_h.is_none());
        assert_eq!(classify(&r, &defaults()), SeverityLevel::Low);
    }

    // --- classify: persistence rule -------------------------------------------

    #[test]
    fn test_persistence_three_is_high_regardless_of_level() {
        assert_eq!(classify(&reading(0.0, 3), &defaults()), SeverityLevel::High);
        assert_eq!(classify(&reading(0.2, 5), &defaults()), SeverityLevel::High);
    }

    #[test]
    fn test_persistence_two_is_medium() {
        assert_eq!(classify(&reading(0.1, 2), &defaults()), SeverityLevel::Medium);
    }

    // --- classify: determinism -------------------------------------------------

    #[test]
    fn test_classify_is_deterministic() {
        let mut r = reading(0.45, 2);
        r.projection_30min_m = Some(0.55);
        let first = classify(&r, &defaults());
        let second = classify(&r, &defaults());
        assert_eq!(first, second, "identical input must yield identical output");
    }

    // --- describe: fragments ----------------------------------------------------

    #[test]
    fn test_describe_critical_level() {
        assert_eq!(describe(&reading(0.6, 0), &defaults()), "Nivel crítico: 0.60m");
    }

    #[test]
    fn test_describe_fallback_reports_level_and_rain() {
        let mut r = reading(0.2, 0);
        r.rain_mm = 5.1234;
        assert_eq!(describe(&r, &defaults()), "Nivel: 0.20m, Lluvia: 5.12mm");
    }

    #[test]
    fn test_describe_projection_fragment() {
        let mut r = reading(0.1, 0);
        r.projection_30min_m = Some(0.65);
        assert_eq!(describe(&r, &defaults()), "Proyección a 30min: 0.65m");
    }

    #[test]
    fn test_describe_rate_of_rise_uses_four_decimals() {
        let mut r = reading(0.1, 0);
        r.rate_of_rise_m_per_h = Some(0.15);
        assert_eq!(describe(&r, &defaults()), "RoR alto: 0.1500 m/h");
    }

    #[test]
    fn test_describe_joins_fragments_in_fixed_order() {
        let mut r = reading(0.55, 4);
        r.projection_30min_m = Some(0.7);
        // RoR absent, so its fragment is skipped; the rest keep their order.
        assert_eq!(
            describe(&r, &defaults()),
            "Nivel crítico: 0.55m | Proyección a 30min: 0.70m | \
             Persistencia: 4 lecturas consecutivas"
        );
    }

    #[test]
    fn test_describe_persistence_fragment_even_when_level_drove_severity() {
        // describe re-evaluates its own conditions independently of classify,
        // so persistence shows up even though the level alone forces HIGH.
        let r = reading(0.9, 3);
        let description = describe(&r, &defaults());
        assert!(description.contains("Nivel crítico: 0.90m"));
        assert!(description.contains("Persistencia: 3 lecturas consecutivas"));
    }

    #[test]
    fn test_custom_thresholds_shared_by_classify_and_describe() {
        let lenient = SeverityThresholds {
            level_high_m: 1.0,
            ..SeverityThresholds::default()
        };
        let r = reading(0.6, 0);
        assert_eq!(classify(&r, &lenient), SeverityLevel::Medium);
        assert_eq!(describe(&r, &lenient), "Nivel: 0.60m, Lluvia: 0.00mm");
    }
}
