/// Derived hydraulic figures for the monitored reach.
///
/// The upstream processor enriches each raw gateway sample (timestamp,
/// level, cumulative rainfall) with the derived columns the classifier and
/// dashboard consume: baseline, ΔH, rate of rise, rainfall intensity,
/// 30-minute projection, hydraulic slope, and persistence. This module
/// carries the same computations so locally-ingested or simulated samples
/// can be enriched identically to the hosted pipeline.

use chrono::DateTime;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Reach geometry
// ---------------------------------------------------------------------------

/// Fixed geometry of the modeled river reach, in meters.
///
/// Loaded from the `[reach]` section of `hidromon.toml`; defaults are the
/// surveyed values for the monitored reach.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReachProfile {
    /// Elevation of the upstream end of the reach (masl).
    pub upstream_elevation_m: f64,
    /// Elevation of the downstream end of the reach (masl).
    pub downstream_elevation_m: f64,
    /// Length of the modeled reach.
    pub reach_length_m: f64,
}

impl Default for ReachProfile {
    fn default() -> Self {
        Self {
            upstream_elevation_m: 2595.4,
            downstream_elevation_m: 2589.6,
            reach_length_m: 3200.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway samples
// ---------------------------------------------------------------------------

/// One raw sample as sent by the field gateway, before enrichment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewaySample {
    pub ts: String, // ISO 8601
    #[serde(rename = "nivel_m")]
    pub level_m: f64,
    #[serde(rename = "lluvia_mm")]
    pub rain_mm: f64,
}

/// The full set of derived columns for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFigures {
    pub base_level_m: f64,
    pub delta_h_m: f64,
    pub rate_of_rise_m_per_h: Option<f64>,
    pub rain_intensity_mm_per_h: Option<f64>,
    pub projection_30min_m: Option<f64>,
    pub hydraulic_slope: f64,
    pub persistence_count: u32,
}

// ---------------------------------------------------------------------------
// Stateless figures
// ---------------------------------------------------------------------------

/// Baseline level for a sample. The reach has no managed pool, so the
/// baseline is the observed level itself.
pub fn base_level(level_m: f64) -> f64 {
    level_m
}

/// Height difference (ΔH) of the current level against the upstream
/// elevation of the reach.
pub fn delta_h(level_m: f64, profile: &ReachProfile) -> f64 {
    level_m - profile.upstream_elevation_m
}

/// Rate of rise in meters per hour between two consecutive samples.
///
/// Returns `None` when there is no predecessor, when either timestamp is
/// unparseable, or when the time delta is not positive (clock skew or
/// duplicated samples must not produce an infinite rate).
pub fn rate_of_rise(current: &GatewaySample, previous: Option<&GatewaySample>) -> Option<f64> {
    let previous = previous?;
    let hours = hours_between(&previous.ts, &current.ts)?;
    Some((current.level_m - previous.level_m) / hours)
}

/// Rainfall intensity in millimeters per hour, from the cumulative rainfall
/// of the current sample over the interval since the previous one. Same
/// guards as `rate_of_rise`.
pub fn rain_intensity(current: &GatewaySample, previous: Option<&GatewaySample>) -> Option<f64> {
    let previous = previous?;
    let hours = hours_between(&previous.ts, &current.ts)?;
    Some(current.rain_mm / hours)
}

/// Projected level 30 minutes ahead, by linear extrapolation of the rate
/// of rise. `None` when no rate is available.
pub fn projection_30min(level_m: f64, ror_m_per_h: Option<f64>) -> Option<f64> {
    ror_m_per_h.map(|ror| level_m + ror * 0.5)
}

/// Hydraulic slope of the reach with the current water level:
/// S = (H_upstream + level − H_downstream) / L.
pub fn hydraulic_slope(level_m: f64, profile: &ReachProfile) -> f64 {
    let water_surface_upstream = profile.upstream_elevation_m + level_m;
    (water_surface_upstream - profile.downstream_elevation_m) / profile.reach_length_m
}

/// Hours between two ISO 8601 timestamps, `None` when unparseable or when
/// the interval is not positive.
fn hours_between(earlier: &str, later: &str) -> Option<f64> {
    let earlier = DateTime::parse_from_rfc3339(earlier).ok()?;
    let later = DateTime::parse_from_rfc3339(later).ok()?;
    let seconds = (later - earlier).num_seconds();
    if seconds <= 0 {
        return None;
    }
    Some(seconds as f64 / 3600.0)
}

// ---------------------------------------------------------------------------
// Stateful enrichment
// ---------------------------------------------------------------------------

/// Number of prior samples the persistence scan looks back over.
const PERSISTENCE_LOOKBACK: usize = 10;

/// Upper bound on the retained sample history.
const HISTORY_CAP: usize = 100;

/// Enrichment pipeline holding the bounded window of prior samples needed
/// for rate, intensity, and persistence computations.
pub struct FigureProcessor {
    profile: ReachProfile,
    /// Level above which a sample counts toward persistence, meters.
    watch_threshold_m: f64,
    history: Vec<GatewaySample>,
}

impl FigureProcessor {
    pub fn new(profile: ReachProfile) -> Self {
        Self {
            profile,
            watch_threshold_m: 0.5,
            history: Vec::new(),
        }
    }

    /// Number of consecutive samples (current included) above the watch
    /// threshold, scanning at most the last `PERSISTENCE_LOOKBACK` prior
    /// samples. Zero when the current level is at or below the threshold.
    pub fn persistence(&self, level_m: f64) -> u32 {
        if level_m <= self.watch_threshold_m {
            return 0;
        }
        let mut count = 1;
        let recent = self.history.iter().rev().take(PERSISTENCE_LOOKBACK);
        for sample in recent {
            if sample.level_m > self.watch_threshold_m {
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// Enriches one sample and records it in the history window.
    pub fn process(&mut self, sample: &GatewaySample) -> DerivedFigures {
        let previous = self.history.last();

        let ror = rate_of_rise(sample, previous);
        let figures = DerivedFigures {
            base_level_m: base_level(sample.level_m),
            delta_h_m: delta_h(sample.level_m, &self.profile),
            rate_of_rise_m_per_h: ror,
            rain_intensity_mm_per_h: rain_intensity(sample, previous),
            projection_30min_m: projection_30min(sample.level_m, ror),
            hydraulic_slope: hydraulic_slope(sample.level_m, &self.profile),
            persistence_count: self.persistence(sample.level_m),
        };

        self.history.push(sample.clone());
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }

        figures
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
