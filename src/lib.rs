/// hidromon_service: community flood-alert monitoring service.
///
/// # Module structure
///
/// ```text
/// hidromon_service
/// ├── model       — shared data types (HydrologicalReading, SeverityLevel, ReadingError, …)
/// ├── config      — service configuration loader (hidromon.toml)
/// ├── alert
/// │   └── severity — per-reading severity classification + descriptions
/// ├── analysis    — derived hydraulic figures (ΔH, RoR, projection, slope, persistence)
/// ├── ingest
/// │   ├── store   — remote record store client: URL construction + JSON parsing
/// │   └── fixtures (test only) — representative store payloads
/// ├── report      — classified alert feed: filtering, pagination, CSV export
/// ├── endpoint    — HTTP API over the classified feed
/// ├── daemon      — main poll loop (startup, refresh, staleness tracking)
/// └── logging     — structured console/file logging
/// ```

/// Public modules
pub mod alert;
pub mod analysis;
pub mod config;
pub mod daemon;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
