/// HTTP endpoint for the classified alert feed.
///
/// Provides a small REST API for the dashboard and external tools:
/// - GET /health           - Service liveness and store configuration
/// - GET /alerts           - Classified alert feed as JSON
/// - GET /alerts.csv       - Same feed as a CSV download
///
/// Query parameters on /alerts and /alerts.csv:
/// - q         free-text search over the description (case-insensitive)
/// - severidad baja | media | alta (anything else means "all")
/// - page      1-based page number (default 1)
/// - per_page  rows per page (default 15, the dashboard's table size)
/// - limit     how many readings to pull from the store (default from config)

use crate::alert::severity::SeverityThresholds;
use crate::config::HidromonConfig;
use crate::ingest::store::StoreClient;
use crate::logging::{self, Source};
use crate::model::SeverityLevel;
use crate::report::{self, AlertFilter, AlertRow};
use std::collections::HashMap;
use std::error::Error;
use tiny_http::{Header, Response, Server};

const DEFAULT_PER_PAGE: usize = 15;

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Starts the endpoint server and blocks serving requests.
pub fn start_endpoint_server(port: u16, config: HidromonConfig) -> Result<(), Box<dyn Error>> {
    let server = Server::http(("0.0.0.0", port))
        .map_err(|e| format!("Failed to bind port {}: {}", port, e))?;

    let store = StoreClient::from_settings(&config.store);
    let thresholds = config.thresholds.resolve();

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let (status, body, content_type) = route(&url, &store, &thresholds, &config);

        let mut response = Response::from_string(body).with_status_code(status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
            response = response.with_header(header);
        }
        if let Err(e) = request.respond(response) {
            logging::warn(Source::System, &format!("Failed to respond to {}: {}", url, e));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes one request URL to (status, body, content type).
fn route(
    url: &str,
    store: &StoreClient,
    thresholds: &SeverityThresholds,
    config: &HidromonConfig,
) -> (u16, String, &'static str) {
    let (path, params) = parse_query(url);

    match path.as_str() {
        "/health" => {
            let body = serde_json::json!({
                "status": "ok",
                "store": config.store.base_url,
                "table": config.store.table,
            });
            (200, body.to_string(), "application/json")
        }
        "/alerts" => match alert_feed(store, thresholds, &params, config.daemon.fetch_limit) {
            Ok(rows) => match serde_json::to_string(&rows) {
                Ok(body) => (200, body, "application/json"),
                Err(e) => error_body(500, &format!("Serialization failed: {}", e)),
            },
            Err(e) => error_body(502, &e),
        },
        "/alerts.csv" => match alert_feed(store, thresholds, &params, config.daemon.fetch_limit) {
            Ok(rows) => (200, report::to_csv(&rows), "text/csv"),
            Err(e) => error_body(502, &e),
        },
        _ => error_body(404, &format!("Unknown path: {}", path)),
    }
}

fn error_body(status: u16, message: &str) -> (u16, String, &'static str) {
    let body = serde_json::json!({ "error": message });
    (status, body.to_string(), "application/json")
}

/// Fetches, classifies, filters, and paginates the feed for one request.
fn alert_feed(
    store: &StoreClient,
    thresholds: &SeverityThresholds,
    params: &HashMap<String, String>,
    default_limit: usize,
) -> Result<Vec<AlertRow>, String> {
    let limit = parse_usize(params.get("limit"), default_limit);

    let readings = store.load_readings(limit).map_err(|e| e.to_string())?;
    let rows = report::build_rows(&readings, thresholds);

    let filtered = report::filter_rows(&rows, &filter_from_params(params));

    let page = parse_usize(params.get("page"), 1);
    let per_page = parse_usize(params.get("per_page"), DEFAULT_PER_PAGE);
    Ok(report::paginate(&filtered, page, per_page).to_vec())
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

/// Splits a request URL into its path and decoded query parameters.
/// Malformed pairs and undecodable values are skipped.
pub fn parse_query(url: &str) -> (String, HashMap<String, String>) {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };

    let mut params = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        if let Ok(decoded) = urlencoding::decode(value) {
            params.insert(key.to_string(), decoded.into_owned());
        }
    }

    (path.to_string(), params)
}

/// Builds the row filter from request parameters. Unknown severity tags
/// (including the dashboard's "todas") mean "no severity filter".
pub fn filter_from_params(params: &HashMap<String, String>) -> AlertFilter {
    AlertFilter {
        search: params.get("q").filter(|q| !q.is_empty()).cloned(),
        severity: params
            .get("severidad")
            .and_then(|tag| SeverityLevel::from_tag(tag)),
    }
}

fn parse_usize(value: Option<&String>, default: usize) -> usize {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
