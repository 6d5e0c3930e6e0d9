//! Offline enrichment of trip-plan files with stable place identifiers.
//!
//! Activities and scenic waypoints whose ids do not already carry a
//! recognized `poi_` identifier are looked up against an external
//! place-search API by name and address, and their ids are rewritten as
//! `poi_<place_id>_<timestamp>`. The document is rewritten in place and
//! its export timestamp bumped. Works on raw JSON values so fields our
//! model does not know about survive untouched.

use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};

/// Fixed pause between place-search requests, respecting the API's rate
/// limit.
pub const REQUEST_DELAY_MS: u64 = 250;

static ENRICHED_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^poi_[A-Za-z0-9][A-Za-z0-9_-]*$").expect("static pattern")
});

/// Whether an identifier already carries a recognized place id.
pub fn is_enriched_id(id: &str) -> bool {
    ENRICHED_ID_RE.is_match(id)
}

pub fn enriched_id(place_id: &str, timestamp: i64) -> String {
    format!("poi_{place_id}_{timestamp}")
}

#[derive(Clone, Debug, Deserialize)]
struct PlaceHit {
    place_id: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PlaceSearchResponse {
    #[serde(default)]
    results: Vec<PlaceHit>,
}

/// Thin client for the external place-search API.
pub struct PlaceClient {
    base_url: String,
    api_key: Option<String>,
}

impl PlaceClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Search by name and optional address, with an optional location
    /// bias. Returns the best hit, or `None` when nothing matched.
    pub fn search(
        &self,
        name: &str,
        address: Option<&str>,
        bias: Option<(f64, f64)>,
    ) -> ServiceResult<Option<String>> {
        let query = match address {
            Some(address) => format!("{name} {address}"),
            None => name.to_string(),
        };
        let mut request = ureq::get(&format!("{}/search", self.base_url)).query("q", &query);
        if let Some((lat, lng)) = bias {
            request = request.query("bias", &format!("{lat},{lng}"));
        }
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(ServiceError::Api(format!("place search: HTTP {code}")));
            }
            Err(e) => return Err(ServiceError::Network(e.to_string())),
        };
        let parsed: PlaceSearchResponse = response
            .into_json()
            .map_err(|e| ServiceError::Network(format!("place search response: {e}")))?;
        Ok(parsed.results.into_iter().next().map(|hit| hit.place_id))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub scanned: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Enrich one trip-plan file in place.
pub fn enrich_file(path: &Path, client: &PlaceClient) -> ServiceResult<EnrichReport> {
    let raw = fs::read_to_string(path)?;
    let mut document: Value = serde_json::from_str(&raw)?;

    let has_envelope = document.get("tripData").is_some();
    let trip = if has_envelope {
        document
            .get_mut("tripData")
            .ok_or_else(|| ServiceError::Other("envelope without tripData".to_string()))?
    } else {
        &mut document
    };

    let mut report = EnrichReport::default();
    let stops = trip
        .get_mut("stops")
        .and_then(|v| v.as_array_mut())
        .ok_or_else(|| ServiceError::InvalidTrip("document has no 'stops' array".to_string()))?;

    for stop in stops {
        let bias = stop.get("location").and_then(|loc| {
            Some((
                loc.get("lat")?.as_f64()?,
                loc.get("lng")?.as_f64()?,
            ))
        });
        for list_key in ["activities", "scenic_waypoints"] {
            let Some(items) = stop.get_mut(list_key).and_then(|v| v.as_array_mut()) else {
                continue;
            };
            for item in items {
                enrich_item(item, client, bias, &mut report);
            }
        }
    }

    let now = Utc::now().to_rfc3339();
    if let Some(obj) = trip.as_object_mut() {
        obj.insert("updated_at".to_string(), Value::String(now.clone()));
    }
    if has_envelope {
        if let Some(obj) = document.as_object_mut() {
            obj.insert("exportDate".to_string(), Value::String(now));
        }
    }

    save_atomically(path, &document)?;
    Ok(report)
}

fn enrich_item(
    item: &mut Value,
    client: &PlaceClient,
    bias: Option<(f64, f64)>,
    report: &mut EnrichReport,
) {
    report.scanned += 1;
    let Some(id) = item.get("activity_id").and_then(|v| v.as_str()) else {
        report.failed += 1;
        return;
    };
    if is_enriched_id(id) {
        report.skipped += 1;
        return;
    }
    let Some(name) = item.get("activity_name").and_then(|v| v.as_str()) else {
        report.failed += 1;
        return;
    };
    let address = item
        .get("location")
        .and_then(|loc| loc.get("address"))
        .and_then(|v| v.as_str());

    match client.search(name, address, bias) {
        Ok(Some(place_id)) => {
            let new_id = enriched_id(&place_id, Utc::now().timestamp());
            tracing::info!(old = id, new = %new_id, "enriched activity id");
            item["activity_id"] = Value::String(new_id);
            report.enriched += 1;
        }
        Ok(None) => {
            tracing::warn!(name, "no place match, leaving id untouched");
            report.failed += 1;
        }
        Err(e) => {
            tracing::warn!(name, error = %e, "place search failed");
            report.failed += 1;
        }
    }
    thread::sleep(Duration::from_millis(REQUEST_DELAY_MS));
}

/// Temp file + rename so an interrupted run never truncates the plan.
fn save_atomically(path: &Path, document: &Value) -> ServiceResult<()> {
    let temp = path.with_extension("tmp");
    let mut f = fs::File::create(&temp)?;
    let content = serde_json::to_string_pretty(document)?;
    f.write_all(content.as_bytes())?;
    f.sync_all()?;
    fs::rename(temp, path)?;
    Ok(())
}
