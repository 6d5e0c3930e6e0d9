//! Trip document and trip list fetching.
//!
//! Documents live behind a path parameterized by filename. A 404 is kept
//! distinct from other failures so the UI can say "trip not found" and
//! offer a retry for everything else.

use serde_json::Value;

use crate::actions::Action;
use crate::error::{ServiceError, ServiceResult};
use crate::store::Store;
use crate::trip::{TripData, validate};
use crate::types::TripSummary;

pub struct TripClient {
    base_url: String,
}

impl TripClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn fetch_json(&self, path: &str) -> ServiceResult<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = match ureq::get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => {
                return Err(ServiceError::NotFound(path.to_string()));
            }
            Err(ureq::Error::Status(code, _)) => {
                return Err(ServiceError::Api(format!("{path}: HTTP {code}")));
            }
            Err(e) => return Err(ServiceError::Network(e.to_string())),
        };
        response
            .into_json::<Value>()
            .map_err(|e| ServiceError::Network(format!("failed to read {path}: {e}")))
    }

    /// Fetch one trip document by filename. An optional `{ tripData: ... }`
    /// envelope is unwrapped before validation; a document that fails
    /// structural validation is rejected with its first error.
    pub fn fetch_trip(&self, filename: &str) -> ServiceResult<TripData> {
        let raw = self.fetch_json(filename)?;
        let unwrapped = unwrap_envelope(raw);
        let report = validate(&unwrapped);
        if !report.is_valid {
            return Err(ServiceError::InvalidTrip(
                report
                    .errors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "unknown validation failure".to_string()),
            ));
        }
        Ok(serde_json::from_value(unwrapped)?)
    }

    /// Fetch the trip index and reduce each document to a summary.
    pub fn fetch_trip_index(&self) -> ServiceResult<Vec<TripSummary>> {
        let raw = self.fetch_json("index.json")?;
        let trips = raw
            .as_array()
            .ok_or_else(|| ServiceError::Api("trip index must be an array".to_string()))?;
        let mut summaries = Vec::with_capacity(trips.len());
        for entry in trips {
            let trip: TripData = serde_json::from_value(unwrap_envelope(entry.clone()))?;
            summaries.push(TripSummary::from(&trip));
        }
        Ok(summaries)
    }
}

/// Unwrap the optional `{ tripData: ... }` envelope.
pub fn unwrap_envelope(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) if map.contains_key("tripData") => {
            map.remove("tripData").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Load one trip into the store: issue the fetch, then dispatch a single
/// terminal action. User modifications come from the store's persistence
/// layer, so overrides survive reloads.
pub fn load_trip(store: &mut Store, client: &TripClient, trip_id: &str, filename: &str) {
    store.dispatch(Action::LoadTripStarted);
    match client.fetch_trip(filename) {
        Ok(data) => {
            let modifications = store.storage().get(
                crate::types::USER_MODIFICATIONS_KEY,
                crate::types::UserModifications::default(),
            );
            store.dispatch(Action::TripLoaded {
                trip_id: trip_id.to_string(),
                data,
                modifications,
            });
        }
        Err(e) => {
            tracing::warn!(trip_id, error = %e, "trip load failed");
            store.dispatch(Action::LoadTripFailed(e.to_string()));
        }
    }
}

/// Refresh the available-trips list; failures surface through the central
/// error slice like any other transport error.
pub fn load_trip_index(store: &mut Store, client: &TripClient) {
    match client.fetch_trip_index() {
        Ok(summaries) => store.dispatch(Action::SetAvailableTrips(summaries)),
        Err(e) => store.dispatch(Action::LoadTripFailed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = TripClient::new("http://localhost:3000/trips/");
        assert_eq!(client.base_url, "http://localhost:3000/trips");
    }

    #[test]
    fn envelope_is_unwrapped_when_present() {
        let wrapped = json!({ "tripData": { "trip_name": "X" } });
        assert_eq!(unwrap_envelope(wrapped), json!({ "trip_name": "X" }));

        let bare = json!({ "trip_name": "X" });
        assert_eq!(unwrap_envelope(bare.clone()), bare);
    }
}
