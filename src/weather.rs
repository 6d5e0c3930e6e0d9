use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Forecasts stay valid for six hours after fetch.
pub const WEATHER_TTL_HOURS: i64 = 6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    pub high_c: f64,
    pub low_c: f64,
    pub precipitation_probability: u8,
    pub conditions: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    pub days: Vec<DailyForecast>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherEntry {
    pub forecast: ForecastData,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Per-stop forecast cache. Entries are never evicted proactively; they
/// are only treated as stale on read, and `get` never returns stale data.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WeatherCache {
    #[serde(default)]
    pub entries: HashMap<String, WeatherEntry>,
}

impl WeatherCache {
    /// Entries are valid while `now <= expires_at`; strictly after that
    /// they are stale.
    pub fn is_valid_at(&self, stop_id: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .get(stop_id)
            .map(|entry| now <= entry.expires_at)
            .unwrap_or(false)
    }

    pub fn is_valid(&self, stop_id: &str) -> bool {
        self.is_valid_at(stop_id, Utc::now())
    }

    pub fn get_at(&self, stop_id: &str, now: DateTime<Utc>) -> Option<&ForecastData> {
        self.entries
            .get(stop_id)
            .filter(|entry| now <= entry.expires_at)
            .map(|entry| &entry.forecast)
    }

    /// The cached forecast, or `None` when missing or expired. Callers
    /// render an "unavailable" indicator on `None` rather than raising an
    /// error.
    pub fn get(&self, stop_id: &str) -> Option<&ForecastData> {
        self.get_at(stop_id, Utc::now())
    }

    pub fn put_at(&mut self, stop_id: &str, forecast: ForecastData, fetched_at: DateTime<Utc>) {
        let entry = WeatherEntry {
            forecast,
            fetched_at,
            expires_at: fetched_at + Duration::hours(WEATHER_TTL_HOURS),
        };
        self.entries.insert(stop_id.to_string(), entry);
    }

    pub fn put(&mut self, stop_id: &str, forecast: ForecastData) {
        self.put_at(stop_id, forecast, Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn forecast() -> ForecastData {
        ForecastData {
            days: vec![DailyForecast {
                date: "2025-11-01".to_string(),
                high_c: 18.0,
                low_c: 7.0,
                precipitation_probability: 20,
                conditions: "Partly cloudy".to_string(),
            }],
        }
    }

    #[test]
    fn entry_is_valid_up_to_and_including_expiry() {
        let fetched = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let mut cache = WeatherCache::default();
        cache.put_at("queenstown", forecast(), fetched);

        let expiry = fetched + Duration::hours(WEATHER_TTL_HOURS);
        assert!(cache.is_valid_at("queenstown", expiry - Duration::milliseconds(1)));
        assert!(cache.is_valid_at("queenstown", expiry));
        assert!(!cache.is_valid_at("queenstown", expiry + Duration::milliseconds(1)));
    }

    #[test]
    fn get_never_returns_stale_data() {
        let fetched = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let mut cache = WeatherCache::default();
        cache.put_at("queenstown", forecast(), fetched);

        let expiry = fetched + Duration::hours(WEATHER_TTL_HOURS);
        assert_eq!(
            cache.get_at("queenstown", expiry - Duration::milliseconds(1)),
            Some(&forecast())
        );
        assert_eq!(cache.get_at("queenstown", expiry + Duration::milliseconds(1)), None);
        // the stale entry is still there, just unreadable
        assert!(cache.entries.contains_key("queenstown"));
    }

    #[test]
    fn missing_stop_reads_as_absent() {
        let cache = WeatherCache::default();
        assert!(!cache.is_valid("nowhere"));
        assert_eq!(cache.get("nowhere"), None);
    }

    #[test]
    fn put_replaces_an_existing_entry() {
        let t0 = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let t1 = t0 + Duration::hours(12);
        let mut cache = WeatherCache::default();
        cache.put_at("s", forecast(), t0);
        assert_eq!(cache.get_at("s", t1), None);

        cache.put_at("s", forecast(), t1);
        assert_eq!(cache.get_at("s", t1), Some(&forecast()));
    }
}
