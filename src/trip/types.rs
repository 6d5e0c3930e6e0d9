use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root trip document. Replaced wholesale on reload; stop ordering is
/// itinerary order and is never edited in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    pub trip_name: String,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub stops: Vec<Stop>,
}

impl TripData {
    pub fn stop(&self, stop_id: &str) -> Option<&Stop> {
        self.stops.iter().find(|s| s.stop_id == stop_id)
    }

    pub fn stop_mut(&mut self, stop_id: &str) -> Option<&mut Stop> {
        self.stops.iter_mut().find(|s| s.stop_id == stop_id)
    }
}

/// A stop ("base"): a waypoint with its own date range and activity list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: String,
    pub name: String,
    pub date: DateRange,
    pub location: Location,
    pub duration_days: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<Accommodation>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenic_waypoints: Option<Vec<Activity>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Accommodation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An activity or scenic waypoint. Scenic waypoints carry no extra
/// semantics beyond styling, so they share this type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    pub activity_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PartialLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    /// Authored display order; overridden by user modifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
}

impl Activity {
    /// Build an activity from a searched place, e.g. when the user adds a
    /// POI search result to a stop. The id embeds the stable place
    /// identifier; the category is inferred from name and tags.
    pub fn from_poi(poi: &PoiDetails, now_ts: i64) -> Self {
        let location = match (&poi.location, &poi.address) {
            (None, None) => None,
            (location, address) => Some(PartialLocation {
                lat: location.as_ref().map(|l| l.lat),
                lng: location.as_ref().map(|l| l.lng),
                address: address.clone(),
            }),
        };
        Self {
            activity_id: format!("poi_{}_{}", poi.place_id, now_ts),
            activity_name: poi.name.clone(),
            location,
            duration: None,
            remarks: None,
            thumbnail_url: None,
            url: poi.url.clone(),
            activity_type: Some(crate::trip::infer::infer_activity_type(
                None, &poi.name, &poi.types,
            )),
            status: None,
            order: None,
        }
    }
}

/// Activity location where every sub-field is individually optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PartialLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActivityStatus {
    #[serde(default)]
    pub done: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Restaurant,
    Cafe,
    Grocery,
    Playground,
    Hike,
    Beach,
    Museum,
    Shopping,
    Transport,
    Scenic,
    Attraction,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Restaurant => "restaurant",
            ActivityType::Cafe => "cafe",
            ActivityType::Grocery => "grocery",
            ActivityType::Playground => "playground",
            ActivityType::Hike => "hike",
            ActivityType::Beach => "beach",
            ActivityType::Museum => "museum",
            ActivityType::Shopping => "shopping",
            ActivityType::Transport => "transport",
            ActivityType::Scenic => "scenic",
            ActivityType::Attraction => "attraction",
            ActivityType::Other => "other",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "restaurant" => Ok(ActivityType::Restaurant),
            "cafe" => Ok(ActivityType::Cafe),
            "grocery" => Ok(ActivityType::Grocery),
            "playground" => Ok(ActivityType::Playground),
            "hike" => Ok(ActivityType::Hike),
            "beach" => Ok(ActivityType::Beach),
            "museum" => Ok(ActivityType::Museum),
            "shopping" => Ok(ActivityType::Shopping),
            "transport" => Ok(ActivityType::Transport),
            "scenic" => Ok(ActivityType::Scenic),
            "attraction" => Ok(ActivityType::Attraction),
            "other" => Ok(ActivityType::Other),
            _ => Err(format!("Unknown activity type: {s}")),
        }
    }
}

/// A place record returned by the external place-search/details API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoiDetails {
    pub place_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// External category tags, used for activity-type inference.
    #[serde(default)]
    pub types: Vec<String>,
}
