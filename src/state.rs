use crate::trip::{PoiDetails, TripData};
use crate::types::{TripSummary, UserModifications};
use crate::weather::WeatherCache;

/// Session-lifetime application state. Constructed once with empty values
/// and mutated only through the reducer.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub current_trip_id: Option<String>,
    pub available_trips: Vec<TripSummary>,
    pub trip_data: Option<TripData>,
    /// stop_id of the currently viewed stop.
    pub current_base: Option<String>,
    /// activity_id of the current activity selection, always scoped to
    /// `current_base`.
    pub selected_activity: Option<String>,
    pub modifications: UserModifications,
    pub weather: WeatherCache,
    pub poi_modal: PoiModalState,
    pub poi_search: PoiSearchState,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PoiModalState {
    pub is_open: bool,
    pub selected: Option<PoiDetails>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PoiSearchState {
    /// Insertion order is the relevance order returned by the search.
    pub results: Vec<PoiDetails>,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    /// Id of the most recently started search; terminal actions answering
    /// an older request are discarded.
    pub request_id: u64,
}
