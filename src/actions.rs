use chrono::{DateTime, Utc};

use crate::trip::{Activity, PoiDetails, TripData};
use crate::types::{TripSummary, UserModifications};
use crate::weather::ForecastData;

/// The complete action catalog: a closed union with one payload shape per
/// variant. Every state transition goes through one of these.
#[derive(Clone, Debug)]
pub enum Action {
    SetCurrentTrip(String),
    SetAvailableTrips(Vec<TripSummary>),
    /// A trip load was issued; raises the loading flag and clears any
    /// previous error.
    LoadTripStarted,
    LoadTripFailed(String),
    /// Terminal load action: atomically installs the trip id, document and
    /// user modifications, and derives the initial stop selection.
    TripLoaded {
        trip_id: String,
        data: TripData,
        modifications: UserModifications,
    },
    /// Change the current stop. Always clears the activity selection,
    /// since selection is scoped to a stop.
    SelectBase(String),
    SelectActivity(Option<String>),
    ToggleActivityDone(String),
    /// Move one activity within a stop's displayed order. `from` and `to`
    /// are positions in the currently displayed order, not activity ids;
    /// out-of-range indices make this a no-op.
    ReorderActivities {
        stop_id: String,
        from: usize,
        to: usize,
    },
    WeatherFetched {
        stop_id: String,
        forecast: ForecastData,
        fetched_at: DateTime<Utc>,
    },
    /// Begins a POI search; the reducer assigns it the next request id.
    PoiSearchStarted {
        query: String,
    },
    /// Terminal search actions echo the id of the request they answer so
    /// responses arriving out of order can be discarded.
    PoiSearchSucceeded {
        request_id: u64,
        results: Vec<PoiDetails>,
    },
    PoiSearchFailed {
        request_id: u64,
        message: String,
    },
    ClearPoiSearch,
    OpenPoiModal,
    PoiDetailsLoaded(PoiDetails),
    PoiDetailsFailed(String),
    ClosePoiModal,
    /// Append a searched place to a stop's activity list. No-op when no
    /// document is loaded or the stop does not exist.
    AddActivityFromPoi {
        stop_id: String,
        activity: Activity,
    },
}

/// Side effects requested by a state transition. The reducer only returns
/// these; the store executes them after the transition, which keeps every
/// transition deterministic and independently testable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    PersistModifications,
    PersistWeather,
    PersistLastViewed,
}
