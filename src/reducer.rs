use crate::actions::{Action, Effect};
use crate::state::{AppState, PoiSearchState};
use crate::trip::{TripData, effective_order, effective_status};

/// Apply one action to the state. Pure and total: every variant maps to a
/// deterministic new state, no I/O happens here, and any effects the
/// transition requires are returned for the store to execute.
pub fn reduce(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::SetCurrentTrip(trip_id) => {
            state.current_trip_id = Some(trip_id);
            Vec::new()
        }
        Action::SetAvailableTrips(summaries) => {
            state.available_trips = summaries;
            Vec::new()
        }
        Action::LoadTripStarted => {
            state.loading = true;
            state.error = None;
            Vec::new()
        }
        Action::LoadTripFailed(message) => {
            state.loading = false;
            state.error = Some(message);
            Vec::new()
        }
        Action::TripLoaded {
            trip_id,
            data,
            mut modifications,
        } => {
            modifications.migrate(&data);
            state.current_base = derive_initial_base(&data, &modifications);
            state.current_trip_id = Some(trip_id);
            state.selected_activity = None;
            state.trip_data = Some(data);
            state.modifications = modifications;
            state.loading = false;
            state.error = None;
            vec![Effect::PersistModifications]
        }
        Action::SelectBase(stop_id) => {
            state.current_base = Some(stop_id.clone());
            // Selection is scoped to a stop; carrying it across stops
            // would violate the selection invariant.
            state.selected_activity = None;
            state.modifications.last_viewed_base = Some(stop_id);
            vec![Effect::PersistModifications, Effect::PersistLastViewed]
        }
        Action::SelectActivity(activity_id) => {
            state.selected_activity = activity_id;
            Vec::new()
        }
        Action::ToggleActivityDone(activity_id) => {
            let current = current_done(state, &activity_id);
            state
                .modifications
                .activity_status
                .insert(activity_id, !current);
            vec![Effect::PersistModifications]
        }
        Action::ReorderActivities { stop_id, from, to } => {
            let Some(trip) = &state.trip_data else {
                return Vec::new();
            };
            let Some(stop) = trip.stop(&stop_id) else {
                return Vec::new();
            };
            let n = stop.activities.len();
            if from >= n || to >= n {
                return Vec::new();
            }
            let mut order: Vec<String> =
                effective_order(&stop.activities, state.modifications.order_for(&stop_id))
                    .into_iter()
                    .map(|a| a.activity_id)
                    .collect();
            // A list move, not a swap: everything between the two
            // positions shifts by one.
            let moved = order.remove(from);
            order.insert(to, moved);
            state.modifications.set_order(&stop_id, order);
            vec![Effect::PersistModifications]
        }
        Action::WeatherFetched {
            stop_id,
            forecast,
            fetched_at,
        } => {
            state.weather.put_at(&stop_id, forecast, fetched_at);
            vec![Effect::PersistWeather]
        }
        Action::PoiSearchStarted { query } => {
            state.poi_search.request_id += 1;
            state.poi_search.query = query;
            state.poi_search.loading = true;
            state.poi_search.error = None;
            Vec::new()
        }
        Action::PoiSearchSucceeded {
            request_id,
            results,
        } => {
            if request_id != state.poi_search.request_id {
                return Vec::new();
            }
            state.poi_search.results = results;
            state.poi_search.loading = false;
            state.poi_search.error = None;
            Vec::new()
        }
        Action::PoiSearchFailed {
            request_id,
            message,
        } => {
            if request_id != state.poi_search.request_id {
                return Vec::new();
            }
            // Query and results stay; only the flags change.
            state.poi_search.loading = false;
            state.poi_search.error = Some(message);
            Vec::new()
        }
        Action::ClearPoiSearch => {
            // One-step reset. The request counter survives so responses
            // still in flight from before the reset stay discardable.
            state.poi_search = PoiSearchState {
                request_id: state.poi_search.request_id,
                ..Default::default()
            };
            Vec::new()
        }
        Action::OpenPoiModal => {
            state.poi_modal.is_open = true;
            state.poi_modal.selected = None;
            state.poi_modal.loading = true;
            state.poi_modal.error = None;
            Vec::new()
        }
        Action::PoiDetailsLoaded(details) => {
            state.poi_modal.selected = Some(details);
            state.poi_modal.loading = false;
            state.poi_modal.error = None;
            Vec::new()
        }
        Action::PoiDetailsFailed(message) => {
            state.poi_modal.loading = false;
            state.poi_modal.error = Some(message);
            Vec::new()
        }
        Action::ClosePoiModal => {
            state.poi_modal = Default::default();
            Vec::new()
        }
        Action::AddActivityFromPoi { stop_id, activity } => {
            let Some(trip) = &mut state.trip_data else {
                return Vec::new();
            };
            let Some(stop) = trip.stop_mut(&stop_id) else {
                return Vec::new();
            };
            stop.activities.push(activity);
            Vec::new()
        }
    }
}

/// The initial stop for a freshly loaded document: the user's last-viewed
/// stop if it still exists there, else the document's first stop.
fn derive_initial_base(
    trip: &TripData,
    modifications: &crate::types::UserModifications,
) -> Option<String> {
    if let Some(last) = &modifications.last_viewed_base {
        if trip.stop(last).is_some() {
            return Some(last.clone());
        }
    }
    trip.stops.first().map(|s| s.stop_id.clone())
}

fn current_done(state: &AppState, activity_id: &str) -> bool {
    if let Some(&done) = state.modifications.activity_status.get(activity_id) {
        return done;
    }
    state
        .trip_data
        .as_ref()
        .and_then(|trip| {
            trip.stops
                .iter()
                .flat_map(|s| s.activities.iter())
                .find(|a| a.activity_id == activity_id)
        })
        .map(|a| effective_status(a, &state.modifications))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::test_support::{activity, trip_with_activities, trip_with_stops};
    use crate::types::UserModifications;
    use crate::weather::{DailyForecast, ForecastData};
    use chrono::{Duration, TimeZone, Utc};

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::TripLoaded {
                trip_id: "trip-a".to_string(),
                data: trip_with_stops(&[
                    ("queenstown", &["a", "b", "c", "d"][..]),
                    ("wanaka", &["e", "f"][..]),
                ]),
                modifications: UserModifications::default(),
            },
        );
        state
    }

    #[test]
    fn trip_load_derives_first_stop_without_last_viewed() {
        let state = loaded_state();
        assert_eq!(state.current_base.as_deref(), Some("queenstown"));
        assert_eq!(state.selected_activity, None);
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn trip_load_restores_surviving_last_viewed_stop() {
        let mut state = AppState::default();
        let mods = UserModifications {
            last_viewed_base: Some("wanaka".to_string()),
            ..Default::default()
        };
        reduce(
            &mut state,
            Action::TripLoaded {
                trip_id: "trip-a".to_string(),
                data: trip_with_stops(&[("queenstown", &[][..]), ("wanaka", &[][..])]),
                modifications: mods,
            },
        );
        assert_eq!(state.current_base.as_deref(), Some("wanaka"));
    }

    #[test]
    fn trip_switch_does_not_carry_last_viewed_across_trips() {
        let mut state = loaded_state();
        reduce(&mut state, Action::SelectBase("queenstown".to_string()));

        // Trip B arrives with its own fresh modifications.
        reduce(
            &mut state,
            Action::TripLoaded {
                trip_id: "trip-b".to_string(),
                data: trip_with_stops(&[("rotorua", &[][..]), ("taupo", &[][..])]),
                modifications: UserModifications::default(),
            },
        );
        assert_eq!(state.current_base.as_deref(), Some("rotorua"));
        assert_eq!(state.current_trip_id.as_deref(), Some("trip-b"));
    }

    #[test]
    fn select_base_clears_activity_selection() {
        let mut state = loaded_state();
        reduce(&mut state, Action::SelectActivity(Some("a".to_string())));
        assert_eq!(state.selected_activity.as_deref(), Some("a"));

        let effects = reduce(&mut state, Action::SelectBase("wanaka".to_string()));
        assert_eq!(state.current_base.as_deref(), Some("wanaka"));
        assert_eq!(state.selected_activity, None);
        assert_eq!(
            state.modifications.last_viewed_base.as_deref(),
            Some("wanaka")
        );
        assert!(effects.contains(&Effect::PersistLastViewed));
    }

    #[test]
    fn toggle_flips_effective_status_each_time() {
        let mut state = loaded_state();
        reduce(&mut state, Action::ToggleActivityDone("a".to_string()));
        assert_eq!(state.modifications.activity_status.get("a"), Some(&true));
        reduce(&mut state, Action::ToggleActivityDone("a".to_string()));
        assert_eq!(state.modifications.activity_status.get("a"), Some(&false));
    }

    #[test]
    fn reorder_moves_not_swaps() {
        let mut state = loaded_state();
        let effects = reduce(
            &mut state,
            Action::ReorderActivities {
                stop_id: "queenstown".to_string(),
                from: 0,
                to: 2,
            },
        );
        assert_eq!(effects, vec![Effect::PersistModifications]);
        assert_eq!(
            state.modifications.order_for("queenstown").unwrap(),
            &["b", "c", "a", "d"]
        );
    }

    #[test]
    fn reorder_composes_with_a_prior_override() {
        let mut state = loaded_state();
        reduce(
            &mut state,
            Action::ReorderActivities {
                stop_id: "queenstown".to_string(),
                from: 0,
                to: 3,
            },
        );
        // displayed order is now b,c,d,a
        reduce(
            &mut state,
            Action::ReorderActivities {
                stop_id: "queenstown".to_string(),
                from: 1,
                to: 0,
            },
        );
        assert_eq!(
            state.modifications.order_for("queenstown").unwrap(),
            &["c", "b", "d", "a"]
        );
    }

    #[test]
    fn out_of_range_reorder_is_a_no_op() {
        let mut state = loaded_state();
        let before = state.modifications.activity_orders.len();
        for (from, to) in [(4, 0), (0, 4), (9, 9)] {
            let effects = reduce(
                &mut state,
                Action::ReorderActivities {
                    stop_id: "queenstown".to_string(),
                    from,
                    to,
                },
            );
            assert!(effects.is_empty());
        }
        assert_eq!(state.modifications.activity_orders.len(), before);
    }

    #[test]
    fn reorder_against_unknown_stop_or_unloaded_trip_is_a_no_op() {
        let mut state = AppState::default();
        let effects = reduce(
            &mut state,
            Action::ReorderActivities {
                stop_id: "queenstown".to_string(),
                from: 0,
                to: 1,
            },
        );
        assert!(effects.is_empty());

        let mut state = loaded_state();
        let effects = reduce(
            &mut state,
            Action::ReorderActivities {
                stop_id: "nowhere".to_string(),
                from: 0,
                to: 1,
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn weather_fetch_writes_the_cache_and_requests_persistence() {
        let mut state = AppState::default();
        let fetched = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let forecast = ForecastData {
            days: vec![DailyForecast {
                date: "2025-11-01".to_string(),
                high_c: 15.0,
                low_c: 4.0,
                precipitation_probability: 60,
                conditions: "Showers".to_string(),
            }],
        };
        let effects = reduce(
            &mut state,
            Action::WeatherFetched {
                stop_id: "queenstown".to_string(),
                forecast: forecast.clone(),
                fetched_at: fetched,
            },
        );
        assert_eq!(effects, vec![Effect::PersistWeather]);
        assert_eq!(
            state.weather.get_at("queenstown", fetched + Duration::hours(1)),
            Some(&forecast)
        );
    }

    #[test]
    fn search_results_apply_only_for_the_latest_request() {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::PoiSearchStarted {
                query: "coffee".to_string(),
            },
        );
        let first = state.poi_search.request_id;
        reduce(
            &mut state,
            Action::PoiSearchStarted {
                query: "coffee queenstown".to_string(),
            },
        );
        let second = state.poi_search.request_id;
        assert!(second > first);

        // The slow first response lands after the second was issued.
        reduce(
            &mut state,
            Action::PoiSearchSucceeded {
                request_id: first,
                results: vec![],
            },
        );
        assert!(state.poi_search.loading, "stale response must be discarded");

        reduce(
            &mut state,
            Action::PoiSearchSucceeded {
                request_id: second,
                results: vec![],
            },
        );
        assert!(!state.poi_search.loading);
        assert_eq!(state.poi_search.error, None);
    }

    #[test]
    fn search_failure_keeps_query_and_results() {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::PoiSearchStarted {
                query: "pizza".to_string(),
            },
        );
        let id = state.poi_search.request_id;
        reduce(
            &mut state,
            Action::PoiSearchFailed {
                request_id: id,
                message: "timeout".to_string(),
            },
        );
        assert_eq!(state.poi_search.query, "pizza");
        assert!(!state.poi_search.loading);
        assert_eq!(state.poi_search.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn clear_search_resets_in_one_step_but_keeps_the_counter() {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::PoiSearchStarted {
                query: "pizza".to_string(),
            },
        );
        let id = state.poi_search.request_id;
        reduce(&mut state, Action::ClearPoiSearch);
        assert_eq!(state.poi_search.query, "");
        assert!(state.poi_search.results.is_empty());
        assert!(!state.poi_search.loading);
        assert_eq!(state.poi_search.error, None);
        assert_eq!(state.poi_search.request_id, id);
    }

    #[test]
    fn add_activity_from_poi_appends_or_no_ops() {
        let mut state = loaded_state();
        reduce(
            &mut state,
            Action::AddActivityFromPoi {
                stop_id: "wanaka".to_string(),
                activity: activity("poi_xyz_1"),
            },
        );
        let trip = state.trip_data.as_ref().unwrap();
        assert_eq!(trip.stop("wanaka").unwrap().activities.len(), 3);

        reduce(
            &mut state,
            Action::AddActivityFromPoi {
                stop_id: "nowhere".to_string(),
                activity: activity("poi_abc_2"),
            },
        );
        let trip = state.trip_data.as_ref().unwrap();
        assert_eq!(trip.stops.iter().map(|s| s.activities.len()).sum::<usize>(), 7);
    }

    #[test]
    fn modal_lifecycle_resets_flags_per_transition() {
        let mut state = AppState::default();
        reduce(&mut state, Action::OpenPoiModal);
        assert!(state.poi_modal.is_open);
        assert!(state.poi_modal.loading);

        reduce(
            &mut state,
            Action::PoiDetailsFailed("no detail".to_string()),
        );
        assert!(!state.poi_modal.loading);
        assert_eq!(state.poi_modal.error.as_deref(), Some("no detail"));

        reduce(&mut state, Action::ClosePoiModal);
        assert!(!state.poi_modal.is_open);
        assert_eq!(state.poi_modal.error, None);
    }

    #[test]
    fn legacy_order_payloads_migrate_during_load() {
        let mut state = AppState::default();
        let mut mods = UserModifications::default();
        mods.activity_orders.insert(
            "s1".to_string(),
            crate::types::StoredOrder::Indices(vec![1, 0]),
        );
        reduce(
            &mut state,
            Action::TripLoaded {
                trip_id: "t".to_string(),
                data: trip_with_activities("s1", &["a", "b"]),
                modifications: mods,
            },
        );
        assert_eq!(
            state.modifications.order_for("s1").unwrap(),
            &["b", "a"]
        );
        assert_eq!(state.modifications.version, crate::types::MODIFICATIONS_VERSION);
    }
}
