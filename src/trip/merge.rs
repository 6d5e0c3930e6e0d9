use chrono::Utc;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};

use crate::trip::types::{Activity, ActivityStatus, Stop, TripData};
use crate::types::UserModifications;

/// Version stamp written into export artifacts.
pub const EXPORT_VERSION: &str = "1.0.0";

fn order_is_permutation(order: &[String], activities: &[Activity]) -> bool {
    if order.len() != activities.len() {
        return false;
    }
    let ids: HashSet<&str> = activities.iter().map(|a| a.activity_id.as_str()).collect();
    order.len() == ids.len() && order.iter().all(|id| ids.contains(id.as_str()))
}

/// Resolve the display order for a stop's activities.
///
/// A user override is honored only when it is a full permutation of the
/// current activity ids; a mismatched override falls back to document
/// order deterministically. With no override, activities sort by their
/// authored `order` value (default 0), stable for ties.
pub fn effective_order(activities: &[Activity], order: Option<&[String]>) -> Vec<Activity> {
    if let Some(order) = order {
        if order_is_permutation(order, activities) {
            let position: HashMap<&str, usize> = order
                .iter()
                .enumerate()
                .map(|(i, id)| (id.as_str(), i))
                .collect();
            let mut sorted = activities.to_vec();
            sorted.sort_by_key(|a| {
                position
                    .get(a.activity_id.as_str())
                    .copied()
                    .unwrap_or(usize::MAX)
            });
            return sorted;
        }
        return activities.to_vec();
    }

    let mut sorted = activities.to_vec();
    sorted.sort_by(|a, b| {
        a.order
            .unwrap_or(0.0)
            .total_cmp(&b.order.unwrap_or(0.0))
    });
    sorted
}

/// Override wins over the authored `status.done`; absent both, not done.
pub fn effective_status(activity: &Activity, mods: &UserModifications) -> bool {
    if let Some(&done) = mods.activity_status.get(&activity.activity_id) {
        return done;
    }
    activity.status.as_ref().map(|s| s.done).unwrap_or(false)
}

/// Completion percentage for a stop, rounded to the nearest integer.
/// A stop with no activities counts as fully done.
pub fn progress(stop: &Stop, mods: &UserModifications) -> u32 {
    if stop.activities.is_empty() {
        return 100;
    }
    let done = stop
        .activities
        .iter()
        .filter(|a| effective_status(a, mods))
        .count();
    ((done as f64 / stop.activities.len() as f64) * 100.0).round() as u32
}

/// Produce a new document with every activity's effective status and order
/// baked in as authored values, activities re-sorted by effective order.
/// Inputs are not mutated; re-merging the result with empty modifications
/// is a no-op.
pub fn merge_for_export(trip: &TripData, mods: &UserModifications) -> TripData {
    let mut merged = trip.clone();
    for stop in &mut merged.stops {
        let ordered = effective_order(&stop.activities, mods.order_for(&stop.stop_id));
        stop.activities = ordered
            .into_iter()
            .enumerate()
            .map(|(index, mut activity)| {
                let done = effective_status(&activity, mods);
                activity.status = Some(ActivityStatus { done });
                activity.order = Some(index as f64);
                activity
            })
            .collect();
    }
    merged
}

/// The downloadable export artifact wrapping a merged document.
pub fn export_envelope(merged: &TripData) -> Value {
    json!({
        "tripData": merged,
        "exportDate": Utc::now().to_rfc3339(),
        "version": EXPORT_VERSION,
    })
}

/// Export filename derived from the trip name: non-alphanumeric characters
/// stripped, lower-cased, suffixed `_updated.json`.
pub fn export_file_name(trip_name: &str) -> String {
    let stem: String = trip_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    format!("{stem}_updated.json")
}
