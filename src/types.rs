use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::trip::TripData;

/// Storage key layout shared with any other process using the same store.
pub const USER_MODIFICATIONS_KEY: &str = "userModifications";
pub const WEATHER_CACHE_KEY: &str = "weatherCache";
pub const LAST_VIEWED_BASE_KEY: &str = "lastViewedBase";

/// Current schema version of [`UserModifications`]. Version 1 stored
/// activity orders as positional indices; version 2 stores activity ids.
pub const MODIFICATIONS_VERSION: u32 = 2;

/// An activity order override as it appears on disk. Old payloads carried
/// positional indices into the authored activity array; current payloads
/// carry the activity ids themselves in display order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredOrder {
    Ids(Vec<String>),
    Indices(Vec<usize>),
}

/// Local per-user overlay on top of the loaded trip document. Never part
/// of the document itself; persisted under [`USER_MODIFICATIONS_KEY`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModifications {
    #[serde(default)]
    pub version: u32,
    /// activity_id -> done. Activity ids are globally unique, so this map
    /// is not scoped per stop.
    #[serde(default)]
    pub activity_status: HashMap<String, bool>,
    /// stop_id -> display order.
    #[serde(default)]
    pub activity_orders: HashMap<String, StoredOrder>,
    #[serde(default)]
    pub last_viewed_base: Option<String>,
}

impl UserModifications {
    /// The canonical order override for a stop: a full permutation of the
    /// stop's activity ids. Anything else (legacy un-migrated payloads,
    /// stale entries after the document changed) yields `None` and the
    /// caller falls back to document order.
    pub fn order_for<'a>(&'a self, stop_id: &str) -> Option<&'a [String]> {
        match self.activity_orders.get(stop_id) {
            Some(StoredOrder::Ids(ids)) => Some(ids),
            _ => None,
        }
    }

    pub fn set_order(&mut self, stop_id: &str, ids: Vec<String>) {
        self.activity_orders
            .insert(stop_id.to_string(), StoredOrder::Ids(ids));
    }

    /// One-time migration of legacy positional-index order overrides,
    /// resolved against the loaded document's authored activity order.
    /// Entries that cannot be mapped (index out of range, length mismatch,
    /// unknown stop) are dropped rather than guessed at.
    pub fn migrate(&mut self, trip: &TripData) {
        if self.version >= MODIFICATIONS_VERSION {
            return;
        }
        let legacy: Vec<(String, Vec<usize>)> = self
            .activity_orders
            .iter()
            .filter_map(|(stop_id, order)| match order {
                StoredOrder::Indices(indices) => Some((stop_id.clone(), indices.clone())),
                StoredOrder::Ids(_) => None,
            })
            .collect();

        for (stop_id, indices) in legacy {
            let mapped = trip.stop(&stop_id).and_then(|stop| {
                if indices.len() != stop.activities.len() {
                    return None;
                }
                indices
                    .iter()
                    .map(|&i| stop.activities.get(i).map(|a| a.activity_id.clone()))
                    .collect::<Option<Vec<String>>>()
            });
            match mapped {
                Some(ids) => {
                    self.activity_orders
                        .insert(stop_id, StoredOrder::Ids(ids));
                }
                None => {
                    tracing::warn!(%stop_id, "dropping unmappable legacy activity order");
                    self.activity_orders.remove(&stop_id);
                }
            }
        }
        self.version = MODIFICATIONS_VERSION;
    }
}

/// Reduced view of a trip document, used for trip pickers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub trip_id: Option<String>,
    pub trip_name: String,
    pub timezone: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&TripData> for TripSummary {
    fn from(trip: &TripData) -> Self {
        Self {
            trip_id: trip.trip_id.clone(),
            trip_name: trip.trip_name.clone(),
            timezone: trip.timezone.clone(),
            created_at: trip.created_at.clone(),
            updated_at: trip.updated_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::test_support::trip_with_activities;

    #[test]
    fn legacy_index_orders_migrate_to_id_sequences() {
        let trip = trip_with_activities("s1", &["a", "b", "c"]);
        let mut mods = UserModifications::default();
        mods.activity_orders
            .insert("s1".to_string(), StoredOrder::Indices(vec![2, 0, 1]));

        mods.migrate(&trip);

        assert_eq!(mods.version, MODIFICATIONS_VERSION);
        assert_eq!(
            mods.order_for("s1").unwrap(),
            &["c".to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn unmappable_legacy_orders_are_dropped() {
        let trip = trip_with_activities("s1", &["a", "b"]);
        let mut mods = UserModifications::default();
        mods.activity_orders
            .insert("s1".to_string(), StoredOrder::Indices(vec![0, 1, 2]));
        mods.activity_orders
            .insert("gone".to_string(), StoredOrder::Indices(vec![0]));

        mods.migrate(&trip);

        assert!(mods.activity_orders.is_empty());
        assert_eq!(mods.version, MODIFICATIONS_VERSION);
    }

    #[test]
    fn migration_is_idempotent_for_current_payloads() {
        let trip = trip_with_activities("s1", &["a", "b"]);
        let mut mods = UserModifications {
            version: MODIFICATIONS_VERSION,
            ..Default::default()
        };
        mods.set_order("s1", vec!["b".to_string(), "a".to_string()]);

        mods.migrate(&trip);

        assert_eq!(
            mods.order_for("s1").unwrap(),
            &["b".to_string(), "a".to_string()]
        );
    }

    #[test]
    fn stored_order_round_trips_both_formats() {
        let ids: StoredOrder = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert!(matches!(ids, StoredOrder::Ids(_)));
        let indices: StoredOrder = serde_json::from_str(r#"[1,0]"#).unwrap();
        assert!(matches!(indices, StoredOrder::Indices(_)));
    }
}
