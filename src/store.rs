use crate::actions::{Action, Effect};
use crate::reducer::reduce;
use crate::state::AppState;
use crate::storage::LocalStore;
use crate::types::{
    LAST_VIEWED_BASE_KEY, USER_MODIFICATIONS_KEY, UserModifications, WEATHER_CACHE_KEY,
};
use crate::weather::WeatherCache;

type Subscriber = Box<dyn Fn(&AppState) + Send>;

/// The application's single state container. Owned by the composition
/// root and injected where needed: actions are dispatched in, change
/// notifications come out, and persistence happens here after each
/// transition rather than inside the reducer.
pub struct Store {
    state: AppState,
    storage: LocalStore,
    subscribers: Vec<Subscriber>,
}

impl Store {
    /// Build a store hydrated from previously persisted state. Corrupt or
    /// missing persisted values silently fall back to empty defaults.
    pub fn new(storage: LocalStore) -> Self {
        let mut state = AppState::default();
        state.modifications =
            storage.get(USER_MODIFICATIONS_KEY, UserModifications::default());
        state.weather = storage.get(WEATHER_CACHE_KEY, WeatherCache::default());
        Self {
            state,
            storage,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: Fn(&AppState) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Apply an action, run its persistence effects, and notify
    /// subscribers. Dispatches are processed synchronously in issue order.
    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        let effects = reduce(&mut self.state, action);
        for effect in effects {
            self.run_effect(effect);
        }
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::PersistModifications => {
                self.storage
                    .set(USER_MODIFICATIONS_KEY, &self.state.modifications);
            }
            Effect::PersistWeather => {
                self.storage.set(WEATHER_CACHE_KEY, &self.state.weather);
            }
            Effect::PersistLastViewed => {
                self.storage.set(
                    LAST_VIEWED_BASE_KEY,
                    &self.state.modifications.last_viewed_base,
                );
            }
        }
    }

    /// Access to the underlying store, e.g. for wiring cross-context
    /// change subscriptions at the composition root.
    pub fn storage(&self) -> &LocalStore {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::test_support::trip_with_activities;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn loaded_store() -> Store {
        let mut store = Store::new(LocalStore::in_memory());
        store.dispatch(Action::TripLoaded {
            trip_id: "t".to_string(),
            data: trip_with_activities("s1", &["a", "b"]),
            modifications: UserModifications::default(),
        });
        store
    }

    #[test]
    fn dispatch_persists_modifications_after_the_transition() {
        let mut store = loaded_store();
        store.dispatch(Action::ToggleActivityDone("a".to_string()));

        let persisted: UserModifications = store
            .storage()
            .get(USER_MODIFICATIONS_KEY, UserModifications::default());
        assert_eq!(persisted.activity_status.get("a"), Some(&true));
    }

    #[test]
    fn select_base_persists_last_viewed_under_its_own_key() {
        let mut store = loaded_store();
        store.dispatch(Action::SelectBase("s1".to_string()));

        let last: Option<String> = store.storage().get(LAST_VIEWED_BASE_KEY, None);
        assert_eq!(last.as_deref(), Some("s1"));
    }

    #[test]
    fn subscribers_observe_every_dispatch() {
        let mut store = loaded_store();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        store.subscribe(move |_state| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(Action::SelectActivity(Some("a".to_string())));
        store.dispatch(Action::SelectActivity(None));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn new_store_hydrates_from_persisted_state() {
        let storage = LocalStore::in_memory();
        let mut mods = UserModifications::default();
        mods.activity_status.insert("a".to_string(), true);
        storage.set(USER_MODIFICATIONS_KEY, &mods);

        let store = Store::new(storage);
        assert_eq!(
            store.state().modifications.activity_status.get("a"),
            Some(&true)
        );
    }
}
