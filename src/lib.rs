//! Wanderlog core: trip-plan validation, the reducer-driven application
//! state container, local persistence, weather caching, merge/export
//! utilities and the offline POI-enrichment pass.

pub mod actions;
pub mod cli;
pub mod client;
pub mod enrich;
pub mod error;
pub mod metadata;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod store;
pub mod trip;
pub mod types;
pub mod weather;

pub use actions::{Action, Effect};
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
pub use store::Store;
