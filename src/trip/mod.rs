pub mod infer;
pub mod merge;
pub mod types;
pub mod validator;

pub use infer::infer_activity_type;
pub use merge::{
    effective_order, effective_status, export_envelope, export_file_name, merge_for_export,
    progress, EXPORT_VERSION,
};
pub use types::{
    Accommodation, Activity, ActivityStatus, ActivityType, DateRange, Location, PartialLocation,
    PoiDetails, Stop, TripData,
};
pub use validator::{validate, TripValidation};
