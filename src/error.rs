use thiserror::Error;

pub type ServiceResult<T> = core::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Transport-level failure reaching a trip or place endpoint.
    #[error("network error: {0}")]
    Network(String),
    /// The endpoint answered with a non-2xx status other than 404.
    #[error("api error: {0}")]
    Api(String),
    /// 404 from a trip endpoint; kept distinct so callers can render
    /// "trip not found" instead of a generic failure.
    #[error("not found: {0}")]
    NotFound(String),
    /// A trip document failed structural validation.
    #[error("invalid trip data: {0}")]
    InvalidTrip(String),
    #[error("{0}")]
    Other(String),
}
