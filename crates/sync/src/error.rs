use engine::EngineError;
use store::StoreError;
use thiserror::Error;

pub type ResultSync<T> = Result<T, SyncError>;

/// Errors surfaced by the sync layer.
///
/// `Unavailable` is a liveness condition, not a failure: the remote store
/// has simply not delivered its initial snapshot yet and the caller should
/// keep the action disabled. `Authentication` is a deliberately generic
/// denial that does not reveal whether the account exists.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("remote store has not delivered an initial snapshot yet")]
    Unavailable,
    #[error("invalid credentials")]
    Authentication,
    #[error("not allowed: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
