use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("spine: {0}")]
    Spine(#[from] spine_protocol::EebusError),

    #[error("no destination feature at the given address")]
    NoDestination,

    #[error("outstanding request timed out")]
    Timeout,

    #[error("outstanding request was cancelled")]
    Cancelled,
}
