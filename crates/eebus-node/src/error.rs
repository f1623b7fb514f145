use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("SKI {0} is not in the trusted set")]
    NotTrusted(String),

    #[error("a Peer for SKI {0} is already active")]
    AlreadyActive(String),

    #[error("no Peer registered for SKI {0}")]
    UnknownPeer(String),

    #[error("transport: {0}")]
    Transport(String),
}
