use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("codec: {0}")]
    Codec(#[from] ship_protocol::ShipCodecError),

    #[error("protocol violation in state {state:?}: {detail}")]
    ProtocolViolation { state: &'static str, detail: String },

    #[error("handshake selection mismatch")]
    SelectionMismatch,

    #[error("session aborted")]
    Aborted,

    #[error("transport closed")]
    TransportClosed,

    #[error("transport error: {0}")]
    Transport(String),
}
