//! Codec failure modes.
//!
//! Every variant here maps onto the `Parse` kind of the core error model
//! (see `spine-protocol::EebusError`); this crate keeps its own enum so the
//! codec has no dependency on the SPINE layer it sits below.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShipCodecError {
    #[error("frame is empty")]
    EmptyFrame,

    #[error("unknown message-type tag {0}")]
    UnknownTag(u8),

    #[error("frame body is not valid UTF-8")]
    NotUtf8,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("unexpected variant '{key}' for this message type")]
    UnknownVariant { key: String },

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value '{value}' for field '{field}'")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("invalid PIN '{0}'")]
    InvalidPin(String),
}
