use thiserror::Error;

/// The closed error-kind set surfaced to callers across the stack (§7),
/// grounded 1:1 on `src/common/eebus_errors.h`. `Ok`/`NoChange` are
/// modelled idiomatically as `Result::Ok` and dedicated per-operation
/// success enums rather than as variants here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EebusError {
    #[error("component not initialised")]
    Init,

    #[error("invalid argument")]
    InputArgument,

    #[error("required argument was null")]
    InputArgumentNull,

    #[error("argument out of range")]
    InputArgumentOutOfRange,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("communication failure")]
    Communication,

    #[error("communication channel busy")]
    CommunicationBusy,

    #[error("out of memory")]
    Memory,

    #[error("memory allocation failed")]
    MemoryAllocate,

    #[error("not implemented")]
    NotImplemented,

    #[error("not supported")]
    NotSupported,

    #[error("not available")]
    NotAvailable,

    #[error("request timed out")]
    Timeout,
}

impl From<ship_protocol::ShipCodecError> for EebusError {
    fn from(e: ship_protocol::ShipCodecError) -> Self {
        EebusError::Parse(e.to_string())
    }
}
