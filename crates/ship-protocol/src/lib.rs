//! SHIP wire-frame codec: message framing and the ten CONTROL/DATA/END
//! message variants, encoded to and decoded from their on-wire JSON shape.
//!
//! This crate knows nothing about session state, transport, or SPINE — it
//! only turns frames into bytes and back.

pub mod close;
pub mod codec;
pub mod control;
pub mod data;
pub mod error;
pub mod fields;
pub mod frame;

pub use close::{ClosePhase, ConnectionClose};
pub use codec::{decode_frame, encode_frame, ShipFrame, INIT_FRAME};
pub use control::{
    AccessMethods, AccessMethodsDns, ConnectionHello, ConnectionPinError, ConnectionPinInput,
    ConnectionPinState, ControlMessage, HandshakeError, HandshakeType, HelloPhase, MessageFormat,
    MessageProtocolHandshake, MessageProtocolHandshakeError, PinError, PinInputPermission,
    PinState, ProtocolVersion,
};
pub use data::DataMessage;
pub use error::ShipCodecError;
pub use frame::MessageType;
