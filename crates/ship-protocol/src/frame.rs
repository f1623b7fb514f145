//! The SHIP frame envelope: a one-byte message-type tag followed by a body.

use crate::error::ShipCodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Init,
    Control,
    Data,
    End,
}

impl MessageType {
    pub fn tag(self) -> u8 {
        match self {
            MessageType::Init => 0,
            MessageType::Control => 1,
            MessageType::Data => 2,
            MessageType::End => 3,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ShipCodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(MessageType::Init),
            1 => Ok(MessageType::Control),
            2 => Ok(MessageType::Data),
            3 => Ok(MessageType::End),
            other => Err(ShipCodecError::UnknownTag(other)),
        }
    }
}
