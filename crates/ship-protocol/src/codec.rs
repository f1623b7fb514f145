//! Top-level frame encode/decode: tag byte + body.

use crate::close::ConnectionClose;
use crate::control::ControlMessage;
use crate::data::DataMessage;
use crate::error::ShipCodecError;
use crate::frame::MessageType;

/// The literal two-byte CMI_STATE_CLIENT_SEND/CMI_STATE_SERVER_WAIT INIT frame.
/// It carries no JSON body — a single `0x00` pad byte follows the tag.
pub const INIT_FRAME: [u8; 2] = [0x00, 0x00];

#[derive(Debug, Clone)]
pub enum ShipFrame {
    Init,
    Control(ControlMessage),
    Data(DataMessage),
    End(ConnectionClose),
}

impl ShipFrame {
    pub fn message_type(&self) -> MessageType {
        match self {
            ShipFrame::Init => MessageType::Init,
            ShipFrame::Control(_) => MessageType::Control,
            ShipFrame::Data(_) => MessageType::Data,
            ShipFrame::End(_) => MessageType::End,
        }
    }
}

/// Encode a frame to its wire bytes: tag byte, then (for non-INIT frames)
/// minified UTF-8 JSON.
pub fn encode_frame(frame: &ShipFrame) -> Result<Vec<u8>, ShipCodecError> {
    if let ShipFrame::Init = frame {
        return Ok(INIT_FRAME.to_vec());
    }

    let body_json = match frame {
        ShipFrame::Init => unreachable!(),
        ShipFrame::Control(ctrl) => {
            serde_json::json!({ ctrl.variant_name(): ctrl.encode_body() })
        }
        ShipFrame::Data(data) => {
            serde_json::json!({ "data": data.encode_body() })
        }
        ShipFrame::End(close) => {
            serde_json::json!({ "connectionClose": close.encode_body() })
        }
    };

    let mut bytes = vec![frame.message_type().tag()];
    bytes.extend_from_slice(serde_json::to_string(&body_json)?.as_bytes());
    Ok(bytes)
}

/// Decode a frame from its wire bytes.
pub fn decode_frame(bytes: &[u8]) -> Result<ShipFrame, ShipCodecError> {
    let (&tag, rest) = bytes.split_first().ok_or(ShipCodecError::EmptyFrame)?;
    let message_type = MessageType::try_from(tag)?;

    if let MessageType::Init = message_type {
        return Ok(ShipFrame::Init);
    }

    let text = std::str::from_utf8(rest).map_err(|_| ShipCodecError::NotUtf8)?;
    let value: serde_json::Value = serde_json::from_str(text)?;
    let obj = value
        .as_object()
        .ok_or_else(|| ShipCodecError::Malformed("frame body must be a JSON object".to_owned()))?;
    if obj.len() != 1 {
        return Err(ShipCodecError::Malformed(
            "frame body must carry exactly one top-level key".to_owned(),
        ));
    }
    let (key, body) = obj.iter().next().expect("len checked above");

    Ok(match message_type {
        MessageType::Init => unreachable!(),
        MessageType::Control => ShipFrame::Control(ControlMessage::decode(key, body)?),
        MessageType::Data => {
            if key != "data" {
                return Err(ShipCodecError::UnknownVariant { key: key.clone() });
            }
            ShipFrame::Data(DataMessage::decode(body)?)
        }
        MessageType::End => {
            if key != "connectionClose" {
                return Err(ShipCodecError::UnknownVariant { key: key.clone() });
            }
            ShipFrame::End(ConnectionClose::decode(body)?)
        }
    })
}
