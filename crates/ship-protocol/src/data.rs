//! The DATA message. Its payload carries a raw SPINE datagram and must not
//! be re-parsed or re-interpreted at this layer — it is passed through
//! verbatim via `RawValue`.

use crate::error::ShipCodecError;
use serde_json::value::RawValue;
use serde_json::{json, Value};

/// The only protocol id this core speaks: major 1, minor 0 (§6).
pub const PROTOCOL_ID: &str = "ee1.0";

#[derive(Debug, Clone)]
pub struct DataMessage {
    pub protocol_id: String,
    pub payload: Box<RawValue>,
}

impl DataMessage {
    pub fn new(payload: Box<RawValue>) -> Self {
        DataMessage {
            protocol_id: PROTOCOL_ID.to_owned(),
            payload,
        }
    }

    pub fn encode_body(&self) -> Value {
        // `[{"header":[{"protocolId":...}]},{"payload":<raw>}]` — the header
        // is itself an array-of-single-key-objects, one level nested inside
        // the data body's own array-of-single-key-objects shape.
        json!([{"header": [{"protocolId": self.protocol_id}]}, {"payload": self.payload}])
    }

    pub fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let arr = body
            .as_array()
            .ok_or_else(|| ShipCodecError::Malformed("data body must be an array".to_owned()))?;

        let header_entry = arr
            .first()
            .ok_or(ShipCodecError::MissingField("header"))?
            .as_object()
            .ok_or_else(|| ShipCodecError::Malformed("data body entry must be an object".to_owned()))?;
        let header_arr = header_entry
            .get("header")
            .ok_or(ShipCodecError::MissingField("header"))?
            .as_array()
            .ok_or_else(|| ShipCodecError::Malformed("header must be an array".to_owned()))?;
        let protocol_id_entry = header_arr
            .first()
            .ok_or(ShipCodecError::MissingField("protocolId"))?
            .as_object()
            .ok_or_else(|| ShipCodecError::Malformed("header entry must be an object".to_owned()))?;
        let protocol_id = protocol_id_entry
            .get("protocolId")
            .and_then(Value::as_str)
            .ok_or(ShipCodecError::MissingField("protocolId"))?
            .to_owned();
        if protocol_id.len() > 7 {
            return Err(ShipCodecError::InvalidEnumValue {
                field: "protocolId",
                value: protocol_id,
            });
        }

        let payload_entry = arr
            .get(1)
            .ok_or(ShipCodecError::MissingField("payload"))?
            .as_object()
            .ok_or_else(|| ShipCodecError::Malformed("data body entry must be an object".to_owned()))?;
        let payload_value = payload_entry.get("payload").ok_or(ShipCodecError::MissingField("payload"))?;
        let raw = RawValue::from_string(payload_value.to_string()).map_err(ShipCodecError::InvalidJson)?;

        Ok(DataMessage { protocol_id, payload: raw })
    }
}

impl PartialEq for DataMessage {
    fn eq(&self, other: &Self) -> bool {
        self.protocol_id == other.protocol_id && self.payload.get() == other.payload.get()
    }
}
impl Eq for DataMessage {}
