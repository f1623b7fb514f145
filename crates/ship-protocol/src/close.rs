//! The END-tagged `connectionClose` message.

use crate::error::ShipCodecError;
use crate::fields::{as_str_enum, parse_field_array, take_optional, take_required, FieldArrayBuilder};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePhase {
    Announce,
    Confirm,
}

impl ClosePhase {
    fn as_str(self) -> &'static str {
        match self {
            ClosePhase::Announce => "announce",
            ClosePhase::Confirm => "confirm",
        }
    }

    fn parse(s: &str) -> Result<Self, ShipCodecError> {
        match s {
            "announce" => Ok(ClosePhase::Announce),
            "confirm" => Ok(ClosePhase::Confirm),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "phase",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionClose {
    pub phase: ClosePhase,
    pub max_time: Option<u32>,
    pub reason: Option<String>,
}

impl ConnectionClose {
    pub fn encode_body(&self) -> Value {
        FieldArrayBuilder::new()
            .push_required("phase", json!(self.phase.as_str()))
            .push("maxTime", self.max_time.map(|t| json!(t)))
            .push("reason", self.reason.clone().map(|r| json!(r)))
            .finish()
    }

    pub fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let phase =
            ClosePhase::parse(as_str_enum("phase", &take_required(&mut fields, "phase")?)?)?;
        let max_time = take_optional(&mut fields, "maxTime").and_then(|v| v.as_u64()).map(|n| n as u32);
        let reason = take_optional(&mut fields, "reason")
            .and_then(|v| v.as_str().map(str::to_owned));
        Ok(ConnectionClose { phase, max_time, reason })
    }
}
