//! The eight CONTROL-tagged message variants (§4.1).

use crate::error::ShipCodecError;
use crate::fields::{as_str_enum, parse_field_array, take_optional, take_required, FieldArrayBuilder};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    ConnectionHello(ConnectionHello),
    MessageProtocolHandshake(MessageProtocolHandshake),
    MessageProtocolHandshakeError(MessageProtocolHandshakeError),
    ConnectionPinState(ConnectionPinState),
    ConnectionPinInput(ConnectionPinInput),
    ConnectionPinError(ConnectionPinError),
    AccessMethodsRequest,
    AccessMethods(AccessMethods),
}

impl ControlMessage {
    pub fn variant_name(&self) -> &'static str {
        match self {
            ControlMessage::ConnectionHello(_) => "connectionHello",
            ControlMessage::MessageProtocolHandshake(_) => "messageProtocolHandshake",
            ControlMessage::MessageProtocolHandshakeError(_) => "messageProtocolHandshakeError",
            ControlMessage::ConnectionPinState(_) => "connectionPinState",
            ControlMessage::ConnectionPinInput(_) => "connectionPinInput",
            ControlMessage::ConnectionPinError(_) => "connectionPinError",
            ControlMessage::AccessMethodsRequest => "accessMethodsRequest",
            ControlMessage::AccessMethods(_) => "accessMethods",
        }
    }

    pub fn encode_body(&self) -> Value {
        match self {
            ControlMessage::ConnectionHello(v) => v.encode(),
            ControlMessage::MessageProtocolHandshake(v) => v.encode(),
            ControlMessage::MessageProtocolHandshakeError(v) => v.encode(),
            ControlMessage::ConnectionPinState(v) => v.encode(),
            ControlMessage::ConnectionPinInput(v) => v.encode(),
            ControlMessage::ConnectionPinError(v) => v.encode(),
            ControlMessage::AccessMethodsRequest => Value::Array(vec![]),
            ControlMessage::AccessMethods(v) => v.encode(),
        }
    }

    pub fn decode(variant: &str, body: &Value) -> Result<Self, ShipCodecError> {
        Ok(match variant {
            "connectionHello" => ControlMessage::ConnectionHello(ConnectionHello::decode(body)?),
            "messageProtocolHandshake" => {
                ControlMessage::MessageProtocolHandshake(MessageProtocolHandshake::decode(body)?)
            }
            "messageProtocolHandshakeError" => ControlMessage::MessageProtocolHandshakeError(
                MessageProtocolHandshakeError::decode(body)?,
            ),
            "connectionPinState" => {
                ControlMessage::ConnectionPinState(ConnectionPinState::decode(body)?)
            }
            "connectionPinInput" => {
                ControlMessage::ConnectionPinInput(ConnectionPinInput::decode(body)?)
            }
            "connectionPinError" => {
                ControlMessage::ConnectionPinError(ConnectionPinError::decode(body)?)
            }
            "accessMethodsRequest" => ControlMessage::AccessMethodsRequest,
            "accessMethods" => ControlMessage::AccessMethods(AccessMethods::decode(body)?),
            other => {
                return Err(ShipCodecError::UnknownVariant {
                    key: other.to_owned(),
                })
            }
        })
    }
}

// ---------------------------------------------------------------------------
// connectionHello
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelloPhase {
    Pending,
    Ready,
    Aborted,
}

impl HelloPhase {
    fn as_str(self) -> &'static str {
        match self {
            HelloPhase::Pending => "pending",
            HelloPhase::Ready => "ready",
            HelloPhase::Aborted => "aborted",
        }
    }

    fn parse(s: &str) -> Result<Self, ShipCodecError> {
        match s {
            "pending" => Ok(HelloPhase::Pending),
            "ready" => Ok(HelloPhase::Ready),
            "aborted" => Ok(HelloPhase::Aborted),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "phase",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHello {
    pub phase: HelloPhase,
    pub waiting: Option<u32>,
    pub prolongation_request: Option<bool>,
}

impl ConnectionHello {
    fn encode(&self) -> Value {
        FieldArrayBuilder::new()
            .push_required("phase", json!(self.phase.as_str()))
            .push("waiting", self.waiting.map(|w| json!(w)))
            .push(
                "prolongationRequest",
                self.prolongation_request.map(|p| json!(p)),
            )
            .finish()
    }

    fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let phase = HelloPhase::parse(as_str_enum("phase", &take_required(&mut fields, "phase")?)?)?;
        let waiting = take_optional(&mut fields, "waiting")
            .map(|v| v.as_u64().map(|n| n as u32))
            .flatten();
        let prolongation_request = take_optional(&mut fields, "prolongationRequest")
            .and_then(|v| v.as_bool());
        Ok(ConnectionHello {
            phase,
            waiting,
            prolongation_request,
        })
    }
}

// ---------------------------------------------------------------------------
// messageProtocolHandshake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeType {
    AnnounceMax,
    Select,
}

impl HandshakeType {
    fn as_str(self) -> &'static str {
        match self {
            HandshakeType::AnnounceMax => "announceMax",
            HandshakeType::Select => "select",
        }
    }

    fn parse(s: &str) -> Result<Self, ShipCodecError> {
        match s {
            "announceMax" => Ok(HandshakeType::AnnounceMax),
            "select" => Ok(HandshakeType::Select),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "handshakeType",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    JsonUtf8,
    JsonUtf16,
}

impl MessageFormat {
    fn as_str(self) -> &'static str {
        match self {
            MessageFormat::JsonUtf8 => "JSON-UTF8",
            MessageFormat::JsonUtf16 => "JSON-UTF16",
        }
    }

    fn parse(s: &str) -> Result<Self, ShipCodecError> {
        match s {
            "JSON-UTF8" => Ok(MessageFormat::JsonUtf8),
            "JSON-UTF16" => Ok(MessageFormat::JsonUtf16),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "formats",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageProtocolHandshake {
    pub handshake_type: HandshakeType,
    pub version: ProtocolVersion,
    pub formats: Vec<MessageFormat>,
}

impl MessageProtocolHandshake {
    fn encode(&self) -> Value {
        FieldArrayBuilder::new()
            .push_required("handshakeType", json!(self.handshake_type.as_str()))
            .push_required(
                "version",
                json!({"major": self.version.major, "minor": self.version.minor}),
            )
            .push_required(
                "formats",
                json!(self
                    .formats
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()),
            )
            .finish()
    }

    fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let handshake_type = HandshakeType::parse(as_str_enum(
            "handshakeType",
            &take_required(&mut fields, "handshakeType")?,
        )?)?;
        let version_val = take_required(&mut fields, "version")?;
        let major = version_val
            .get("major")
            .and_then(Value::as_u64)
            .ok_or(ShipCodecError::MissingField("version.major"))? as u32;
        let minor = version_val
            .get("minor")
            .and_then(Value::as_u64)
            .ok_or(ShipCodecError::MissingField("version.minor"))? as u32;
        let formats_val = take_required(&mut fields, "formats")?;
        let formats_arr = formats_val
            .as_array()
            .ok_or(ShipCodecError::MissingField("formats"))?;
        let mut formats = Vec::with_capacity(formats_arr.len());
        for f in formats_arr {
            formats.push(MessageFormat::parse(as_str_enum("formats", f)?)?);
        }
        Ok(MessageProtocolHandshake {
            handshake_type,
            version: ProtocolVersion { major, minor },
            formats,
        })
    }
}

// ---------------------------------------------------------------------------
// messageProtocolHandshakeError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeError {
    Rfu,
    Timeout,
    UnexpectedMessage,
    SelectionMismatch,
}

impl HandshakeError {
    fn as_code(self) -> u64 {
        match self {
            HandshakeError::Rfu => 0,
            HandshakeError::Timeout => 1,
            HandshakeError::UnexpectedMessage => 2,
            HandshakeError::SelectionMismatch => 3,
        }
    }

    fn parse(code: u64) -> Result<Self, ShipCodecError> {
        match code {
            0 => Ok(HandshakeError::Rfu),
            1 => Ok(HandshakeError::Timeout),
            2 => Ok(HandshakeError::UnexpectedMessage),
            3 => Ok(HandshakeError::SelectionMismatch),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "error",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageProtocolHandshakeError {
    pub error: HandshakeError,
}

impl MessageProtocolHandshakeError {
    fn encode(&self) -> Value {
        FieldArrayBuilder::new()
            .push_required("error", json!(self.error.as_code()))
            .finish()
    }

    fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let code = take_required(&mut fields, "error")?
            .as_u64()
            .ok_or(ShipCodecError::MissingField("error"))?;
        Ok(MessageProtocolHandshakeError {
            error: HandshakeError::parse(code)?,
        })
    }
}

// ---------------------------------------------------------------------------
// connectionPinState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    Required,
    Optional,
    PinOk,
    None,
}

impl PinState {
    fn as_str(self) -> &'static str {
        match self {
            PinState::Required => "required",
            PinState::Optional => "optional",
            PinState::PinOk => "pinOk",
            PinState::None => "none",
        }
    }

    fn parse(s: &str) -> Result<Self, ShipCodecError> {
        match s {
            "required" => Ok(PinState::Required),
            "optional" => Ok(PinState::Optional),
            "pinOk" => Ok(PinState::PinOk),
            "none" => Ok(PinState::None),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "pinState",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinInputPermission {
    Busy,
    Ok,
}

impl PinInputPermission {
    fn as_str(self) -> &'static str {
        match self {
            PinInputPermission::Busy => "busy",
            PinInputPermission::Ok => "ok",
        }
    }

    fn parse(s: &str) -> Result<Self, ShipCodecError> {
        match s {
            "busy" => Ok(PinInputPermission::Busy),
            "ok" => Ok(PinInputPermission::Ok),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "inputPermission",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionPinState {
    pub pin_state: PinState,
    pub input_permission: Option<PinInputPermission>,
}

impl ConnectionPinState {
    fn encode(&self) -> Value {
        FieldArrayBuilder::new()
            .push_required("pinState", json!(self.pin_state.as_str()))
            .push(
                "inputPermission",
                self.input_permission.map(|p| json!(p.as_str())),
            )
            .finish()
    }

    fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let pin_state = PinState::parse(as_str_enum(
            "pinState",
            &take_required(&mut fields, "pinState")?,
        )?)?;
        let input_permission = match take_optional(&mut fields, "inputPermission") {
            Some(v) => Some(PinInputPermission::parse(as_str_enum(
                "inputPermission",
                &v,
            )?)?),
            None => None,
        };
        Ok(ConnectionPinState {
            pin_state,
            input_permission,
        })
    }
}

// ---------------------------------------------------------------------------
// connectionPinInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionPinInput {
    pub pin: u64,
}

impl ConnectionPinInput {
    fn encode(&self) -> Value {
        FieldArrayBuilder::new()
            .push_required("pin", json!(format!("{:X}", self.pin)))
            .finish()
    }

    fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let raw = take_required(&mut fields, "pin")?;
        let s = as_str_enum("pin", &raw)?;
        Ok(ConnectionPinInput { pin: parse_pin(s)? })
    }
}

/// Parse a SHIP PIN: 8–16 hex digits, no leading zero.
pub fn parse_pin(s: &str) -> Result<u64, ShipCodecError> {
    if s.len() < 8 || s.len() > 16 {
        return Err(ShipCodecError::InvalidPin(s.to_owned()));
    }
    if s.starts_with('0') {
        return Err(ShipCodecError::InvalidPin(s.to_owned()));
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ShipCodecError::InvalidPin(s.to_owned()));
    }
    u64::from_str_radix(s, 16).map_err(|_| ShipCodecError::InvalidPin(s.to_owned()))
}

// ---------------------------------------------------------------------------
// connectionPinError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    WrongPin,
}

impl PinError {
    fn as_code(self) -> u64 {
        match self {
            PinError::WrongPin => 1,
        }
    }

    fn parse(code: u64) -> Result<Self, ShipCodecError> {
        match code {
            1 => Ok(PinError::WrongPin),
            other => Err(ShipCodecError::InvalidEnumValue {
                field: "error",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionPinError {
    pub error: PinError,
}

impl ConnectionPinError {
    fn encode(&self) -> Value {
        FieldArrayBuilder::new()
            .push_required("error", json!(self.error.as_code()))
            .finish()
    }

    fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let code = take_required(&mut fields, "error")?
            .as_u64()
            .ok_or(ShipCodecError::MissingField("error"))?;
        Ok(ConnectionPinError {
            error: PinError::parse(code)?,
        })
    }
}

// ---------------------------------------------------------------------------
// accessMethods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMethodsDns {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMethods {
    pub id: String,
    /// Absent on the wire is equivalent to `false`.
    pub dns_sd_mdns: bool,
    pub dns: Option<AccessMethodsDns>,
}

impl AccessMethods {
    fn encode(&self) -> Value {
        let dns_val = self.dns.as_ref().map(|d| {
            Value::Array(vec![json!({"uri": d.uri})])
        });
        FieldArrayBuilder::new()
            .push_required("id", json!(self.id))
            .push(
                "dnsSd_mDns",
                if self.dns_sd_mdns { Some(json!(true)) } else { None },
            )
            .push("dns", dns_val)
            .finish()
    }

    fn decode(body: &Value) -> Result<Self, ShipCodecError> {
        let mut fields = parse_field_array(body)?;
        let id = take_required(&mut fields, "id")?
            .as_str()
            .ok_or(ShipCodecError::MissingField("id"))?
            .to_owned();
        let dns_sd_mdns = take_optional(&mut fields, "dnsSd_mDns")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let dns = match take_optional(&mut fields, "dns") {
            Some(v) => {
                let arr = v
                    .as_array()
                    .ok_or(ShipCodecError::MissingField("dns"))?;
                let first = arr.first().ok_or(ShipCodecError::MissingField("dns.uri"))?;
                let uri = first
                    .get("uri")
                    .and_then(Value::as_str)
                    .ok_or(ShipCodecError::MissingField("dns.uri"))?
                    .to_owned();
                Some(AccessMethodsDns { uri })
            }
            None => None,
        };
        Ok(AccessMethods {
            id,
            dns_sd_mdns,
            dns,
        })
    }
}
