//! The SPINE datagram: a JSON object with top-level keys `header` and
//! `payload` (§6). Carried verbatim inside a SHIP DATA frame.

use crate::address::FeatureAddress;
use crate::command::Command;
use crate::error::EebusError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `"ee1.0"` — major 1, minor 0, the only protocol identifier this core
/// advertises or accepts (§6).
pub const SPEC_VERSION: &str = "ee1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CmdClassifier {
    Read,
    Reply,
    Notify,
    Write,
    Call,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub spec_version: String,
    pub src_addr: FeatureAddress,
    pub dest_addr: FeatureAddress,
    pub msg_counter: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_counter_ref: Option<u64>,
    pub cmd_classifier: CmdClassifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack_request: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Datagram {
    pub header: Header,
    pub commands: Vec<Command>,
}

impl Datagram {
    pub fn encode(&self) -> Result<Value, EebusError> {
        let header =
            serde_json::to_value(&self.header).map_err(|e| EebusError::Parse(e.to_string()))?;
        let cmd: Result<Vec<Value>, EebusError> =
            self.commands.iter().map(Command::encode).collect();
        Ok(serde_json::json!({
            "header": header,
            "payload": { "cmd": cmd? },
        }))
    }

    pub fn decode(value: &Value) -> Result<Self, EebusError> {
        let header_val = value
            .get("header")
            .ok_or_else(|| EebusError::Parse("datagram missing header".to_owned()))?;
        let header: Header =
            serde_json::from_value(header_val.clone()).map_err(|e| EebusError::Parse(e.to_string()))?;
        let payload = value
            .get("payload")
            .ok_or_else(|| EebusError::Parse("datagram missing payload".to_owned()))?;
        let cmd_arr = payload
            .get("cmd")
            .and_then(Value::as_array)
            .ok_or_else(|| EebusError::Parse("payload missing cmd array".to_owned()))?;
        let commands = cmd_arr
            .iter()
            .map(Command::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Datagram { header, commands })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{DestinationEntry, DestinationListData, FunctionData};

    fn addr(feature: u32) -> FeatureAddress {
        FeatureAddress {
            device: "dev-1".to_owned(),
            entity: vec![0],
            feature,
        }
    }

    #[test]
    fn datagram_round_trips_and_omits_absent_counter_ref() {
        let datagram = Datagram {
            header: Header {
                spec_version: SPEC_VERSION.to_owned(),
                src_addr: addr(0),
                dest_addr: addr(0),
                msg_counter: 7,
                msg_counter_ref: None,
                cmd_classifier: CmdClassifier::Read,
                ack_request: None,
            },
            commands: vec![Command::new(FunctionData::DestinationListData(
                DestinationListData {
                    entries: vec![DestinationEntry {
                        device_address: "dev-1".to_owned(),
                        ship_id: "ShipId-1".to_owned(),
                    }],
                },
            ))],
        };
        let encoded = datagram.encode().unwrap();
        assert!(encoded["header"].get("msg_counter_ref").is_none());
        let decoded = Datagram::decode(&encoded).unwrap();
        assert_eq!(decoded, datagram);
    }
}
