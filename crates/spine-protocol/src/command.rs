//! A single command: `{function-specific-key: function-data}` (§4.3: "each
//! command carries exactly one typed function data value tagged by a
//! FunctionType enumeration").

use crate::error::EebusError;
use crate::function::{FunctionData, FunctionType};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub data: FunctionData,
}

impl Command {
    pub fn new(data: FunctionData) -> Self {
        Command { data }
    }

    pub fn encode(&self) -> Result<Value, EebusError> {
        let key = self.data.function_type().wire_key();
        let inner = match &self.data {
            // Bypass the untagged derive here: its struct shape would wrap
            // the opaque payload as `{"key":...,"value":...}` instead of
            // reproducing the bare value the wire key was decoded from.
            FunctionData::Other { value, .. } => value.clone(),
            other => serde_json::to_value(other).map_err(|e| EebusError::Parse(e.to_string()))?,
        };
        let mut obj = serde_json::Map::new();
        obj.insert(key, inner);
        Ok(Value::Object(obj))
    }

    pub fn decode(value: &Value) -> Result<Self, EebusError> {
        let obj = value
            .as_object()
            .ok_or_else(|| EebusError::Parse("command must be an object".to_owned()))?;
        if obj.len() != 1 {
            return Err(EebusError::Parse(
                "command must carry exactly one function-data key".to_owned(),
            ));
        }
        let (key, inner) = obj.iter().next().expect("len checked above");
        let function_type = FunctionType::from_wire_key(key);
        let data = decode_function_data(&function_type, inner)?;
        Ok(Command { data })
    }
}

fn decode_function_data(function_type: &FunctionType, inner: &Value) -> Result<FunctionData, EebusError> {
    use crate::function::*;
    let parse = |v: &Value| -> Result<_, EebusError> {
        serde_json::from_value(v.clone()).map_err(|e| EebusError::Parse(e.to_string()))
    };
    Ok(match function_type {
        FunctionType::NodeManagementDetailedDiscoveryData => {
            FunctionData::DetailedDiscoveryData(parse(inner)?)
        }
        FunctionType::NodeManagementSubscriptionData => FunctionData::SubscriptionData(parse(inner)?),
        FunctionType::NodeManagementSubscriptionRequestCall => {
            FunctionData::SubscriptionRequestCall(parse(inner)?)
        }
        FunctionType::NodeManagementSubscriptionDeleteCall => {
            FunctionData::SubscriptionDeleteCall(parse(inner)?)
        }
        FunctionType::NodeManagementBindingData => FunctionData::BindingData(parse(inner)?),
        FunctionType::NodeManagementBindingRequestCall => {
            FunctionData::BindingRequestCall(parse(inner)?)
        }
        FunctionType::NodeManagementBindingDeleteCall => {
            FunctionData::BindingDeleteCall(parse(inner)?)
        }
        FunctionType::NodeManagementUseCaseData => FunctionData::UseCaseData(parse(inner)?),
        FunctionType::NodeManagementDestinationListData => {
            FunctionData::DestinationListData(parse(inner)?)
        }
        FunctionType::ResultData => FunctionData::ResultData(parse(inner)?),
        FunctionType::Other(key) => FunctionData::Other { key: key.clone(), value: inner.clone() },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{DestinationEntry, DestinationListData};

    #[test]
    fn destination_list_round_trips_under_its_wire_key() {
        let cmd = Command::new(FunctionData::DestinationListData(DestinationListData {
            entries: vec![DestinationEntry {
                device_address: "dev-1".to_owned(),
                ship_id: "ShipId-1".to_owned(),
            }],
        }));
        let encoded = cmd.encode().unwrap();
        assert!(encoded.get("nodeManagementDestinationListData").is_some());
        let decoded = Command::decode(&encoded).unwrap();
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn unknown_function_type_round_trips_as_opaque_json() {
        let value = serde_json::json!({"measurementListData": {"measurement": []}});
        let decoded = Command::decode(&value).unwrap();
        assert!(matches!(&decoded.data, FunctionData::Other { key, .. } if key == "measurementListData"));
        let re_encoded = decoded.encode().unwrap();
        assert_eq!(re_encoded, value);
    }
}
