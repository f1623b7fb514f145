//! Helpers for the SHIP wire shape: a JSON object with exactly one key
//! (the variant name) whose value is an array of single-key objects, one
//! per field. Optional-absent fields are simply missing entries rather
//! than `null`, and field order in the emitted array always matches the
//! order fields are pushed here — matching the byte-stable encoding rule.

use crate::error::ShipCodecError;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Builder for the array-of-single-key-objects shape.
#[derive(Default)]
pub struct FieldArrayBuilder {
    entries: Vec<Value>,
}

impl FieldArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a field; a `None` value is simply omitted.
    pub fn push(mut self, key: &str, value: Option<Value>) -> Self {
        if let Some(v) = value {
            let mut obj = Map::new();
            obj.insert(key.to_owned(), v);
            self.entries.push(Value::Object(obj));
        }
        self
    }

    pub fn push_required(self, key: &str, value: Value) -> Self {
        self.push(key, Some(value))
    }

    pub fn finish(self) -> Value {
        Value::Array(self.entries)
    }
}

/// Parse an array-of-single-key-objects `Value` into a lookup table.
///
/// Rejects anything that isn't an array of objects each carrying exactly
/// one key. Later duplicate keys overwrite earlier ones.
pub fn parse_field_array(value: &Value) -> Result<HashMap<String, Value>, ShipCodecError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ShipCodecError::Malformed("variant payload must be an array".to_owned()))?;

    let mut map = HashMap::with_capacity(arr.len());
    for entry in arr {
        let obj = entry.as_object().ok_or_else(|| {
            ShipCodecError::Malformed("array entry must be an object".to_owned())
        })?;
        if obj.len() != 1 {
            return Err(ShipCodecError::Malformed(
                "array entry must carry exactly one field".to_owned(),
            ));
        }
        let (k, v) = obj.iter().next().expect("len checked above");
        map.insert(k.clone(), v.clone());
    }
    Ok(map)
}

pub fn take_required(
    fields: &mut HashMap<String, Value>,
    key: &'static str,
) -> Result<Value, ShipCodecError> {
    fields.remove(key).ok_or(ShipCodecError::MissingField(key))
}

pub fn take_optional(fields: &mut HashMap<String, Value>, key: &str) -> Option<Value> {
    fields.remove(key)
}

pub fn as_str_enum<'a>(
    field: &'static str,
    value: &'a Value,
) -> Result<&'a str, ShipCodecError> {
    value
        .as_str()
        .ok_or_else(|| ShipCodecError::InvalidEnumValue {
            field,
            value: value.to_string(),
        })
}
