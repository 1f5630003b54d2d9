use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::{error_info, ErrorInfo, ErrorInfoContext};

pub trait EasyJson {
    fn json(&self) -> Result<String, ErrorInfo>;
    fn json_or(&self) -> String;
    fn json_sorted_pretty(&self) -> Result<String, ErrorInfo>;
}

pub trait EasyJsonDeser {
    fn json_from<'a, T: serde::Deserialize<'a>>(&'a self) -> Result<T, ErrorInfo>;
}

impl EasyJsonDeser for String {
    fn json_from<'a, T: serde::Deserialize<'a>>(&'a self) -> Result<T, ErrorInfo> {
        json_from(self)
    }
}

impl EasyJsonDeser for str {
    fn json_from<'a, T: serde::Deserialize<'a>>(&'a self) -> Result<T, ErrorInfo> {
        json_from(self)
    }
}

impl<T> EasyJson for T
where T: Serialize {
    fn json(&self) -> Result<String, ErrorInfo> {
        json(&self)
    }

    fn json_or(&self) -> String {
        json_or(&self)
    }

    fn json_sorted_pretty(&self) -> Result<String, ErrorInfo> {
        json_sorted_pretty(&self)
    }
}

pub fn json<T: Serialize>(t: &T) -> Result<String, ErrorInfo> {
    serde_json::to_string(&t).map_err(|e| error_info(format!("serde json ser error: {:?}", e)))
}

pub fn json_or<T: Serialize>(t: &T) -> String {
    json(t).unwrap_or("json ser failure of error".to_string())
}

pub fn json_from<'a, T: serde::Deserialize<'a>>(t: &'a str) -> Result<T, ErrorInfo> {
    serde_json::from_str(t).map_err(|e| error_info(format!("serde json deser error: {:?}", e)))
}

/// Human formatted output with object keys sorted and a four space indent.
pub fn json_sorted_pretty<T: Serialize>(t: &T) -> Result<String, ErrorInfo> {
    let value = serde_json::to_value(t).error_info("serde json value conversion error")?;
    let value = sort_keys(value);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).error_info("serde json ser error")?;
    String::from_utf8(buf).error_info("json utf8 decode error")
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries = map.into_iter().collect::<Vec<(String, Value)>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
