mod query;

pub use query::encode_query;

use std::borrow::Cow;

use serde_json::Value;

use crate::annotation::Annotation;
use crate::error::{MapSnapError, Result};

/// A request field after it has been mapped to one of the encoding rules
/// the snapshot service understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue<'a> {
    Text(Cow<'a, str>),
    Integer(i64),
    Number(f64),
    /// Sent as `1` or `0`.
    Flag(bool),
    /// The canonical string of an enum variant.
    Variant(&'static str),
    /// Comma-joined when rendered.
    List(Vec<String>),
    /// Rendered as a JSON array of per-annotation objects.
    Annotations(&'a [Annotation]),
    /// Any other structured value, rendered as compact JSON.
    Json(Value),
}

impl ParamValue<'_> {
    pub fn text(value: impl std::fmt::Display) -> Self {
        ParamValue::Text(Cow::Owned(value.to_string()))
    }

    /// Renders the value as the exact string placed in the query.
    pub fn render(&self) -> Result<String> {
        match self {
            ParamValue::Text(text) => Ok(text.to_string()),
            ParamValue::Integer(value) => Ok(value.to_string()),
            ParamValue::Number(value) => {
                if !value.is_finite() {
                    return Err(MapSnapError::Serialization(format!(
                        "{value} cannot be sent as a number"
                    )));
                }
                Ok(value.to_string())
            }
            ParamValue::Flag(flag) => Ok(if *flag { "1" } else { "0" }.to_string()),
            ParamValue::Variant(value) => Ok(value.to_string()),
            ParamValue::List(items) => Ok(items.join(",")),
            ParamValue::Annotations(annotations) => {
                let objects = annotations
                    .iter()
                    .map(|annotation| annotation.to_json().map(Value::Object))
                    .collect::<Result<Vec<_>>>()?;
                Ok(serde_json::to_string(&objects)?)
            }
            ParamValue::Json(value) => Ok(serde_json::to_string(value)?),
        }
    }

    /// Converts the value into a JSON scalar for embedding inside an
    /// annotation object.
    pub fn to_json(&self) -> Result<Value> {
        match self {
            ParamValue::Integer(value) => Ok(Value::from(*value)),
            ParamValue::Number(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .ok_or_else(|| {
                    MapSnapError::Serialization(format!("{value} cannot be sent as a number"))
                }),
            ParamValue::Flag(flag) => Ok(Value::from(u8::from(*flag))),
            ParamValue::Json(value) => Ok(value.clone()),
            ParamValue::Annotations(_) => Err(MapSnapError::Serialization(
                "annotations cannot be nested".into(),
            )),
            other => Ok(Value::String(other.render()?)),
        }
    }
}
