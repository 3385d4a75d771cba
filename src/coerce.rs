//! Convert a source's raw value into the native type a leaf declares.
//!
//! | format   | text (env)                         | typed (JSON, overrides) |
//! |----------|------------------------------------|-------------------------|
//! | `string` | as is                              | must be a string        |
//! | `int`    | base-10 `i64`                      | must be an integer      |
//! | `float`  | decimal `f64`                      | integer or float        |
//! | `bool`   | `true`/`false`, any ASCII case     | must be a boolean       |
//! | `list`   | split on `,`, pieces kept verbatim | must be an array        |
//!
//! Schema defaults never pass through here.

use toml::Value;

use crate::error::LayerfigError;
use crate::source::RawValue;
use crate::types::Format;

pub fn coerce(key: &str, format: Format, raw: RawValue) -> Result<Value, LayerfigError> {
    let coerced = match &raw {
        RawValue::Text(text) => parse_text(format, text),
        RawValue::Typed(value) => check_typed(format, value),
    };
    coerced.ok_or_else(|| LayerfigError::Coercion {
        key: key.to_string(),
        format,
        raw: raw.to_string(),
    })
}

fn parse_text(format: Format, text: &str) -> Option<Value> {
    match format {
        Format::String => Some(Value::String(text.to_string())),
        Format::Int => text.parse::<i64>().ok().map(Value::Integer),
        Format::Float => text.parse::<f64>().ok().map(Value::Float),
        Format::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Some(Value::Boolean(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Value::Boolean(false))
            } else {
                None
            }
        }
        Format::List => Some(Value::Array(
            text.split(',')
                .map(|piece| Value::String(piece.to_string()))
                .collect(),
        )),
    }
}

fn check_typed(format: Format, value: &Value) -> Option<Value> {
    match (format, value) {
        (Format::Float, Value::Integer(i)) => Some(Value::Float(*i as f64)),
        (format, value) if format.accepts(value) => Some(value.clone()),
        _ => None,
    }
}
