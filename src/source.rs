//! The `Source` capability and the in-memory override source.
//!
//! A source answers one question: "do you have a raw value for this dotted
//! key?". It never sees the schema and never coerces; the resolver does both.
//! New kinds of source plug in by implementing [`Source`].

use std::fmt;

use toml::Value;

/// An uncoerced value as a source hands it over.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Text from an environment-like source, parsed according to the leaf's format.
    Text(String),
    /// A natively typed value (JSON, programmatic overrides) that must already
    /// match the leaf's format.
    Typed(Value),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s:?}"),
            RawValue::Typed(v) => write!(f, "{v}"),
        }
    }
}

/// A read-only provider of override values.
pub trait Source: Send + Sync {
    /// Human-readable label used in logs and by [`Config::origin`](crate::Config::origin).
    fn name(&self) -> String;

    /// The raw value stored for `key`, if this source has one.
    fn get_raw(&self, key: &str) -> Option<RawValue>;

    /// Whether this source has a value for `key`.
    fn has(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }
}

/// Programmatic overrides keyed by dotted path.
///
/// Values are typed and must match the leaf format like JSON values do.
/// If the same key is set twice, the last value wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideSource {
    entries: Vec<(String, Value)>,
}

impl OverrideSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override. `None` is ignored, which suits optional CLI arguments.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(v) = value {
            self.entries.push((key.to_string(), v.into()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Source for OverrideSource {
    fn name(&self) -> String {
        "overrides".into()
    }

    fn get_raw(&self, key: &str) -> Option<RawValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| RawValue::Typed(v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_some_added() {
        let mut src = OverrideSource::new();
        src.set("integer", Some(3000i64));
        assert!(src.has("integer"));
        assert_eq!(src.get_raw("integer"), Some(RawValue::Typed(Value::Integer(3000))));
    }

    #[test]
    fn override_none_skipped() {
        let mut src = OverrideSource::new();
        src.set::<i64>("integer", None);
        assert!(src.is_empty());
        assert!(!src.has("integer"));
    }

    #[test]
    fn last_override_wins() {
        let mut src = OverrideSource::new();
        src.set("string", Some("first"));
        src.set("string", Some("second"));
        assert_eq!(
            src.get_raw("string"),
            Some(RawValue::Typed(Value::String("second".into())))
        );
    }

    #[test]
    fn raw_text_displays_quoted() {
        assert_eq!(RawValue::Text("abc".into()).to_string(), "\"abc\"");
        assert_eq!(RawValue::Typed(Value::Integer(1)).to_string(), "1");
    }
}
