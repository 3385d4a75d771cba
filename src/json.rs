//! JSON-file source.
//!
//! The file is parsed once, at construction, into a nested table held for the
//! source's lifetime. Lookups walk that table by dotted-path segments and hand
//! back natively typed values.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::error::LayerfigError;
use crate::file;
use crate::keys;
use crate::source::{RawValue, Source};
use crate::types::SearchPath;

/// Source backed by one JSON object file.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
    table: Table,
}

impl JsonSource {
    /// Read and parse `path`. A missing, unreadable or malformed file, or one
    /// whose top level is not an object, fails with [`LayerfigError::SourceRead`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LayerfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LayerfigError::SourceRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Build a source from JSON text. `path` is only used in messages.
    pub fn parse_str(path: impl AsRef<Path>, content: &str) -> Result<Self, LayerfigError> {
        Self::parse(path.as_ref(), content)
    }

    /// Open every `{dir}/{file_name}` that exists across `search_paths`.
    ///
    /// The result keeps search-path order, which is priority-ascending: push
    /// the sources onto a config in this order and later directories win.
    pub fn discover(
        search_paths: &[SearchPath],
        file_name: &str,
        app_name: &str,
    ) -> Result<Vec<Self>, LayerfigError> {
        file::load_config_files(search_paths, file_name, app_name)?
            .into_iter()
            .map(|(path, content)| Self::parse(&path, &content))
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(path: &Path, content: &str) -> Result<Self, LayerfigError> {
        let table = parse_object(content).map_err(|reason| LayerfigError::SourceRead {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), keys = table.len(), "loaded JSON source");
        Ok(Self {
            path: path.to_path_buf(),
            table,
        })
    }
}

impl Source for JsonSource {
    fn name(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn get_raw(&self, key: &str) -> Option<RawValue> {
        keys::table_get(&self.table, key).map(|v| RawValue::Typed(v.clone()))
    }
}

/// Parse JSON text whose top level must be an object into a `toml::Table`.
///
/// Object members set to `null` are dropped; `null` inside an array is an error.
pub(crate) fn parse_object(content: &str) -> Result<Table, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    match value {
        serde_json::Value::Object(map) => object_to_table(map),
        other => Err(format!("expected a JSON object at the top level, found {other}")),
    }
}

fn object_to_table(map: serde_json::Map<String, serde_json::Value>) -> Result<Table, String> {
    let mut table = Table::new();
    for (key, value) in map {
        if let Some(v) = json_to_toml(value)? {
            table.insert(key, v);
        }
    }
    Ok(table)
}

fn json_to_toml(value: serde_json::Value) -> Result<Option<Value>, String> {
    use serde_json::Value as Json;

    let converted = match value {
        Json::Null => return Ok(None),
        Json::Bool(b) => Value::Boolean(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().ok_or_else(|| format!("unsupported number {n}"))?),
        },
        Json::String(s) => Value::String(s),
        Json::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(json_to_toml(item)?.ok_or("null is not allowed inside an array")?);
            }
            Value::Array(out)
        }
        Json::Object(map) => Value::Table(object_to_table(map)?),
    };
    Ok(Some(converted))
}
