//! Schema: every recognized key, its documentation, format and default.
//!
//! Keys are stored flat, by full dotted path, in a sorted map. Intermediate
//! nodes (`deeply`, `deeply.nested`) are never stored; they are answered by a
//! range scan over the keys that start with `"{prefix}."`, which are contiguous
//! in sorted order.
//!
//! A schema can be built from code, parsed from a TOML or JSON declaration
//! (`{ "<dotted.key>": { doc, format, default } }`), or derived from a
//! confique struct.

use std::collections::BTreeMap;
use std::path::Path;

use confique::meta::{FieldKind, Meta};
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::error::LayerfigError;
use crate::json;
use crate::keys;
use crate::types::Format;

/// Descriptor of one schema leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(default)]
    pub doc: String,
    pub format: Format,
    pub default: Value,
}

impl SchemaEntry {
    pub fn new(doc: &str, format: Format, default: impl Into<Value>) -> Self {
        Self {
            doc: doc.to_string(),
            format,
            default: default.into(),
        }
    }
}

/// Immutable set of schema leaves keyed by dotted path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    entries: BTreeMap<String, SchemaEntry>,
}

impl ConfigSchema {
    /// Build a schema from `(dotted key, entry)` pairs.
    ///
    /// Fails with [`LayerfigError::InvalidSchema`] when a key is malformed,
    /// declared twice, is both a leaf and a prefix of another leaf, or has a
    /// default that does not match its format. Integer defaults declared as
    /// `float` are widened.
    pub fn new<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, SchemaEntry)>,
    ) -> Result<Self, LayerfigError> {
        let mut map = BTreeMap::new();
        for (key, mut entry) in entries {
            let key = key.into();
            keys::validate_key(&key).map_err(|reason| invalid(&key, reason))?;

            if !entry.format.accepts(&entry.default) {
                let reason = format!(
                    "default {} is not a valid {}",
                    entry.default, entry.format
                );
                return Err(invalid(&key, reason));
            }
            if let (Format::Float, Value::Integer(i)) = (entry.format, &entry.default) {
                entry.default = Value::Float(*i as f64);
            }

            if map.insert(key.clone(), entry).is_some() {
                return Err(invalid(&key, "declared more than once".into()));
            }
        }

        let schema = Self { entries: map };
        for key in schema.entries.keys() {
            if let Some((nested, _)) = schema.leaves_under(key).next() {
                return Err(invalid(
                    key,
                    format!("is a leaf but also the parent of '{nested}'"),
                ));
            }
        }
        Ok(schema)
    }

    /// Parse a TOML declaration.
    ///
    /// Dotted keys may be written quoted (`["deeply.nested.config"]`) or as
    /// nested tables (`[deeply.nested.config]`); any table with a `format`
    /// key is taken as a leaf.
    pub fn from_toml_str(content: &str) -> Result<Self, LayerfigError> {
        Self::parse_toml(content, Path::new("<toml>"))
    }

    /// Parse a JSON declaration. Same shape as [`from_toml_str`](Self::from_toml_str).
    pub fn from_json_str(content: &str) -> Result<Self, LayerfigError> {
        Self::parse_json(content, Path::new("<json>"))
    }

    /// Load a declaration file, picking the parser by extension (`.toml` or `.json`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LayerfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LayerfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::parse_toml(&content, path),
            Some("json") => Self::parse_json(&content, path),
            _ => Err(LayerfigError::SchemaParse {
                path: path.to_path_buf(),
                reason: "expected a .toml or .json file".into(),
            }),
        }
    }

    /// Derive a schema from a confique config struct.
    ///
    /// Defaults come from confique's default loading, docs from the struct's
    /// `///` comments and formats from the type of each default. Every leaf
    /// must have a default; `Option` fields without one are rejected.
    pub fn from_config<C>() -> Result<Self, LayerfigError>
    where
        C: confique::Config + Serialize,
    {
        let config = C::builder().load()?;
        let defaults = match Value::try_from(&config) {
            Ok(Value::Table(table)) => table,
            Ok(_) => return Err(invalid("<root>", "config did not serialize to a table".into())),
            Err(e) => return Err(invalid("<root>", e.to_string())),
        };
        let defaults: BTreeMap<String, Value> =
            keys::flatten_table(&defaults).into_iter().collect();

        let mut entries = Vec::new();
        for (key, doc) in meta_leaves(&C::META) {
            let default = defaults
                .get(&key)
                .cloned()
                .ok_or_else(|| invalid(&key, "field has no default value".into()))?;
            let format = Format::of(&default)
                .ok_or_else(|| invalid(&key, format!("unsupported default {default}")))?;
            entries.push((key, SchemaEntry { doc, format, default }));
        }
        Self::new(entries)
    }

    /// The leaf declared at exactly `key`.
    pub fn entry(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.get(key)
    }

    /// Whether `key` is a declared leaf.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` is an intermediate node, i.e. a strict prefix of some leaf.
    pub fn is_prefix(&self, key: &str) -> bool {
        self.leaves_under(key).next().is_some()
    }

    /// Doc string of a leaf.
    pub fn doc(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.doc.as_str())
    }

    /// All leaf keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All leaves, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Leaves strictly below `prefix`, sorted by key.
    pub fn leaves_under<'a>(
        &'a self,
        prefix: &str,
    ) -> impl Iterator<Item = (&'a str, &'a SchemaEntry)> + use<'a> {
        let start = format!("{prefix}.");
        self.entries
            .range(start.clone()..)
            .take_while(move |(k, _)| k.starts_with(&start))
            .map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self, LayerfigError> {
        let table: Table = toml::from_str(content).map_err(|e| LayerfigError::SchemaParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_declaration(&table, path)
    }

    fn parse_json(content: &str, path: &Path) -> Result<Self, LayerfigError> {
        let table = json::parse_object(content).map_err(|reason| LayerfigError::SchemaParse {
            path: path.to_path_buf(),
            reason,
        })?;
        Self::from_declaration(&table, path)
    }

    fn from_declaration(table: &Table, path: &Path) -> Result<Self, LayerfigError> {
        let mut entries = Vec::new();
        collect_declared(table, "", path, &mut entries)?;
        Self::new(entries)
    }
}

fn collect_declared(
    table: &Table,
    prefix: &str,
    path: &Path,
    out: &mut Vec<(String, SchemaEntry)>,
) -> Result<(), LayerfigError> {
    for (key, value) in table {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let Value::Table(body) = value else {
            return Err(LayerfigError::SchemaParse {
                path: path.to_path_buf(),
                reason: format!("'{dotted}' must be a table with doc, format and default"),
            });
        };

        if body.contains_key("format") {
            let entry: SchemaEntry = Value::Table(body.clone()).try_into().map_err(
                |e: toml::de::Error| LayerfigError::SchemaParse {
                    path: path.to_path_buf(),
                    reason: format!("'{dotted}': {}", e.message()),
                },
            )?;
            out.push((dotted, entry));
        } else {
            collect_declared(body, &dotted, path, out)?;
        }
    }
    Ok(())
}

/// Collect `(dotted key, doc)` for every leaf field of a confique `Meta` tree.
fn meta_leaves(meta: &Meta) -> Vec<(String, String)> {
    let mut leaves = Vec::new();
    collect_meta(meta, "", &mut leaves);
    leaves
}

fn collect_meta(meta: &Meta, prefix: &str, out: &mut Vec<(String, String)>) {
    for field in meta.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Leaf { .. } => {
                let doc: Vec<&str> = field.doc.iter().map(|line| line.trim()).collect();
                out.push((dotted, doc.join(" ")));
            }
            FieldKind::Nested { meta, .. } => collect_meta(meta, &dotted, out),
        }
    }
}

fn invalid(key: &str, reason: String) -> LayerfigError {
    LayerfigError::InvalidSchema {
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{UnsetConfig, WebConfig, reference_schema};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reference_schema_has_all_leaves() {
        let schema = reference_schema();
        assert_eq!(schema.len(), 8);
        assert!(schema.contains("deeply.nested.configtwo"));
        assert!(!schema.contains("deeply"));
    }

    #[test]
    fn intermediate_nodes_are_prefixes() {
        let schema = reference_schema();
        assert!(schema.is_prefix("deeply"));
        assert!(schema.is_prefix("deeply.nested"));
        assert!(schema.is_prefix("nested"));
        assert!(!schema.is_prefix("deep"));
        assert!(!schema.is_prefix("deeply.nested.config"));
        assert!(!schema.is_prefix("string"));
    }

    #[test]
    fn leaves_under_stays_inside_prefix() {
        let schema = reference_schema();
        let keys: Vec<&str> = schema.leaves_under("deeply").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["deeply.nested.config", "deeply.nested.configtwo"]);
    }

    #[test]
    fn rejects_malformed_key() {
        let err = ConfigSchema::new([("a..b", SchemaEntry::new("", Format::Int, 1))]).unwrap_err();
        assert!(matches!(err, LayerfigError::InvalidSchema { .. }));
    }

    #[test]
    fn rejects_default_of_wrong_type() {
        let err =
            ConfigSchema::new([("port", SchemaEntry::new("", Format::Int, "8080"))]).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn rejects_leaf_that_is_also_a_parent() {
        let err = ConfigSchema::new([
            ("a", SchemaEntry::new("", Format::String, "x")),
            ("a.b", SchemaEntry::new("", Format::String, "y")),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn sibling_with_shared_stem_is_not_a_conflict() {
        let schema = ConfigSchema::new([
            ("a", SchemaEntry::new("", Format::String, "x")),
            ("a-b.c", SchemaEntry::new("", Format::String, "y")),
            ("ab", SchemaEntry::new("", Format::String, "z")),
        ])
        .unwrap();
        assert!(!schema.is_prefix("a"));
    }

    #[test]
    fn integer_default_widened_for_float() {
        let schema = ConfigSchema::new([("rate", SchemaEntry::new("", Format::Float, 2))]).unwrap();
        assert_eq!(schema.entry("rate").unwrap().default, Value::Float(2.0));
    }

    #[test]
    fn parses_toml_quoted_and_nested_keys() {
        let schema = ConfigSchema::from_toml_str(
            r#"
            [string]
            doc = "String config"
            format = "string"
            default = "DEFAULT"

            ["nested.config"]
            format = "int"
            default = 3

            [deeply.nested.config]
            doc = "deeply nested"
            format = "list"
            default = ["a", "b"]
            "#,
        )
        .unwrap();
        assert_eq!(schema.doc("string"), Some("String config"));
        assert_eq!(schema.doc("nested.config"), Some(""));
        assert_eq!(schema.entry("nested.config").unwrap().format, Format::Int);
        assert_eq!(
            schema.entry("deeply.nested.config").unwrap().format,
            Format::List
        );
    }

    #[test]
    fn parses_json_declaration() {
        let schema = ConfigSchema::from_json_str(
            r#"{
                "bool": {"doc": "Bool config", "format": "bool", "default": true},
                "float": {"doc": "Float config", "format": "float", "default": 1.1}
            }"#,
        )
        .unwrap();
        assert_eq!(schema.entry("bool").unwrap().default, Value::Boolean(true));
        assert_eq!(schema.entry("float").unwrap().default, Value::Float(1.1));
    }

    #[test]
    fn json_declaration_with_unknown_format_fails() {
        let err = ConfigSchema::from_json_str(
            r#"{"x": {"format": "date", "default": "2024-01-01"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LayerfigError::SchemaParse { .. }));
    }

    #[test]
    fn json_declaration_with_null_default_fails() {
        let err =
            ConfigSchema::from_json_str(r#"{"x": {"format": "string", "default": null}}"#)
                .unwrap_err();
        assert!(err.to_string().contains("x"));
    }

    #[test]
    fn declaration_leaf_must_be_table() {
        let err = ConfigSchema::from_toml_str("port = 8080\n").unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn from_path_picks_parser_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(
            &path,
            r#"{"name": {"doc": "Name", "format": "string", "default": "app"}}"#,
        )
        .unwrap();
        let schema = ConfigSchema::from_path(&path).unwrap();
        assert_eq!(schema.doc("name"), Some("Name"));

        let other = dir.path().join("schema.yaml");
        fs::write(&other, "name: x").unwrap();
        assert!(matches!(
            ConfigSchema::from_path(&other),
            Err(LayerfigError::SchemaParse { .. })
        ));
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = ConfigSchema::from_path(dir.path().join("nope.toml"));
        assert!(matches!(result, Err(LayerfigError::Io { .. })));
    }

    #[test]
    fn derives_schema_from_confique_struct() {
        let schema = ConfigSchema::from_config::<WebConfig>().unwrap();
        let port = schema.entry("port").unwrap();
        assert_eq!(port.format, Format::Int);
        assert_eq!(port.default, Value::Integer(8080));
        assert_eq!(port.doc, "The port number.");

        let hosts = schema.entry("database.replicas").unwrap();
        assert_eq!(hosts.format, Format::List);
        assert_eq!(
            schema.entry("database.timeout").unwrap().format,
            Format::Float
        );
        assert!(schema.is_prefix("database"));
    }

    #[test]
    fn confique_field_without_default_is_rejected() {
        let err = ConfigSchema::from_config::<UnsetConfig>().unwrap_err();
        assert!(err.to_string().contains("url"));
    }
}
