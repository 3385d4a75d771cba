//! Resolution engine: schema defaults overlaid by an ordered list of sources.
//!
//! Sources are held in **priority-ascending** order: the last source that has
//! a key supplies its value, and any source beats the schema default.
//!
//! ```text
//! Schema default
//!        ↑ overridden by
//! sources[0]
//!        ↑ overridden by
//! ...
//!        ↑ overridden by
//! sources[n - 1]
//! ```
//!
//! Nothing is cached: every `get` re-queries the sources, so an env source
//! sees the process environment as it is at call time.

use std::fmt;

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use crate::builder::ConfigBuilder;
use crate::coerce::coerce;
use crate::error::LayerfigError;
use crate::keys;
use crate::schema::{ConfigSchema, SchemaEntry};
use crate::source::{RawValue, Source};

/// Layered configuration: a schema plus its override sources.
pub struct Config {
    schema: ConfigSchema,
    sources: Vec<Box<dyn Source>>,
    env_prefix: Option<String>,
}

impl Config {
    /// Sources are given lowest priority first.
    pub fn new(schema: ConfigSchema, sources: Vec<Box<dyn Source>>) -> Self {
        Self {
            schema,
            sources,
            env_prefix: None,
        }
    }

    pub fn builder(schema: ConfigSchema) -> ConfigBuilder {
        ConfigBuilder::new(schema)
    }

    pub(crate) fn with_env_prefix(mut self, prefix: Option<String>) -> Self {
        self.env_prefix = prefix;
        self
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// Prefix of the env source added through the builder, if any.
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// Source names, lowest priority first.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve a dotted key.
    ///
    /// A leaf resolves to its coerced value. An intermediate node (`deeply`
    /// when `deeply.nested.config` exists) resolves to a table holding every
    /// leaf below it, each resolved the same way. Anything else is
    /// [`LayerfigError::UnknownKey`].
    pub fn get(&self, key: &str) -> Result<Value, LayerfigError> {
        if let Some(entry) = self.schema.entry(key) {
            return self.resolve_leaf(key, entry);
        }
        if self.schema.is_prefix(key) {
            return self.resolve_subtree(key).map(Value::Table);
        }
        Err(LayerfigError::UnknownKey(key.to_string()))
    }

    /// Resolve a key and deserialize it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, LayerfigError> {
        self.get(key)?
            .try_into()
            .map_err(|e: toml::de::Error| LayerfigError::Deserialize {
                key: key.to_string(),
                reason: e.message().to_string(),
            })
    }

    /// The whole configuration as one nested table.
    pub fn tree(&self) -> Result<Table, LayerfigError> {
        let mut table = Table::new();
        for (key, entry) in self.schema.iter() {
            keys::set_nested(&mut table, key, self.resolve_leaf(key, entry)?);
        }
        Ok(table)
    }

    /// Every leaf with its resolved value, sorted by key.
    pub fn list(&self) -> Result<Vec<(String, Value)>, LayerfigError> {
        self.schema
            .iter()
            .map(|(key, entry)| Ok((key.to_string(), self.resolve_leaf(key, entry)?)))
            .collect()
    }

    /// Name of the layer that supplies a leaf: a source name, or `"default"`.
    pub fn origin(&self, key: &str) -> Result<String, LayerfigError> {
        if !self.schema.contains(key) {
            return Err(LayerfigError::UnknownKey(key.to_string()));
        }
        Ok(self
            .winning(key)
            .map_or_else(|| "default".to_string(), |(source, _)| source.name()))
    }

    fn resolve_leaf(&self, key: &str, entry: &SchemaEntry) -> Result<Value, LayerfigError> {
        match self.winning(key) {
            Some((source, raw)) => {
                tracing::trace!(key, source = %source.name(), "resolved from source");
                coerce(key, entry.format, raw)
            }
            None => {
                tracing::trace!(key, "resolved from default");
                Ok(entry.default.clone())
            }
        }
    }

    fn resolve_subtree(&self, prefix: &str) -> Result<Table, LayerfigError> {
        let mut table = Table::new();
        for (key, entry) in self.schema.leaves_under(prefix) {
            let relative = &key[prefix.len() + 1..];
            keys::set_nested(&mut table, relative, self.resolve_leaf(key, entry)?);
        }
        Ok(table)
    }

    /// Highest-priority source holding `key`, with its raw value.
    fn winning(&self, key: &str) -> Option<(&dyn Source, RawValue)> {
        self.sources
            .iter()
            .rev()
            .find_map(|source| source.get_raw(key).map(|raw| (source.as_ref(), raw)))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("schema", &self.schema)
            .field("sources", &self.source_names())
            .field("env_prefix", &self.env_prefix)
            .finish()
    }
}
