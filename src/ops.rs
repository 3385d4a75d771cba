//! Config operations: key lookup, listing, dotenv template generation, and
//! the result types callers display.

use std::fmt;
use std::path::PathBuf;

use toml::Value;

use crate::env;
use crate::error::LayerfigError;
use crate::resolve::Config;
use crate::schema::ConfigSchema;
use crate::types::ConfigAction;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A generated dotenv template.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A key's resolved value and its doc string.
    KeyValue {
        key: String,
        value: String,
        doc: Option<String>,
    },
    /// All resolved configuration key-value pairs.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template(t) => write!(f, "{t}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Config template written to {}", path.display())
            }
            ConfigResult::KeyValue { key, value, doc } => {
                if let Some(doc) = doc.as_deref().filter(|d| !d.is_empty()) {
                    writeln!(f, "# {doc}")?;
                }
                write!(f, "{key} = {value}")
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

impl Config {
    /// Handle a `ConfigAction` (list / gen / get).
    pub fn handle(&self, action: &ConfigAction) -> Result<ConfigResult, LayerfigError> {
        match action {
            ConfigAction::List => list_values(self),
            ConfigAction::Get { key } => get_value(self, key),
            ConfigAction::Gen { output } => {
                let prefix = self.env_prefix().unwrap_or("");
                let template = generate_env_template(self.schema(), prefix);
                match output {
                    Some(path) => {
                        if let Some(parent) = path.parent() {
                            std::fs::create_dir_all(parent).map_err(|e| LayerfigError::Io {
                                path: parent.to_path_buf(),
                                source: e,
                            })?;
                        }
                        std::fs::write(path, &template).map_err(|e| LayerfigError::Io {
                            path: path.clone(),
                            source: e,
                        })?;
                        Ok(ConfigResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(ConfigResult::Template(template)),
                }
            }
        }
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(&self, action: &ConfigAction) -> Result<(), LayerfigError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }
}

/// Resolve a key (leaf or subtree) for display, with the leaf's doc string.
pub fn get_value(config: &Config, key: &str) -> Result<ConfigResult, LayerfigError> {
    let value = config.get(key)?;
    Ok(ConfigResult::KeyValue {
        key: key.into(),
        value: format_value(&value),
        doc: config.schema().doc(key).map(str::to_string),
    })
}

/// List every resolved leaf as dotted key-value pairs.
pub fn list_values(config: &Config) -> Result<ConfigResult, LayerfigError> {
    let entries = config
        .list()?
        .into_iter()
        .map(|(key, value)| (key, format_value(&value)))
        .collect();
    Ok(ConfigResult::Listing { entries })
}

/// Render a documented dotenv file: one `# doc` line (when present) and one
/// `{PREFIX}KEY="default"` line per leaf. Lists are comma-joined, matching
/// how the env source splits them.
pub fn generate_env_template(schema: &ConfigSchema, prefix: &str) -> String {
    let mut out = String::new();
    for (key, entry) in schema.iter() {
        for line in entry.doc.lines() {
            out.push_str(&format!("# {line}\n"));
        }
        let value = env_literal(&entry.default).replace('\\', "\\\\").replace('"', "\\\"");
        out.push_str(&format!("{}=\"{value}\"\n", env::var_name(prefix, key)));
    }
    out
}

fn env_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(env_literal)
            .collect::<Vec<_>>()
            .join(","),
        other => format_value(other),
    }
}

/// Format a value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(a) => Value::Array(a.clone()).to_string(),
        Value::Table(t) => serde_json::to_string(t).unwrap_or_else(|_| format!("{t:?}")),
        Value::Datetime(d) => d.to_string(),
    }
}
