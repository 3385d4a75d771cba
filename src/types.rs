use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use toml::Value;

/// Value format a schema leaf declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    String,
    Int,
    Float,
    Bool,
    List,
}

impl Format {
    /// Infer the format of an already-typed value. Tables and datetimes have none.
    pub fn of(value: &Value) -> Option<Format> {
        match value {
            Value::String(_) => Some(Format::String),
            Value::Integer(_) => Some(Format::Int),
            Value::Float(_) => Some(Format::Float),
            Value::Boolean(_) => Some(Format::Bool),
            Value::Array(_) => Some(Format::List),
            Value::Table(_) | Value::Datetime(_) => None,
        }
    }

    /// Whether `value` is a valid native value for this format.
    /// Integers are accepted where a float is declared.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Format::String, Value::String(_))
                | (Format::Int, Value::Integer(_))
                | (Format::Float, Value::Float(_) | Value::Integer(_))
                | (Format::Bool, Value::Boolean(_))
                | (Format::List, Value::Array(_))
        )
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::String => "string",
            Format::Int => "int",
            Format::Float => "float",
            Format::Bool => "bool",
            Format::List => "list",
        };
        f.write_str(name)
    }
}

/// Where to search for config files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit absolute path.
    Path(PathBuf),
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    List,
    Gen { output: Option<PathBuf> },
    Get { key: String },
}
