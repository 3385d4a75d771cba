use std::path::PathBuf;
use thiserror::Error;

use crate::types::Format;

#[derive(Debug, Error)]
pub enum LayerfigError {
    #[error("Unknown key '{0}': not a schema leaf or a prefix of one")]
    UnknownKey(String),

    #[error("Cannot read '{key}' as {format}: got {raw}")]
    Coercion {
        key: String,
        format: Format,
        raw: String,
    },

    #[error("Cannot deserialize '{key}': {reason}")]
    Deserialize { key: String, reason: String },

    #[error("Failed to load source {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },

    #[error("Invalid schema key '{key}': {reason}")]
    InvalidSchema { key: String, reason: String },

    #[error("Failed to parse schema {path}: {reason}")]
    SchemaParse { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Path not found in tree: {0}")]
    PathNotFound(String),

    #[error("App name is required to search for config files: call .app_name() on the builder")]
    AppNameRequired,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_names_key_format_and_raw() {
        let err = LayerfigError::Coercion {
            key: "integer".into(),
            format: Format::Int,
            raw: "\"abc\"".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("integer"));
        assert!(msg.contains("int"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn unknown_key_formats() {
        let err = LayerfigError::UnknownKey("deeply.missing".into());
        assert!(err.to_string().contains("deeply.missing"));
    }

    #[test]
    fn app_name_required_formats() {
        let err = LayerfigError::AppNameRequired;
        assert!(err.to_string().contains("app_name"));
    }

    #[test]
    fn source_read_includes_path() {
        let err = LayerfigError::SourceRead {
            path: "/tmp/project/config.json".into(),
            reason: "expected value at line 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("config.json"));
        assert!(msg.contains("line 1"));
    }
}
