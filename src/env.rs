//! Environment-variable source with `.env` file loading.
//!
//! Presence is exact: a variable that is set, whatever its bytes, answers the
//! lookup. Values that are not valid UTF-8 are handed over lossily and fail
//! coercion instead of being skipped.

use std::collections::HashMap;
use std::path::Path;

use crate::error::LayerfigError;
use crate::source::{RawValue, Source};

/// File name looked up by [`EnvSource::new`].
pub const DOTENV_FILE: &str = ".env";

/// Source backed by environment variables named `{PREFIX}{KEY}`.
///
/// The dotted key is upper-cased and its dots become underscores:
/// with prefix `TEST_CONF_`, `deeply.nested.config` reads
/// `TEST_CONF_DEEPLY_NESTED_CONFIG`. The prefix is used as given.
///
/// Values are handed over as text; the resolver parses them per the leaf's
/// format.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    vars: Vars,
}

#[derive(Debug, Clone)]
enum Vars {
    /// Read the process environment on every lookup.
    Process,
    /// A fixed set of variables, for callers that don't want process access.
    Snapshot(HashMap<String, String>),
}

impl EnvSource {
    /// Load `{dir}/.env` into the process environment, then read from it.
    ///
    /// A missing `.env` file is fine. Variables already set in the environment
    /// are never overwritten by the file. A malformed file fails with
    /// [`LayerfigError::SourceRead`].
    ///
    /// Loading mutates the process environment: construct env sources from one
    /// thread at a time.
    pub fn new(prefix: &str, dir: impl AsRef<Path>) -> Result<Self, LayerfigError> {
        Self::with_file_name(prefix, dir, DOTENV_FILE)
    }

    /// Like [`new`](Self::new) with a dotenv file name other than `.env`.
    pub fn with_file_name(
        prefix: &str,
        dir: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<Self, LayerfigError> {
        let path = dir.as_ref().join(file_name);
        load_dotenv(&path)?;
        Ok(Self {
            prefix: prefix.to_string(),
            vars: Vars::Process,
        })
    }

    /// Build a source over a fixed set of variables. No file is read and the
    /// process environment is not consulted.
    ///
    /// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
    pub fn from_vars(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            prefix: prefix.to_string(),
            vars: Vars::Snapshot(vars.into_iter().collect()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Environment variable name for a dotted key.
    pub fn var_name(&self, key: &str) -> String {
        var_name(&self.prefix, key)
    }
}

/// `{prefix}` followed by `key` upper-cased with `.` replaced by `_`.
pub fn var_name(prefix: &str, key: &str) -> String {
    format!("{prefix}{}", key.to_uppercase().replace('.', "_"))
}

impl Source for EnvSource {
    fn name(&self) -> String {
        format!("env:{}", self.prefix)
    }

    fn get_raw(&self, key: &str) -> Option<RawValue> {
        let name = self.var_name(key);
        let value = match &self.vars {
            Vars::Process => std::env::var_os(&name).map(|os| {
                os.into_string()
                    .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
            }),
            Vars::Snapshot(map) => map.get(&name).cloned(),
        };
        value.map(RawValue::Text)
    }
}

fn load_dotenv(path: &Path) -> Result<(), LayerfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "loaded dotenv file");
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::trace!(path = %path.display(), "no dotenv file");
            Ok(())
        }
        Err(e) => Err(LayerfigError::SourceRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
