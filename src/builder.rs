use std::path::PathBuf;

use toml::Value;

use crate::env::EnvSource;
use crate::error::LayerfigError;
use crate::json::JsonSource;
use crate::resolve::Config;
use crate::schema::ConfigSchema;
use crate::source::{OverrideSource, Source};
use crate::types::SearchPath;

/// One layer as declared on the builder. File-backed layers are opened by
/// [`ConfigBuilder::build`], in declaration order.
enum Layer {
    Ready(Box<dyn Source>),
    Env { prefix: String, dir: PathBuf },
    JsonFile(PathBuf),
    JsonSearch {
        search_paths: Vec<SearchPath>,
        file_name: String,
    },
}

/// Builder for assembling a [`Config`] from a schema and its layers.
///
/// Layers are added in **priority-ascending** order: each layer overrides the
/// ones added before it. Values set with [`set()`](Self::set) always sit on
/// top, whatever order the calls were made in.
pub struct ConfigBuilder {
    schema: ConfigSchema,
    app_name: Option<String>,
    layers: Vec<Layer>,
    overrides: OverrideSource,
}

impl ConfigBuilder {
    pub(crate) fn new(schema: ConfigSchema) -> Self {
        Self {
            schema,
            app_name: None,
            layers: Vec::new(),
            overrides: OverrideSource::new(),
        }
    }

    /// Set the application name, used to find the platform config directory
    /// for [`SearchPath::Platform`].
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Add an already-built source.
    pub fn source<S: Source + 'static>(mut self, source: S) -> Self {
        self.layers.push(Layer::Ready(Box::new(source)));
        self
    }

    /// Add an environment source reading `{prefix}KEY` variables, loading
    /// `{dir}/.env` first.
    pub fn env(mut self, prefix: &str, dir: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::Env {
            prefix: prefix.to_string(),
            dir: dir.into(),
        });
        self
    }

    /// Add a JSON file source. The file must exist.
    pub fn json_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::JsonFile(path.into()));
        self
    }

    /// Add one JSON source per `{dir}/{file_name}` found across `search_paths`.
    /// Missing files are skipped; later directories win.
    pub fn search_json(mut self, search_paths: Vec<SearchPath>, file_name: &str) -> Self {
        self.layers.push(Layer::JsonSearch {
            search_paths,
            file_name: file_name.to_string(),
        });
        self
    }

    /// Add a programmatic override. `None` values are ignored (useful for optional clap args).
    pub fn set<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        self.overrides.set(key, value);
        self
    }

    /// Open every layer and assemble the config. Missing or malformed files
    /// fail here, before any lookup.
    pub fn build(self) -> Result<Config, LayerfigError> {
        let mut sources: Vec<Box<dyn Source>> = Vec::new();
        let mut env_prefix = None;

        for layer in self.layers {
            match layer {
                Layer::Ready(source) => sources.push(source),
                Layer::Env { prefix, dir } => {
                    sources.push(Box::new(EnvSource::new(&prefix, &dir)?));
                    env_prefix = Some(prefix);
                }
                Layer::JsonFile(path) => sources.push(Box::new(JsonSource::open(&path)?)),
                Layer::JsonSearch {
                    search_paths,
                    file_name,
                } => {
                    let app_name = self
                        .app_name
                        .as_deref()
                        .ok_or(LayerfigError::AppNameRequired)?;
                    for found in JsonSource::discover(&search_paths, &file_name, app_name)? {
                        sources.push(Box::new(found));
                    }
                }
            }
        }

        if !self.overrides.is_empty() {
            sources.push(Box::new(self.overrides));
        }

        tracing::debug!(sources = sources.len(), "built layered config");
        Ok(Config::new(self.schema, sources).with_env_prefix(env_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::reference_schema;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_builder_resolves_defaults() {
        let config = Config::builder(reference_schema()).build().unwrap();
        assert!(config.source_names().is_empty());
        assert_eq!(config.get("integer").unwrap(), Value::Integer(1));
    }

    #[test]
    fn json_file_layers_in_order() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.json");
        let local = dir.path().join("local.json");
        fs::write(&base, r#"{"string": "base", "integer": 10}"#).unwrap();
        fs::write(&local, r#"{"string": "local"}"#).unwrap();

        let config = Config::builder(reference_schema())
            .json_file(&base)
            .json_file(&local)
            .build()
            .unwrap();

        assert_eq!(config.get("string").unwrap(), Value::String("local".into()));
        assert_eq!(config.get("integer").unwrap(), Value::Integer(10));
    }

    #[test]
    fn missing_json_file_fails_at_build() {
        let dir = TempDir::new().unwrap();
        let result = Config::builder(reference_schema())
            .json_file(dir.path().join("absent.json"))
            .build();
        assert!(matches!(result, Err(LayerfigError::SourceRead { .. })));
    }

    #[test]
    fn overrides_sit_on_top_regardless_of_call_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"integer": 3000}"#).unwrap();

        let config = Config::builder(reference_schema())
            .set("integer", Some(9999i64))
            .json_file(&path)
            .build()
            .unwrap();

        assert_eq!(config.get("integer").unwrap(), Value::Integer(9999));
        assert_eq!(config.origin("integer").unwrap(), "overrides");
    }

    #[test]
    fn none_override_leaves_lower_layers() {
        let config = Config::builder(reference_schema())
            .set::<i64>("integer", None)
            .build()
            .unwrap();
        assert!(config.source_names().is_empty());
    }

    #[test]
    fn search_json_requires_app_name() {
        let dir = TempDir::new().unwrap();
        let result = Config::builder(reference_schema())
            .search_json(vec![SearchPath::Path(dir.path().to_path_buf())], "app.json")
            .build();
        assert!(matches!(result, Err(LayerfigError::AppNameRequired)));
    }

    #[test]
    fn search_json_adds_found_files() {
        let global = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        fs::write(global.path().join("app.json"), r#"{"string": "global", "integer": 2}"#)
            .unwrap();
        fs::write(local.path().join("app.json"), r#"{"string": "local"}"#).unwrap();

        let config = Config::builder(reference_schema())
            .app_name("app")
            .search_json(
                vec![
                    SearchPath::Path(global.path().to_path_buf()),
                    SearchPath::Path(local.path().to_path_buf()),
                ],
                "app.json",
            )
            .build()
            .unwrap();

        assert_eq!(config.source_names().len(), 2);
        assert_eq!(config.get("string").unwrap(), Value::String("local".into()));
        assert_eq!(config.get("integer").unwrap(), Value::Integer(2));
    }

    #[test]
    #[serial]
    fn env_after_json_wins() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("config.json");
        fs::write(&json, r#"{"deeply": {"nested": {"config": "json", "configtwo": "json"}}}"#)
            .unwrap();
        fs::write(
            dir.path().join(".env"),
            "LAYERFIG_B1_DEEPLY_NESTED_CONFIGTWO=\"env value\"\n",
        )
        .unwrap();

        let config = Config::builder(reference_schema())
            .json_file(&json)
            .env("LAYERFIG_B1_", dir.path())
            .build()
            .unwrap();

        assert_eq!(config.env_prefix(), Some("LAYERFIG_B1_"));
        let deeply = config.get("deeply").unwrap();
        assert_eq!(deeply["nested"]["config"].as_str(), Some("json"));
        assert_eq!(deeply["nested"]["configtwo"].as_str(), Some("env value"));

        unsafe { std::env::remove_var("LAYERFIG_B1_DEEPLY_NESTED_CONFIGTWO") };
    }
}
