#[cfg(test)]
pub mod test {
    use confique::Config;
    use serde::{Deserialize, Serialize};
    use toml::Value;

    use crate::schema::{ConfigSchema, SchemaEntry};
    use crate::types::Format;

    /// Eight leaves covering every format plus two levels of nesting.
    pub fn reference_schema() -> ConfigSchema {
        let list = Value::Array(vec!["a".into(), "b".into(), "c".into()]);
        ConfigSchema::new([
            ("string", SchemaEntry::new("String config", Format::String, "DEFAULT")),
            ("integer", SchemaEntry::new("Integer config", Format::Int, 1)),
            ("float", SchemaEntry::new("Float config", Format::Float, 1.1)),
            ("list", SchemaEntry::new("List config", Format::List, list)),
            ("bool", SchemaEntry::new("Bool config", Format::Bool, true)),
            ("nested.config", SchemaEntry::new("nested", Format::String, "")),
            (
                "deeply.nested.config",
                SchemaEntry::new("deeply nested", Format::String, "DEFAULT"),
            ),
            (
                "deeply.nested.configtwo",
                SchemaEntry::new(
                    "deeply nested with multiple values",
                    Format::String,
                    "DEFAULT",
                ),
            ),
        ])
        .unwrap()
    }

    /// The same values as text, the way an env source delivers them.
    pub const ENV_VALUES: [(&str, &str); 8] = [
        ("string", "env value"),
        ("integer", "123"),
        ("float", "2.2"),
        ("list", "d,e,f"),
        ("bool", "False"),
        ("nested.config", "env value"),
        ("deeply.nested.config", "env value"),
        ("deeply.nested.configtwo", "env value"),
    ];

    pub const JSON_VALUES: &str = r#"{
        "string": "json value",
        "integer": 123,
        "float": 2.2,
        "list": ["g", "h", "i"],
        "bool": false,
        "deeply": {"nested": {"config": "json value 3", "configtwo": "json value 4"}},
        "nested": {"config": "json value 2"}
    }"#;

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct WebConfig {
        /// The application host.
        #[config(default = "localhost")]
        pub host: String,

        /// The port number.
        #[config(default = 8080)]
        pub port: u16,

        /// Enable debug mode.
        #[config(default = false)]
        pub debug: bool,

        /// Database settings.
        #[config(nested)]
        pub database: WebDbConfig,
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct WebDbConfig {
        /// Replica host names.
        #[config(default = ["db1", "db2"])]
        pub replicas: Vec<String>,

        /// Connect timeout in seconds.
        #[config(default = 2.5)]
        pub timeout: f64,
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct UnsetConfig {
        /// Connection string URL.
        pub url: Option<String>,

        #[config(default = 5)]
        pub pool_size: usize,
    }

    #[test]
    fn web_config_loads_defaults() {
        let config = WebConfig::builder().load().unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
        assert_eq!(config.database.replicas, vec!["db1", "db2"]);
    }
}
