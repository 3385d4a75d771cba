//! Configuration structs for the layerfig demo application.
//!
//! [`DemoConfig`] is turned into a schema with
//! [`ConfigSchema::from_config`](layerfig::ConfigSchema::from_config): the
//! `///` docs become leaf docs and the `#[config(default)]` values become
//! leaf defaults.
//!
//! # Env var mapping
//!
//! With the prefix `LAYERFIG_DEMO_`:
//!
//! | Env var                              | Config key               |
//! |--------------------------------------|--------------------------|
//! | `LAYERFIG_DEMO_NAME`                 | `name`                   |
//! | `LAYERFIG_DEMO_VERBOSE`              | `verbose`                |
//! | `LAYERFIG_DEMO_SERVER_HOST`          | `server.host`            |
//! | `LAYERFIG_DEMO_SERVER_PORT`          | `server.port`            |
//! | `LAYERFIG_DEMO_SERVER_ALLOWED_HOSTS` | `server.allowed_hosts`   |
//! | `LAYERFIG_DEMO_DISPLAY_COLOR`        | `display.color`          |
//! | `LAYERFIG_DEMO_DISPLAY_SCALE`        | `display.scale`          |

use confique::Config;
use serde::{Deserialize, Serialize};

/// Root configuration for the demo application.
#[derive(Config, Serialize, Deserialize, Debug)]
pub struct DemoConfig {
    /// Application name shown in the echo banner.
    #[config(default = "layerfig-demo")]
    pub name: String,

    /// Enable verbose output.
    #[config(default = false)]
    pub verbose: bool,

    #[config(nested)]
    pub server: ServerConfig,

    #[config(nested)]
    pub display: DisplayConfig,
}

#[derive(Config, Serialize, Deserialize, Debug)]
pub struct ServerConfig {
    /// Hostname to bind to.
    #[config(default = "127.0.0.1")]
    pub host: String,

    /// Port number.
    #[config(default = 3000)]
    pub port: u16,

    /// Hosts allowed to connect (comma-separated in env vars).
    #[config(default = ["localhost"])]
    pub allowed_hosts: Vec<String>,
}

#[derive(Config, Serialize, Deserialize, Debug)]
pub struct DisplayConfig {
    /// Terminal color for the echo command output.
    ///
    /// Supported values: red, green, yellow, blue, magenta, cyan, white.
    #[config(default = "yellow")]
    pub color: String,

    /// Width multiplier for the key column.
    #[config(default = 1.0)]
    pub scale: f64,
}
