//! Schema-driven, layered configuration plus declarative file scaffolding.
//!
//! Layerfig resolves typed configuration values from a declared schema and an
//! ordered stack of sources: environment variables (with `.env` file
//! support), JSON files, and programmatic overrides. Every value that comes
//! out of a lookup has the format its schema leaf declares.
//!
//! ```ignore
//! let schema = ConfigSchema::from_path("schema.toml")?;
//! let config = Config::builder(schema)
//!     .json_file("config.json")
//!     .env("MYAPP_", ".")
//!     .build()?;
//!
//! let port: u16 = config.get_as("server.port")?;
//! let db = config.get("database")?; // a nested table
//! ```
//!
//! # Schema as source of truth
//!
//! A [`ConfigSchema`] is a tree of leaves. Each leaf has a dotted key, a
//! documentation string, a [`Format`] (`string`, `int`, `float`, `bool`,
//! `list`) and a default of that format. The schema decides:
//!
//! - **which keys exist**: asking for anything that is neither a leaf nor a
//!   prefix of one fails with [`LayerfigError::UnknownKey`];
//! - **how raw text is read**: environment values are coerced to the leaf's
//!   format, and a value that does not parse fails with
//!   [`LayerfigError::Coercion`] instead of falling back to the default;
//! - **what `config gen` writes**: one documented line per leaf.
//!
//! Schemas can be written in TOML or JSON ([`ConfigSchema::from_path`]) or
//! derived from a confique struct ([`ConfigSchema::from_config`]), in which
//! case `///` docs and `#[config(default)]` values carry over.
//!
//! # Layer precedence
//!
//! ```text
//! Schema defaults       always present
//!        ↑ overridden by
//! Sources               in the order given, later sources win
//!        ↑ overridden by
//! Overrides             ConfigBuilder::set()
//! ```
//!
//! Every source is **sparse**: it only answers for the keys it holds, and
//! anything else falls through to the sources below it. Lookups are lazy,
//! so a malformed value only fails the lookups that reach it.
//!
//! Looking up a prefix such as `deeply.nested` resolves every leaf under it
//! independently, so the resulting table can mix values from several
//! sources with defaults.
//!
//! # Environment variables
//!
//! With prefix `MYAPP_`, the variable for a key is the prefix followed by the
//! key upper-cased with `.` replaced by `_`:
//!
//! | Env var | Config key |
//! |---------|------------|
//! | `MYAPP_HOST` | `host` |
//! | `MYAPP_DATABASE_URL` | `database.url` |
//!
//! [`EnvSource::new`] loads `.env` from the given directory into the process
//! environment first; variables that are already set are kept. Lists are
//! written comma-separated (`a,b,c`) and booleans accept `true`/`false` in
//! any case.
//!
//! # JSON files
//!
//! A JSON source is one object, nested the way the keys are dotted. Its
//! values are already typed and must match the leaf format; an integer is
//! accepted where a float is declared. [`JsonSource::discover`] finds one
//! file per [`SearchPath`], skipping missing files.
//!
//! # Scaffolding
//!
//! The [`scaffold`] module describes a tree of files and directories in
//! memory and writes it to disk. Optional files are written once and never
//! overwritten, which makes it suitable for seeding user-editable config.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`ConfigArgs`] adds
//! `config list|get|gen` subcommands to an app. They map to
//! [`ConfigAction`], which [`Config::handle`] executes without any CLI
//! framework involved.
//!
//! # Demo
//!
//! A runnable demo application lives in `demos/layerfig_demo/` and is
//! registered as a Cargo example: `cargo run --example layerfig_demo -- echo`.
//!
//! # Error handling
//!
//! All fallible operations return [`LayerfigError`]. Source files are read
//! when a source is constructed, so missing or malformed files fail early.

pub mod error;
pub mod scaffold;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod env;
mod file;
mod json;
mod keys;
mod ops;
mod resolve;
mod schema;
mod source;

#[cfg(test)]
mod fixtures;

pub use builder::ConfigBuilder;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use env::{DOTENV_FILE, EnvSource};
pub use error::LayerfigError;
pub use json::JsonSource;
pub use ops::{ConfigResult, generate_env_template};
pub use resolve::Config;
pub use schema::{ConfigSchema, SchemaEntry};
pub use source::{OverrideSource, RawValue, Source};
pub use types::{ConfigAction, Format, SearchPath};
