//! Clap adapter, compiled only with the `clap` Cargo feature (on by default).
//!
//! [`ConfigArgs`] embeds into an app's clap derive to give it
//! `config list|get|gen` subcommands. [`ConfigArgs::into_action()`] converts
//! the parsed arguments into a [`ConfigAction`](crate::ConfigAction), which
//! [`Config::handle()`](crate::Config::handle) executes.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// Clap-derived args for the `config` subcommand group.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show all resolved configuration key-value pairs.
    List,
    /// Generate a commented sample .env file.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the resolved value and documentation for a key or section.
    Get {
        /// Dotted key path (e.g. "deeply.nested.config").
        key: String,
    },
}

impl ConfigArgs {
    /// Bare `config` (no subcommand) and explicit `config list` both map to
    /// `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Gen { output }) => ConfigAction::Gen { output },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key },
        }
    }
}
