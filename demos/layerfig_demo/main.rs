//! # layerfig demo application
//!
//! A sample CLI tool showing how an application wires layerfig together. It
//! is not a real app; it exists to demonstrate and manually verify the
//! library.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example layerfig_demo -- echo
//! cargo run --example layerfig_demo -- config list
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                                      |
//! |-----------------------|-------------------------------------------------------------------------|
//! | Schema defaults       | `cargo run --example layerfig_demo -- echo`                             |
//! | JSON file (cwd)       | Run `init`, edit `layerfig-demo.json`, then run `echo`                  |
//! | `.env` file           | Run `init`, edit `.env`, then run `echo`                                |
//! | Env var override      | `LAYERFIG_DEMO_DISPLAY_COLOR=red cargo run --example layerfig_demo -- echo` |
//! | List from env         | `LAYERFIG_DEMO_SERVER_ALLOWED_HOSTS=a,b cargo run --example layerfig_demo -- echo` |
//! | CLI override          | `cargo run --example layerfig_demo -- --port 9999 echo`                 |
//! | Subtree lookup        | `cargo run --example layerfig_demo -- config get server`                |
//! | `config gen`          | `cargo run --example layerfig_demo -- config gen -o .env.example`       |
//! | Scaffolding           | `cargo run --example layerfig_demo -- init` (twice, to see the skip)    |

mod config;

use clap::{Parser, Subcommand};

use layerfig::scaffold::{Directory, File, Tree};
use layerfig::{
    Config, ConfigArgs, ConfigSchema, LayerfigError, SearchPath, generate_env_template,
};

use config::{DemoConfig, ServerConfig};

const APP_NAME: &str = "layerfig-demo";
const ENV_PREFIX: &str = "LAYERFIG_DEMO_";
const JSON_FILE: &str = "layerfig-demo.json";

/// layerfig demo: a sample CLI app for showcasing layerfig integration.
#[derive(Parser, Debug)]
#[command(name = "layerfig-demo")]
struct Cli {
    /// Enable verbose output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Override the display color.
    #[arg(long, global = true)]
    color: Option<String>,

    /// Override the server port.
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print resolved configuration values.
    Echo {
        /// Print only this dotted key (or section) instead of everything.
        #[arg(long)]
        key: Option<String>,
    },
    /// Inspect the configuration (list, get, gen).
    Config(ConfigArgs),
    /// Write a starter layerfig-demo.json and .env into the current directory.
    Init,
}

/// Layers, lowest priority first: Platform dir → `~/.layerfig-demo/` → cwd
/// JSON files, then `LAYERFIG_DEMO_*` env vars (with `.env`), then CLI flags.
fn load(verbose: bool, color: Option<String>, port: Option<u16>) -> Result<Config, LayerfigError> {
    let schema = ConfigSchema::from_config::<DemoConfig>()?;
    Config::builder(schema)
        .app_name(APP_NAME)
        .search_json(
            vec![
                SearchPath::Platform,
                SearchPath::Home(".layerfig-demo"),
                SearchPath::Cwd,
            ],
            JSON_FILE,
        )
        .env(ENV_PREFIX, ".")
        .set("verbose", verbose.then_some(true))
        .set("display.color", color)
        .set("server.port", port.map(i64::from))
        .build()
}

fn ansi_color_code(name: &str) -> &str {
    match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "magenta" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "white" => "\x1b[37m",
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";

fn echo(config: &Config, key: Option<&str>) -> Result<(), LayerfigError> {
    let color: String = config.get_as("display.color")?;
    let scale: f64 = config.get_as("display.scale")?;
    let color = ansi_color_code(&color);

    if config.get_as::<bool>("verbose")? {
        let name: String = config.get_as("name")?;
        let server: ServerConfig = config.get_as("server")?;
        println!("{color}[verbose] {name} on {}:{}{RESET}", server.host, server.port);
        println!();
    }

    let entries = match key {
        Some(key) => vec![(key.to_string(), config.get(key)?.to_string())],
        None => config
            .list()?
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect(),
    };

    let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let width = (max_key_len as f64 * scale.max(1.0)) as usize;
    for (key, value) in &entries {
        let origin = config.origin(key).unwrap_or_else(|_| "-".into());
        println!("{color}{key:<width$}{RESET}  {value}  ({origin})");
    }
    Ok(())
}

fn init() -> Result<(), LayerfigError> {
    let schema = ConfigSchema::from_config::<DemoConfig>()?;
    let starter = r#"{
  "server": { "port": 3000 },
  "display": { "color": "green" }
}
"#;
    let template = generate_env_template(&schema, ENV_PREFIX);
    let tree = Tree::new(vec![
        File::optional(JSON_FILE, starter)
            .with_warning("layerfig-demo.json already exists, keeping your edits")
            .into(),
        File::optional(".env", &template).into(),
        Directory::new("docs", vec![File::new("env.example", &template).into()]).into(),
    ]);

    let report = tree.create(".")?;
    for file in &report.files {
        println!("{}: {:?}", file.path.display(), file.outcome);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), LayerfigError> {
    let Cli {
        verbose,
        color,
        port,
        command,
    } = cli;
    match command {
        Commands::Echo { key } => echo(&load(verbose, color, port)?, key.as_deref()),
        Commands::Config(args) => {
            load(verbose, color, port)?.handle_and_print(&args.into_action())
        }
        Commands::Init => init(),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error:\n{e}");
        std::process::exit(1);
    }
}
