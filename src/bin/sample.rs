//! Schema Mapper CLI
//!
//! Prints the schemas of a small weather-forecast model and of a callable that
//! consumes it, and manages the settings file.

use clap::{Parser, Subcommand};
use schema_mapper::weather::{should_step_outside, weather_registry};
use schema_mapper::{schema_for_callable, schema_for_type, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-mapper")]
#[command(about = "Generate JSON Schema documents from serialization contracts")]
struct Cli {
    /// Path to a settings file
    #[arg(short, long)]
    config: Option<String>,

    /// Print compact JSON regardless of the configured output format
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the schema of the WeatherForecast type
    Forecast,

    /// Print the argument schema of should_step_outside
    Callable,

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings as TOML
    Show,

    /// Write the default settings to a file
    Init {
        #[arg(default_value = "schema-mapper.toml")]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load_from(cli.config.as_deref())?;
    if cli.compact {
        settings.output.format = schema_mapper::config::OutputFormat::Compact;
    }

    match cli.command {
        Command::Forecast => {
            let registry = weather_registry()?;
            let schema = schema_for_type(&registry, "WeatherForecast", &settings.mapper)?;
            println!("{}", settings.render(&schema)?);
        }
        Command::Callable => {
            let registry = weather_registry()?;
            let schema = schema_for_callable(&registry, &should_step_outside(), &settings.mapper)?;
            println!("{}", settings.render(&schema)?);
        }
        Command::Config { action: ConfigAction::Show } => {
            print!("{}", toml::to_string_pretty(&settings)?);
        }
        Command::Config { action: ConfigAction::Init { path, force } } => {
            if std::path::Path::new(&path).exists() && !force {
                return Err(format!("{} already exists (use --force to overwrite)", path).into());
            }
            Settings::default().save(&path)?;
            println!("✅ Wrote default settings to {}", path);
        }
    }

    Ok(())
}
