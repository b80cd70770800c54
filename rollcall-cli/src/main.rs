//! rollcall CLI - person CRUD service
//!
//! Entry point for the `rollcall` binary:
//! - `serve`: migrate, seed and run the HTTP API
//! - `migrate`: apply schema migrations and exit
//! - `config`: inspect the config file
//! - `completions`: shell completion scripts

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "rollcall",
    author,
    version,
    about = "Person CRUD service over HTTP, backed by PostgreSQL",
    long_about = "Serve a small JSON API under /api/users for creating, listing, \
                  updating and deleting people. Schema migrations and demo seeding \
                  run automatically on startup."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Apply database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
    /// Inspect rollcall configuration (path, show)
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

fn load_dotenv() {
    // ~/.rollcall/.env first, then cwd; existing env vars always win
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".rollcall/.env"));
    }
    let _ = dotenvy::dotenv();
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Migrate(args) => commands::run_migrate(args).await,
        Commands::Config(args) => commands::run_config(args),
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                clap_complete::Shell::from(args.shell),
                &mut cmd,
                "rollcall",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    tracing_setup::shutdown_otel();
    result
}
