mod config;
mod env_cmd;
mod providers_cmd;
mod ps_cmd;
mod run_cmd;
mod serve_cmd;
mod show_cmd;
mod switch_cmd;
mod terminal_output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};

use ccswitch_config::StateStore;
use ccswitch_logging::init_logger;
use ccswitch_supervisor::ProcessTable;

use config::Config;
use switch_cmd::SwitchArgs;
use terminal_output::note_error;

#[derive(Parser)]
#[command(name = "cc-switch")]
#[command(about = "Cloud Code provider switcher")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current active provider state
    Show,
    /// Print shell export commands for active state
    Env,
    /// List known providers
    Providers,
    /// Switch the active provider
    Switch(SwitchArgs),
    /// List running processes started with `run`
    Ps,
    /// Start the settings server and open a browser
    Ui(ServeArgs),
    /// Start the settings server
    Serve(ServeArgs),
    /// Run claude with active provider env
    #[command(disable_help_flag = true)]
    Run {
        /// Arguments passed through to claude
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(long)]
    host: Option<String>,
    /// Port to bind the HTTP server to
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeArgs {
    fn apply(self, config: Config) -> Config {
        Config {
            host: self.host.unwrap_or(config.host),
            port: self.port.unwrap_or(config.port),
            ..config
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    let serving = matches!(cli.command, Commands::Ui(_) | Commands::Serve(_));
    init_logger(Some(&config.log_dir()), config.effective_log_level(serving));
    debug!(config_dir = %config.config_dir.display(), "Resolved config directory");

    match dispatch(cli.command, config).await {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            error!(error = %e, "Command failed");
            note_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Run one subcommand and return the process exit code.
async fn dispatch(command: Commands, config: Config) -> Result<i32> {
    let store = StateStore::new(&config.config_dir);

    match command {
        Commands::Show => show_cmd::run(&store).await?,
        Commands::Env => env_cmd::run(&store).await?,
        Commands::Providers => {
            let active = store.load().await?;
            providers_cmd::run(Some(&active.provider))?;
        }
        Commands::Switch(args) => switch_cmd::run(&store, args).await?,
        Commands::Ps => ps_cmd::run(&ProcessTable::new(&config.config_dir)).await?,
        Commands::Ui(args) => serve_cmd::run(&args.apply(config), true).await?,
        Commands::Serve(args) => serve_cmd::run(&args.apply(config), false).await?,
        Commands::Run { args } => {
            return run_cmd::run(&store, &config.claude_bin, args).await;
        }
    }

    Ok(0)
}
