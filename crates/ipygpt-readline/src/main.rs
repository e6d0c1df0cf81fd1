mod display;
mod helper;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use ipygpt_application::{MagicHost, registered_magics, split_cells};
use ipygpt_core::{ChatConfig, DisplayMode};
use ipygpt_infrastructure::{ConfigStorage, Dashboard, IpygptPaths};
use ipygpt_interaction::OpenAIClient;

use crate::display::display_for;
use crate::helper::CliHelper;

#[derive(Parser)]
#[command(name = "ipygpt", version)]
#[command(about = "Notebook-style chat magics backed by the OpenAI API", long_about = None)]
struct Cli {
    /// Output style: rich (coloured) or plain
    #[arg(long)]
    display: Option<DisplayMode>,

    /// Keep the chat log but do not start the dashboard process
    #[arg(long)]
    no_dashboard: bool,

    /// Dashboard command; the log path is appended (default: "streamlit run")
    #[arg(long, value_name = "CMD")]
    dashboard_command: Option<String>,

    /// Directory for the chat log (default: .ipygpt_tmp)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Config file (default: ~/.config/ipygpt/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run the cells in FILE instead of starting the REPL
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

/// Filter from `RUST_LOG`, `warn` when unset or invalid.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Sends tracing output to a daily log file so the REPL stays readable.
/// Falls back to stderr when no log directory is available.
fn init_logging() -> Option<WorkerGuard> {
    let filter = log_filter();

    let logs_dir = IpygptPaths::logs_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    match logs_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "ipygpt.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
            None
        }
    }
}

fn print_magics() {
    for magic in registered_magics() {
        println!("  {}", magic.usage.bright_cyan());
        println!("      {}", magic.description.bright_black());
    }
}

/// Builds the host from CLI flags, the config file and the environment.
fn build_host(cli: &Cli) -> Result<MagicHost> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => IpygptPaths::config_file().context("cannot locate config directory")?,
    };
    let file_config = ConfigStorage::new(config_path.clone())
        .load()
        .with_context(|| format!("failed to read {}", config_path.display()))?;

    let chat_config = file_config.apply_to(ChatConfig::from_env());
    let mode = cli.display.or(file_config.display).unwrap_or_default();

    let mut settings = file_config.dashboard.clone();
    if cli.no_dashboard {
        settings.enabled = false;
    }
    if let Some(command) = &cli.dashboard_command {
        settings.command = shlex::split(command)
            .with_context(|| format!("cannot parse dashboard command '{command}'"))?;
    }
    if let Some(dir) = &cli.log_dir {
        settings.log_dir = dir.clone();
    }

    let dashboard = Dashboard::launch(&settings).context("failed to start dashboard")?;
    if settings.enabled {
        println!(
            "{}",
            format!(
                "Launching dashboard to log this chat session ({})",
                dashboard.log().path().display()
            )
            .bright_black()
        );
    }

    let backend = Arc::new(OpenAIClient::from_env());
    tracing::info!(base_url = backend.base_url(), %mode, "ipygpt session started");

    Ok(MagicHost::new(chat_config, backend, display_for(mode), dashboard))
}

async fn run_script(host: &mut MagicHost, path: &PathBuf) -> Result<()> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;

    for cell in split_cells(&script) {
        let header = cell.lines().next().unwrap_or_default();
        println!("{}", format!("In: {header}").green());
        host.run_cell(&cell).await;
        println!();
    }
    Ok(())
}

async fn run_repl(host: &mut MagicHost) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== ipygpt ===".bright_magenta().bold());
    println!(
        "{}",
        "Cell magics end with an empty line. Type 'help' for magics, 'quit' to exit."
            .bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(input) => {
                let trimmed = input.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(input.trim_end());

                if trimmed == "help" {
                    print_magics();
                    continue;
                }

                host.run_cell(trimmed).await;
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    let mut host = build_host(&cli)?;

    let outcome = match &cli.script {
        Some(path) => run_script(&mut host, path).await,
        None => run_repl(&mut host).await,
    };

    if let Err(e) = host.shutdown().await {
        tracing::warn!(error = %e, "dashboard shutdown failed");
    }
    outcome
}
