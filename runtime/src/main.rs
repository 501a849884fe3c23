// Copyright 2026 Ionian Weather Contributors
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use ionian_wx_runtime::cli;
use ionian_wx_runtime::cli::run_cmd::RunOptions;
use ionian_wx_runtime::config::resolve_output_dir;
use ionian_wx_runtime::sources::SourceKind;

#[derive(Parser)]
#[command(
    name = "ionian-wx",
    about = "Collect daily weather observations for Corfu and Epirus stations",
    version,
    after_help = "Run 'ionian-wx <command> --help' for details on each command.\nRun 'ionian-wx' with no command to do a full run."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every source and append the sections to today's report
    Run {
        /// Report directory (default: $IONIAN_WX_OUTPUT_DIR or data/extract)
        #[arg(long)]
        output_dir: Option<String>,
        /// Only run these sources (repeatable)
        #[arg(long, value_enum)]
        only: Vec<SourceKind>,
        /// Do not start a browser; penteli and weathercloud report errors
        #[arg(long)]
        no_browser: bool,
    },
    /// List the configured stations, or show the display name of one id
    Stations {
        /// Station id to look up
        id: Option<String>,
    },
    /// Check environment and diagnose issues
    Doctor {
        /// Report directory to check
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   ionian-wx completions bash > ~/.local/share/bash-completion/completions/ionian-wx
    ///   ionian-wx completions zsh > ~/.zfunc/_ionian-wx
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        output_dir: None,
        only: Vec::new(),
        no_browser: false,
    });

    let result = match command {
        Commands::Run {
            output_dir,
            only,
            no_browser,
        } => {
            cli::run_cmd::run(RunOptions {
                output_dir: resolve_output_dir(output_dir.as_deref()),
                only,
                no_browser,
                json: cli.json,
            })
            .await
        }
        Commands::Stations { id } => cli::stations_cmd::run(id.as_deref(), cli.json),
        Commands::Doctor { output_dir } => cli::doctor::run(output_dir.as_deref(), cli.json).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ionian-wx", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": true,
                    "message": format!("{e:#}"),
                })
            );
        } else {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
