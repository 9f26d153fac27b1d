use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vsc_inventory::{
    config::Config,
    model::{Edition, ProfileRecord},
    output::{print_extensions_table, print_profiles_table, ExportMode},
    platform::VscodePaths,
    runner::{self, RunOptions},
};

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "vsc-inventory")]
#[command(
    author,
    version,
    about = "Inventory VSCode extensions across profiles and export them as CSV"
)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export installed extensions to CSV
    Export {
        /// Report to produce (all, per-profile, summary, everything)
        #[arg(short, long)]
        mode: Option<String>,

        /// Directory to write reports into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// List discovered profiles
    List {
        /// Also list every extension
        #[arg(long)]
        extensions: bool,

        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args)]
struct LocationArgs {
    /// Inventory VSCode Insiders instead of stable
    #[arg(long)]
    insiders: bool,

    /// Override the VSCode user directory (the one containing `profiles`)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Override the flat extensions directory
    #[arg(long)]
    extensions_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config file: {:#}", e);
        Config::default()
    });

    match cli.command {
        Commands::Export {
            mode,
            output_dir,
            location,
        } => {
            let mut options = resolve_options(&config, &location)?;
            if let Some(mode) = mode {
                options.mode = ExportMode::from_str(&mode).map_err(|e| anyhow::anyhow!(e))?;
            }
            if let Some(dir) = output_dir {
                options.output_dir = dir;
            }

            run_export(&options, cli.quiet).await
        }
        Commands::List {
            extensions,
            location,
        } => {
            let options = resolve_options(&config, &location)?;
            let profiles = discover_with_progress(&options, !cli.quiet).await;

            print_profiles_table(&profiles);
            if extensions {
                println!();
                print_extensions_table(&profiles);
            }
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Initialize tracing; `RUST_LOG` wins over the flags when set.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn resolve_options(config: &Config, location: &LocationArgs) -> Result<RunOptions> {
    let edition = if location.insiders {
        Edition::Insiders
    } else {
        config.edition
    };
    let paths = VscodePaths::detect(edition).context("Could not determine home directory")?;
    let mut options = RunOptions::from_config(config, paths);

    if let Some(base_dir) = &location.base_dir {
        options.paths = options.paths.with_base_dir(base_dir);
    }
    if let Some(extensions_dir) = &location.extensions_dir {
        options.paths = options.paths.with_extensions_dir(extensions_dir);
    }

    Ok(options)
}

async fn run_export(options: &RunOptions, quiet: bool) -> Result<u8> {
    let profiles = discover_with_progress(options, !quiet).await;

    let report = runner::export(&profiles, options)
        .with_context(|| format!("Failed to export {} report", options.mode))?;

    if !quiet {
        println!(
            "Exported {} extension(s) from {} profile(s):",
            report.extensions, report.profiles
        );
        for file in &report.files {
            println!("  {}", file.display());
        }
    }

    Ok(exit_codes::SUCCESS)
}

async fn discover_with_progress(options: &RunOptions, show_progress: bool) -> Vec<ProfileRecord> {
    let progress = if show_progress && std::io::stderr().is_terminal() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Discovering VSCode profiles...");
        Some(pb)
    } else {
        None
    };

    let profiles = runner::discover(options).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    profiles
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'vsc-inventory config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
