//! CalGen command-line driver.
//!
//! Regenerates every marker-delimited block in the worklist files from the
//! calibration schema, or a single file, or prints the validated schema.

mod cli_config;
mod commands;
mod output;

use std::path::PathBuf;

use calgen_weave::CalgenConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli_config::load_cli_config;

/// Regenerate calibration code from the calibration info page schema.
///
/// Without a subcommand every file on the worklist is processed in place.
#[derive(Parser, Debug)]
#[command(name = "calgen-ctl", version, about, styles = output::clap_styles())]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, short = 'r', global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Config file (defaults to .calgen.toml in the project root)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate a single file; it must still be on the worklist
    File {
        /// File to regenerate
        path: PathBuf,
    },
    /// Load, validate and print the calibration schema
    DumpSchema {
        /// Schema file (defaults to the configured yaml path)
        #[arg(long, value_name = "YAML")]
        file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = init_tracing(verbose).and_then(|()| run(cli)) {
        output::error(format!("{e:#}"));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env();
    for target in ["calgen_ctl", "calgen_weave", "calgen_schema"] {
        filter = filter.add_directive(format!("{target}={level}").parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let project_root = match cli.root {
        Some(root) => std::path::absolute(root)?,
        None => std::env::current_dir()?,
    };

    let cli_config = load_cli_config(cli.config.as_deref(), &project_root)?;
    let mut config = CalgenConfig::for_project_root(&project_root);
    cli_config.apply(&mut config);
    tracing::debug!(?config, "Resolved CalGen configuration");

    match cli.command {
        None => commands::handle_generate_all(&config),
        Some(Commands::File { path }) => commands::handle_generate_file(&config, &path),
        Some(Commands::DumpSchema { file }) => {
            commands::handle_dump_schema(&config, file.as_deref())
        }
    }
}
