//! CLI command handling for portico

mod rewrite;

use clap::{Parser, Subcommand};
use portico_config::AppConfig;
use portico_rules::canonicalize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rewrite::RunMode;

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "portico")]
#[command(about = "Rewrite cross-module relative imports to public module specifiers")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of portico.toml / .portico/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite imports in the given files and directories
    ///
    /// Directories are walked recursively. Hidden directories and
    /// node_modules are skipped.
    Rewrite {
        /// Files or directories to process
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Report what would change without writing anything
        #[arg(long, conflicts_with = "check")]
        dry_run: bool,

        /// Like --dry-run, but exit non-zero when any file would change
        #[arg(long)]
        check: bool,
    },
    /// Print the public specifier of a module root
    ///
    /// The container segment is looked up below the workspace root
    /// (`rules.workspace_root`, or the working directory).
    Canonicalize {
        /// Module root directory, e.g. projects/lib-b
        module_root: PathBuf,
    },
}

/// Parse arguments, run the command and map its outcome to an exit code
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    portico_config::logging::initialize(&config.logging);

    match cli.command {
        Commands::Rewrite {
            paths,
            dry_run,
            check,
        } => {
            let mode = if check {
                RunMode::Check
            } else if dry_run {
                RunMode::DryRun
            } else {
                RunMode::Write
            };
            run_rewrite(&config, &paths, mode)
        }
        Commands::Canonicalize { module_root } => run_canonicalize(&config, &module_root),
    }
}

fn run_rewrite(config: &AppConfig, paths: &[PathBuf], mode: RunMode) -> ExitCode {
    let report = match rewrite::run(config, paths, mode) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let verb = match mode {
        RunMode::Write => "rewrote",
        RunMode::DryRun | RunMode::Check => "would rewrite",
    };
    for path in &report.rewritten {
        println!("{verb} {}", path.display());
    }
    for (path, error) in &report.failed {
        eprintln!("error: {}: {error}", path.display());
    }
    println!(
        "{} files scanned, {} rewritten, {} failed",
        report.scanned,
        report.rewritten.len(),
        report.failed.len()
    );

    if !report.failed.is_empty() || (mode == RunMode::Check && !report.rewritten.is_empty()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_canonicalize(config: &AppConfig, module_root: &Path) -> ExitCode {
    let workspace_root = match rewrite::workspace_root(config) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };
    // Compare canonical paths; a root that doesn't exist is taken as given
    let module_root = fs::canonicalize(module_root).unwrap_or_else(|_| module_root.to_path_buf());

    match canonicalize(
        &module_root,
        Some(&workspace_root),
        &config.rules.container_segment,
    ) {
        Ok(specifier) => {
            println!("{specifier}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
