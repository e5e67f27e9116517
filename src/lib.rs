//! flatdupe - duplicate file finder for a single directory
//!
//! Files directly inside one directory are keyed by MD5 digest (or by size),
//! grouped by key in first-seen order, and groups of two or more are
//! reported. Optionally the first file of each group is kept and the rest
//! are removed.
//!
//! The binary is a thin wrapper around [`run_app`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{
    execute_if_confirmed, prompt_confirmation, BatchDeleteResult, Decision, DeleteConfig,
};
use crate::cli::{Cli, Commands, HashArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, DuplicateTable, FinderConfig};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TableOutput};
use crate::progress::Progress;
use crate::scanner::{hash_to_hex, Hasher};
use crate::signal::ShutdownHandler;

/// Run the application, writing results to stdout.
///
/// # Errors
///
/// Returns an error for fatal failures: bad configuration, a missing or
/// unreadable scan root, an interrupted scan, or a failed write to stdout.
/// Per-file failures are not errors; they yield [`ExitCode::PartialSuccess`].
pub fn run_app(mut cli: Cli) -> Result<ExitCode> {
    if !io::stdout().is_terminal() {
        cli.no_color = true;
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_app_with_writer(cli, &mut out)
}

/// Run the application, writing results to `out`.
///
/// Progress, log records and the confirmation prompt go to stderr.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_app_with_writer<W: Write>(cli: Cli, out: &mut W) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Scan(args) => run_scan(&cli, args, out),
        Commands::Hash(args) => run_hash(&cli, args, out),
    }
}

fn run_scan<W: Write>(cli: &Cli, args: &ScanArgs, out: &mut W) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_scan_args(args)?;
    log::debug!("Effective configuration: {:?}", config);

    let handler = signal::install_handler()?;
    let reporter = Arc::new(Progress::new(cli.quiet));

    let mut finder_config = FinderConfig::default()
        .with_strategy(config.strategy)
        .with_chunk_size(config.chunk_size)
        .with_shutdown_flag(handler.get_flag());
    if !cli.quiet && io::stderr().is_terminal() {
        finder_config = finder_config.with_progress_callback(reporter.clone());
    }

    let (table, summary) = DuplicateFinder::new(finder_config)
        .find_duplicates(&args.path)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    match config.output {
        OutputFormat::Table => {
            if table.is_empty() {
                writeln!(out, "No duplicates found!")?;
            } else {
                TableOutput::new(&table, config.strategy)
                    .with_color(!cli.no_color)
                    .write_to(&mut *out)?;
            }
            if summary.has_errors() && !cli.quiet {
                eprintln!("{} file(s) could not be compared", summary.error_count());
            }
        }
        OutputFormat::Csv => CsvOutput::new(&table).write_to(&mut *out)?,
        // Written last so it can carry the deletion report.
        OutputFormat::Json => {}
    }
    out.flush()?;

    let deletion = if args.delete {
        let decision = decide(&table, args.yes)?;
        let delete_config = DeleteConfig::default().with_shutdown_flag(handler.get_flag());
        execute_if_confirmed(&table, decision, &delete_config, Some(reporter.as_ref()))
    } else {
        None
    };

    let exit_code = exit_code_for(&table, summary.error_count(), deletion.as_ref(), &handler);

    if config.output == OutputFormat::Json {
        let mut json = JsonOutput::new(&table, &summary, exit_code);
        if let Some(result) = &deletion {
            json = json.with_deletion(result);
        }
        json.write_to(&mut *out)?;
        out.flush()?;
    }

    Ok(exit_code)
}

/// Pass the decision gate: `--yes`, or an interactive prompt.
fn decide(table: &DuplicateTable, yes: bool) -> Result<Decision> {
    if table.is_empty() {
        log::info!("No duplicates to delete");
        return Ok(Decision::Declined);
    }
    if yes {
        return Ok(Decision::Confirmed);
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        log::warn!("Standard input is not a terminal; pass --yes to delete without a prompt");
        return Ok(Decision::Declined);
    }
    prompt_confirmation(stdin.lock(), io::stderr(), table.redundant_count())
        .context("Failed to read confirmation")
}

fn exit_code_for(
    table: &DuplicateTable,
    scan_failures: usize,
    deletion: Option<&BatchDeleteResult>,
    handler: &ShutdownHandler,
) -> ExitCode {
    if deletion.is_some_and(|d| d.interrupted) || handler.is_shutdown_requested() {
        return ExitCode::Interrupted;
    }
    let delete_failures = deletion.map_or(0, BatchDeleteResult::failure_count);
    ExitCode::for_outcome(table.len(), scan_failures + delete_failures)
}

fn run_hash<W: Write>(cli: &Cli, args: &HashArgs, out: &mut W) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(size) = args.chunk_size {
        config.chunk_size = usize::try_from(size).unwrap_or(usize::MAX);
        config.validate()?;
    }
    let hasher = Hasher::with_chunk_size(config.chunk_size);

    let mut failed = 0;
    for path in &args.files {
        match hasher.full_hash(path) {
            Ok(hash) => writeln!(out, "{}  {}", hash_to_hex(&hash), path.display())?,
            Err(e) => {
                log::error!("{e}");
                failed += 1;
            }
        }
    }
    out.flush()?;

    Ok(if failed > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}
