// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Command-line interface for wxr2md.
//!
//! This binary provides the `wxr2md` command for converting WordPress WXR
//! export files to Markdown documents.

use chrono::{Local, NaiveDate};
use lexopt::prelude::*;
use log::{LevelFilter, info, warn};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use snafu::{ensure, prelude::*};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;
use wxr2md::model::Statistics;
use wxr2md::renderer::RenderOptions;
use wxr2md::session::{Conversion, ConvertError, Session, output_file_name};

/// Where to write the rendered output.
#[derive(Clone)]
enum OutputTarget {
    /// Write each document to the specified directory.
    Directory(PathBuf),
    /// Write to stdout.
    Stdout,
}

#[allow(clippy::struct_excessive_bools)]
struct Cli {
    input: Vec<PathBuf>,
    output: OutputTarget,
    generated_on: Option<NaiveDate>,
    stats: bool,
    quiet: bool,
    verbose: bool,
    dry_run: bool,
    force: bool,
}

impl Cli {
    const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Warn
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to parse arguments: {source}"))]
    ParseArgs { source: lexopt::Error },

    #[snafu(display("at least one input file or directory is required"))]
    NoInputFiles,

    #[snafu(display("cannot output multiple files to stdout"))]
    MultipleFilesToStdout,

    #[snafu(display("failed to create output directory: {source}"))]
    CreateOutputDir { source: std::io::Error },

    #[snafu(display("{}: {source}", path.display()))]
    Convert { path: PathBuf, source: ConvertError },

    #[snafu(display(
        "cannot name output for {}: {name} is already used in this run",
        path.display()
    ))]
    DuplicateOutput { path: PathBuf, name: String },

    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to serialize statistics: {source}"))]
    SerializeStats { source: serde_json::Error },
}

fn print_help() {
    println!(
        "\
{name} {version}
Convert WordPress WXR exports to Markdown

Usage: {name} [OPTIONS] <INPUT>...

Arguments:
  <INPUT>...  Export XML files or directories containing exports

Options:
  -o, --output <OUTPUT>     Output directory (default: .), or - for stdout
      --date <YYYY-MM-DD>   Generation date printed in the footer (default: today)
  -s, --stats               Print post/page/category/tag counts as JSON on stderr

Other options:
  -q, --quiet               Suppress progress messages
  -v, --verbose             Print debug messages
  -n, --dry-run             Show what would be written without writing
  -f, --force               Overwrite existing output files
  -h, --help                Print help
  -V, --version             Print version",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    );
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    // Show help if no arguments provided
    if std::env::args().len() == 1 {
        print_help();
        std::process::exit(0);
    }

    let mut input = Vec::new();
    let mut output = OutputTarget::Directory(PathBuf::from("."));
    let mut generated_on = None;
    let mut stats = false;
    let mut quiet = false;
    let mut verbose = false;
    let mut dry_run = false;
    let mut force = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => {
                let val: PathBuf = parser.value()?.parse()?;
                output = if val == Path::new("-") {
                    OutputTarget::Stdout
                } else {
                    OutputTarget::Directory(val)
                };
            }
            Long("date") => {
                let val: NaiveDate = parser
                    .value()?
                    .parse()
                    .map_err(|_| "date must be formatted as YYYY-MM-DD")?;
                generated_on = Some(val);
            }
            Short('s') | Long("stats") => stats = true,
            Short('q') | Long("quiet") => quiet = true,
            Short('v') | Long("verbose") => verbose = true,
            Short('n') | Long("dry-run") => dry_run = true,
            Short('f') | Long("force") => force = true,
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) => input.push(val.parse()?),
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        input,
        output,
        generated_on,
        stats,
        quiet,
        verbose,
        dry_run,
        force,
    })
}

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    // Only fails if a logger is already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let cli = parse_args().context(ParseArgsSnafu)?;
    init_logging(cli.log_level());

    ensure!(!cli.input.is_empty(), NoInputFilesSnafu);

    // Collect all input files first
    let files = collect_input_files(&cli.input);
    ensure!(!files.is_empty(), NoInputFilesSnafu);

    let mut session = Session::new(RenderOptions {
        generated_on: cli
            .generated_on
            .unwrap_or_else(|| Local::now().date_naive()),
    });

    match &cli.output {
        OutputTarget::Stdout => {
            ensure!(files.len() == 1, MultipleFilesToStdoutSnafu);
            process_to_stdout(&mut session, &files[0], &cli)?;
        }
        OutputTarget::Directory(dir) => {
            if !cli.dry_run {
                std::fs::create_dir_all(dir).context(CreateOutputDirSnafu)?;
            }
            let mut claimed = HashSet::new();
            for file in &files {
                process_file(&mut session, file, dir, &mut claimed, &cli)?;
            }
        }
    }

    Ok(())
}

/// Collects all XML files from the given inputs (files and directories).
fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| {
                    e.path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
                })
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Prints statistics as a JSON object on stderr when `--stats` is set.
fn report_stats(stats: &Statistics, cli: &Cli) -> Result<(), Error> {
    if cli.stats {
        let json = serde_json::to_string(stats).context(SerializeStatsSnafu)?;
        eprintln!("{json}");
    }
    Ok(())
}

/// Converts a single file and prints the Markdown to stdout.
fn process_to_stdout(session: &mut Session, input: &Path, cli: &Cli) -> Result<(), Error> {
    let conversion = session
        .convert_file(input)
        .context(ConvertSnafu { path: input })?;
    report_stats(&conversion.statistics, cli)?;

    if cli.dry_run {
        info!("Would output {} ({})", input.display(), conversion.statistics);
        return Ok(());
    }

    print!("{}", conversion.markdown);
    Ok(())
}

/// Converts a single file and writes it to the output directory.
fn process_file(
    session: &mut Session,
    input: &Path,
    out_dir: &Path,
    claimed: &mut HashSet<String>,
    cli: &Cli,
) -> Result<(), Error> {
    let conversion = session
        .convert_file(input)
        .context(ConvertSnafu { path: input })?;
    report_stats(&conversion.statistics, cli)?;

    let out_path = out_dir.join(claim_output_name(conversion, input, claimed)?);

    // Handle dry-run mode
    if cli.dry_run {
        info!("Would write {} ({})", out_path.display(), conversion.statistics);
        return Ok(());
    }

    // Check if output exists and handle overwrite
    if out_path.exists() && !cli.force {
        warn!(
            "Skipping {} (already exists, use --force to overwrite)",
            out_path.display()
        );
        return Ok(());
    }

    write_output(conversion, &out_path)?;
    info!("Wrote {} ({})", out_path.display(), conversion.statistics);
    Ok(())
}

/// Picks an output file name not yet used by another input in this run.
///
/// Exports of the same site share a title, so a clash falls back to the
/// input's file stem.
fn claim_output_name(
    conversion: &Conversion,
    input: &Path,
    claimed: &mut HashSet<String>,
) -> Result<String, Error> {
    let preferred = conversion.file_name();
    if claimed.insert(preferred.clone()) {
        return Ok(preferred);
    }

    let fallback = output_file_name("", &conversion.source_name);
    ensure!(
        claimed.insert(fallback.clone()),
        DuplicateOutputSnafu {
            path: input,
            name: preferred,
        }
    );
    info!(
        "{preferred} already used by another input, using {fallback} for {}",
        input.display()
    );
    Ok(fallback)
}

fn write_output(conversion: &Conversion, out_path: &Path) -> Result<(), Error> {
    std::fs::write(out_path, &conversion.markdown).context(WriteFileSnafu { path: out_path })
}
