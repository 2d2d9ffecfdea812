//! Sheetxfer - aggregate a spreadsheet column and write the result into another workbook

mod config;
mod report;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand};
use sheetxfer_core::{CellRef, Operation, Session, SourceFile, WorkbookId};
use sheetxfer_engine::engine::{Preview, column_label};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "sheetxfer", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: <config dir>/sheetxfer/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the sheets of one or more files
    Preview {
        /// Spreadsheet files (.xlsx, .xls, .csv)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Data rows to show per sheet
        #[arg(long)]
        rows: Option<usize>,
        /// Only show this sheet
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Compute statistics for one column
    Stats {
        file: PathBuf,
        #[arg(long)]
        sheet: Option<String>,
        /// Zero-based column index or header label
        #[arg(long)]
        column: String,
        /// Operation to mark as selected
        #[arg(long)]
        op: Option<Operation>,
        /// Print stats as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a column statistic into a cell of another workbook
    Transfer {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        source_sheet: Option<String>,
        /// Zero-based column index or header label
        #[arg(long)]
        column: String,
        #[arg(long)]
        op: Option<Operation>,
        #[arg(long)]
        target: PathBuf,
        #[arg(long)]
        target_sheet: Option<String>,
        /// Target cell in A1 notation
        #[arg(long, conflicts_with_all = ["row", "col"], required_unless_present_all = ["row", "col"])]
        cell: Option<String>,
        /// Zero-based target row
        #[arg(long, requires = "col")]
        row: Option<usize>,
        /// Zero-based target column
        #[arg(long, requires = "row")]
        col: Option<usize>,
        /// Where to write the updated target (default: its file name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let (config, warnings) = config::load_config(cli.config.as_deref());
    for warning in warnings {
        tracing::warn!("{}", warning);
    }

    match cli.command {
        Command::Preview { files, rows, sheet } => {
            let limit = rows.unwrap_or(config.preview_rows);
            preview(&files, limit, sheet.as_deref())
        }
        Command::Stats {
            file,
            sheet,
            column,
            op,
            json,
        } => {
            let mut session = Session::with_limits(config.limits);
            let id = load_one(&mut session, &file)?;
            select_source(&mut session, id, sheet.as_deref(), &column)?;
            session.select_operation(op.unwrap_or(config.operation));

            let stats = session
                .stats()
                .copied()
                .ok_or_else(|| anyhow!("Column {} has no numeric values", column))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", report::render_stats(&stats, session.selection().operation));
            }
            Ok(())
        }
        Command::Transfer {
            source,
            source_sheet,
            column,
            op,
            target,
            target_sheet,
            cell,
            row,
            col,
            output,
        } => {
            let cell = match (cell, row, col) {
                (Some(a1), _, _) => CellRef::from_str(&a1)
                    .ok_or_else(|| anyhow!("Invalid cell reference: {}", a1))?,
                (None, Some(row), Some(col)) => CellRef::new(row, col),
                _ => bail!("Either --cell or both --row and --col are required"),
            };

            let mut session = Session::with_limits(config.limits);
            let source_id = load_one(&mut session, &source)?;
            let target_id = if same_file(&source, &target) {
                source_id
            } else {
                load_one(&mut session, &target)?
            };

            select_source(&mut session, source_id, source_sheet.as_deref(), &column)?;
            session.select_operation(op.unwrap_or(config.operation));
            session.select_target(target_id)?;
            if let Some(name) = target_sheet.as_deref() {
                session.select_target_sheet(name)?;
            }
            session.select_target_cell(cell.row, cell.col)?;

            let receipt = session.transfer().with_context(|| {
                format!("Cannot transfer column {} of {}", column, source.display())
            })?;

            let (file_name, bytes) = session.export(target_id)?;
            let out_path = output.unwrap_or_else(|| PathBuf::from(file_name));
            std::fs::write(&out_path, bytes)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;

            println!(
                "{} {}!{} = {}",
                receipt.operation,
                receipt.sheet,
                CellRef::new(receipt.row, receipt.col),
                receipt.value
            );
            println!("Wrote {}", out_path.display());
            Ok(())
        }
    }
}

fn preview(files: &[PathBuf], limit: usize, sheet: Option<&str>) -> Result<()> {
    let mut session = Session::new();
    let mut batch = Vec::with_capacity(files.len());
    for path in files {
        match SourceFile::read(path) {
            Ok(file) => batch.push(file),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file"),
        }
    }

    // Rejected and undecodable files are logged by the session.
    let outcome = session.ingest(batch);
    tracing::debug!(loaded = outcome.loaded.len(), clean = outcome.is_clean(), "preview batch loaded");
    if session.workbooks().is_empty() {
        bail!("No workbooks loaded");
    }

    let mut shown = 0;
    for workbook in session.workbooks() {
        println!("== {}", workbook.summary());
        for entry in workbook.sheets() {
            if sheet.is_some_and(|name| name != entry.name) {
                continue;
            }
            println!("-- {}", entry.name);
            print!("{}", report::render_preview(&Preview::new(&entry.grid, limit)));
            shown += 1;
        }
    }
    if let (Some(name), 0) = (sheet, shown) {
        bail!("Sheet not found: {}", name);
    }
    Ok(())
}

/// Load a single file, failing if it cannot be decoded.
fn load_one(session: &mut Session, path: &Path) -> Result<WorkbookId> {
    let file =
        SourceFile::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let outcome = session.ingest(vec![file]);
    if let Some((name, reason)) = outcome.rejected.first().or(outcome.failed.first()) {
        bail!("{}: {}", name, reason);
    }
    outcome
        .loaded
        .first()
        .copied()
        .ok_or_else(|| anyhow!("Failed to load {}", path.display()))
}

fn select_source(
    session: &mut Session,
    id: WorkbookId,
    sheet: Option<&str>,
    column: &str,
) -> Result<()> {
    session.select_source(id)?;
    if let Some(name) = sheet {
        session.select_source_sheet(name)?;
    }
    let col = resolve_column(session, column)?;
    session.select_column(col)?;
    Ok(())
}

/// A column given as a zero-based index, or as a header label.
fn resolve_column(session: &Session, column: &str) -> Result<usize> {
    if let Ok(index) = column.trim().parse::<usize>() {
        return Ok(index);
    }
    let source = session
        .selection()
        .source
        .as_ref()
        .ok_or_else(|| anyhow!("No source selected"))?;
    let grid = session
        .workbook(source.workbook)
        .and_then(|wb| wb.sheet(&source.sheet))
        .ok_or_else(|| anyhow!("Sheet not found: {}", source.sheet))?;

    let labels: Vec<String> = (0..grid.header().len())
        .map(|col| column_label(grid, col))
        .collect();
    labels
        .iter()
        .position(|label| label == column)
        .or_else(|| labels.iter().position(|label| label.eq_ignore_ascii_case(column)))
        .ok_or_else(|| anyhow!("No column labelled {:?} in sheet {}", column, source.sheet))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
