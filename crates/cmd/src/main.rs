// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::{OutputFormat, ReportContext, list_command, query_command, run_command};

/// Loads the ticket dataset into DuckDB and exports each KPI query as CSV
/// for the dashboard.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "kpi-report")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pipeline configuration (YAML). Defaults to $KPI_CONFIG, then built-in settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the source CSV file
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Override the directory holding the query files
    #[arg(long, global = true)]
    queries_dir: Option<PathBuf>,

    /// Override the directory the KPI files are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Log each step to stderr (same as KPI_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the source and export every KPI (the default)
    Run,
    /// List the configured KPIs in run order
    #[command(visible_alias = "ls")]
    List,
    /// Run one SQL statement against the loaded source table
    Query {
        /// SQL text, e.g. "SELECT queue, COUNT(*) FROM dataset_tickets GROUP BY 1"
        sql: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    match main_result() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}

fn main_result() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        diagnostics::init_with_level("info");
    } else {
        diagnostics::init_diagnostics();
    }

    let ctx = ReportContext {
        config_path: cli.config,
        source: cli.source,
        queries_dir: cli.queries_dir,
        output_dir: cli.output_dir,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_command(&ctx, &mut out).map(|_| ()),
        Commands::List => list_command(&ctx, &mut out),
        Commands::Query { sql, format } => query_command(&ctx, &sql, format, &mut out),
    }
}
