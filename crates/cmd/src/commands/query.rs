// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Result, anyhow};
use arrow_csv::WriterBuilder;
use clap::ValueEnum;
use duckdb::arrow::record_batch::RecordBatch;
use duckdb::arrow::util::pretty::pretty_format_batches;
use pipeline::Session;
use std::io::Write;

use crate::common::ReportContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table
    #[default]
    Table,
    /// CSV with a header row
    Csv,
    /// Number of result rows only
    Count,
}

/// Execute an ad-hoc SQL query against the loaded source table
pub fn query_command(
    ctx: &ReportContext,
    sql: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    diagnostics::debug!("query_command called with sql: {sql}", sql: sql);

    // No output directory is needed, so open a bare session
    let config = ctx.resolve_config()?;
    let session = Session::open_in_memory()?;
    session.load_csv(&config.table, &config.source, config.header)?;

    let result = session.query("<adhoc>", sql)?;

    match format {
        OutputFormat::Table => {
            if result.num_rows() == 0 {
                writeln!(out, "No results found.")?;
            } else {
                let formatted = pretty_format_batches(&result.batches)
                    .map_err(|e| anyhow!("Failed to format results as table: {}", e))?;
                writeln!(out, "{}", formatted)?;
            }
        }
        OutputFormat::Csv => {
            let mut csv_writer = WriterBuilder::new().with_header(true).build(&mut *out);
            if result.batches.is_empty() {
                csv_writer
                    .write(&RecordBatch::new_empty(result.schema.clone()))
                    .map_err(|e| anyhow!("Failed to write CSV: {}", e))?;
            }
            for batch in &result.batches {
                csv_writer
                    .write(batch)
                    .map_err(|e| anyhow!("Failed to write CSV: {}", e))?;
            }
        }
        OutputFormat::Count => {
            writeln!(out, "{}", result.num_rows())?;
        }
    }

    session.close()?;
    Ok(())
}
