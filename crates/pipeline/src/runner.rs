// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The load, query, export pipeline.
//!
//! A [`PipelineRunner`] owns the DuckDB session for its whole lifetime. KPIs
//! run strictly in configured order and the first failure ends the run;
//! files written by earlier KPIs stay on disk.

use crate::config::{KpiSpec, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::export::write_csv;
use crate::session::{QueryResult, Session};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// Confirmation that one KPI file was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiOutput {
    /// Output file name, as configured
    pub name: String,
    /// Full path of the written file
    pub path: PathBuf,
    /// Data rows written, excluding the header
    pub rows: usize,
}

#[derive(Debug)]
pub struct PipelineRunner {
    config: PipelineConfig,
    session: Session,
}

impl PipelineRunner {
    /// Open a session and create the output directory if missing.
    pub fn initialize(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        std::fs::create_dir_all(&config.output_dir)
            .map_err(|e| PipelineError::io(&config.output_dir, e))?;

        let session = Session::open_in_memory()?;
        let output_dir = config.output_dir.display().to_string();
        diagnostics::info!("Pipeline initialized, writing to {output_dir}", output_dir: output_dir);

        Ok(Self { config, session })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load `path` into the configured source table, replacing it if present.
    pub fn load_source(&self, path: &Path) -> Result<u64> {
        let rows = self
            .session
            .load_csv(&self.config.table, path, self.config.header)?;

        let table = self.config.table.as_str();
        let source = path.display().to_string();
        diagnostics::info!(
            "Loaded {rows} rows from {source} into {table}",
            rows: rows,
            source: source,
            table: table
        );
        Ok(rows)
    }

    /// Load the configured source file.
    pub fn load_configured_source(&self) -> Result<u64> {
        self.load_source(&self.config.source)
    }

    /// Run ad-hoc SQL against the session.
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        self.session.query("<adhoc>", sql)
    }

    /// Run the SQL in `query_path` and export its result to `output_name`
    /// inside the output directory.
    pub fn run_kpi(&self, query_path: &Path, output_name: &str) -> Result<KpiOutput> {
        let sql = std::fs::read_to_string(query_path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound => PipelineError::not_found(query_path),
            _ => PipelineError::io(query_path, e),
        })?;

        let origin = query_path.display().to_string();
        let result = self.session.query(&origin, &sql)?;

        let path = self.config.output_dir.join(output_name);
        let rows = write_csv(&path, &result)?;

        let saved = path.display().to_string();
        let row_count = rows as u64;
        diagnostics::info!(
            "Saved {output_name} ({row_count} rows) to {saved}",
            output_name: output_name,
            row_count: row_count,
            saved: saved
        );

        Ok(KpiOutput {
            name: output_name.to_string(),
            path,
            rows,
        })
    }

    fn run_spec(&self, kpi: &KpiSpec) -> Result<KpiOutput> {
        self.run_kpi(&self.config.query_path(kpi), &kpi.output)
    }

    /// Run every configured KPI in order, stopping at the first failure.
    ///
    /// `on_saved` is called after each file is written, before the next KPI
    /// starts.
    pub fn run_all<F>(&self, mut on_saved: F) -> Result<Vec<KpiOutput>>
    where
        F: FnMut(&KpiOutput),
    {
        let mut outputs = Vec::with_capacity(self.config.kpis.len());
        for kpi in &self.config.kpis {
            let output = self.run_spec(kpi).inspect_err(|e| {
                let error = e.to_string();
                let query = kpi.query.display().to_string();
                diagnostics::error!("KPI {query} failed: {error}", query: query, error: error);
            })?;
            on_saved(&output);
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Release the session.
    pub fn shutdown(self) -> Result<()> {
        self.session.close()?;
        diagnostics::info!("Pipeline shut down");
        Ok(())
    }
}

/// Initialize, load the configured source, run every KPI and shut down.
pub fn run_pipeline<F>(config: PipelineConfig, on_saved: F) -> Result<Vec<KpiOutput>>
where
    F: FnMut(&KpiOutput),
{
    let runner = PipelineRunner::initialize(config)?;
    runner.load_configured_source()?;
    let outputs = runner.run_all(on_saved)?;
    runner.shutdown()?;
    Ok(outputs)
}
