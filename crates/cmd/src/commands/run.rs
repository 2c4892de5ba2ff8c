// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Run command - loads the source CSV and exports every configured KPI
//!
//! Example:
//!   kpi-report --config pipeline.yaml run
//!
//! Prints `Saved <file>` as each KPI file is written. The first failure
//! stops the run; files saved before it are kept.

use crate::common::ReportContext;
use anyhow::{Context, Result};
use pipeline::{KpiOutput, run_pipeline};
use std::io::Write;

pub fn run_command(ctx: &ReportContext, out: &mut impl Write) -> Result<Vec<KpiOutput>> {
    let config = ctx.resolve_config()?;
    diagnostics::debug!("Running {count} KPIs", count: config.kpis.len() as u64);

    let mut write_error = None;
    let outputs = run_pipeline(config, |saved| {
        if write_error.is_none() {
            write_error = writeln!(out, "Saved {}", saved.name).err();
        }
    })
    .context("KPI report failed")?;

    if let Some(err) = write_error {
        return Err(err).context("Failed to write confirmation");
    }

    Ok(outputs)
}
