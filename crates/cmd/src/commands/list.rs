// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::ReportContext;
use anyhow::Result;
use std::io::Write;

/// Print the configured KPIs in run order without opening a session
pub fn list_command(ctx: &ReportContext, out: &mut impl Write) -> Result<()> {
    let config = ctx.resolve_config()?;

    writeln!(out, "Source: {} (table {})", config.source.display(), config.table)?;
    for (i, kpi) in config.kpis.iter().enumerate() {
        writeln!(
            out,
            "{}. {} -> {}",
            i + 1,
            config.query_path(kpi).display(),
            config.output_dir.join(&kpi.output).display()
        )?;
    }
    Ok(())
}
