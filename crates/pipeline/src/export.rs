// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{PipelineError, Result};
use crate::session::QueryResult;
use arrow_csv::WriterBuilder;
use duckdb::arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a result set to `path` as comma-separated values with a header row.
///
/// The file is truncated if it exists. A result with no rows still gets its
/// header line. Returns the number of data rows written.
pub fn write_csv(path: &Path, result: &QueryResult) -> Result<usize> {
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let export_err = |source| PipelineError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));

    // The header is emitted on the first write, so an empty result needs
    // one empty batch carrying the schema
    if result.batches.is_empty() {
        writer
            .write(&RecordBatch::new_empty(result.schema.clone()))
            .map_err(export_err)?;
    }

    for batch in &result.batches {
        writer.write(batch).map_err(export_err)?;
    }

    writer
        .into_inner()
        .flush()
        .map_err(|e| PipelineError::io(path, e))?;

    Ok(result.num_rows())
}
