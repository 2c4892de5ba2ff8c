// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory DuckDB session holding the source table.

use crate::error::{PipelineError, Result};
use duckdb::Connection;
use duckdb::arrow::datatypes::SchemaRef;
use duckdb::arrow::record_batch::RecordBatch;
use std::path::Path;

/// A fully materialized query result.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl QueryResult {
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.fields().iter().map(|f| f.name().clone()).collect()
    }
}

#[derive(Debug)]
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Open a session against an empty in-memory catalog.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(PipelineError::Session)?;
        diagnostics::debug!("Opened in-memory DuckDB session");
        Ok(Self { conn })
    }

    /// Load a CSV file into `table`, replacing any table of that name.
    ///
    /// Delimiter, quoting and column types are sniffed by DuckDB. `header`
    /// of `None` leaves header detection to the sniffer as well. Returns the
    /// number of rows loaded.
    ///
    /// DuckDB expands glob patterns in CSV paths, so a path containing
    /// `*`, `?` or `[` is refused rather than loading several files.
    pub fn load_csv(&self, table: &str, path: &Path, header: Option<bool>) -> Result<u64> {
        if !path.is_file() {
            return Err(PipelineError::load(path, "no such file"));
        }

        let path_text = path.to_string_lossy();
        if path_text.contains(GLOB_CHARS) {
            return Err(PipelineError::load(
                path,
                "path contains glob characters (*, ?, [)",
            ));
        }

        let options = match header {
            Some(header) => format!(", header = {header}"),
            None => String::new(),
        };
        let sql = format!(
            "CREATE OR REPLACE TABLE {} AS SELECT * FROM read_csv_auto({}{})",
            quote_identifier(table),
            quote_literal(&path_text),
            options,
        );
        diagnostics::debug!("Loading source: {sql}", sql: sql);

        self.conn
            .execute_batch(&sql)
            .map_err(|e| PipelineError::load(path, e.to_string()))?;

        let count_sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let rows: i64 = self
            .conn
            .query_row(&count_sql, [], |row| row.get(0))
            .map_err(|e| PipelineError::load(path, e.to_string()))?;

        Ok(u64::try_from(rows).unwrap_or_default())
    }

    /// Execute one SQL statement and collect every batch of its result.
    ///
    /// `origin` names the statement in error messages.
    pub fn query(&self, origin: &str, sql: &str) -> Result<QueryResult> {
        diagnostics::debug!("Executing {origin}: {sql}", origin: origin, sql: sql);

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| PipelineError::query(origin, e))?;
        let arrow = stmt
            .query_arrow([])
            .map_err(|e| PipelineError::query(origin, e))?;

        let schema = arrow.get_schema();
        let batches: Vec<RecordBatch> = arrow.collect();

        Ok(QueryResult { schema, batches })
    }

    /// Close the connection, releasing the in-memory catalog.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_conn, e)| PipelineError::Session(e))?;
        diagnostics::debug!("Closed DuckDB session");
        Ok(())
    }
}

const GLOB_CHARS: [char; 3] = ['*', '?', '['];

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
