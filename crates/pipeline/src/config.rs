// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Pipeline configuration, parsed from YAML.
//!
//! Every field is optional; an empty document yields the built-in ticket
//! KPI report.
//!
//! ```yaml
//! source: data/raw/dataset-tickets-multi-lang-4-20k.csv
//! table: dataset_tickets
//! header: true        # omit to let DuckDB detect the header row
//! queries_dir: sql
//! output_dir: powerbi/data
//! kpis:
//!   - query: kpi_ticket_volume.sql
//!     output: kpi_ticket_volume.csv
//! ```

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "data/raw/dataset-tickets-multi-lang-4-20k.csv";
pub const DEFAULT_TABLE: &str = "dataset_tickets";
pub const DEFAULT_QUERIES_DIR: &str = "sql";
pub const DEFAULT_OUTPUT_DIR: &str = "powerbi/data";

/// The ticket KPIs, in run order: (query file, output file).
pub const DEFAULT_KPIS: [(&str, &str); 5] = [
    ("kpi_ticket_volume.sql", "kpi_ticket_volume.csv"),
    ("kpi_priority_mix.sql", "kpi_priority_mix.csv"),
    ("kpi_queue_workload_concentration.sql", "kpi_queue_concentration.csv"),
    ("kpi_ticket_type_mix.sql", "kpi_ticket_type_mix.csv"),
    ("kpi_top_recurring_issues.sql", "kpi_top_issues.csv"),
];

/// One KPI step: a query file and the CSV it is exported to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSpec {
    /// Query file, relative to `queries_dir` unless absolute
    pub query: PathBuf,
    /// Output file name inside `output_dir`
    pub output: String,
}

impl KpiSpec {
    pub fn new(query: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// CSV file loaded into the source table
    pub source: PathBuf,
    /// Name of the source table the queries select from
    pub table: String,
    /// Whether the first CSV line is a header; `None` lets DuckDB decide
    pub header: Option<bool>,
    pub queries_dir: PathBuf,
    pub output_dir: PathBuf,
    pub kpis: Vec<KpiSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            table: DEFAULT_TABLE.to_string(),
            header: None,
            queries_dir: PathBuf::from(DEFAULT_QUERIES_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            kpis: DEFAULT_KPIS
                .iter()
                .map(|(query, output)| KpiSpec::new(*query, *output))
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;

        let mut config = Self::from_yaml(&content)
            .map_err(|e| PipelineError::config(format!("{}: {}", path.display(), e)))?;

        if let Some(base) = path.parent() {
            config = config.relative_to(base);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without resolving paths or validating.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document parses as null, which means all defaults
        let parsed: Option<Self> = serde_yaml_ng::from_str(content).map_err(|e| {
            PipelineError::config(format!("Failed to parse YAML configuration: {e}"))
        })?;
        Ok(parsed.unwrap_or_default())
    }

    /// Resolve relative paths against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.source = resolve(base, &self.source);
        self.queries_dir = resolve(base, &self.queries_dir);
        self.output_dir = resolve(base, &self.output_dir);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.kpis.is_empty() {
            return Err(PipelineError::config("At least one KPI must be configured"));
        }

        if !is_identifier(&self.table) {
            return Err(PipelineError::config(format!(
                "Table name '{}' is not a plain SQL identifier",
                self.table
            )));
        }

        let mut seen = BTreeSet::new();
        for kpi in &self.kpis {
            if kpi.output.is_empty() {
                return Err(PipelineError::config(format!(
                    "Output name cannot be empty for query {}",
                    kpi.query.display()
                )));
            }
            if kpi.output.contains(['/', '\\']) || kpi.output == "." || kpi.output == ".." {
                return Err(PipelineError::config(format!(
                    "Output name '{}' must be a plain file name",
                    kpi.output
                )));
            }
            if !seen.insert(kpi.output.as_str()) {
                return Err(PipelineError::config(format!(
                    "Output name '{}' is used by more than one KPI",
                    kpi.output
                )));
            }
        }

        Ok(())
    }

    /// Full path of a KPI's query file.
    pub fn query_path(&self, kpi: &KpiSpec) -> PathBuf {
        resolve(&self.queries_dir, &kpi.query)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
