// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Pipeline - loads one CSV dataset into an in-memory DuckDB table, runs a
//! fixed list of KPI query files against it and exports each result as CSV
//! for the dashboard.

pub mod config;
pub mod error;
pub mod export;
pub mod runner;
pub mod session;

pub use config::{KpiSpec, PipelineConfig};
pub use error::{ErrorKind, PipelineError, Result};
pub use export::write_csv;
pub use runner::{KpiOutput, PipelineRunner, run_pipeline};
pub use session::{QueryResult, Session};
