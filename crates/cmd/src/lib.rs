// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod commands;
pub mod common;

pub use commands::list::list_command;
pub use commands::query::{OutputFormat, query_command};
pub use commands::run::run_command;
pub use common::ReportContext;
