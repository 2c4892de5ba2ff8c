// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use pipeline::PipelineConfig;

/// Environment variable naming a default configuration file.
pub const CONFIG_ENV: &str = "KPI_CONFIG";

/// Get the config path with an optional override, falling back to KPI_CONFIG
pub fn get_config_path_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    override_path.or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Command-line settings that shape the pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub config_path: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub queries_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl ReportContext {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            ..Self::default()
        }
    }

    /// Load the configuration file, or the built-in defaults when none is
    /// given, then apply flag overrides.
    pub fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match get_config_path_with_override(self.config_path.clone()) {
            Some(path) => PipelineConfig::load(&path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(queries_dir) = &self.queries_dir {
            config.queries_dir = queries_dir.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}
