use std::path::Path;

use color_eyre::eyre::WrapErr;
use comm_core::{LabelPaths, LabelingConfig, LabelingTables, Letter, PieceType};
use serde::Deserialize;

/// Optional settings read from a TOML file.
///
/// ```toml
/// edge_buffer = "c"
/// corner_buffer = "c"
///
/// [labels]
/// edge_labels = "labels/edge_labels.csv"
/// corner_labels = "labels/corner_labels.csv"
/// edge_connections = "labels/edge_connections.csv"
/// corner_connections = "labels/corner_connections.csv"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub edge_buffer: Option<Letter>,
    pub corner_buffer: Option<Letter>,
    /// Alternative lettering; the standard Speffz scheme otherwise
    pub labels: Option<LabelPaths>,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> color_eyre::Result<CliConfig> {
        let Some(path) = path else {
            return Ok(CliConfig::default());
        };

        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read configuration file {}", path.display()))?;

        toml::from_str(&text)
            .wrap_err_with(|| format!("Failed to parse configuration file {}", path.display()))
    }

    /// A buffer given on the command line wins over the configured one.
    pub fn buffer(&self, piece_type: PieceType, flag: Option<Letter>) -> Letter {
        let configured = match piece_type {
            PieceType::Edge => self.edge_buffer,
            PieceType::Corner => self.corner_buffer,
        };

        flag.or(configured).unwrap_or(Letter::DEFAULT_BUFFER)
    }

    pub fn tables(&self) -> color_eyre::Result<LabelingTables> {
        let config = match &self.labels {
            Some(paths) => LabelingConfig::load(paths)?,
            None => LabelingConfig::speffz()?,
        };

        Ok(LabelingTables::new(&config)?)
    }
}
