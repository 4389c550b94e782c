use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Error, Debug)]
pub enum SieveError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedConfigFormat(PathBuf),

    #[error("Source dataset not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Table {name} is provided by both {} and {}", .first.display(), .second.display())]
    DuplicateTable {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Table {0} has not been started on the target")]
    TableNotStarted(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Pipeline stage panicked: {0}")]
    StagePanicked(Stage),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SieveError>;
