use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use sieve::{SieveConfig, SieveError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Sieve(#[from] SieveError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Missing '--{0}' argument")]
    MissingArgument(&'static str),
    #[error("Target directory {0} holds the source files; choose another directory")]
    TargetOverwritesSource(PathBuf),
}

/// Sieve small polygons and holes out of a GeoJSON dataset
#[derive(Parser, Debug, Clone)]
#[command(name = "polygon-sieve", author, version, about, long_about = None)]
pub struct SieveArgs {
    /// Source GeoJSON file, or a directory of them
    #[arg(short, long, env = "SOURCE_GEOJSON", required_unless_present = "print_schema")]
    pub source: Option<PathBuf>,

    /// Target directory, one GeoJSON file per source table
    #[arg(short, long, env = "TARGET_GEOJSON", required_unless_present = "print_schema")]
    pub target: Option<PathBuf>,

    /// Resolution, the threshold area to determine if a feature is sieved or not
    #[arg(short, long, env = "SIEVE_RESOLUTION")]
    pub resolution: Option<f64>,

    /// Page size, how many features are written per page to the target
    #[arg(short, long = "pagesize", env = "SIEVE_PAGESIZE")]
    pub page_size: Option<usize>,

    /// Drop sieved polygons instead of replacing them by their centroid
    #[arg(long)]
    pub drop_reduced: bool,

    /// Memory limit of the target in megabytes
    #[arg(long, env = "SIEVE_MEMORY_LIMIT")]
    pub memory_limit: Option<f64>,

    /// Path to a TOML or JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    pub print_schema: bool,
}

impl SieveArgs {
    /// Build the run configuration: file values first, then explicit flags.
    pub fn to_config(&self) -> Result<SieveConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => SieveConfig::from_file(path)?,
            None => SieveConfig::default(),
        };

        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if self.drop_reduced {
            config.replace_with_centroid = false;
        }
        if self.memory_limit.is_some() {
            config.memory_limit_mb = self.memory_limit;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn source(&self) -> Result<&Path, CliError> {
        self.source.as_deref().ok_or(CliError::MissingArgument("source"))
    }

    pub fn target(&self) -> Result<&Path, CliError> {
        self.target.as_deref().ok_or(CliError::MissingArgument("target"))
    }
}

/// Refuse a target directory that would truncate the source files.
pub fn check_target(source: &Path, target: &Path) -> Result<(), CliError> {
    if !target.exists() {
        return Ok(());
    }

    let source = fs::canonicalize(source)?;
    let source_dir = if source.is_dir() {
        source.as_path()
    } else {
        source.parent().unwrap_or(source.as_path())
    };
    if fs::canonicalize(target)? == source_dir {
        return Err(CliError::TargetOverwritesSource(target.to_path_buf()));
    }
    Ok(())
}
