use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::cli::{Cli, OutputFormat};
use crate::error::{Result, XcompError};

/// Defaults read from a TOML config file.
///
/// ```toml
/// cache_files = ["/data/hashes.txt"]
/// recursive = true
/// verbose = false
/// threads = 4
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub cache_files: Vec<PathBuf>,
    pub recursive: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| XcompError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&text).map_err(|e| XcompError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

/// Everything a comparison run needs. Built once and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub path1: PathBuf,
    pub path2: PathBuf,
    pub cache_files: Vec<PathBuf>,
    pub recursive: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
    pub format: OutputFormat,
    pub color: bool,
}

impl Options {
    pub fn new(path1: impl Into<PathBuf>, path2: impl Into<PathBuf>) -> Self {
        Self {
            path1: path1.into(),
            path2: path2.into(),
            cache_files: Vec::new(),
            recursive: false,
            verbose: false,
            threads: None,
            format: OutputFormat::Text,
            color: false,
        }
    }

    /// Command line flags layered over the optional config file. Flags can
    /// only switch booleans on; config cache files are read before the ones
    /// given on the command line.
    pub fn from_cli(cli: &Cli, file: FileConfig, color: bool) -> Self {
        let mut cache_files = file.cache_files;
        cache_files.extend(cli.cache_file.iter().cloned());
        Self {
            path1: cli.path1.clone(),
            path2: cli.path2.clone(),
            cache_files,
            recursive: cli.recursive || file.recursive,
            verbose: cli.verbose || file.verbose,
            threads: cli.threads.or(file.threads),
            format: cli.format,
            color: color && !cli.no_color,
        }
    }
}
