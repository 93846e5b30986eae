use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xcomp", version)]
#[command(about = "Compare two paths using the xxh64 hash algorithm. Paths must be both files or both directories.")]
pub struct Cli {
    /// Path to a file or a directory
    pub path1: PathBuf,

    /// Path to a file or a directory
    pub path2: PathBuf,

    /// Plain text file(s) used as cache for file hashes, consulted for single
    /// files as well as directory trees. Lines should look like:
    /// d50463dd92503d34 '/path/to/file'
    #[arg(short, long = "cache-file", visible_alias = "cache_file", value_name = "FILE")]
    pub cache_file: Vec<PathBuf>,

    /// Compare every file below both directories, subdirectories included
    #[arg(short, long)]
    pub recursive: bool,

    /// Show the digest and full path of each file
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of parallel threads for hashing (default: number of CPU cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Never color the report
    #[arg(long)]
    pub no_color: bool,

    /// TOML file with default options
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Diagnostic log level (written to stderr)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
