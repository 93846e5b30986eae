use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal conditions. Any of these aborts the whole comparison.
///
/// A content mismatch is not an error; see [`crate::compare::Outcome`].
#[derive(Error, Debug)]
pub enum XcompError {
    #[error("{}", describe_missing(.paths))]
    PathNotFound { paths: Vec<PathBuf> },

    #[error("can't compare a single file ({}) with a directory ({})", .file.display(), .directory.display())]
    FileVersusDirectory { file: PathBuf, directory: PathBuf },

    #[error("can't compare a directory ({}) with a single file ({})", .directory.display(), .file.display())]
    DirectoryVersusFile { directory: PathBuf, file: PathBuf },

    #[error("the cache file ({}) doesn't exist", .0.display())]
    CacheFileNotFound(PathBuf),

    #[error("failed to read cache file {}", .path.display())]
    CacheRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("the cache file(s) ({}) don't comply with format requirements", join_paths(.sources))]
    CacheFormatInvalid { sources: Vec<PathBuf> },

    #[error("failed to read file {}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk directory {}", .root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[error("invalid config file {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to write report")]
    Output(#[from] std::io::Error),

    #[error("interrupted")]
    Interrupted,
}

impl XcompError {
    pub fn not_found(path: &Path) -> Self {
        Self::PathNotFound {
            paths: vec![path.to_path_buf()],
        }
    }
}

fn describe_missing(paths: &[PathBuf]) -> String {
    match paths {
        [single] => format!("the path '{}' doesn't exist", single.display()),
        _ => format!(
            "the paths {} don't exist",
            paths
                .iter()
                .map(|p| format!("'{}'", p.display()))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = XcompError> = std::result::Result<T, E>;
