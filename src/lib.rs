pub mod cache;
pub mod cli;
pub mod compare;
pub mod config;
pub mod digest;
pub mod error;
pub mod logging;
pub mod report;
pub mod scanner;
pub mod signal;
pub mod utils;

use std::io::Write;
use std::path::Path;

use log::{debug, warn};

pub use cache::{DigestSource, HashCache, ResolvedFile};
pub use cli::Cli;
pub use compare::{
    DirectoryComparison, FileComparison, Finding, Outcome, Side, compare_directories,
    compare_files, compare_indexes,
};
pub use config::Options;
pub use digest::{Digest, digest_file};
pub use error::XcompError;
pub use report::{Mode, Reporter};
pub use scanner::{DigestIndex, build_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathKind {
    File,
    Directory,
    Missing,
}

fn path_kind(path: &Path) -> PathKind {
    if path.is_dir() {
        PathKind::Directory
    } else if path.exists() {
        PathKind::File
    } else {
        PathKind::Missing
    }
}

/// Compares `options.path1` against `options.path2` and writes the report to
/// `out`.
///
/// Returns the overall outcome; every fatal condition (missing input, file
/// versus directory, cache problems, unreadable file) is an error instead.
pub fn run<W: Write>(options: &Options, out: W) -> error::Result<Outcome> {
    let (left, right) = (options.path1.as_path(), options.path2.as_path());
    let mode = match (path_kind(left), path_kind(right)) {
        (PathKind::File, PathKind::File) => Mode::Files,
        (PathKind::Directory, PathKind::Directory) => Mode::Directories,
        (PathKind::Missing, _) | (_, PathKind::Missing) => {
            let paths = [left, right]
                .into_iter()
                .filter(|p| path_kind(p) == PathKind::Missing)
                .map(Path::to_path_buf)
                .collect();
            return Err(XcompError::PathNotFound { paths });
        }
        (PathKind::File, PathKind::Directory) => {
            return Err(XcompError::FileVersusDirectory {
                file: left.to_path_buf(),
                directory: right.to_path_buf(),
            });
        }
        (PathKind::Directory, PathKind::File) => {
            return Err(XcompError::DirectoryVersusFile {
                directory: left.to_path_buf(),
                file: right.to_path_buf(),
            });
        }
    };
    debug!("Comparing {} in {:?} mode: {:?}", left.display(), mode, options);

    let cache = HashCache::load(&options.cache_files)?;
    let mut reporter = Reporter::new(out, options.format, options.verbose, options.color);

    let outcome = match mode {
        Mode::Files => {
            if options.recursive {
                warn!("--recursive has no effect when comparing two files");
            }
            let comparison = compare_files(left, right, &cache)?;
            reporter.file_resolved(&comparison.left)?;
            reporter.file_resolved(&comparison.right)?;
            let outcome = comparison.outcome();
            reporter.report(mode, &comparison.findings(), outcome)?;
            outcome
        }
        Mode::Directories => {
            let mut write_error = None;
            let comparison = compare_directories(left, right, options, &cache, |file| {
                if write_error.is_none() {
                    write_error = reporter.file_resolved(file).err();
                }
            });
            if let Some(err) = write_error {
                return Err(err.into());
            }
            let comparison = comparison?;
            let outcome = comparison.outcome();
            reporter.report(mode, &comparison.findings, outcome)?;
            outcome
        }
    };
    Ok(outcome)
}
