use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::cache::{HashCache, ResolvedFile};
use crate::config::Options;
use crate::digest::Digest;
use crate::error::Result;
use crate::scanner::{DigestIndex, build_index};
use crate::utils::{serialize_path_lossy, serialize_paths_lossy};

/// Overall answer of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Redundant,
    NotRedundant,
}

impl Outcome {
    pub fn is_redundant(self) -> bool {
        self == Self::Redundant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// One classified digest of a directory comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Two or more files on the same side share a digest.
    InternalDuplicate {
        side: Side,
        digest: Digest,
        #[serde(serialize_with = "serialize_paths_lossy")]
        paths: Vec<PathBuf>,
    },
    /// The digest exists on both sides; left paths come first.
    Redundant {
        digest: Digest,
        #[serde(serialize_with = "serialize_paths_lossy")]
        paths: Vec<PathBuf>,
    },
    UniqueLeft {
        digest: Digest,
        #[serde(serialize_with = "serialize_path_lossy")]
        path: PathBuf,
    },
    UniqueRight {
        digest: Digest,
        #[serde(serialize_with = "serialize_path_lossy")]
        path: PathBuf,
    },
}

impl Finding {
    pub fn is_unique(&self) -> bool {
        matches!(self, Self::UniqueLeft { .. } | Self::UniqueRight { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileComparison {
    pub left: ResolvedFile,
    pub right: ResolvedFile,
    /// The two inputs were spelled differently.
    pub distinct_paths: bool,
}

impl FileComparison {
    pub fn outcome(&self) -> Outcome {
        if self.left.digest == self.right.digest {
            Outcome::Redundant
        } else {
            Outcome::NotRedundant
        }
    }

    /// Equal content is one redundant pair (reported only for two distinct
    /// inputs); different content is one unique file per side.
    pub fn findings(&self) -> Vec<Finding> {
        match self.outcome() {
            Outcome::Redundant if self.distinct_paths => vec![Finding::Redundant {
                digest: self.left.digest,
                paths: vec![self.left.path.clone(), self.right.path.clone()],
            }],
            Outcome::Redundant => Vec::new(),
            Outcome::NotRedundant => vec![
                Finding::UniqueLeft {
                    digest: self.left.digest,
                    path: self.left.path.clone(),
                },
                Finding::UniqueRight {
                    digest: self.right.digest,
                    path: self.right.path.clone(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryComparison {
    pub findings: Vec<Finding>,
}

impl DirectoryComparison {
    /// Redundant iff both sides hold the same set of digests.
    pub fn outcome(&self) -> Outcome {
        if self.findings.iter().any(Finding::is_unique) {
            Outcome::NotRedundant
        } else {
            Outcome::Redundant
        }
    }
}

pub fn compare_files(left: &Path, right: &Path, cache: &HashCache) -> Result<FileComparison> {
    let comparison = FileComparison {
        left: cache.resolve(left)?,
        right: cache.resolve(right)?,
        distinct_paths: left.as_os_str() != right.as_os_str(),
    };
    info!(
        "Compared files {} and {}: {:?}",
        left.display(),
        right.display(),
        comparison.outcome()
    );
    Ok(comparison)
}

/// Classifies every digest of both indexes.
///
/// Findings are ordered: left internal duplicates, right internal
/// duplicates, unique-left, then redundant and unique-right in the order
/// the right side's digests were first seen.
pub fn compare_indexes(left: &DigestIndex, right: &DigestIndex) -> DirectoryComparison {
    let mut findings = Vec::new();

    for (side, index) in [(Side::Left, left), (Side::Right, right)] {
        for (digest, paths) in index.iter() {
            if paths.len() > 1 {
                findings.push(Finding::InternalDuplicate {
                    side,
                    digest: *digest,
                    paths: paths.to_vec(),
                });
            }
        }
    }

    for (digest, paths) in left.iter() {
        if !right.contains(digest) {
            findings.extend(paths.iter().map(|path| Finding::UniqueLeft {
                digest: *digest,
                path: path.clone(),
            }));
        }
    }

    for (digest, paths) in right.iter() {
        match left.get(digest) {
            Some(left_paths) => findings.push(Finding::Redundant {
                digest: *digest,
                paths: left_paths.iter().chain(paths).cloned().collect(),
            }),
            None => findings.extend(paths.iter().map(|path| Finding::UniqueRight {
                digest: *digest,
                path: path.clone(),
            })),
        }
    }

    DirectoryComparison { findings }
}

/// Indexes both roots and compares them. `on_file` sees the left side's
/// files before the right side's.
pub fn compare_directories<F>(
    left: &Path,
    right: &Path,
    options: &Options,
    cache: &HashCache,
    mut on_file: F,
) -> Result<DirectoryComparison>
where
    F: FnMut(&ResolvedFile),
{
    let left_index = build_index(left, options, cache, &mut on_file)?;
    let right_index = build_index(right, options, cache, &mut on_file)?;
    let comparison = compare_indexes(&left_index, &right_index);
    info!(
        "Compared directories {} and {}: {} findings, {:?}",
        left.display(),
        right.display(),
        comparison.findings.len(),
        comparison.outcome()
    );
    Ok(comparison)
}
