use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{HumanCount, ProgressBar};
use log::{debug, info};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::cache::{DigestSource, HashCache, ResolvedFile};
use crate::config::Options;
use crate::digest::Digest;
use crate::error::{Result, XcompError};
use crate::signal;

/// Files grouped by content digest for one side of a directory comparison.
///
/// Digests keep the order in which they were first seen during the walk and
/// every bucket lists its paths in walk order. A bucket is never empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DigestIndex {
    buckets: Vec<(Digest, Vec<PathBuf>)>,
    positions: HashMap<Digest, usize>,
}

impl DigestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, digest: Digest, path: PathBuf) {
        match self.positions.get(&digest) {
            Some(&slot) => self.buckets[slot].1.push(path),
            None => {
                self.positions.insert(digest, self.buckets.len());
                self.buckets.push((digest, vec![path]));
            }
        }
    }

    pub fn get(&self, digest: &Digest) -> Option<&[PathBuf]> {
        self.positions
            .get(digest)
            .map(|&slot| self.buckets[slot].1.as_slice())
    }

    pub fn contains(&self, digest: &Digest) -> bool {
        self.positions.contains_key(digest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &[PathBuf])> {
        self.buckets
            .iter()
            .map(|(digest, paths)| (digest, paths.as_slice()))
    }

    /// Number of distinct digests.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.buckets.iter().map(|(_, paths)| paths.len()).sum()
    }
}

impl FromIterator<(Digest, PathBuf)> for DigestIndex {
    fn from_iter<I: IntoIterator<Item = (Digest, PathBuf)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (digest, path) in iter {
            index.insert(digest, path);
        }
        index
    }
}

/// Regular files under `root` in walk order, sorted by name per directory,
/// plus any symlink whose target is missing. Only the top level is visited
/// unless `recursive` is set.
pub fn list_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(root).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| XcompError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        // A dangling link is kept so hashing it fails instead of skipping it.
        let path = entry.path();
        let dangling = entry.path_is_symlink() && !path.exists();
        if path.is_file() || dangling {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Builds the digest index of `root`, reading digests from `cache` where
/// possible and hashing the remaining files on the rayon pool.
///
/// `on_file` sees every resolved file in walk order once hashing is done.
/// The first unreadable file or walk error aborts the whole build.
pub fn build_index<F>(
    root: &Path,
    options: &Options,
    cache: &HashCache,
    mut on_file: F,
) -> Result<DigestIndex>
where
    F: FnMut(&ResolvedFile),
{
    info!("Scanning {}", root.display());

    let pb = if options.verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_message(format!("Scanning {}...", root.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let file_paths = list_files(root, options.recursive)?;
    pb.set_length(file_paths.len() as u64);
    debug!("Found {} files under {}", file_paths.len(), root.display());

    let resolved: Result<Vec<ResolvedFile>> = file_paths
        .par_iter()
        .map(|path| {
            if signal::interrupted() {
                return Err(XcompError::Interrupted);
            }
            let file = cache.resolve(path)?;
            pb.inc(1);
            Ok(file)
        })
        .collect();
    pb.finish_and_clear();
    let resolved = resolved?;

    let mut index = DigestIndex::new();
    let mut cached = 0u64;
    for file in resolved {
        on_file(&file);
        if file.source == DigestSource::Cached {
            cached += 1;
        }
        index.insert(file.digest, file.path);
    }

    info!(
        "Indexed {} files ({} from cache) into {} digests under {}",
        HumanCount(index.file_count() as u64),
        HumanCount(cached),
        HumanCount(index.len() as u64),
        root.display()
    );
    Ok(index)
}
