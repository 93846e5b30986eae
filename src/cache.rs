use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indicatif::HumanCount;
use log::{debug, info};
use regex::Regex;
use zstd::stream::decode_all;

use crate::digest::{Digest, digest_file};
use crate::error::{Result, XcompError};
use crate::utils::absolute_path;

// digest, whitespace, then a path that is either single-quoted (anything may
// follow the closing quote) or bare (trailing whitespace dropped). A leading
// report sigil is allowed so mismatch output can be reused as a cache.
static RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[<>=]?([0-9a-f]{16})[ \t]+(?:'([^'\n]+)'(?:\s.*)?|([^'\n]*[^'\s]))\s*$")
        .expect("cache record pattern is valid")
});

/// One well-formed cache line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub digest: Digest,
    pub path: PathBuf,
}

/// Parses a single cache line; `None` when the line doesn't have the shape
/// `<16 hex digits> <path>` or `<16 hex digits> '<path>'`.
pub fn parse_line(line: &str) -> Option<CacheRecord> {
    let captures = RECORD.captures(line)?;
    let digest = captures.get(1)?.as_str().parse().ok()?;
    let path = captures.get(2).or_else(|| captures.get(3))?.as_str();
    Some(CacheRecord {
        digest,
        path: PathBuf::from(path),
    })
}

/// Where a file's digest came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestSource {
    Cached,
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub digest: Digest,
    pub source: DigestSource,
}

/// Read-only mapping from absolute file path to a precomputed digest.
///
/// Entries are trusted as given: nothing checks them against the file's
/// current content, size or modification time.
#[derive(Debug, Default, Clone)]
pub struct HashCache {
    entries: HashMap<PathBuf, Digest>,
}

impl HashCache {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the cache from every source in order; a later record for the
    /// same path replaces an earlier one.
    ///
    /// Fails if a source is missing or unreadable, or if not one line across
    /// all sources is a well-formed record. Sources ending in `.zst` are
    /// decompressed first. No sources means an empty cache.
    pub fn load(sources: &[PathBuf]) -> Result<Self> {
        let mut entries = HashMap::new();
        if sources.is_empty() {
            return Ok(Self { entries });
        }

        let mut matched = 0usize;
        let mut skipped = 0usize;
        for source in sources {
            let text = read_source(source)?;
            for line in text.lines() {
                match parse_line(line) {
                    Some(record) => {
                        matched += 1;
                        entries.insert(absolute_path(&record.path), record.digest);
                    }
                    None => skipped += 1,
                }
            }
        }

        if matched == 0 {
            return Err(XcompError::CacheFormatInvalid {
                sources: sources.to_vec(),
            });
        }
        if skipped > 0 {
            debug!("Skipped {} malformed cache line(s)", skipped);
        }
        info!(
            "Hash cache has {} entries from {} source(s)",
            HumanCount(entries.len() as u64),
            sources.len()
        );
        Ok(Self { entries })
    }

    pub fn lookup(&self, path: &Path) -> Option<Digest> {
        self.entries.get(path).copied()
    }

    /// Cached digest for `path` when present, otherwise a freshly computed one.
    pub fn resolve(&self, path: &Path) -> Result<ResolvedFile> {
        let path = absolute_path(path);
        if let Some(digest) = self.lookup(&path) {
            return Ok(ResolvedFile {
                path,
                digest,
                source: DigestSource::Cached,
            });
        }
        let digest = digest_file(&path)?;
        Ok(ResolvedFile {
            path,
            digest,
            source: DigestSource::Computed,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_source(source: &Path) -> Result<String> {
    let read_error = |e: std::io::Error| match e.kind() {
        ErrorKind::NotFound => XcompError::CacheFileNotFound(source.to_path_buf()),
        _ => XcompError::CacheRead {
            path: source.to_path_buf(),
            source: e,
        },
    };

    let raw = fs::read(source).map_err(read_error)?;
    let bytes = if source.extension().is_some_and(|ext| ext == "zst") {
        decode_all(&raw[..]).map_err(read_error)?
    } else {
        raw
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
