use std::fmt;
use std::fs;
use std::hash::Hasher;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Serialize, Serializer};
use twox_hash::XxHash64;

use crate::error::{Result, XcompError};

const CHUNK_SIZE: usize = 1024;

/// xxHash64 content fingerprint, written as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(u64);

impl Digest {
    pub const HEX_LEN: usize = 16;

    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDigestError(String);

impl fmt::Display for ParseDigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a 16-digit lowercase hex digest: {:?}", self.0)
    }
}

impl std::error::Error for ParseDigestError {}

impl FromStr for Digest {
    type Err = ParseDigestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let well_formed = s.len() == Self::HEX_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(ParseDigestError(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseDigestError(s.to_string()))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn digest_bytes(bytes: &[u8]) -> Digest {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    Digest(hasher.finish())
}

/// Streams `file_path` through xxHash64 in 1 KiB chunks.
///
/// A missing path is reported as [`XcompError::PathNotFound`]; every other
/// I/O failure as [`XcompError::UnreadableFile`].
pub fn digest_file(file_path: &Path) -> Result<Digest> {
    let unreadable = |source: std::io::Error| XcompError::UnreadableFile {
        path: file_path.to_path_buf(),
        source,
    };

    let mut file = fs::File::open(file_path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => XcompError::not_found(file_path),
        _ => unreadable(e),
    })?;
    let mut hasher = XxHash64::with_seed(0);
    let mut buffer = [0; CHUNK_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(unreadable(e)),
        };
        hasher.write(&buffer[..bytes_read]);
        total_bytes += bytes_read as u64;
    }

    let digest = Digest(hasher.finish());
    debug!(
        "Hash calculated for '{}': {} ({} bytes)",
        file_path.display(),
        digest,
        total_bytes
    );
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_input_has_reference_digest() {
        assert_eq!(digest_bytes(b"").to_string(), "ef46db3751d8e999");
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(Digest::from_u64(0xab).to_string(), "00000000000000ab");
    }

    #[test]
    fn parse_accepts_only_lowercase_hex_of_fixed_width() {
        let digest: Digest = "8bb820c8bfd319e9".parse().unwrap();
        assert_eq!(digest.as_u64(), 0x8bb820c8bfd319e9);
        assert!("8BB820C8BFD319E9".parse::<Digest>().is_err());
        assert!("8bb820c8bfd319e".parse::<Digest>().is_err());
        assert!("8bb820c8bfd319e9a".parse::<Digest>().is_err());
        assert!("+bb820c8bfd319e9".parse::<Digest>().is_err());
    }

    #[test]
    fn file_digest_matches_in_memory_digest_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big");
        let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        fs::File::create(&path).unwrap().write_all(&content).unwrap();

        let first = digest_file(&path).unwrap();
        assert_eq!(first, digest_bytes(&content));
        assert_eq!(first, digest_file(&path).unwrap());
    }

    #[test]
    fn missing_file_is_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = digest_file(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, XcompError::PathNotFound { .. }));
    }
}
