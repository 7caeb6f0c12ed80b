//! Content fingerprints for native addons.
//!
//! Digests depend on the bytes only. Paths, timestamps and sizes never feed
//! into them, so identical content always produces the identical output name.

use crate::bundler::error::{ErrorExt, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::{fmt, path::Path};
use tokio::io::AsyncReadExt;

/// Default number of hex characters kept from a digest.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Hash function used to fingerprint artifact content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, 32 hex characters.
    #[default]
    Md5,
    /// SHA-256, 64 hex characters.
    #[serde(alias = "sha-256")]
    Sha256,
}

impl HashAlgorithm {
    /// Full width of the hex digest for this algorithm.
    pub fn hex_width(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => f.write_str("md5"),
            HashAlgorithm::Sha256 => f.write_str("sha256"),
        }
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(format!("unknown hash algorithm: {other} (expected md5 or sha256)")),
        }
    }
}

/// Computes the lowercase hex digest of `bytes`, truncated to `length`
/// characters.
///
/// `length` larger than the algorithm's width returns the full digest.
pub fn digest(bytes: &[u8], algorithm: HashAlgorithm, length: usize) -> String {
    let mut hex = match algorithm {
        HashAlgorithm::Md5 => format!("{:x}", md5::compute(bytes)),
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
    };
    hex.truncate(length.min(algorithm.hex_width()));
    hex
}

/// Streams `path` through the hasher in 8 KiB chunks and returns the
/// truncated digest.
pub async fn digest_file(path: &Path, algorithm: HashAlgorithm, length: usize) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening addon for fingerprinting", path)?;
    let mut hasher = Hasher::new(algorithm);
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading addon for fingerprinting", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    let mut hex = hasher.finalize();
    hex.truncate(length.min(algorithm.hex_width()));
    Ok(hex)
}

enum Hasher {
    Md5(md5::Context),
    Sha256(Sha256),
}

impl Hasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Hasher::Md5(md5::Context::new()),
            HashAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Hasher::Md5(ctx) => ctx.consume(chunk),
            Hasher::Sha256(hasher) => hasher.update(chunk),
        }
    }

    fn finalize(self) -> String {
        match self {
            Hasher::Md5(ctx) => format!("{:x}", ctx.finalize()),
            Hasher::Sha256(hasher) => hex::encode(hasher.finalize()),
        }
    }
}
