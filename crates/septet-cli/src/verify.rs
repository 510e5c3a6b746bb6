//! Round-trip verification over CSV fixtures.

use anyhow::Context;
use std::fmt;
use std::path::{Path, PathBuf};

use septet_core::{CodecError, CompressionStats, DecodeOptions};

use crate::config::InputConfig;
use crate::ingest;

/// Result of verifying a single file
#[derive(Debug)]
pub enum Outcome {
    /// Round trip reproduced the input
    Passed(CompressionStats),
    /// Decompressed bytes differ from the input
    Mismatch {
        /// First differing index, or the shorter length
        first_difference: usize,
    },
    /// Codec rejected the input
    Rejected(CodecError),
    /// File could not be read or parsed
    Unreadable(String),
}

impl Outcome {
    /// Whether this outcome counts as a pass
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed(stats) => match stats.reduction() {
                Some(r) => write!(f, "PASSED  {:.2}%", r * 100.0),
                None => write!(f, "PASSED  N/A"),
            },
            Self::Mismatch { first_difference } => {
                write!(f, "FAILED  mismatch at index {first_difference}")
            }
            Self::Rejected(e) => write!(f, "FAILED  {e}"),
            Self::Unreadable(reason) => write!(f, "FAILED  {reason}"),
        }
    }
}

/// Compress, decompress and compare `data`.
pub fn verify_bytes(data: &[u8]) -> Outcome {
    let roundtrip = septet_core::compress_to_vec(data).and_then(|packed| {
        let stats = CompressionStats::from_compressed(&packed, DecodeOptions::strict())?;
        let restored = septet_core::decompress_to_vec(&packed, DecodeOptions::strict())?;
        Ok((stats, restored))
    });

    match roundtrip {
        Ok((stats, restored)) if restored == data => Outcome::Passed(stats),
        Ok((_, restored)) => Outcome::Mismatch {
            first_difference: restored
                .iter()
                .zip(data)
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| restored.len().min(data.len())),
        },
        Err(e) => Outcome::Rejected(e),
    }
}

/// Expand `paths` into the list of files to verify.
///
/// Directories contribute their `*.csv` entries in name order.
pub fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
                .collect();
            found.sort();
            if found.is_empty() {
                tracing::warn!("No .csv files in {}", path.display());
            }
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Verify a single CSV file.
pub fn verify_file(path: &Path, input: &InputConfig) -> anyhow::Result<Outcome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data = ingest::parse_bytes(&text, input)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let outcome = verify_bytes(&data);
    tracing::debug!(file = %path.display(), passed = outcome.passed(), "verified");
    Ok(outcome)
}

/// Verify a single CSV file, reporting read and parse failures as an outcome.
pub fn verify_path(path: &Path, input: &InputConfig) -> Outcome {
    verify_file(path, input).unwrap_or_else(|e| {
        tracing::warn!(file = %path.display(), "{e:#}");
        Outcome::Unreadable(format!("{e:#}"))
    })
}
