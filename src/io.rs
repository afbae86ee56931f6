// File-level helpers for creating and applying IPS patches.
//
// Whole files are read into memory; the format addresses at most 16 MiB, so
// streaming buys nothing. Optionally computes SHA-256 checksums of the
// buffers that pass through (feature-gated behind `file-io`).

use std::io;
use std::path::Path;

use log::debug;

use crate::ips::{Patch, PatchError, diff};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by [`create_patch_file`].
#[derive(Debug, Clone)]
pub struct CreateStats {
    /// Original file size in bytes.
    pub original_size: u64,
    /// Modified file size in bytes.
    pub modified_size: u64,
    /// Encoded patch size in bytes.
    pub patch_size: u64,
    /// Number of records in the patch.
    pub records: usize,
    /// SHA-256 of the original file (if the `file-io` feature is enabled).
    pub original_sha256: Option<[u8; 32]>,
    /// SHA-256 of the modified file (if the `file-io` feature is enabled).
    pub modified_sha256: Option<[u8; 32]>,
}

/// Statistics returned by [`apply_patch_file`].
#[derive(Debug, Clone)]
pub struct ApplyStats {
    /// Patch file size in bytes.
    pub patch_size: u64,
    /// Input file size in bytes.
    pub input_size: u64,
    /// Patched output size in bytes.
    pub output_size: u64,
    /// Number of records applied.
    pub records: usize,
    /// SHA-256 of the output (if the `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Patch construction or decode error.
    #[error(transparent)]
    Patch(#[from] PatchError),
}

// ---------------------------------------------------------------------------
// Checksums
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    use sha2::Digest;
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    Some(hasher.finalize().into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// create_patch_file
// ---------------------------------------------------------------------------

/// Diff `original_path` against `modified_path` and write the encoded patch
/// to `patch_path`.
pub fn create_patch_file(
    original_path: &Path,
    modified_path: &Path,
    patch_path: &Path,
) -> Result<CreateStats, IoError> {
    let original = std::fs::read(original_path)?;
    let modified = std::fs::read(modified_path)?;

    let patch = diff(&original, &modified)?;
    let encoded = patch.encode();
    std::fs::write(patch_path, &encoded)?;

    debug!(
        "create: {} -> {}: {} records, {} B patch",
        original_path.display(),
        modified_path.display(),
        patch.len(),
        encoded.len()
    );

    Ok(CreateStats {
        original_size: original.len() as u64,
        modified_size: modified.len() as u64,
        patch_size: encoded.len() as u64,
        records: patch.len(),
        original_sha256: sha256(&original),
        modified_sha256: sha256(&modified),
    })
}

// ---------------------------------------------------------------------------
// apply_patch_file
// ---------------------------------------------------------------------------

/// Apply the patch at `patch_path` to `input_path`, writing the patched
/// bytes to `output_path`. The input file is left untouched.
pub fn apply_patch_file(
    patch_path: &Path,
    input_path: &Path,
    output_path: &Path,
) -> Result<ApplyStats, IoError> {
    let patch_bytes = std::fs::read(patch_path)?;
    let patch = Patch::decode(&patch_bytes)?;

    let input = std::fs::read(input_path)?;
    let output = patch.apply_copy(&input);
    std::fs::write(output_path, &output)?;

    debug!(
        "apply: {} records onto {} B input -> {} B output",
        patch.len(),
        input.len(),
        output.len()
    );

    Ok(ApplyStats {
        patch_size: patch_bytes.len() as u64,
        input_size: input.len() as u64,
        output_size: output.len() as u64,
        records: patch.len(),
        output_sha256: sha256(&output),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
