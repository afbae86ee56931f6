// IPS patch format implementation.
//
// # Modules
//
// - `record` — one edit record: wire layout, validation, per-record apply
// - `patch`  — the framed record sequence: whole-patch decode/encode/apply
// - `diff`   — mismatch-run segmentation of two buffers into records
// - `error`  — the shared error enum

pub mod diff;
pub mod error;
pub mod patch;
pub mod record;

// Re-export key types for convenience.
pub use diff::diff;
pub use error::PatchError;
pub use patch::{EOF_MARKER, MAGIC, Patch};
pub use record::{OFFSET_MAX, PAYLOAD_MAX, PatchRecord, RecordData};
