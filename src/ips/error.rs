// Error types for the IPS codec.
//
// Construction-time range failures and decode-time structural failures are
// separate variants of one enum; there is no recovery path for either, the
// error is always returned to the immediate caller.

/// Errors produced when constructing, decoding, or diffing IPS patches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// A record field does not fit its fixed on-wire width.
    #[error("{field} {value:#x} exceeds field maximum {max:#x}")]
    ValueOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Largest value the field can carry.
        max: u64,
    },

    /// A record covering zero bytes was requested. A zero size field is the
    /// RLE sentinel on the wire, so such a record cannot be represented.
    #[error("record covers zero bytes; a zero size field marks an RLE record")]
    EmptyRecord,

    /// The patch does not start with the `PATCH` magic bytes.
    #[error("invalid patch: bad magic header")]
    BadMagic,

    /// The input ended inside a record.
    #[error("truncated patch: record needs {needed} bytes, {available} available")]
    Truncated {
        /// Bytes the record layout requires from the cursor.
        needed: usize,
        /// Bytes remaining in the input.
        available: usize,
    },

    /// The input ended before the `EOF` end marker.
    #[error("invalid patch: missing EOF end marker")]
    MissingEndMarker,
}
