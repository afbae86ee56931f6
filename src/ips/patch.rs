// IPS patch container: an ordered record sequence framed by `PATCH`/`EOF`.
//
//   Patch := "PATCH" Record* "EOF"
//
// The end-marker check happens only where a new record would begin, never
// inside a record's own fields. Records are applied in file order; the diff
// generator never emits overlapping records, so order does not affect the
// result, only determinism.

use super::error::PatchError;
use super::record::PatchRecord;

// ---------------------------------------------------------------------------
// Framing constants
// ---------------------------------------------------------------------------

/// Magic bytes opening every IPS patch.
pub const MAGIC: &[u8; 5] = b"PATCH";
/// End marker closing the record sequence.
pub const EOF_MARKER: &[u8; 3] = b"EOF";

// ---------------------------------------------------------------------------
// Patch container
// ---------------------------------------------------------------------------

/// An IPS patch: an ordered sequence of [`PatchRecord`]s.
///
/// Built empty, populated by [`Patch::push`], [`Patch::decode`], or
/// [`crate::ips::diff::diff`], then consumed by [`Patch::encode`] or one of
/// the apply operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    records: Vec<PatchRecord>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// The records in on-wire (= application) order.
    #[inline]
    pub fn records(&self) -> &[PatchRecord] {
        &self.records
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Does the patch describe no edits?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record. Records are applied in insertion order.
    pub fn push(&mut self, record: PatchRecord) {
        self.records.push(record);
    }

    /// Decode a complete patch from `input`.
    ///
    /// Verifies the magic header, then decodes records until the end marker
    /// appears at a record boundary. Bytes after the end marker are ignored.
    pub fn decode(input: &[u8]) -> Result<Self, PatchError> {
        let Some(body) = input.strip_prefix(MAGIC.as_slice()) else {
            return Err(PatchError::BadMagic);
        };

        let mut patch = Self::new();
        let mut cursor = body;
        loop {
            if cursor.starts_with(EOF_MARKER) {
                return Ok(patch);
            }
            if cursor.len() < EOF_MARKER.len() {
                return Err(PatchError::MissingEndMarker);
            }
            let (record, consumed) = PatchRecord::decode(cursor)?;
            patch.records.push(record);
            cursor = &cursor[consumed..];
        }
    }

    /// Encode the patch to its wire form: magic, records, end marker.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(MAGIC);
        for record in &self.records {
            record.encode_into(&mut out);
        }
        out.extend_from_slice(EOF_MARKER);
        out
    }

    /// Encoded byte length, framing included.
    pub fn encoded_len(&self) -> usize {
        let records: usize = self.records.iter().map(PatchRecord::encoded_len).sum();
        MAGIC.len() + records + EOF_MARKER.len()
    }

    /// Apply every record to `buf` in sequence order, mutating it in place.
    /// The buffer grows when a record extends past its current end.
    pub fn apply_in_place(&self, buf: &mut Vec<u8>) {
        for record in &self.records {
            record.apply_to(buf);
        }
    }

    /// Apply the patch to a copy of `source`, returning the patched buffer
    /// and leaving `source` untouched.
    pub fn apply_copy(&self, source: &[u8]) -> Vec<u8> {
        let mut buf = source.to_vec();
        self.apply_in_place(&mut buf);
        buf
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_magic_plus_eof() {
        let patch = Patch::new();
        assert_eq!(patch.encode(), b"PATCHEOF");
        assert_eq!(patch.encoded_len(), 8);
    }

    #[test]
    fn roundtrip_mixed_records() {
        let mut patch = Patch::new();
        patch.push(PatchRecord::literal(0, b"abc".to_vec()).unwrap());
        patch.push(PatchRecord::run(10, 4, 0xFF).unwrap());
        patch.push(PatchRecord::literal(0x123456, vec![0x42]).unwrap());

        let bytes = patch.encode();
        assert_eq!(bytes.len(), patch.encoded_len());

        let decoded = Patch::decode(&bytes).unwrap();
        assert_eq!(decoded.records(), patch.records());
    }

    #[test]
    fn rejects_bad_magic() {
        assert_eq!(Patch::decode(b"NOTCHEOF"), Err(PatchError::BadMagic));
        assert_eq!(Patch::decode(b""), Err(PatchError::BadMagic));
        assert_eq!(Patch::decode(b"PATC"), Err(PatchError::BadMagic));
    }

    #[test]
    fn rejects_missing_end_marker() {
        assert_eq!(Patch::decode(b"PATCH"), Err(PatchError::MissingEndMarker));
        // A record boundary with fewer than 3 bytes left cannot hold "EOF".
        assert_eq!(Patch::decode(b"PATCHEO"), Err(PatchError::MissingEndMarker));
    }

    #[test]
    fn rejects_truncated_record() {
        // One literal record claiming 4 bytes of data, cut short.
        let mut bytes = b"PATCH".to_vec();
        bytes.extend_from_slice(&[0x00, 0x00, 0x01, 0x00, 0x04, 0xAA]);
        assert!(matches!(
            Patch::decode(&bytes),
            Err(PatchError::Truncated { .. })
        ));
    }

    #[test]
    fn ignores_bytes_after_end_marker() {
        let decoded = Patch::decode(b"PATCHEOFtrailing garbage").unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn apply_in_place_mutates() {
        let mut patch = Patch::new();
        patch.push(PatchRecord::literal(1, b"\x01\x01".to_vec()).unwrap());

        let mut buf = vec![0u8; 5];
        patch.apply_in_place(&mut buf);
        assert_eq!(buf, [0x00, 0x01, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn apply_copy_leaves_source_untouched() {
        let mut patch = Patch::new();
        patch.push(PatchRecord::run(2, 3, 0x99).unwrap());

        let source = vec![0u8; 4];
        let patched = patch.apply_copy(&source);
        assert_eq!(source, [0, 0, 0, 0]);
        assert_eq!(patched, [0, 0, 0x99, 0x99, 0x99]);
    }

    #[test]
    fn apply_extends_past_source_end() {
        let mut patch = Patch::new();
        patch.push(PatchRecord::literal(2, b"CDE".to_vec()).unwrap());
        assert_eq!(patch.apply_copy(b"AB"), b"ABCDE");
    }
}
