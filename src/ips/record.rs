// IPS record codec: one edit instruction and its on-wire layout.
//
// Layout (big-endian throughout):
//   offset(3B)  size(2B)  data(size bytes)              -- literal record
//   offset(3B)  0x0000    rle_len(2B)  fill(1B)         -- RLE record
//
// A zero size field is the RLE sentinel, so a literal record with an empty
// payload is unrepresentable and rejected at construction.

use std::fmt;

use super::error::PatchError;

// ---------------------------------------------------------------------------
// Field widths and limits
// ---------------------------------------------------------------------------

/// Width of the offset field in bytes.
pub const OFFSET_LEN: usize = 3;
/// Width of the size field in bytes.
pub const SIZE_LEN: usize = 2;
/// Width of the RLE run-length field in bytes.
pub const RLE_LEN: usize = 2;

/// Largest representable record offset (24-bit field).
pub const OFFSET_MAX: u32 = (1 << (OFFSET_LEN * 8)) - 1;
/// Largest literal payload / RLE run length (16-bit fields).
pub const PAYLOAD_MAX: usize = u16::MAX as usize;

/// offset + size fields, common to both record forms.
const HEADER_LEN: usize = OFFSET_LEN + SIZE_LEN;
/// rle_len + fill byte.
const RLE_BODY_LEN: usize = RLE_LEN + 1;

// ---------------------------------------------------------------------------
// Record type
// ---------------------------------------------------------------------------

/// Payload of a [`PatchRecord`]: literal replacement bytes, or a run of one
/// repeated byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    /// Replace with these bytes verbatim (1..=65535 of them).
    Literal(Vec<u8>),
    /// Fill `len` bytes with `byte`.
    Run { len: u16, byte: u8 },
}

/// One IPS edit: a target offset plus the bytes to write there.
///
/// Records are immutable after construction; the constructors validate every
/// field against its on-wire width, so an existing record always encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord {
    offset: u32,
    data: RecordData,
}

fn check_offset(offset: u32) -> Result<(), PatchError> {
    if offset > OFFSET_MAX {
        return Err(PatchError::ValueOutOfRange {
            field: "offset",
            value: u64::from(offset),
            max: u64::from(OFFSET_MAX),
        });
    }
    Ok(())
}

impl PatchRecord {
    /// Create a literal record. Rejects empty payloads (the wire encoding
    /// would be indistinguishable from an RLE record) and payloads that do
    /// not fit the 16-bit size field.
    pub fn literal(offset: u32, data: Vec<u8>) -> Result<Self, PatchError> {
        check_offset(offset)?;
        if data.is_empty() {
            return Err(PatchError::EmptyRecord);
        }
        if data.len() > PAYLOAD_MAX {
            return Err(PatchError::ValueOutOfRange {
                field: "literal size",
                value: data.len() as u64,
                max: PAYLOAD_MAX as u64,
            });
        }
        Ok(Self {
            offset,
            data: RecordData::Literal(data),
        })
    }

    /// Create an RLE record filling `len` bytes with `byte`. Rejects
    /// zero-length runs.
    pub fn run(offset: u32, len: u16, byte: u8) -> Result<Self, PatchError> {
        check_offset(offset)?;
        if len == 0 {
            return Err(PatchError::EmptyRecord);
        }
        Ok(Self {
            offset,
            data: RecordData::Run { len, byte },
        })
    }

    /// Target offset where the edit begins.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// The record payload.
    #[inline]
    pub fn data(&self) -> &RecordData {
        &self.data
    }

    /// Is this a run-length-encoded fill?
    #[inline]
    pub fn is_rle(&self) -> bool {
        matches!(self.data, RecordData::Run { .. })
    }

    /// Number of target bytes this record overwrites.
    pub fn applied_size(&self) -> usize {
        match &self.data {
            RecordData::Literal(bytes) => bytes.len(),
            RecordData::Run { len, .. } => usize::from(*len),
        }
    }

    /// Encoded byte length of this record on the wire.
    pub fn encoded_len(&self) -> usize {
        match &self.data {
            RecordData::Literal(bytes) => HEADER_LEN + bytes.len(),
            RecordData::Run { .. } => HEADER_LEN + RLE_BODY_LEN,
        }
    }

    /// Decode one record from the start of `input`.
    ///
    /// Returns the record and the number of bytes consumed. Fails with
    /// [`PatchError::Truncated`] when `input` ends inside the record.
    pub fn decode(input: &[u8]) -> Result<(Self, usize), PatchError> {
        let truncated = |needed: usize| PatchError::Truncated {
            needed,
            available: input.len(),
        };

        if input.len() < HEADER_LEN {
            return Err(truncated(HEADER_LEN));
        }
        let offset = u32::from_be_bytes([0, input[0], input[1], input[2]]);
        let size = usize::from(u16::from_be_bytes([input[3], input[4]]));

        if size > 0 {
            let consumed = HEADER_LEN + size;
            if input.len() < consumed {
                return Err(truncated(consumed));
            }
            let record = Self::literal(offset, input[HEADER_LEN..consumed].to_vec())?;
            Ok((record, consumed))
        } else {
            let consumed = HEADER_LEN + RLE_BODY_LEN;
            if input.len() < consumed {
                return Err(truncated(consumed));
            }
            let len = u16::from_be_bytes([input[5], input[6]]);
            let record = Self::run(offset, len, input[7])?;
            Ok((record, consumed))
        }
    }

    /// Append the wire encoding of this record to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.offset.to_be_bytes()[1..]);
        match &self.data {
            RecordData::Literal(bytes) => {
                out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                out.extend_from_slice(bytes);
            }
            RecordData::Run { len, byte } => {
                out.extend_from_slice(&[0, 0]);
                out.extend_from_slice(&len.to_be_bytes());
                out.push(*byte);
            }
        }
    }

    /// Write this record's effect into `buf`, growing it (zero-filled) when
    /// the record extends past the current end.
    pub fn apply_to(&self, buf: &mut Vec<u8>) {
        let start = self.offset as usize;
        let end = start + self.applied_size();
        if buf.len() < end {
            buf.resize(end, 0);
        }
        match &self.data {
            RecordData::Literal(bytes) => buf[start..end].copy_from_slice(bytes),
            RecordData::Run { byte, .. } => buf[start..end].fill(*byte),
        }
    }
}

impl fmt::Display for PatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x} bytes at {:#x}{}",
            self.applied_size(),
            self.offset,
            if self.is_rle() { " (RLE)" } else { "" }
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
