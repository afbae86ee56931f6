// Diff generation: derive an IPS record sequence from two buffers.
//
// Straightforward mismatch-run segmentation: scan the comparable range for
// runs of differing bytes and emit each run as one literal record, capped at
// the 16-bit size field's maximum. Target bytes past the source's end are
// always treated as differing and covered by trailing literal records.
//
// The differ never emits RLE records even though encode/apply support them;
// run detection would change the emitted patch bytes, and the output here is
// kept byte-stable.

use log::debug;

use super::error::PatchError;
use super::patch::Patch;
use super::record::{OFFSET_MAX, PAYLOAD_MAX, PatchRecord};

fn record_offset(pos: usize) -> Result<u32, PatchError> {
    u32::try_from(pos)
        .ok()
        .filter(|&offset| offset <= OFFSET_MAX)
        .ok_or(PatchError::ValueOutOfRange {
            field: "offset",
            value: pos as u64,
            max: u64::from(OFFSET_MAX),
        })
}

/// Compute a patch that transforms `source` into `target`.
///
/// Records are emitted in strictly increasing offset order and never
/// overlap. `diff(x, x)` yields an empty patch. Fails with
/// [`PatchError::ValueOutOfRange`] when a record would start past the
/// 24-bit offset limit (targets larger than 16 MiB).
///
/// IPS patches cannot shrink a file: when `target` is shorter than
/// `source`, the trailing source bytes are left in place by `apply`.
pub fn diff(source: &[u8], target: &[u8]) -> Result<Patch, PatchError> {
    let mut patch = Patch::new();
    let cmp_len = source.len().min(target.len());

    let mut i = 0;
    while i < cmp_len {
        if source[i] == target[i] {
            i += 1;
            continue;
        }
        // Mismatch run, capped by the literal payload maximum.
        let diff_start = i;
        let run_limit = cmp_len.min(diff_start + PAYLOAD_MAX);
        while i < run_limit && source[i] != target[i] {
            i += 1;
        }
        patch.push(PatchRecord::literal(
            record_offset(diff_start)?,
            target[diff_start..i].to_vec(),
        )?);
    }

    // Trailing target bytes past the source's end.
    let mut tail = source.len();
    while tail < target.len() {
        let end = target.len().min(tail + PAYLOAD_MAX);
        patch.push(PatchRecord::literal(
            record_offset(tail)?,
            target[tail..end].to_vec(),
        )?);
        tail = end;
    }

    debug!(
        "diff: source {} B, target {} B -> {} records ({} B encoded)",
        source.len(),
        target.len(),
        patch.len(),
        patch.encoded_len()
    );
    Ok(patch)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ips::record::RecordData;

    fn assert_inverse(source: &[u8], target: &[u8]) {
        let patch = diff(source, target).expect("diff failed");
        assert_eq!(
            patch.apply_copy(source),
            target,
            "diff/apply mismatch (source={}, target={})",
            source.len(),
            target.len()
        );
    }

    #[test]
    fn identical_inputs_produce_empty_patch() {
        let patch = diff(b"same bytes", b"same bytes").unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.encode(), b"PATCHEOF");
    }

    #[test]
    fn empty_inputs() {
        assert!(diff(b"", b"").unwrap().is_empty());
        assert_inverse(b"", b"fresh content");
    }

    #[test]
    fn single_mismatch_run() {
        let source = b"\x00\x00\x00\x00\x00";
        let target = b"\x00\x01\x01\x00\x00";
        let patch = diff(source, target).unwrap();

        assert_eq!(patch.len(), 1);
        let record = &patch.records()[0];
        assert_eq!(record.offset(), 1);
        assert_eq!(
            record.data(),
            &RecordData::Literal(b"\x01\x01".to_vec())
        );
        assert_eq!(patch.apply_copy(source), target);
    }

    #[test]
    fn target_longer_than_source() {
        let patch = diff(b"AB", b"ABCDE").unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.records()[0].offset(), 2);
        assert_eq!(
            patch.records()[0].data(),
            &RecordData::Literal(b"CDE".to_vec())
        );
        assert_eq!(patch.apply_copy(b"AB"), b"ABCDE");
    }

    #[test]
    fn target_shorter_keeps_source_tail() {
        // IPS cannot truncate; the patched output keeps the source's length.
        let patch = diff(b"ABCD", b"AXC").unwrap();
        assert_eq!(patch.apply_copy(b"ABCD"), b"AXCD");
    }

    #[test]
    fn separate_runs_become_separate_records() {
        let source = b"aaaaaaaaaa";
        let target = b"aXaaaYYaaZ";
        let patch = diff(source, target).unwrap();
        assert_eq!(patch.len(), 3);

        let offsets: Vec<u32> = patch.records().iter().map(|r| r.offset()).collect();
        assert_eq!(offsets, [1, 5, 9]);
        assert_eq!(patch.apply_copy(source), target);
    }

    #[test]
    fn mismatch_run_is_chunked_at_payload_max() {
        let source = vec![0u8; PAYLOAD_MAX + 1000];
        let target = vec![1u8; PAYLOAD_MAX + 1000];
        let patch = diff(&source, &target).unwrap();

        assert_eq!(patch.len(), 2);
        assert_eq!(patch.records()[0].applied_size(), PAYLOAD_MAX);
        assert_eq!(patch.records()[0].offset(), 0);
        assert_eq!(patch.records()[1].offset(), PAYLOAD_MAX as u32);
        assert_eq!(patch.apply_copy(&source), target);
    }

    #[test]
    fn trailing_bytes_are_chunked() {
        let source = b"x".to_vec();
        let mut target = source.clone();
        target.extend(std::iter::repeat_n(7u8, PAYLOAD_MAX + 10));

        let patch = diff(&source, &target).unwrap();
        assert_eq!(patch.len(), 2);
        assert_eq!(patch.records()[0].offset(), 1);
        assert_eq!(patch.records()[0].applied_size(), PAYLOAD_MAX);
        assert_eq!(patch.apply_copy(&source), target);
    }

    #[test]
    fn offsets_are_strictly_increasing_and_disjoint() {
        let source: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut target = source.clone();
        for i in (0..target.len()).step_by(97) {
            target[i] = target[i].wrapping_add(1);
        }
        let patch = diff(&source, &target).unwrap();

        let mut last_end = 0usize;
        for record in patch.records() {
            assert!(record.offset() as usize >= last_end, "overlap at {record}");
            last_end = record.offset() as usize + record.applied_size();
        }
        assert_eq!(patch.apply_copy(&source), target);
    }

    #[test]
    fn offset_overflow_is_rejected() {
        // A mismatch just past the 24-bit offset limit cannot be encoded.
        let len = OFFSET_MAX as usize + 2;
        let source = vec![0u8; len];
        let mut target = source.clone();
        *target.last_mut().unwrap() = 1;

        let err = diff(&source, &target).unwrap_err();
        assert!(matches!(
            err,
            PatchError::ValueOutOfRange { field: "offset", .. }
        ));
    }
}
