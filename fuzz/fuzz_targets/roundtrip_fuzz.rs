#![no_main]
use libfuzzer_sys::fuzz_target;
use oxips::ips::{self, Patch};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Split input into "source" and "target" halves.
    let split = data.len() / 2;
    let (source, target) = data.split_at(split);

    let patch = ips::diff(source, target).unwrap();
    let encoded = patch.encode();
    let decoded = Patch::decode(&encoded).unwrap();
    assert_eq!(decoded.records(), patch.records());

    // The patched output must reproduce the target over its full length;
    // IPS cannot shrink, so a shorter target keeps trailing source bytes.
    let patched = decoded.apply_copy(source);
    assert_eq!(&patched[..target.len()], target);
});
