#![no_main]
use libfuzzer_sys::fuzz_target;
use oxips::ips::Patch;

fuzz_target!(|data: &[u8]| {
    // Fuzz the decoder with arbitrary bytes.
    // The decoder must never panic — only return errors.
    if let Ok(patch) = Patch::decode(data) {
        // Anything that decodes must re-encode and apply without panicking.
        let _ = patch.encode();
        let _ = patch.apply_copy(&[]);
    }
});
