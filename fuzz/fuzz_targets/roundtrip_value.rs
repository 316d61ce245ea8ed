#![no_main]
use libfuzzer_sys::fuzz_target;

// A valid frame that decodes must re-encode to the same bytes: the codec is
// deterministic, and dict-key/container order is never normalized away.
fuzz_target!(|data: &[u8]| {
    if let Ok(value) = crous::decode_value(data) {
        let reencoded = crous::encode_value(&value).expect("a decoded value must re-encode");
        assert_eq!(reencoded, data);
    }
});
