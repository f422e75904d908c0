#![no_main]
use libfuzzer_sys::fuzz_target;
use urlid_rs::{Codec, Hash128};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    // Anything that decodes must encode back to the same value.
    let codec = Codec::default();
    if let Ok(id) = codec.decode(&input) {
        assert_eq!(codec.decode(&codec.encode(id)), Ok(id));
    }
    if let Ok(hash) = Hash128::decode_url(&input) {
        assert_eq!(Hash128::decode_url(&hash.encode_url()), Ok(hash));
    }
    if let Ok(hash) = Hash128::from_hex(&input) {
        assert_eq!(hash.to_hex(), input.to_ascii_lowercase());
    }
});
