#![no_main]
use libfuzzer_sys::fuzz_target;
use smallvol::util::parse_triple;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_triple(text);
    }
});
