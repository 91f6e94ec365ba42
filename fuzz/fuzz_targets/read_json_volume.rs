#![no_main]
use libfuzzer_sys::fuzz_target;
use smallvol::storage::json::value_to_volume;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice(data) {
        if let Ok(volume) = value_to_volume(&value) {
            let _ = volume.value_range();
        }
    }
});
