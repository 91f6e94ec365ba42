#![no_main]
use libfuzzer_sys::fuzz_target;
use smallvol::storage::n5::{BlockDecoder, DatasetAttributes};

fn decoder(attributes: &str) -> BlockDecoder {
    let attributes: DatasetAttributes = serde_json::from_str(attributes).unwrap();
    BlockDecoder::new(&attributes).unwrap()
}

fuzz_target!(|data: &[u8]| {
    let raw = decoder(r#"{"dimensions": [9, 7, 5], "blockSize": [4, 4, 4], "dataType": "uint8", "compression": {"type": "raw"}}"#);
    let gzip = decoder(r#"{"dimensions": [9, 7], "blockSize": [8, 8], "dataType": "uint16", "compression": {"type": "gzip"}}"#);
    let zlib = decoder(r#"{"dimensions": [3], "blockSize": [2], "dataType": "float64", "compression": {"type": "gzip", "useZlib": true}}"#);
    let _ = raw.decode(data);
    let _ = gzip.decode(data);
    let _ = zlib.decode(data);
});
