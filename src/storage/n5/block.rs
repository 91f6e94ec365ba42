//! Dataset attributes and block decoding.
//!
//! Each block file starts with a big-endian header:
//!
//! | bytes     | field                                         |
//! |-----------|-----------------------------------------------|
//! | 2         | mode (0 = default, 1 = varlength, 2 = object) |
//! | 2         | number of dimensions `n`                      |
//! | 4 × n     | block size over each N5 dimension             |
//! | 4         | number of elements (varlength mode only)      |
//!
//! followed by the element data, big-endian, possibly compressed.
use crate::error::{ReadError, Result};
use crate::storage::backend;
use crate::volume::DataType;
use byteordered::ByteOrdered;
use flate2::read::ZlibDecoder;
use ndarray::{ArrayD, IxDyn, Slice};
use num_traits::FromPrimitive;
use serde::Deserialize;
use serde_json::{json, Value};
use std::borrow::Cow;
use std::io::Read;
use std::sync::Arc;
use zarrs::array::codec::{BytesToBytesCodecTraits, Codec, CodecOptions};
use zarrs::array::BytesRepresentation;
use zarrs::metadata::v3::MetadataV3;

/// The `attributes.json` of an N5 dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAttributes {
    /// Size of the dataset over each N5 dimension, fastest-varying first.
    pub dimensions: Vec<u64>,
    /// Size of a full block over each N5 dimension.
    pub block_size: Vec<u64>,
    /// Element type name, such as `"uint16"`.
    pub data_type: String,
    /// Block compression; raw when absent.
    #[serde(default)]
    pub compression: Option<CompressionAttribute>,
    /// Compression name of N5 versions before 1.0.
    #[serde(default)]
    pub compression_type: Option<String>,
}

/// The `compression` object of dataset attributes. Only the parameters
/// needed for decoding are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompressionAttribute {
    /// Compression scheme, such as `"gzip"` or `"blosc"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Gzip only: the data is a bare zlib stream.
    #[serde(default, rename = "useZlib")]
    pub use_zlib: bool,
}

impl DatasetAttributes {
    /// Check that the attributes describe a readable dataset, and resolve
    /// its element type.
    pub fn validate(&self) -> Result<DataType> {
        if self.dimensions.len() != self.block_size.len() {
            return Err(ReadError::InconsistentShape(format!(
                "{} dimensions but {} block sizes",
                self.dimensions.len(),
                self.block_size.len()
            )));
        }
        if self.block_size.iter().any(|&b| b == 0) {
            return Err(ReadError::InconsistentShape("zero block size".to_string()));
        }
        DataType::from_name(&self.data_type)
            .ok_or_else(|| ReadError::UnsupportedDataType(self.data_type.clone()))
    }

    /// Shape of the dataset, in C order.
    pub fn shape(&self) -> Vec<u64> {
        self.dimensions.iter().rev().copied().collect()
    }

    /// Shape of a full block, in C order.
    pub fn block_shape(&self) -> Vec<u64> {
        self.block_size.iter().rev().copied().collect()
    }

    /// Zarr v3 metadata of the array presenting this dataset: C-ordered
    /// shape and chunks, big-endian elements, zero fill.
    pub fn zarr_metadata(&self, dtype: DataType) -> Value {
        json!({
            "zarr_format": 3,
            "node_type": "array",
            "shape": self.shape(),
            "data_type": dtype.name(),
            "chunk_grid": {
                "name": "regular",
                "configuration": { "chunk_shape": self.block_shape() }
            },
            "chunk_key_encoding": {
                "name": "default",
                "configuration": { "separator": "/" }
            },
            "fill_value": 0,
            "codecs": [{ "name": "bytes", "configuration": { "endian": "big" } }]
        })
    }
}

/// Compression applied to the data section of each block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlockCompression {
    /// Stored as is.
    Raw,
    /// Gzip stream.
    Gzip,
    /// Zlib stream.
    Zlib,
    /// Bzip2 stream.
    Bzip2,
    /// Blosc frame.
    Blosc,
}

impl BlockCompression {
    /// Resolve the compression named by dataset attributes.
    ///
    /// # Errors
    ///
    /// `ReadError::UnsupportedCompression` for schemes other than raw, gzip,
    /// zlib, bzip2 and blosc.
    pub fn from_attributes(attributes: &DatasetAttributes) -> Result<Self> {
        let (kind, use_zlib) = match (&attributes.compression, &attributes.compression_type) {
            (Some(c), _) => (c.kind.as_str(), c.use_zlib),
            (None, Some(kind)) => (kind.as_str(), false),
            (None, None) => ("raw", false),
        };
        match kind {
            "raw" => Ok(BlockCompression::Raw),
            "gzip" if use_zlib => Ok(BlockCompression::Zlib),
            "gzip" => Ok(BlockCompression::Gzip),
            "bzip2" => Ok(BlockCompression::Bzip2),
            "blosc" => Ok(BlockCompression::Blosc),
            other => Err(ReadError::UnsupportedCompression(other.to_string())),
        }
    }

    /// The zarrs codec decoding this compression, for those zarrs provides.
    fn codec(self) -> Result<Option<Arc<dyn BytesToBytesCodecTraits>>> {
        // decoders read their parameters from the stream itself
        let metadata = match self {
            BlockCompression::Raw | BlockCompression::Zlib => return Ok(None),
            BlockCompression::Gzip => json!({ "name": "gzip", "configuration": { "level": 5 } }),
            BlockCompression::Bzip2 => json!({ "name": "bz2", "configuration": { "level": 9 } }),
            BlockCompression::Blosc => json!({
                "name": "blosc",
                "configuration": { "cname": "lz4", "clevel": 5, "shuffle": "noshuffle", "blocksize": 0 }
            }),
        };
        let metadata: MetadataV3 = serde_json::from_value(metadata)?;
        match Codec::from_metadata(&metadata) {
            Ok(Codec::BytesToBytes(codec)) => Ok(Some(codec)),
            _ => Err(ReadError::UnsupportedCompression(format!("{:?}", self))),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
enum BlockMode {
    Default = 0,
    VarLength = 1,
    Object = 2,
}

/// Turns N5 block files of one dataset into full, C-ordered chunks of
/// big-endian elements.
#[derive(Debug, Clone)]
pub struct BlockDecoder {
    compression: BlockCompression,
    codec: Option<Arc<dyn BytesToBytesCodecTraits>>,
    element_size: usize,
    block_shape: Vec<usize>,
}

impl BlockDecoder {
    /// Create the decoder of a dataset.
    ///
    /// # Errors
    ///
    /// The errors of [`DatasetAttributes::validate`] and
    /// [`BlockCompression::from_attributes`].
    pub fn new(attributes: &DatasetAttributes) -> Result<Self> {
        let dtype = attributes.validate()?;
        let compression = BlockCompression::from_attributes(attributes)?;
        Ok(BlockDecoder {
            compression,
            codec: compression.codec()?,
            element_size: dtype.size_of(),
            block_shape: attributes.block_shape().into_iter().map(|b| b as usize).collect(),
        })
    }

    /// Compression of the blocks.
    pub fn compression(&self) -> BlockCompression {
        self.compression
    }

    /// Decode the contents of a block file. Blocks on the edge of the
    /// dataset are stored truncated, and come out padded with zeros.
    ///
    /// # Errors
    ///
    /// - `ReadError::UnsupportedDataType` for blocks in object mode.
    /// - `ReadError::InconsistentShape` if the header does not fit the
    /// dataset, or the data does not fit the header.
    /// - `ReadError::Io` or `ReadError::Backend` on truncated or corrupt data.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut header = ByteOrdered::be(bytes);
        let mode = header.read_u16()?;
        let mode = BlockMode::from_u16(mode)
            .ok_or_else(|| ReadError::InconsistentShape(format!("unknown N5 block mode {}", mode)))?;
        let ndim = header.read_u16()? as usize;
        if ndim != self.block_shape.len() {
            return Err(ReadError::InconsistentShape(format!(
                "block has {} dimensions, dataset has {}",
                ndim,
                self.block_shape.len()
            )));
        }
        let mut shape = vec![0usize; ndim];
        // stored fastest-varying first
        for d in shape.iter_mut().rev() {
            *d = header.read_u32()? as usize;
        }
        if shape.iter().zip(&self.block_shape).any(|(&s, &b)| s > b) {
            return Err(ReadError::InconsistentShape(format!(
                "block of shape {:?} exceeds the block size {:?}",
                shape, self.block_shape
            )));
        }
        let count = shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| ReadError::InconsistentShape(format!("block size {:?} overflows", shape)))?;
        match mode {
            BlockMode::Default => {}
            BlockMode::VarLength => {
                let declared = header.read_u32()? as usize;
                if declared != count {
                    return Err(ReadError::InconsistentShape(format!(
                        "varlength block holds {} elements, block shape {:?}",
                        declared, shape
                    )));
                }
            }
            BlockMode::Object => {
                return Err(ReadError::UnsupportedDataType("N5 object block".to_string()))
            }
        }

        let data = self.decompress(header.into_inner())?;
        if Some(data.len()) != count.checked_mul(self.element_size) {
            return Err(ReadError::InconsistentShape(format!(
                "block of shape {:?} holds {} bytes",
                shape,
                data.len()
            )));
        }
        if shape == self.block_shape {
            return Ok(data);
        }

        let mut stored = shape;
        stored.push(self.element_size);
        let mut full = self.block_shape.clone();
        full.push(self.element_size);
        let block = ArrayD::from_shape_vec(IxDyn(&stored), data)?;
        let mut chunk = ArrayD::<u8>::zeros(IxDyn(&full));
        chunk
            .slice_each_axis_mut(|d| Slice::from(0..stored[d.axis.index()]))
            .assign(&block);
        Ok(chunk.into_raw_vec())
    }

    fn decompress(&self, payload: &[u8]) -> Result<Vec<u8>> {
        match (&self.codec, self.compression) {
            (Some(codec), _) => {
                let decoded = codec
                    .decode(
                        Cow::Borrowed(payload),
                        &BytesRepresentation::UnboundedSize,
                        &CodecOptions::default(),
                    )
                    .map_err(backend)?;
                Ok(decoded.into_owned())
            }
            (None, BlockCompression::Zlib) => {
                let mut data = Vec::new();
                let _ = ZlibDecoder::new(payload).read_to_end(&mut data)?;
                Ok(data)
            }
            (None, _) => Ok(payload.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockCompression, BlockDecoder, DatasetAttributes};
    use crate::error::ReadError;
    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use serde_json::json;
    use std::borrow::Cow;
    use std::io::Write;
    use zarrs::array::codec::{BytesToBytesCodecTraits, CodecOptions};

    fn attributes(dimensions: &[u64], block_size: &[u64], dtype: &str, compression: serde_json::Value) -> DatasetAttributes {
        serde_json::from_value(json!({
            "dimensions": dimensions,
            "blockSize": block_size,
            "dataType": dtype,
            "compression": compression,
        }))
        .unwrap()
    }

    fn header(dims: &[u32]) -> Vec<u8> {
        let mut bytes = vec![0, 0];
        bytes.extend_from_slice(&(dims.len() as u16).to_be_bytes());
        for d in dims {
            bytes.extend_from_slice(&d.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn compression_names() {
        let parse = |c| BlockCompression::from_attributes(&attributes(&[4], &[4], "uint8", c));
        assert_eq!(parse(json!({"type": "raw"})).unwrap(), BlockCompression::Raw);
        assert_eq!(parse(json!({"type": "gzip", "level": -1})).unwrap(), BlockCompression::Gzip);
        assert_eq!(
            parse(json!({"type": "gzip", "useZlib": true})).unwrap(),
            BlockCompression::Zlib
        );
        assert_eq!(parse(json!({"type": "bzip2", "blockSize": 9})).unwrap(), BlockCompression::Bzip2);
        assert_eq!(parse(json!({"type": "blosc", "cname": "zstd"})).unwrap(), BlockCompression::Blosc);
        match parse(json!({"type": "xz", "preset": 6})) {
            Err(ReadError::UnsupportedCompression(name)) => assert_eq!(name, "xz"),
            other => panic!("unexpected {:?}", other),
        }

        let legacy: DatasetAttributes = serde_json::from_str(
            r#"{"dimensions": [4], "blockSize": [4], "dataType": "uint8", "compressionType": "gzip"}"#,
        )
        .unwrap();
        assert_eq!(BlockCompression::from_attributes(&legacy).unwrap(), BlockCompression::Gzip);
    }

    #[test]
    fn raw_block_is_c_ordered() {
        // N5 dims (x=3, y=2): two rows of three
        let decoder = BlockDecoder::new(&attributes(&[3, 2], &[3, 2], "uint16", json!({"type": "raw"}))).unwrap();
        let mut bytes = header(&[3, 2]);
        for v in 0u16..6 {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        let chunk = decoder.decode(&bytes).unwrap();
        assert_eq!(chunk, bytes[12..].to_vec());
    }

    #[test]
    fn edge_block_is_padded() {
        // full block (y=2, x=3), stored block (y=1, x=2)
        let decoder = BlockDecoder::new(&attributes(&[5, 3], &[3, 2], "uint8", json!({"type": "raw"}))).unwrap();
        let mut bytes = header(&[2, 1]);
        bytes.extend_from_slice(&[7, 8]);
        assert_eq!(decoder.decode(&bytes).unwrap(), vec![7, 8, 0, 0, 0, 0]);

        let decoder = BlockDecoder::new(&attributes(&[3, 3], &[2, 2], "uint16", json!({"type": "raw"}))).unwrap();
        let mut bytes = header(&[1, 2]);
        bytes.extend_from_slice(&[0, 1, 0, 2]);
        assert_eq!(decoder.decode(&bytes).unwrap(), vec![0, 1, 0, 0, 0, 2, 0, 0]);
    }

    #[test]
    fn gzip_and_zlib_blocks() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[1, 2, 3, 4]).unwrap();
        let mut bytes = header(&[2, 2]);
        bytes.extend(encoder.finish().unwrap());
        let decoder = BlockDecoder::new(&attributes(&[2, 2], &[2, 2], "uint8", json!({"type": "gzip"}))).unwrap();
        assert_eq!(decoder.decode(&bytes).unwrap(), vec![1, 2, 3, 4]);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[1, 2, 3, 4]).unwrap();
        let mut bytes = header(&[2, 2]);
        bytes.extend(encoder.finish().unwrap());
        let decoder = BlockDecoder::new(&attributes(
            &[2, 2],
            &[2, 2],
            "uint8",
            json!({"type": "gzip", "useZlib": true}),
        ))
        .unwrap();
        assert_eq!(decoder.compression(), BlockCompression::Zlib);
        assert_eq!(decoder.decode(&bytes).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn bzip2_and_blosc_blocks() {
        let data: Vec<u8> = (0..64).collect();
        for compression in &[BlockCompression::Bzip2, BlockCompression::Blosc] {
            let codec = compression.codec().unwrap().unwrap();
            let encoded = codec
                .encode(Cow::Borrowed(&data[..]), &CodecOptions::default())
                .unwrap();
            let mut bytes = header(&[8, 8]);
            bytes.extend_from_slice(&encoded);
            let name = if *compression == BlockCompression::Bzip2 { "bzip2" } else { "blosc" };
            let decoder = BlockDecoder::new(&attributes(&[8, 8], &[8, 8], "uint8", json!({"type": name}))).unwrap();
            assert_eq!(decoder.decode(&bytes).unwrap(), data, "{}", name);
        }
    }

    #[test]
    fn bad_blocks() {
        let decoder = BlockDecoder::new(&attributes(&[4], &[4], "uint8", json!({"type": "raw"}))).unwrap();

        let mut bytes = header(&[4]);
        bytes.extend_from_slice(&[1, 2]);
        match decoder.decode(&bytes) {
            Err(ReadError::InconsistentShape(_)) => {}
            other => panic!("unexpected {:?}", other),
        }

        match decoder.decode(&header(&[4])[..5]) {
            Err(ReadError::Io(_)) => {}
            other => panic!("unexpected {:?}", other),
        }

        let mut bytes = header(&[4]);
        bytes[1] = 2;
        match decoder.decode(&bytes) {
            Err(ReadError::UnsupportedDataType(_)) => {}
            other => panic!("unexpected {:?}", other),
        }

        let mut bytes = header(&[2]);
        bytes[1] = 1;
        bytes.extend_from_slice(&3u32.to_be_bytes());
        bytes.extend_from_slice(&[1, 2, 3]);
        match decoder.decode(&bytes) {
            Err(ReadError::InconsistentShape(_)) => {}
            other => panic!("unexpected {:?}", other),
        }

        match decoder.decode(&header(&[8])) {
            Err(ReadError::InconsistentShape(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match decoder.decode(&header(&[2, 2])) {
            Err(ReadError::InconsistentShape(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn invalid_attributes() {
        match BlockDecoder::new(&attributes(&[4, 4], &[4], "uint8", json!({"type": "raw"}))) {
            Err(ReadError::InconsistentShape(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match BlockDecoder::new(&attributes(&[4], &[0], "uint8", json!({"type": "raw"}))) {
            Err(ReadError::InconsistentShape(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match BlockDecoder::new(&attributes(&[4], &[4], "complex64", json!({"type": "raw"}))) {
            Err(ReadError::UnsupportedDataType(name)) => assert_eq!(name, "complex64"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
