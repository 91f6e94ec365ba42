//! Read-only `zarrs` store over one N5 dataset.
use super::block::{BlockDecoder, DatasetAttributes};
use super::ATTRIBUTES_FILE;
use crate::error::{ReadError, Result};
use log::{debug, trace};
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use zarrs::storage::byte_range::{extract_byte_ranges, ByteRange};
use zarrs::storage::{Bytes, ReadableStorageTraits, StorageError, StoreKey};

const ZARR_METADATA: &str = "zarr.json";

/// Presents an N5 dataset as a Zarr v3 array at the same node path.
///
/// The store answers two kinds of keys under the node: its `zarr.json`,
/// derived from the dataset attributes, and chunk keys `c/<j0>/.../<jn>`,
/// which name the block at the reversed grid position. Everything else is
/// absent.
#[derive(Debug)]
pub struct N5Store {
    dataset: PathBuf,
    node: String,
    metadata: Vec<u8>,
    decoder: BlockDecoder,
}

impl N5Store {
    /// Open the dataset at `internal_path` of the container at `container`.
    ///
    /// # Errors
    ///
    /// - `ReadError::MissingDataset` if the dataset has no attributes file.
    /// - The errors of [`BlockDecoder::new`] for attributes this reader
    /// cannot decode.
    pub fn open<P: AsRef<Path>>(container: P, internal_path: &str) -> Result<Self> {
        let node = internal_path.trim_matches('/').to_string();
        let dataset = container.as_ref().join(&node);
        let file = match File::open(dataset.join(ATTRIBUTES_FILE)) {
            Ok(file) => file,
            Err(ref e) if e.kind() == ErrorKind::NotFound => {
                return Err(ReadError::MissingDataset(internal_path.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let attributes: DatasetAttributes = serde_json::from_reader(BufReader::new(file))?;
        let decoder = BlockDecoder::new(&attributes)?;
        let dtype = attributes.validate()?;
        debug!(
            "N5 dataset {}: shape {:?}, blocks {:?}, {} ({:?})",
            dataset.display(),
            attributes.shape(),
            attributes.block_shape(),
            dtype,
            decoder.compression()
        );
        let metadata = serde_json::to_vec(&attributes.zarr_metadata(dtype))?;
        Ok(N5Store {
            dataset,
            node,
            metadata,
            decoder,
        })
    }

    /// Node path of the dataset, without leading or trailing slashes.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// File of the block named by a chunk key relative to the node, if the
    /// key names a chunk.
    pub fn block_path(&self, chunk_key: &str) -> Option<PathBuf> {
        let indices = chunk_key.strip_prefix("c/")?;
        let mut path = self.dataset.clone();
        for index in indices.rsplit('/') {
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            path.push(index);
        }
        Some(path)
    }

    fn value(&self, key: &StoreKey) -> std::result::Result<Option<Vec<u8>>, StorageError> {
        let name = if self.node.is_empty() {
            key.as_str()
        } else {
            match key
                .as_str()
                .strip_prefix(self.node.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
            {
                Some(name) => name,
                None => return Ok(None),
            }
        };
        if name == ZARR_METADATA {
            return Ok(Some(self.metadata.clone()));
        }
        let path = match self.block_path(name) {
            Some(path) => path,
            None => return Ok(None),
        };
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(ref e) if e.kind() == ErrorKind::NotFound => {
                trace!("Block {} absent, filling with zeros", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        trace!("Reading block {}", path.display());
        self.decoder
            .decode(&bytes)
            .map(Some)
            .map_err(|e| StorageError::Other(format!("{}: {}", path.display(), e)))
    }
}

impl ReadableStorageTraits for N5Store {
    fn get_partial_values_key(
        &self,
        key: &StoreKey,
        byte_ranges: &[ByteRange],
    ) -> std::result::Result<Option<Vec<Bytes>>, StorageError> {
        match self.value(key)? {
            Some(value) => Ok(Some(
                extract_byte_ranges(&value, byte_ranges)?
                    .into_iter()
                    .map(Bytes::from)
                    .collect(),
            )),
            None => Ok(None),
        }
    }

    fn size_key(&self, key: &StoreKey) -> std::result::Result<Option<u64>, StorageError> {
        Ok(self.value(key)?.map(|value| value.len() as u64))
    }
}
