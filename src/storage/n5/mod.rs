//! N5 containers, read through the same `zarrs` array machinery as Zarr.
//!
//! An N5 dataset is a directory holding an `attributes.json` file and one
//! file per block, at `<dataset>/<i0>/<i1>/.../<in>` where `ik` is the block
//! grid index over N5 dimension `k`. N5 lists dimensions fastest-varying
//! first, so shapes and grid indices are reversed with respect to the C order
//! used by [`Volume`].
//!
//! [`N5Store`] presents a dataset as a Zarr v3 array with the reversed shape:
//! the array metadata is derived from the attributes, and each chunk is a
//! block with its header stripped, decompressed, and padded to the full
//! block size if it lies on the edge of the dataset. Blocks which were never
//! written are absent and read as zeros.
//!
//! Requires the `n5` feature (enabled by default).
//!
//! [`Volume`]: ../../volume/enum.Volume.html
//! [`N5Store`]: ./struct.N5Store.html
use crate::error::Result;
use crate::region::Region;
use crate::volume::Volume;
use std::path::Path;

#[cfg(feature = "n5")]
mod block;
#[cfg(feature = "n5")]
mod store;

#[cfg(feature = "n5")]
pub use self::block::{BlockCompression, BlockDecoder, CompressionAttribute, DatasetAttributes};
#[cfg(feature = "n5")]
pub use self::store::N5Store;

/// Name of the attribute file of every N5 group and dataset.
pub const ATTRIBUTES_FILE: &str = "attributes.json";

/// Read the dataset at `internal_path` of the container at `path`,
/// restricted to the region.
///
/// # Errors
///
/// - `ReadError::MissingDataset` if there is no dataset at that path.
/// - `ReadError::UnsupportedDataType` or `UnsupportedCompression` if the
/// attributes name something this reader cannot decode.
/// - `ReadError::MissingFeature` if the crate was built without `n5`.
#[cfg(feature = "n5")]
pub fn read_n5<P: AsRef<Path>>(path: P, internal_path: &str, region: &Region) -> Result<Volume> {
    use super::chunked;
    use std::sync::Arc;

    let store = N5Store::open(path, internal_path)?;
    let node = store.node().to_string();
    let array = chunked::open_array(Arc::new(store), &node)?;
    chunked::read_array(&array, region)
}

/// Read the dataset at `internal_path` of the container at `path`,
/// restricted to the region.
///
/// # Errors
///
/// Always `ReadError::MissingFeature`: the crate was built without `n5`.
#[cfg(not(feature = "n5"))]
pub fn read_n5<P: AsRef<Path>>(_path: P, _internal_path: &str, _region: &Region) -> Result<Volume> {
    Err(crate::error::ReadError::MissingFeature("n5"))
}
