//! Zarr containers, through the `zarrs` crate.
//!
//! Requires the `zarr` feature (enabled by default). Only the chunks which
//! intersect the region are retrieved.
use crate::error::{ReadError, Result};
use crate::region::Region;
use crate::volume::Volume;
use std::path::Path;

/// Read the array at `internal_path` of the container at `path`, restricted
/// to the region.
///
/// # Errors
///
/// - `ReadError::MissingDataset` if there is no array at that path.
/// - `ReadError::MissingFeature` if the crate was built without `zarr`.
#[cfg(feature = "zarr")]
pub fn read_zarr<P: AsRef<Path>>(path: P, internal_path: &str, region: &Region) -> Result<Volume> {
    use super::{backend, chunked};
    use log::debug;
    use std::sync::Arc;
    use zarrs::filesystem::FilesystemStore;

    let path = path.as_ref();
    let node = internal_path.trim_matches('/');
    let dir = path.join(node);
    if !dir.join(".zarray").is_file() && !dir.join("zarr.json").is_file() {
        return Err(ReadError::MissingDataset(internal_path.to_string()));
    }

    debug!("Zarr array {} in {}", node, path.display());
    let store = Arc::new(FilesystemStore::new(path).map_err(backend)?);
    let array = chunked::open_array(store, node)?;
    chunked::read_array(&array, region)
}

/// Read the array at `internal_path` of the container at `path`, restricted
/// to the region.
///
/// # Errors
///
/// Always `ReadError::MissingFeature`: the crate was built without `zarr`.
#[cfg(not(feature = "zarr"))]
pub fn read_zarr<P: AsRef<Path>>(_path: P, _internal_path: &str, _region: &Region) -> Result<Volume> {
    Err(ReadError::MissingFeature("zarr"))
}
