//! HDF5 containers, through the `hdf5` crate.
//!
//! Requires the `hdf5` feature, which links against the system HDF5 library.
//! The region is passed down as a hyperslab selection, so only the selected
//! elements are read from disk.
use crate::error::{ReadError, Result};
use crate::region::Region;
use crate::volume::Volume;
use std::path::Path;

/// Read the dataset at `internal_path` of the file at `path`, restricted to
/// the region.
///
/// # Errors
///
/// - `ReadError::MissingDataset` if there is no dataset at that path.
/// - `ReadError::MissingFeature` if the crate was built without `hdf5`.
#[cfg(feature = "hdf5")]
pub fn read_hdf5<P: AsRef<Path>>(path: P, internal_path: &str, region: &Region) -> Result<Volume> {
    use super::{backend, Selection};
    use crate::volume::{DataType, VolumeElement};
    use ::hdf5::types::{FloatSize, IntSize, TypeDescriptor};
    use log::debug;
    use ndarray::{IxDyn, SliceInfo, SliceInfoElem};
    use std::convert::TryFrom;

    let file = ::hdf5::File::open(path.as_ref()).map_err(backend)?;
    let dataset = file
        .dataset(internal_path)
        .map_err(|_| ReadError::MissingDataset(internal_path.to_string()))?;
    let descriptor = dataset
        .dtype()
        .and_then(|t| t.to_descriptor())
        .map_err(backend)?;
    let dtype = match descriptor {
        TypeDescriptor::Unsigned(IntSize::U1) => DataType::Uint8,
        TypeDescriptor::Unsigned(IntSize::U2) => DataType::Uint16,
        TypeDescriptor::Unsigned(IntSize::U4) => DataType::Uint32,
        TypeDescriptor::Unsigned(IntSize::U8) => DataType::Uint64,
        TypeDescriptor::Integer(IntSize::U1) => DataType::Int8,
        TypeDescriptor::Integer(IntSize::U2) => DataType::Int16,
        TypeDescriptor::Integer(IntSize::U4) => DataType::Int32,
        TypeDescriptor::Integer(IntSize::U8) => DataType::Int64,
        TypeDescriptor::Float(FloatSize::U4) => DataType::Float32,
        TypeDescriptor::Float(FloatSize::U8) => DataType::Float64,
        other => return Err(ReadError::UnsupportedDataType(format!("hdf5 {:?}", other))),
    };

    let shape = dataset.shape();
    let selection = Selection::new(region, &shape);
    debug!("hdf5 dataset {} of shape {:?}, reading {:?}", internal_path, shape, selection.ranges());
    if selection.is_empty() {
        return Ok(selection.empty_volume(dtype));
    }
    let elems: Vec<SliceInfoElem> = selection
        .ranges()
        .iter()
        .map(|r| SliceInfoElem::Slice {
            start: r.start as isize,
            end: Some(r.end as isize),
            step: 1,
        })
        .collect();
    let slicing = SliceInfo::<_, IxDyn, IxDyn>::try_from(elems)?;

    with_element_type!(dtype, T => {
        let array = dataset
            .read_slice::<T, _, IxDyn>(slicing)
            .map_err(backend)?;
        Ok(T::into_volume(array))
    })
}

/// Read the dataset at `internal_path` of the file at `path`, restricted to
/// the region.
///
/// # Errors
///
/// Always `ReadError::MissingFeature`: the crate was built without `hdf5`.
#[cfg(not(feature = "hdf5"))]
pub fn read_hdf5<P: AsRef<Path>>(_path: P, _internal_path: &str, _region: &Region) -> Result<Volume> {
    Err(ReadError::MissingFeature("hdf5"))
}
