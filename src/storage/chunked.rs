//! Region reads from chunked arrays through `zarrs`, shared by the Zarr and
//! N5 strategies, which differ only in the store the array is opened from.
//! Only the chunks which intersect the region are retrieved, and absent
//! chunks read as the fill value.
use super::{backend, Selection};
use crate::error::{ReadError, Result};
use crate::region::Region;
use crate::volume::{DataType, Volume, VolumeElement};
use log::debug;
use ndarray::{ArrayD, IxDyn};
use std::sync::Arc;
use zarrs::array::{Array, DataType as ZarrDataType};
use zarrs::array_subset::ArraySubset;
use zarrs::storage::ReadableStorageTraits;

/// Open the array at `node` of a store, given without leading slash.
pub(crate) fn open_array<TStorage>(storage: Arc<TStorage>, node: &str) -> Result<Array<TStorage>>
where
    TStorage: ?Sized + ReadableStorageTraits + 'static,
{
    Array::open(storage, &format!("/{}", node)).map_err(backend)
}

fn volume_data_type(dtype: &ZarrDataType) -> Result<DataType> {
    Ok(match dtype {
        ZarrDataType::UInt8 => DataType::Uint8,
        ZarrDataType::UInt16 => DataType::Uint16,
        ZarrDataType::UInt32 => DataType::Uint32,
        ZarrDataType::UInt64 => DataType::Uint64,
        ZarrDataType::Int8 => DataType::Int8,
        ZarrDataType::Int16 => DataType::Int16,
        ZarrDataType::Int32 => DataType::Int32,
        ZarrDataType::Int64 => DataType::Int64,
        ZarrDataType::Float32 => DataType::Float32,
        ZarrDataType::Float64 => DataType::Float64,
        other => return Err(ReadError::UnsupportedDataType(format!("zarr {:?}", other))),
    })
}

/// Read the part of an array within the region.
pub(crate) fn read_array<TStorage>(array: &Array<TStorage>, region: &Region) -> Result<Volume>
where
    TStorage: ?Sized + ReadableStorageTraits + 'static,
{
    let dtype = volume_data_type(array.data_type())?;
    let shape: Vec<usize> = array.shape().iter().map(|&d| d as usize).collect();
    let selection = Selection::new(region, &shape);
    debug!("Chunked array of shape {:?}, reading {:?}", shape, selection.ranges());
    if selection.is_empty() {
        return Ok(selection.empty_volume(dtype));
    }

    let subset = ArraySubset::new_with_ranges(
        &selection
            .ranges()
            .iter()
            .map(|r| r.start as u64..r.end as u64)
            .collect::<Vec<_>>(),
    );
    let selected = selection.shape();
    with_element_type!(dtype, T => {
        let data = array
            .retrieve_array_subset_elements::<T>(&subset)
            .map_err(backend)?;
        Ok(T::into_volume(ArrayD::from_shape_vec(IxDyn(&selected), data)?))
    })
}
