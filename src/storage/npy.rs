//! NumPy `.npy` files and `.npz` archives of them.
use super::dense_array;
use crate::error::{ReadError, Result};
use crate::region::Region;
use crate::volume::{DataType, Volume, VolumeElement};
use log::debug;
use npyz::npz::NpzArchive;
use npyz::{DType, NpyFile, Order};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read a whole `.npy` file, then restrict it to the region.
pub fn read_npy<P: AsRef<Path>>(path: P, region: &Region) -> Result<Volume> {
    let file = BufReader::new(File::open(path)?);
    let npy = NpyFile::new(file)?;
    Ok(npy_to_volume(npy)?.select(region))
}

/// Read the array called `name` from an `.npz` archive, then restrict it to
/// the region.
///
/// # Errors
///
/// - `ReadError::MissingDataset` if the archive has no array of that name.
pub fn read_npz<P: AsRef<Path>>(path: P, name: &str, region: &Region) -> Result<Volume> {
    let mut archive = NpzArchive::open(path)?;
    let npy = archive
        .by_name(name)?
        .ok_or_else(|| ReadError::MissingDataset(name.to_string()))?;
    Ok(npy_to_volume(npy)?.select(region))
}

fn npy_to_volume<R: Read>(npy: NpyFile<R>) -> Result<Volume> {
    let descr = match npy.dtype() {
        DType::Plain(ts) => ts.to_string(),
        other => return Err(ReadError::UnsupportedDataType(format!("{:?}", other))),
    };
    let dtype = DataType::from_numpy_descr(&descr)
        .ok_or_else(|| ReadError::UnsupportedDataType(descr.clone()))?;
    let shape: Vec<usize> = npy.shape().iter().map(|&d| d as usize).collect();
    let fortran = matches!(npy.order(), Order::Fortran);
    debug!("npy array of shape {:?}, type {} ({})", shape, dtype, descr);

    with_element_type!(dtype, T => {
        let data: Vec<T> = npy.into_vec()?;
        dense_array(shape, data, fortran).map(T::into_volume)
    })
}
