//! Extraction strategies, one module per family of file formats.
//!
//! Each strategy opens the file read-only, locates the array, and returns a
//! dense [`Volume`] already restricted to the requested [`Region`]. Handles
//! are owned locally and released before the strategy returns, on success
//! and on failure alike.
//!
//! Strategies backed by an optional library are always present; when the
//! corresponding cargo feature is disabled they fail with
//! `ReadError::MissingFeature` on first use.
//!
//! [`Volume`]: ../volume/enum.Volume.html
//! [`Region`]: ../region/enum.Region.html

#[cfg(any(feature = "zarr", feature = "n5"))]
mod chunked;
pub mod frames;
pub mod hdf5;
pub mod json;
pub mod n5;
pub mod npy;
pub mod zarr;

use crate::error::{ReadError, Result};
use crate::region::Region;
use crate::volume::{DataType, Volume, VolumeElement};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use std::error::Error as StdError;
use std::ops::Range;

/// Build a C-ordered array from a flat buffer, which is laid out in Fortran
/// order if `fortran` is set.
pub(crate) fn dense_array<T: Clone>(shape: Vec<usize>, data: Vec<T>, fortran: bool) -> Result<ArrayD<T>> {
    if fortran {
        let array = ArrayD::from_shape_vec(IxDyn(&shape).f(), data)?;
        Ok(array.as_standard_layout().into_owned())
    } else {
        Ok(ArrayD::from_shape_vec(IxDyn(&shape), data)?)
    }
}

/// The part of an array selected by a region, resolved against the shape of
/// the stored array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(not(any(feature = "zarr", feature = "n5", feature = "hdf5")), allow(dead_code))]
pub(crate) struct Selection {
    ranges: Vec<Range<usize>>,
}

#[cfg_attr(not(any(feature = "zarr", feature = "n5", feature = "hdf5")), allow(dead_code))]
impl Selection {
    pub(crate) fn new(region: &Region, shape: &[usize]) -> Self {
        Selection {
            ranges: region.resolve(shape),
        }
    }

    /// Index range over each axis.
    pub(crate) fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Shape of the selected part.
    pub(crate) fn shape(&self) -> Vec<usize> {
        self.ranges.iter().map(|r| r.len()).collect()
    }

    /// Whether nothing is selected, so that the file need not be read.
    pub(crate) fn is_empty(&self) -> bool {
        self.ranges.iter().any(|r| r.is_empty())
    }

    /// An empty volume of the selected shape.
    pub(crate) fn empty_volume(&self, dtype: DataType) -> Volume {
        with_element_type!(dtype, T => T::into_volume(ArrayD::default(IxDyn(&self.shape()))))
    }
}

/// Wrap an error raised by an optional storage library.
#[allow(dead_code)]
pub(crate) fn backend<E>(err: E) -> ReadError
where
    E: StdError + Send + Sync + 'static,
{
    ReadError::Backend(Box::new(err))
}
