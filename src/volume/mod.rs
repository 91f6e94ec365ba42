//! This module defines the in-memory volume type produced by every reader.
//!
//! A [`Volume`] is a dense `ndarray` array whose element type is only known
//! at run time, since it depends on the file being read. Axis 0 is the scroll
//! axis, axes 1 and 2 are the vertical and horizontal axes of each slice, and
//! an optional axis 3 holds colour channels.
//!
//! Statically typed access goes through the [`VolumeElement`] trait:
//!
//! ```
//! # use smallvol::Volume;
//! # use ndarray::{ArrayD, IxDyn};
//! let volume = Volume::from(ArrayD::<u16>::zeros(IxDyn(&[2, 3, 4])));
//! assert_eq!(volume.shape(), &[2, 3, 4]);
//! let array: ArrayD<u16> = volume.into_array().unwrap();
//! assert_eq!(array.len(), 24);
//! ```
//!
//! [`Volume`]: ./enum.Volume.html
//! [`VolumeElement`]: ./element/trait.VolumeElement.html

pub mod element;

pub use self::element::VolumeElement;

use crate::error::{ReadError, Result};
use crate::region::Region;
use ndarray::{ArrayD, Axis};
use num_traits::AsPrimitive;
use std::fmt;

/// Data type for representing the element type of a volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DataType {
    /// unsigned char.
    Uint8,
    /// unsigned short.
    Uint16,
    /// unsigned int.
    Uint32,
    /// unsigned long long.
    Uint64,
    /// signed char.
    Int8,
    /// signed short.
    Int16,
    /// signed int.
    Int32,
    /// signed long long.
    Int64,
    /// 32 bit float.
    Float32,
    /// 64 bit float = double.
    Float64,
}

impl DataType {
    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(self) -> usize {
        use self::DataType::*;
        match self {
            Uint8 | Int8 => 1,
            Uint16 | Int16 => 2,
            Uint32 | Int32 | Float32 => 4,
            Uint64 | Int64 | Float64 => 8,
        }
    }

    /// Resolve a data type from its lowercase name, as used in N5 and HDF5
    /// tooling (`"uint8"`, `"float32"`, ...).
    pub fn from_name(name: &str) -> Option<DataType> {
        use self::DataType::*;
        Some(match name {
            "uint8" => Uint8,
            "uint16" => Uint16,
            "uint32" => Uint32,
            "uint64" => Uint64,
            "int8" => Int8,
            "int16" => Int16,
            "int32" => Int32,
            "int64" => Int64,
            "float32" => Float32,
            "float64" => Float64,
            _ => return None,
        })
    }

    /// Resolve a data type from a NumPy type string such as `"<u2"` or
    /// `"|i1"`. The byte order character is ignored.
    pub fn from_numpy_descr(descr: &str) -> Option<DataType> {
        use self::DataType::*;
        let code = descr.trim_start_matches(|c| matches!(c, '<' | '>' | '|' | '='));
        Some(match code {
            "u1" | "B" => Uint8,
            "u2" => Uint16,
            "u4" => Uint32,
            "u8" => Uint64,
            "i1" | "b" => Int8,
            "i2" => Int16,
            "i4" => Int32,
            "i8" => Int64,
            "f4" => Float32,
            "f8" => Float64,
            _ => return None,
        })
    }

    /// Lowercase name of this data type.
    pub fn name(self) -> &'static str {
        use self::DataType::*;
        match self {
            Uint8 => "uint8",
            Uint16 => "uint16",
            Uint32 => "uint32",
            Uint64 => "uint64",
            Int8 => "int8",
            Int16 => "int16",
            Int32 => "int32",
            Int64 => "int64",
            Float32 => "float32",
            Float64 => "float64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dense array read from a file, of any supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Volume {
    /// `u8` elements
    Uint8(ArrayD<u8>),
    /// `u16` elements
    Uint16(ArrayD<u16>),
    /// `u32` elements
    Uint32(ArrayD<u32>),
    /// `u64` elements
    Uint64(ArrayD<u64>),
    /// `i8` elements
    Int8(ArrayD<i8>),
    /// `i16` elements
    Int16(ArrayD<i16>),
    /// `i32` elements
    Int32(ArrayD<i32>),
    /// `i64` elements
    Int64(ArrayD<i64>),
    /// `f32` elements
    Float32(ArrayD<f32>),
    /// `f64` elements
    Float64(ArrayD<f64>),
}

impl Volume {
    /// Get this volume's element type.
    pub fn data_type(&self) -> DataType {
        each_variant!(self, a => element_type_of(a))
    }

    /// Get the dimensions of the volume.
    pub fn shape(&self) -> &[usize] {
        each_variant!(self, a => a.shape())
    }

    /// Get the volume's number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// Whether the volume holds no elements at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restrict the volume to a region. See [`Region::apply`].
    ///
    /// [`Region::apply`]: ../region/enum.Region.html#method.apply
    pub fn select(self, region: &Region) -> Volume {
        map_variant!(self, a => region.apply(a))
    }

    /// Move the array out of the volume, if it holds elements of type `T`.
    pub fn into_array<T: VolumeElement>(self) -> Option<ArrayD<T>> {
        T::from_volume(self).ok()
    }

    /// Borrow the array of the volume, if it holds elements of type `T`.
    pub fn as_array<T: VolumeElement>(&self) -> Option<&ArrayD<T>> {
        T::view_volume(self)
    }

    /// Convert every element to `f64`.
    pub fn to_f64(&self) -> ArrayD<f64> {
        each_variant!(self, a => a.mapv(|v| v.as_()))
    }

    /// Smallest and largest value in the volume, ignoring NaN. `None` if
    /// there are no comparable values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        each_variant!(self, a => {
            a.iter().fold(None, |acc: Option<(f64, f64)>, v| {
                let v: f64 = v.as_();
                if v.is_nan() {
                    return acc;
                }
                Some(match acc {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                })
            })
        })
    }

    /// Obtain the slice at `index` along the scroll axis, yielding a volume
    /// with one dimension fewer.
    ///
    /// # Panic
    ///
    /// Panics if the volume has no dimensions or `index` is out of bounds.
    pub fn index_scroll(&self, index: usize) -> Volume {
        map_variant!(self, a => a.index_axis(Axis(0), index).to_owned())
    }

    /// Stack volumes of equal shape and element type along a new leading
    /// axis.
    ///
    /// # Errors
    ///
    /// - `ReadError::InconsistentShape` if the parts differ in shape or
    /// element type.
    pub fn stack(parts: Vec<Volume>, template: &[usize], dtype: DataType) -> Result<Volume> {
        with_element_type!(dtype, T => stack_typed::<T>(parts, template).map(T::into_volume))
    }
}

fn element_type_of<T: VolumeElement>(_: &ArrayD<T>) -> DataType {
    T::DATA_TYPE
}

fn stack_typed<T: VolumeElement>(parts: Vec<Volume>, template: &[usize]) -> Result<ArrayD<T>> {
    let mut shape = Vec::with_capacity(template.len() + 1);
    shape.push(parts.len());
    shape.extend_from_slice(template);

    let mut data = Vec::with_capacity(shape.iter().product());
    for (i, part) in parts.into_iter().enumerate() {
        if part.shape() != template {
            return Err(ReadError::InconsistentShape(format!(
                "part {} has shape {:?}, expected {:?}",
                i,
                part.shape(),
                template
            )));
        }
        let array = T::from_volume(part).map_err(|other| {
            ReadError::InconsistentShape(format!(
                "part {} has data type {}, expected {}",
                i,
                other.data_type(),
                T::DATA_TYPE
            ))
        })?;
        data.extend(array.iter().copied());
    }
    Ok(ArrayD::from_shape_vec(shape, data)?)
}
