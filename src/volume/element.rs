//! This module defines the data element API, which ties each supported Rust
//! numeric type to its [`Volume`] variant.
//!
//! [`Volume`]: ../enum.Volume.html
use super::{DataType, Volume};
use ndarray::ArrayD;
use num_traits::AsPrimitive;
use std::fmt::Debug;

/// Trait type for numeric types which can be held in a volume.
pub trait VolumeElement: 'static + Copy + Debug + Default + PartialOrd + AsPrimitive<f64> {
    /// The runtime data type matching this element type.
    const DATA_TYPE: DataType;

    /// Wrap an array of this element type into a volume.
    fn into_volume(array: ArrayD<Self>) -> Volume;

    /// Take the array out of a volume of this element type, or hand the
    /// volume back if its element type is different.
    fn from_volume(volume: Volume) -> Result<ArrayD<Self>, Volume>;

    /// Borrow the array of a volume of this element type.
    fn view_volume(volume: &Volume) -> Option<&ArrayD<Self>>;
}

macro_rules! impl_volume_element {
    ($t:ty, $variant:ident) => {
        impl VolumeElement for $t {
            const DATA_TYPE: DataType = DataType::$variant;

            fn into_volume(array: ArrayD<Self>) -> Volume {
                Volume::$variant(array)
            }

            fn from_volume(volume: Volume) -> Result<ArrayD<Self>, Volume> {
                match volume {
                    Volume::$variant(a) => Ok(a),
                    other => Err(other),
                }
            }

            fn view_volume(volume: &Volume) -> Option<&ArrayD<Self>> {
                match volume {
                    Volume::$variant(a) => Some(a),
                    _ => None,
                }
            }
        }

        impl From<ArrayD<$t>> for Volume {
            fn from(array: ArrayD<$t>) -> Volume {
                Volume::$variant(array)
            }
        }
    };
}

impl_volume_element!(u8, Uint8);
impl_volume_element!(u16, Uint16);
impl_volume_element!(u32, Uint32);
impl_volume_element!(u64, Uint64);
impl_volume_element!(i8, Int8);
impl_volume_element!(i16, Int16);
impl_volume_element!(i32, Int32);
impl_volume_element!(i64, Int64);
impl_volume_element!(f32, Float32);
impl_volume_element!(f64, Float64);
