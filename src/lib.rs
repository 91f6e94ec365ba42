//! Read small 3D volumes out of scientific array files, and page through
//! their slices.
//!
//! A single [`read`] call opens a file of any supported format, optionally
//! restricted to a sub-region, and returns a dense [`Volume`]:
//!
//! | Format | Extensions | Internal path |
//! |--------|------------|---------------|
//! | N5     | `n5`                 | required (feature `n5`) |
//! | HDF5   | `h5`, `hdf`, `hdf5`  | required (feature `hdf5`) |
//! | Zarr   | `zarr`, `zr`         | required (feature `zarr`) |
//! | NumPy  | `npy`                | ignored  |
//! | NumPy archive | `npz`         | required |
//! | JSON   | `json`               | optional top-level key |
//! | Images | anything else        | ignored  |
//!
//! Image files are read frame by frame (TIFF pages, GIF frames, or a single
//! still image), each frame becoming one slice along the first axis.
//!
//! # Example
//!
//! ```no_run
//! let volume = smallvol::read("stack.tif", Some([5, 0, 0]), Some([3, 64, 64]), None, None)?;
//! println!("{:?} {}", volume.shape(), volume.data_type());
//! # Ok::<(), smallvol::ReadError>(())
//! ```
//!
//! The [`SliceViewer`] holds a read volume and the state of a scroll-through
//! display: the current slice, its title and axis labels, and a grayscale or
//! colour rendering of it.
//!
//! [`read`]: ./reader/fn.read.html
//! [`Volume`]: ./volume/enum.Volume.html
//! [`SliceViewer`]: ./viewer/struct.SliceViewer.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

#[macro_use]
mod macros;

pub mod error;
pub mod format;
pub mod reader;
pub mod region;
pub mod storage;
pub mod util;
pub mod viewer;
pub mod volume;

pub use crate::error::{ReadError, Result, ViewError};
pub use crate::format::{Format, InternalPath};
pub use crate::reader::{read, ReaderOptions};
pub use crate::region::{to_region, Region};
pub use crate::viewer::{ScrollDirection, SliceViewer, ViewerOptions};
pub use crate::volume::{DataType, Volume, VolumeElement};
