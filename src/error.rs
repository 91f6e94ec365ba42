//! Types for error handling go here.
use crate::format::Format;
use std::error::Error as StdError;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum ReadError {
        /// A malformed offset or shape argument, such as a triple with the
        /// wrong number of elements.
        InvalidArgument(msg: String) {
            display("Invalid argument: {}", msg)
        }
        /// The format stores several datasets and no internal path was given.
        MissingInternalPath(format: Format) {
            display("An internal path is required by the {} file format", format)
        }
        /// The library backing this format was not compiled into the crate.
        MissingFeature(feature: &'static str) {
            display("The `{}` feature is required to open this file format", feature)
        }
        /// The internal path does not name anything in the file.
        MissingDataset(path: String) {
            display("No dataset found at internal path `{}`", path)
        }
        /// The stored element type cannot be represented as a volume.
        UnsupportedDataType(descr: String) {
            display("Unsupported data type: {}", descr)
        }
        /// A chunk compression scheme which is not implemented.
        UnsupportedCompression(name: String) {
            display("Unsupported compression: {}", name)
        }
        /// Stored data does not describe a dense, rectangular array.
        InconsistentShape(msg: String) {
            display("Inconsistent array shape: {}", msg)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
        /// JSON document or attribute parsing error
        Json(err: serde_json::Error) {
            from()
            source(err)
        }
        /// Image decoding error
        Image(err: image::ImageError) {
            from()
            source(err)
        }
        /// TIFF decoding error
        Tiff(err: tiff::TiffError) {
            from()
            source(err)
        }
        /// Decoded data does not fit the declared array shape
        Shape(err: ndarray::ShapeError) {
            from()
            source(err)
        }
        /// Error raised by an optional storage library
        Backend(err: Box<dyn StdError + Send + Sync>) {
            source(&**err)
            display("Storage backend error: {}", err)
        }
    }
}

quick_error! {
    /// Error type for invalid viewer input.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum ViewError {
        /// Two-dimensional data has no axis to scroll through.
        TwoDimensional {
            display("Data is 2D: nothing to scroll through")
        }
        /// Channel axis is wider than RGBA.
        TooManyChannels(n: usize) {
            display("Data has {} colour channels, cannot display more than 4", n)
        }
        /// Fewer than two axes, so there is no slice to show.
        TooFewDimensions(n: usize) {
            display("Data has {} dimensions, cannot display", n)
        }
        /// Rank outside of 3 spatial axes plus channels.
        TooManyDimensions(n: usize) {
            display("Data has {} dimensions, more than 4 including colour channels, cannot display", n)
        }
        /// The axis label order is not a permutation of "zyx".
        BadDataOrder(order: String) {
            display("Data order must include z, y and x dimensions, got `{}`", order)
        }
        /// Slice index past the end of the scroll axis
        SliceOutOfBounds(index: usize, len: usize) {
            display("Slice {} out of bounds for {} slices", index, len)
        }
        /// Reading the volume failed.
        Read(err: ReadError) {
            from()
            source(err)
            display("{}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, ReadError>;
