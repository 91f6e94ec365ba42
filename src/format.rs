//! Canonical file formats and their resolution from extensions or tags.
//!
//! Every file handed to the reader resolves to exactly one [`Format`]. Known
//! extensions map onto a closed set of container formats; anything else is
//! treated as a frame-sequential image file (a multi-page TIFF, an animated
//! GIF, or a single still image) and decoded frame by frame.
//!
//! [`Format`]: ./enum.Format.html

use std::fmt;
use std::path::Path;

/// Whether a format locates its array through an internal dataset path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InternalPath {
    /// The file holds several datasets and one must be named.
    Required,
    /// The path may descend into the file, or be left out to take the whole of it.
    Optional,
    /// The file holds a single array. A given path is ignored with a warning.
    Unsupported,
}

/// Canonical identifier of a supported file format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    /// N5 chunked container (directory of big-endian blocks).
    N5,
    /// HDF5 hierarchical container.
    Hdf5,
    /// Zarr chunked container.
    Zarr,
    /// Single NumPy array file.
    Npy,
    /// Zip archive of NumPy arrays.
    Npz,
    /// JSON document of nested lists.
    Json,
    /// Frame-sequential image file. Holds the raw tag (if any) which was
    /// given for it, to be used as a codec hint.
    Frames(Option<String>),
}

impl Format {
    /// Resolve a format from a tag such as `"h5"`, `".HDF5"` or `"tif"`.
    ///
    /// The leading dot is stripped and case is ignored. Tags outside of the
    /// known set are not an error: they resolve to [`Format::Frames`], which
    /// keeps the tag as given so that it can hint the image codec.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallvol::Format;
    /// assert_eq!(Format::from_tag(".H5"), Format::Hdf5);
    /// assert_eq!(Format::from_tag("zr"), Format::Zarr);
    /// assert_eq!(Format::from_tag("tiff"), Format::Frames(Some("tiff".to_string())));
    /// ```
    pub fn from_tag(tag: &str) -> Format {
        let stripped = tag.trim_start_matches('.').to_lowercase();
        match stripped.as_str() {
            "n5" => Format::N5,
            "hdf" | "h5" | "hdf5" => Format::Hdf5,
            "zarr" | "zr" => Format::Zarr,
            "npy" => Format::Npy,
            "npz" => Format::Npz,
            "json" => Format::Json,
            "" => Format::Frames(None),
            _ => Format::Frames(Some(tag.to_string())),
        }
    }

    /// Infer the format from the extension of a file path.
    ///
    /// Paths without an extension are read as frame-sequential files, with
    /// the codec guessed from the file contents.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Format {
        match path.as_ref().extension() {
            Some(ext) => Format::from_tag(&ext.to_string_lossy()),
            None => Format::Frames(None),
        }
    }

    /// Whether this format requires, accepts or ignores an internal path.
    pub fn internal_path(&self) -> InternalPath {
        match self {
            Format::N5 | Format::Hdf5 | Format::Zarr | Format::Npz => InternalPath::Required,
            Format::Json => InternalPath::Optional,
            Format::Npy | Format::Frames(_) => InternalPath::Unsupported,
        }
    }

    /// Short lowercase name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::N5 => "n5",
            Format::Hdf5 => "hdf5",
            Format::Zarr => "zarr",
            Format::Npy => "npy",
            Format::Npz => "npz",
            Format::Json => "json",
            Format::Frames(_) => "image",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Frames(Some(tag)) => write!(f, "image ({})", tag),
            other => f.write_str(other.name()),
        }
    }
}
