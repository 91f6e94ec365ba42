//! Uniform entry point for reading a volume out of any supported file.
//!
//! [`ReaderOptions`] gathers what a read needs besides the path: an explicit
//! format tag, an internal dataset path, and a region of interest. The
//! format is resolved once, the internal path is checked against what the
//! format accepts, and the read is dispatched to the matching strategy in
//! [`storage`].
//!
//! [`ReaderOptions`]: ./struct.ReaderOptions.html
//! [`storage`]: ../storage/index.html
use crate::error::{ReadError, Result};
use crate::format::{Format, InternalPath};
use crate::region::{to_region, Region};
use crate::storage;
use crate::volume::Volume;
use log::{debug, warn};
use std::path::Path;

/// Options and flags which can be used to configure how a volume is read.
///
/// # Example
///
/// ```no_run
/// # use smallvol::ReaderOptions;
/// let volume = ReaderOptions::new()
///     .internal_path("volumes/raw")
///     .offset_shape(Some([10, 0, 0]), Some([5, 64, 64]))
///     .read_file("data.n5")?;
/// # Ok::<(), smallvol::ReadError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReaderOptions {
    format: Option<String>,
    internal_path: Option<String>,
    region: Region,
}

impl ReaderOptions {
    /// Options for reading a whole file, with its format inferred from the
    /// path's extension.
    pub fn new() -> Self {
        ReaderOptions::default()
    }

    /// Override the file format with a tag such as `"h5"` or `"tif"`, in
    /// place of the path's extension.
    pub fn format<S: Into<String>>(&mut self, tag: S) -> &mut Self {
        self.format = Some(tag.into());
        self
    }

    /// Set the path of the dataset within the file. An empty path is the
    /// same as none.
    pub fn internal_path<S: Into<String>>(&mut self, internal_path: S) -> &mut Self {
        let internal_path = internal_path.into();
        self.internal_path = if internal_path.is_empty() {
            None
        } else {
            Some(internal_path)
        };
        self
    }

    /// Restrict the read to a region.
    pub fn region(&mut self, region: Region) -> &mut Self {
        self.region = region;
        self
    }

    /// Restrict the read to the region starting at `offset` and spanning
    /// `shape`, over the first three axes.
    pub fn offset_shape(&mut self, offset: Option<[usize; 3]>, shape: Option<[usize; 3]>) -> &mut Self {
        self.region(to_region(offset, shape))
    }

    /// The region the read is restricted to.
    pub fn get_region(&self) -> &Region {
        &self.region
    }

    /// Resolve the format of the file at `path`: the explicit tag if one was
    /// given, or else the path's extension.
    pub fn resolve_format<P: AsRef<Path>>(&self, path: P) -> Format {
        match &self.format {
            Some(tag) => Format::from_tag(tag),
            None => Format::from_path(path),
        }
    }

    /// Read the volume from the file at the given path.
    ///
    /// # Errors
    ///
    /// - `ReadError::MissingInternalPath` if the format needs an internal
    /// path and none was given. This is checked before the file is opened.
    /// - `ReadError::MissingFeature` if the format's library was not built in.
    /// - any error raised while opening or decoding the file.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Volume> {
        let path = path.as_ref();
        let format = self.resolve_format(path);
        let internal_path = checked_internal_path(&format, self.internal_path.as_deref())?;
        debug!("Reading {} as {}, region {:?}", path.display(), format, self.region);

        let dataset = || internal_path.ok_or_else(|| ReadError::MissingInternalPath(format.clone()));
        let volume = match &format {
            Format::N5 => storage::n5::read_n5(path, dataset()?, &self.region),
            Format::Hdf5 => storage::hdf5::read_hdf5(path, dataset()?, &self.region),
            Format::Zarr => storage::zarr::read_zarr(path, dataset()?, &self.region),
            Format::Npz => storage::npy::read_npz(path, dataset()?, &self.region),
            Format::Npy => storage::npy::read_npy(path, &self.region),
            Format::Json => storage::json::read_json(path, internal_path, &self.region),
            Format::Frames(hint) => storage::frames::read_image_file(path, hint.as_deref(), &self.region),
        }?;
        debug!("Read {} volume of shape {:?}", volume.data_type(), volume.shape());
        Ok(volume)
    }
}

/// Check an internal path against the format's needs, dropping it (with a
/// warning) where the format has no use for it.
fn checked_internal_path<'a>(format: &Format, internal_path: Option<&'a str>) -> Result<Option<&'a str>> {
    match (format.internal_path(), internal_path) {
        (InternalPath::Required, None) => Err(ReadError::MissingInternalPath(format.clone())),
        (InternalPath::Unsupported, Some(path)) => {
            warn!(
                "Internal path `{}` is not used by the {} file format and will be ignored",
                path, format
            );
            Ok(None)
        }
        (_, path) => Ok(path),
    }
}

/// Read a volume from a file.
///
/// This is a shorthand for configuring [`ReaderOptions`] and calling
/// `read_file`. `offset` and `shape` give the region to read over the first
/// three axes, `internal_path` locates the dataset in container formats,
/// and `ftype` overrides the format inferred from the path's extension.
///
/// [`ReaderOptions`]: ./struct.ReaderOptions.html
pub fn read<P: AsRef<Path>>(
    path: P,
    offset: Option<[usize; 3]>,
    shape: Option<[usize; 3]>,
    internal_path: Option<&str>,
    ftype: Option<&str>,
) -> Result<Volume> {
    let mut options = ReaderOptions::new();
    options.offset_shape(offset, shape);
    if let Some(internal_path) = internal_path {
        options.internal_path(internal_path);
    }
    if let Some(ftype) = ftype {
        options.format(ftype);
    }
    options.read_file(path)
}
