//! Frame-sequential image files: multi-page TIFF stacks, animated GIFs, and
//! single still images.
//!
//! Frames are visited in order. Those before the start of the scroll range
//! are skipped, iteration stops at its end, and each remaining frame is
//! cropped in-plane before being stacked along a new leading axis. A
//! grayscale frame adds a 2D slice; a colour frame keeps its channels as a
//! trailing axis, giving a 4D volume.
use crate::error::{ReadError, Result};
use crate::region::{AxisRange, Region};
use crate::volume::{Volume, VolumeElement};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Frames, ImageFormat, ImageReader};
use log::{debug, trace};
use ndarray::{ArrayD, IxDyn};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;

/// A sequential source of 2D frames.
pub trait FrameSource {
    /// Move past the next frame, without decoding its pixels where the
    /// codec allows it. Returns `false` if there was no frame left.
    fn skip_frame(&mut self) -> Result<bool>;

    /// Decode the next frame, or `None` if there is no frame left. A frame
    /// has shape `(rows, cols)`, or `(rows, cols, channels)` for colour.
    fn next_frame(&mut self) -> Result<Option<Volume>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn skip_frame(&mut self) -> Result<bool> {
        (**self).skip_frame()
    }

    fn next_frame(&mut self) -> Result<Option<Volume>> {
        (**self).next_frame()
    }
}

/// Read an image file as a volume, restricted to the region.
///
/// `hint` names the codec (as a file extension) when it cannot be told from
/// the path; otherwise the codec is guessed from the file contents.
pub fn read_image_file<P: AsRef<Path>>(path: P, hint: Option<&str>, region: &Region) -> Result<Volume> {
    let mut source = open_frames(path.as_ref(), hint)?;
    read_frames(&mut source, region)
}

/// Open the frame source fitting the codec of an image file.
pub fn open_frames(path: &Path, hint: Option<&str>) -> Result<Box<dyn FrameSource>> {
    let hinted = hint.and_then(|tag| ImageFormat::from_extension(tag.trim_start_matches('.')));
    let format = match hinted {
        Some(format) => Some(format),
        None => ImageReader::open(path)?.with_guessed_format()?.format(),
    };
    debug!("Reading {} as frames, codec {:?}", path.display(), format);
    let source: Box<dyn FrameSource> = match format {
        Some(ImageFormat::Tiff) => Box::new(TiffFrames::open(path)?),
        Some(ImageFormat::Gif) => Box::new(ImageFrames::animation(path)?),
        other => Box::new(ImageFrames::still(path, other)?),
    };
    Ok(source)
}

/// Collect the frames of the region's scroll range into a volume.
///
/// Frames before the range are skipped and frames after it are never
/// reached. If no frame is collected the result is an empty `u8` volume.
pub fn read_frames<S: FrameSource + ?Sized>(source: &mut S, region: &Region) -> Result<Volume> {
    let scroll = region.axis(0);
    let start = scroll.start.unwrap_or(0);
    let end = scroll.end;
    let plane = Region::Bounded([region.axis(1), region.axis(2), AxisRange::full()]);

    let mut frames = Vec::new();
    let mut index = 0;
    while end.map_or(true, |end| index < end) {
        if index < start {
            if !source.skip_frame()? {
                break;
            }
            trace!("Skipped frame {}", index);
        } else {
            match source.next_frame()? {
                Some(frame) => frames.push(frame.select(&plane)),
                None => break,
            }
            trace!("Decoded frame {}", index);
        }
        index += 1;
    }

    let (template, dtype) = match frames.first() {
        Some(first) => (first.shape().to_vec(), first.data_type()),
        None => return Ok(Volume::from(ArrayD::<u8>::zeros(IxDyn(&[0, 0, 0])))),
    };
    debug!("Stacking {} frames of shape {:?}", frames.len(), template);
    Volume::stack(frames, &template, dtype)
}

/// Build a frame from interleaved pixel data.
pub fn pixels_to_volume<T>(height: u32, width: u32, channels: usize, data: Vec<T>) -> Result<Volume>
where
    T: VolumeElement,
{
    let (h, w) = (height as usize, width as usize);
    let array = if channels == 1 {
        ArrayD::from_shape_vec(IxDyn(&[h, w]), data)?
    } else {
        ArrayD::from_shape_vec(IxDyn(&[h, w, channels]), data)?
    };
    Ok(T::into_volume(array))
}

/// Pages of a TIFF file. Skipping a page only reads its directory.
pub struct TiffFrames<R: Read + Seek> {
    decoder: Decoder<R>,
    has_current: bool,
}

impl<R: Read + Seek> std::fmt::Debug for TiffFrames<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiffFrames")
            .field("has_current", &self.has_current)
            .finish()
    }
}

impl TiffFrames<BufReader<File>> {
    /// Open a TIFF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        TiffFrames::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> TiffFrames<R> {
    /// Read the first page directory of a TIFF stream.
    pub fn new(reader: R) -> Result<Self> {
        let decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());
        Ok(TiffFrames {
            decoder,
            has_current: true,
        })
    }

    fn advance(&mut self) -> Result<()> {
        if self.decoder.more_images() {
            self.decoder.next_image()?;
        } else {
            self.has_current = false;
        }
        Ok(())
    }
}

impl<R: Read + Seek> FrameSource for TiffFrames<R> {
    fn skip_frame(&mut self) -> Result<bool> {
        if !self.has_current {
            return Ok(false);
        }
        self.advance()?;
        Ok(true)
    }

    fn next_frame(&mut self) -> Result<Option<Volume>> {
        if !self.has_current {
            return Ok(None);
        }
        let (width, height) = self.decoder.dimensions()?;
        let channels = match self.decoder.colortype()? {
            ColorType::Gray(_) | ColorType::Palette(_) => 1,
            ColorType::GrayA(_) => 2,
            ColorType::RGB(_) => 3,
            ColorType::RGBA(_) | ColorType::CMYK(_) => 4,
            #[allow(unreachable_patterns)]
            other => return Err(ReadError::UnsupportedDataType(format!("TIFF {:?}", other))),
        };
        let frame = match self.decoder.read_image()? {
            DecodingResult::U8(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::U16(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::U32(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::U64(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::I8(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::I16(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::I32(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::I64(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::F32(data) => pixels_to_volume(height, width, channels, data),
            DecodingResult::F64(data) => pixels_to_volume(height, width, channels, data),
            #[allow(unreachable_patterns)]
            _ => Err(ReadError::UnsupportedDataType("TIFF sample format".to_string())),
        }?;
        self.advance()?;
        Ok(Some(frame))
    }
}

/// Frames decoded by the `image` crate: the frames of an animation, or the
/// single frame of a still image.
pub enum ImageFrames {
    /// Animation frames, composited to RGBA.
    Animation(Frames<'static>),
    /// A still image, decoded on first request.
    Still(Option<ImageReader<BufReader<File>>>),
}

impl std::fmt::Debug for ImageFrames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFrames::Animation(_) => f.write_str("ImageFrames::Animation"),
            ImageFrames::Still(reader) => write!(f, "ImageFrames::Still(pending: {})", reader.is_some()),
        }
    }
}

impl ImageFrames {
    /// Open an animated GIF.
    pub fn animation<P: AsRef<Path>>(path: P) -> Result<Self> {
        let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
        Ok(ImageFrames::Animation(decoder.into_frames()))
    }

    /// Open a still image, of a known format or guessed from its contents.
    pub fn still<P: AsRef<Path>>(path: P, format: Option<ImageFormat>) -> Result<Self> {
        let mut reader = ImageReader::open(path)?;
        match format {
            Some(format) => reader.set_format(format),
            None => reader = reader.with_guessed_format()?,
        }
        Ok(ImageFrames::Still(Some(reader)))
    }
}

impl FrameSource for ImageFrames {
    fn skip_frame(&mut self) -> Result<bool> {
        match self {
            // GIF frames are delta-coded, so skipping still decodes them
            ImageFrames::Animation(frames) => Ok(frames.next().transpose()?.is_some()),
            ImageFrames::Still(reader) => Ok(reader.take().is_some()),
        }
    }

    fn next_frame(&mut self) -> Result<Option<Volume>> {
        match self {
            ImageFrames::Animation(frames) => match frames.next().transpose()? {
                Some(frame) => {
                    let buffer = frame.into_buffer();
                    let (width, height) = buffer.dimensions();
                    pixels_to_volume(height, width, 4, buffer.into_raw()).map(Some)
                }
                None => Ok(None),
            },
            ImageFrames::Still(reader) => match reader.take() {
                Some(reader) => image_to_volume(reader.decode()?).map(Some),
                None => Ok(None),
            },
        }
    }
}

/// Convert a decoded image into a frame, keeping its sample type.
pub fn image_to_volume(image: DynamicImage) -> Result<Volume> {
    let (width, height) = (image.width(), image.height());
    match image {
        DynamicImage::ImageLuma8(b) => pixels_to_volume(height, width, 1, b.into_raw()),
        DynamicImage::ImageLumaA8(b) => pixels_to_volume(height, width, 2, b.into_raw()),
        DynamicImage::ImageRgb8(b) => pixels_to_volume(height, width, 3, b.into_raw()),
        DynamicImage::ImageRgba8(b) => pixels_to_volume(height, width, 4, b.into_raw()),
        DynamicImage::ImageLuma16(b) => pixels_to_volume(height, width, 1, b.into_raw()),
        DynamicImage::ImageLumaA16(b) => pixels_to_volume(height, width, 2, b.into_raw()),
        DynamicImage::ImageRgb16(b) => pixels_to_volume(height, width, 3, b.into_raw()),
        DynamicImage::ImageRgba16(b) => pixels_to_volume(height, width, 4, b.into_raw()),
        DynamicImage::ImageRgb32F(b) => pixels_to_volume(height, width, 3, b.into_raw()),
        DynamicImage::ImageRgba32F(b) => pixels_to_volume(height, width, 4, b.into_raw()),
        other => pixels_to_volume(height, width, 4, other.into_rgba8().into_raw()),
    }
}
