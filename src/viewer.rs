//! Scroll-through display state for a volume.
//!
//! Axis 0 of the volume is scrolled through, axis 1 runs top to bottom and
//! axis 2 left to right in each slice, and an optional axis 3 holds up to
//! four colour channels. The viewer tracks the current slice index, builds
//! the title and axis labels, and renders the current slice to an image.
use crate::error::{ReadError, ViewError};
use crate::reader::ReaderOptions;
use crate::volume::Volume;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::Path;

/// Display options for a [`SliceViewer`].
///
/// [`SliceViewer`]: ./struct.SliceViewer.html
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Labels of the three spatial axes, in data order. Must contain each of
    /// `z`, `y` and `x`. The data itself is never transposed.
    pub data_order: String,
    /// Colour map name. Defaults to `"gray"` for 3D data.
    pub cmap: Option<String>,
    /// Further options handed to the rendering front-end untouched.
    pub render_options: BTreeMap<String, String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        ViewerOptions {
            data_order: "zyx".to_string(),
            cmap: None,
            render_options: BTreeMap::new(),
        }
    }
}

/// Direction of a scroll event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards the last slice.
    Up,
    /// Towards the first slice.
    Down,
    /// Any other button, which does nothing.
    Other,
}

/// A volume along with the slice currently on display.
#[derive(Debug, Clone)]
pub struct SliceViewer {
    volume: Volume,
    labels: [char; 3],
    cmap: Option<String>,
    render_options: BTreeMap<String, String>,
    slices: usize,
    index: usize,
}

impl SliceViewer {
    /// Validate a volume for display and start at slice 0.
    ///
    /// # Errors
    ///
    /// - `ViewError::BadDataOrder` if the data order lacks one of `z`, `y`, `x`.
    /// - `ViewError::TwoDimensional` for 2D data.
    /// - `ViewError::TooManyChannels` for 4D data with more than 4 channels.
    /// - `ViewError::TooManyDimensions` for more than 4 dimensions.
    pub fn new(volume: Volume, options: ViewerOptions) -> Result<Self, ViewError> {
        debug!(
            "Volume of shape {:?} and type {} received",
            volume.shape(),
            volume.data_type()
        );
        let ViewerOptions {
            data_order,
            cmap,
            render_options,
        } = options;
        if !"zyx".chars().all(|dim| data_order.contains(dim)) {
            return Err(ViewError::BadDataOrder(data_order));
        }
        let mut chars = data_order.chars();
        let mut labels = ['z', 'y', 'x'];
        for label in labels.iter_mut() {
            if let Some(c) = chars.next() {
                *label = c;
            }
        }

        let cmap = match volume.ndim() {
            0 | 1 => return Err(ViewError::TooFewDimensions(volume.ndim())),
            2 => return Err(ViewError::TwoDimensional),
            3 => cmap.or_else(|| Some("gray".to_string())),
            4 => {
                let channels = volume.shape()[3];
                if channels > 4 {
                    return Err(ViewError::TooManyChannels(channels));
                }
                cmap
            }
            n => return Err(ViewError::TooManyDimensions(n)),
        };

        let slices = volume.shape()[0];
        Ok(SliceViewer {
            volume,
            labels,
            cmap,
            render_options,
            slices,
            index: 0,
        })
    }

    /// Read a volume from a file and view it.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        reader: &ReaderOptions,
        options: ViewerOptions,
    ) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let volume = reader.read_file(path)?;
        info!("Viewing {}: shape {:?}", path.display(), volume.shape());
        SliceViewer::new(volume, options)
    }

    /// The volume on display.
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Number of slices along the scroll axis.
    pub fn slices(&self) -> usize {
        self.slices
    }

    /// Index of the current slice.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Jump to a slice.
    pub fn set_index(&mut self, index: usize) -> Result<(), ViewError> {
        if index >= self.slices {
            return Err(ViewError::SliceOutOfBounds(index, self.slices));
        }
        self.index = index;
        Ok(())
    }

    /// Move one slice in the given direction, stopping at either end.
    /// Returns whether the index changed and the display needs redrawing.
    pub fn scroll(&mut self, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Up if self.index + 1 < self.slices => {
                debug!("Scrolling forward by 1");
                self.index += 1;
            }
            ScrollDirection::Down if self.index > 0 => {
                debug!("Scrolling back by 1");
                self.index -= 1;
            }
            _ => return false,
        }
        true
    }

    /// Title of the current slice, e.g. `"z = 3 (last = 9)"`.
    pub fn title(&self) -> String {
        format!(
            "{} = {} (last = {})",
            self.labels[0],
            self.index,
            self.slices as isize - 1
        )
    }

    /// Labels of the vertical and horizontal axes of each slice.
    pub fn axis_labels(&self) -> (char, char) {
        (self.labels[1], self.labels[2])
    }

    /// Colour map to render with, if any.
    pub fn cmap(&self) -> Option<&str> {
        self.cmap.as_deref()
    }

    /// Options passed through to the renderer.
    pub fn render_options(&self) -> &BTreeMap<String, String> {
        &self.render_options
    }

    /// The current slice: a 2D array, or 3D with colour channels last.
    pub fn current_slice(&self) -> Result<Volume, ViewError> {
        if self.index >= self.slices {
            return Err(ViewError::SliceOutOfBounds(self.index, self.slices));
        }
        Ok(self.volume.index_scroll(self.index))
    }

    /// Render the current slice to an 8 bit image.
    ///
    /// Values are scaled linearly so that the range of the whole volume spans
    /// 0 to 255, which keeps the brightness stable while scrolling. One
    /// channel gives a grayscale image, two gray and alpha, three RGB and
    /// four RGBA.
    pub fn render(&self) -> Result<DynamicImage, ViewError> {
        let slice = self.current_slice()?.to_f64();
        let (lo, hi) = self.volume.value_range().unwrap_or((0., 0.));
        let span = hi - lo;
        let pixels: Vec<u8> = slice
            .iter()
            .map(|&v| {
                if v.is_nan() || span <= 0. {
                    0
                } else {
                    ((v - lo) * 255. / span).round().max(0.).min(255.) as u8
                }
            })
            .collect();

        let shape = slice.shape();
        let (height, width) = (shape[0] as u32, shape[1] as u32);
        let channels = shape.get(2).copied().unwrap_or(1);
        let image = match channels {
            1 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(width, height, pixels).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
            _ => RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8),
        };
        image.ok_or_else(|| {
            ViewError::Read(ReadError::InconsistentShape(format!(
                "slice of shape {:?} does not fit an image",
                shape
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollDirection, SliceViewer, ViewerOptions};
    use crate::error::ViewError;
    use crate::volume::Volume;
    use ndarray::{Array, ArrayD, IxDyn};

    fn volume(shape: &[usize]) -> Volume {
        Volume::from(ArrayD::<u8>::zeros(IxDyn(shape)))
    }

    #[test]
    fn scrolling_stops_at_the_ends() {
        let mut viewer = SliceViewer::new(volume(&[3, 4, 4]), ViewerOptions::default()).unwrap();
        assert_eq!(viewer.title(), "z = 0 (last = 2)");
        assert!(!viewer.scroll(ScrollDirection::Down));
        assert!(viewer.scroll(ScrollDirection::Up));
        assert!(viewer.scroll(ScrollDirection::Up));
        assert!(!viewer.scroll(ScrollDirection::Up));
        assert_eq!(viewer.index(), 2);
        assert_eq!(viewer.title(), "z = 2 (last = 2)");
        assert!(!viewer.scroll(ScrollDirection::Other));
        assert!(viewer.scroll(ScrollDirection::Down));
        assert_eq!(viewer.index(), 1);
    }

    #[test]
    fn labels_and_cmap() {
        let options = ViewerOptions {
            data_order: "xzy".to_string(),
            ..ViewerOptions::default()
        };
        let viewer = SliceViewer::new(volume(&[2, 4, 4]), options).unwrap();
        assert_eq!(viewer.title(), "x = 0 (last = 1)");
        assert_eq!(viewer.axis_labels(), ('z', 'y'));
        assert_eq!(viewer.cmap(), Some("gray"));

        let viewer = SliceViewer::new(volume(&[2, 4, 4, 3]), ViewerOptions::default()).unwrap();
        assert_eq!(viewer.cmap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        match SliceViewer::new(volume(&[4, 4]), ViewerOptions::default()) {
            Err(ViewError::TwoDimensional) => {}
            other => panic!("unexpected {:?}", other),
        }
        match SliceViewer::new(volume(&[2, 4, 4, 5]), ViewerOptions::default()) {
            Err(ViewError::TooManyChannels(5)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match SliceViewer::new(volume(&[2, 2, 2, 2, 2]), ViewerOptions::default()) {
            Err(ViewError::TooManyDimensions(5)) => {}
            other => panic!("unexpected {:?}", other),
        }
        let options = ViewerOptions {
            data_order: "zya".to_string(),
            ..ViewerOptions::default()
        };
        match SliceViewer::new(volume(&[2, 2, 2]), options) {
            Err(ViewError::BadDataOrder(order)) => assert_eq!(order, "zya"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn render_scales_to_volume_range() {
        let array = Array::from_shape_fn(IxDyn(&[2, 2, 3]), |ix| (ix[0] * 6 + ix[1] * 3 + ix[2]) as f32 * 10.);
        let mut viewer = SliceViewer::new(Volume::from(array), ViewerOptions::default()).unwrap();
        viewer.set_index(1).unwrap();
        let image = viewer.render().unwrap().into_luma8();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1)[0], 255);
        assert_eq!(image.get_pixel(0, 0)[0], 139);

        assert!(viewer.set_index(2).is_err());
    }

    #[test]
    fn render_rounds_midpoints_up() {
        let array = Array::from_shape_vec(IxDyn(&[1, 1, 3]), vec![0u8, 100, 200]).unwrap();
        let viewer = SliceViewer::new(Volume::from(array), ViewerOptions::default()).unwrap();
        let image = viewer.render().unwrap().into_luma8();
        assert_eq!(image.as_raw(), &vec![0, 128, 255]);
    }

    #[test]
    fn render_colour() {
        let viewer = SliceViewer::new(volume(&[1, 2, 5, 3]), ViewerOptions::default()).unwrap();
        let image = viewer.render().unwrap();
        assert_eq!(image.color(), image::ColorType::Rgb8);
        assert_eq!((image.width(), image.height()), (5, 2));
    }
}
