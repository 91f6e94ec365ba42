//! Region-of-interest selection over the three spatial axes.
//!
//! A [`Region`] is built once per read from an optional offset and an optional
//! shape, and is consumed by whichever storage strategy handles the file.
//! Bounds behave like half-open slices: they are clamped to the extent of each
//! axis, and an end before the start selects nothing.
//!
//! [`Region`]: ./enum.Region.html
use ndarray::{ArrayD, Slice};
use std::ops::Range;

/// Number of axes a region can restrict: the scroll axis followed by the two
/// in-plane axes. Further axes (colour channels) are always taken whole.
pub const SPATIAL_AXES: usize = 3;

/// A half-open range over a single axis, where either end may be left open.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct AxisRange {
    /// First index, or the beginning of the axis if `None`.
    pub start: Option<usize>,
    /// One past the last index, or the end of the axis if `None`.
    pub end: Option<usize>,
}

impl AxisRange {
    /// The range covering a whole axis.
    pub fn full() -> Self {
        AxisRange::default()
    }

    /// Create a range with explicit bounds.
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        AxisRange { start, end }
    }

    /// Concrete index range for an axis of length `len`.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallvol::region::AxisRange;
    /// assert_eq!(AxisRange::new(Some(2), None).resolve(10), 2..10);
    /// assert_eq!(AxisRange::new(None, Some(20)).resolve(10), 0..10);
    /// assert_eq!(AxisRange::new(Some(8), Some(4)).resolve(10), 8..8);
    /// ```
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let start = self.start.unwrap_or(0).min(len);
        let end = self.end.unwrap_or(len).min(len).max(start);
        start..end
    }
}

/// A rectangular sub-range request over the spatial axes, or everything.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    /// Read the whole array.
    Unbounded,
    /// Read the given range of each spatial axis.
    Bounded([AxisRange; SPATIAL_AXES]),
}

impl Default for Region {
    fn default() -> Self {
        Region::Unbounded
    }
}

impl Region {
    /// Build a region from a per-axis offset and a per-axis shape.
    ///
    /// When both are `None` the region is [`Region::Unbounded`]. Otherwise,
    /// for each axis, the start is the offset and the end is the offset plus
    /// the shape, saturating at `usize::MAX`. A missing offset leaves the
    /// start open, so the end is the shape itself; a missing shape leaves the
    /// end open.
    pub fn from_offset_shape(
        offset: Option<[Option<usize>; SPATIAL_AXES]>,
        shape: Option<[Option<usize>; SPATIAL_AXES]>,
    ) -> Region {
        if offset.is_none() && shape.is_none() {
            return Region::Unbounded;
        }
        let offset = offset.unwrap_or([None; SPATIAL_AXES]);
        let shape = shape.unwrap_or([None; SPATIAL_AXES]);

        let mut axes = [AxisRange::full(); SPATIAL_AXES];
        for (axis, (o, s)) in axes.iter_mut().zip(offset.iter().zip(shape.iter())) {
            *axis = match (*o, *s) {
                (o, None) => AxisRange::new(o, None),
                (None, Some(s)) => AxisRange::new(None, Some(s)),
                (Some(o), Some(s)) => AxisRange::new(Some(o), Some(o.saturating_add(s))),
            };
        }
        Region::Bounded(axes)
    }

    /// Whether this region selects the whole array.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Region::Unbounded)
    }

    /// The range requested over the given axis. Axes past the spatial ones,
    /// and every axis of an unbounded region, are taken whole.
    pub fn axis(&self, axis: usize) -> AxisRange {
        match self {
            Region::Bounded(axes) if axis < SPATIAL_AXES => axes[axis],
            _ => AxisRange::full(),
        }
    }

    /// Concrete index ranges for every axis of an array with the given shape.
    pub fn resolve(&self, shape: &[usize]) -> Vec<Range<usize>> {
        shape
            .iter()
            .enumerate()
            .map(|(i, &len)| self.axis(i).resolve(len))
            .collect()
    }

    /// Shape of the selection taken from an array of the given shape.
    pub fn selected_shape(&self, shape: &[usize]) -> Vec<usize> {
        self.resolve(shape).into_iter().map(|r| r.len()).collect()
    }

    /// Restrict an in-memory array to this region.
    ///
    /// An unbounded region hands the array back untouched, without copying.
    /// A bounded region copies exactly the selected elements into a new
    /// array in standard layout.
    pub fn apply<T: Clone>(&self, array: ArrayD<T>) -> ArrayD<T> {
        if self.is_unbounded() {
            return array;
        }
        let ranges = self.resolve(array.shape());
        let view = array.slice_each_axis(|desc| Slice::from(ranges[desc.axis.index()].clone()));
        view.as_standard_layout().into_owned()
    }
}

/// Build a region from optional offset and shape triples.
///
/// This is the common form of [`Region::from_offset_shape`], where each
/// triple is either given in full or not at all.
///
/// # Example
///
/// ```
/// # use smallvol::region::{to_region, AxisRange, Region};
/// assert_eq!(to_region(None, None), Region::Unbounded);
/// assert_eq!(
///     to_region(Some([1, 1, 1]), Some([2, 2, 2])),
///     Region::Bounded([AxisRange::new(Some(1), Some(3)); 3])
/// );
/// ```
pub fn to_region(offset: Option<[usize; 3]>, shape: Option<[usize; 3]>) -> Region {
    let wrap = |t: [usize; 3]| [Some(t[0]), Some(t[1]), Some(t[2])];
    Region::from_offset_shape(offset.map(wrap), shape.map(wrap))
}
