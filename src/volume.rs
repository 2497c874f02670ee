use std::cmp::Ordering;

use thiserror::Error;

use crate::enums::{Modality, PatientPosition, PixelRepresentation, SortBy};
use crate::image::Image2D;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VolumeError {
    #[error("Volume holds no images")]
    Unpopulated,

    #[error("Index {index} out of bounds for a volume of {len} images")]
    OutOfBounds { index: usize, len: usize },
}

/// A stack of [`Image2D`] slices forming a volume.
///
/// Slices are kept in insertion order until an order dependent value is
/// requested, at which point the stack is sorted. Appending a slice
/// invalidates that ordering again.
#[derive(Debug, Default, Clone)]
pub struct Image3D {
    images: Vec<Image2D>,
    sorted: bool,
    sort_by: SortBy,
}

impl Image3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort_by(sort_by: SortBy) -> Self {
        Self {
            sort_by,
            ..Self::default()
        }
    }

    /// Append a slice, slices without a SOP Instance UID are ignored.
    pub fn push(&mut self, slice: Image2D) {
        if slice.sop_instance_uid.is_empty() {
            return;
        }
        self.images.push(slice);
        self.sorted = false;
    }

    /// Order the slices along the stacking axis.
    ///
    /// The sort is stable: slices at the same position keep their
    /// insertion order. Slices without a finite position are moved to the
    /// end.
    pub fn sort(&mut self) {
        match self.sort_by {
            SortBy::ImagePositionPatient => self.images.sort_by(|a, b| {
                compare_keys(stacking_position(a), stacking_position(b), f64::total_cmp)
            }),
            SortBy::InstanceNumber => self.images.sort_by(|a, b| {
                compare_keys(a.instance_number, b.instance_number, Ord::cmp)
            }),
        }
        self.sorted = true;
    }

    fn ensure_sorted(&mut self) {
        if !self.sorted {
            self.sort();
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Image2D, VolumeError> {
        if self.images.is_empty() {
            return Err(VolumeError::Unpopulated);
        }
        self.images.get(index).ok_or(VolumeError::OutOfBounds {
            index,
            len: self.images.len(),
        })
    }

    /// Slices in their current order, which is only guaranteed to be
    /// spatial after [`Image3D::sort`].
    pub fn iter(&self) -> std::slice::Iter<'_, Image2D> {
        self.images.iter()
    }

    fn first(&self) -> Option<&Image2D> {
        self.images.first()
    }

    pub fn frame_of_reference_uid(&self) -> &str {
        self.first().map_or("", |i| i.frame_of_reference_uid.as_str())
    }

    pub fn modality(&self) -> Modality {
        self.first().map_or(Modality::Unknown, |i| i.modality)
    }

    pub fn study_instance_uid(&self) -> &str {
        self.first().map_or("", |i| i.study_instance_uid.as_str())
    }

    pub fn patient_position(&self) -> PatientPosition {
        self.first()
            .map_or(PatientPosition::Unknown, |i| i.patient_position)
    }

    pub fn pixel_spacing(&self) -> Option<[f64; 2]> {
        self.first()?.pixel_spacing
    }

    pub fn image_orientation_patient(&self) -> Option<[f64; 6]> {
        self.first()?.image_orientation_patient
    }

    pub fn pixel_representation(&self) -> PixelRepresentation {
        self.first()
            .map_or(PixelRepresentation::None, |i| i.pixel_representation)
    }

    pub fn bits_allocated(&self) -> u16 {
        self.first().map_or(0, |i| i.bits_allocated)
    }

    /// Position of the first slice of the sorted stack.
    pub fn image_position_patient(&mut self) -> Option<[f64; 3]> {
        if self.images.is_empty() {
            return None;
        }
        self.ensure_sorted();
        self.first()?.image_position_patient
    }

    /// Distance between the first two slices of the sorted stack along
    /// the slice normal.
    pub fn slice_spacing(&mut self) -> Option<f64> {
        if self.images.len() < 2 {
            return None;
        }
        self.ensure_sorted();
        let first = stacking_position(&self.images[0])?;
        let second = stacking_position(&self.images[1])?;
        Some((second - first).abs())
    }

    /// Stored value of the voxel, `None` outside of the volume.
    pub fn value(&mut self, column: usize, row: usize, depth: usize) -> Option<f64> {
        self.ensure_sorted();
        self.images.get(depth)?.value(column, row)
    }

    /// Rescaled value of the voxel, `None` outside of the volume.
    pub fn scaled_value(&mut self, column: usize, row: usize, depth: usize) -> Option<f64> {
        self.ensure_sorted();
        self.images.get(depth)?.scaled_value(column, row)
    }
}

fn stacking_position(image: &Image2D) -> Option<f64> {
    image.position_along_normal().filter(|p| p.is_finite())
}

/// Order by `key`, with absent keys after every present one.
fn compare_keys<T>(a: Option<T>, b: Option<T>, key: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => key(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Extend<Image2D> for Image3D {
    fn extend<I: IntoIterator<Item = Image2D>>(&mut self, iter: I) {
        for slice in iter {
            self.push(slice);
        }
    }
}

impl FromIterator<Image2D> for Image3D {
    fn from_iter<I: IntoIterator<Item = Image2D>>(iter: I) -> Self {
        let mut volume = Image3D::new();
        volume.extend(iter);
        volume
    }
}

impl<'a> IntoIterator for &'a Image3D {
    type Item = &'a Image2D;
    type IntoIter = std::slice::Iter<'a, Image2D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
