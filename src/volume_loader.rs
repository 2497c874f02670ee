use crate::{
    enums::SortBy,
    factory::{DicomError, DicomFactory},
    image::Image2D,
    object::DicomObject,
    volume::Image3D,
};

use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No valid DICOM images found")]
    NoValidImages,

    #[error("Inconsistent image dimensions")]
    InconsistentDimensions,

    #[error("Images belong to different frames of reference")]
    InconsistentFrameOfReference,

    #[error("DICOM error: {0}")]
    Dicom(#[from] DicomError),
}

pub struct VolumeLoader;

impl VolumeLoader {
    /// Assemble a volume from the CT and PET images among decoded objects
    ///
    /// # Arguments
    ///
    /// * `dicom_objects` - Objects as returned by [`DicomFactory`]
    /// * `sort_by` - Method to sort the slices
    ///
    /// # Errors
    ///
    /// Returns error if no images are found, or if the images do not share
    /// their dimensions and frame of reference
    pub fn load_from_dicom_objects(
        dicom_objects: impl IntoIterator<Item = DicomObject>,
        sort_by: SortBy,
    ) -> Result<Image3D, VolumeLoaderError> {
        let images: Vec<Image2D> = dicom_objects
            .into_iter()
            .filter_map(DicomObject::into_image)
            .collect();

        if images.is_empty() {
            return Err(VolumeLoaderError::NoValidImages);
        }

        Self::validate_images(&images)?;

        let mut volume = Image3D::with_sort_by(sort_by);
        volume.extend(images);
        volume.sort();
        debug!("Assembled volume of {} slices", volume.len());
        Ok(volume)
    }

    /// Load a volume from file paths
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path>],
        sort_by: SortBy,
    ) -> Result<Image3D, VolumeLoaderError> {
        let objects: Result<Vec<_>, _> = DicomFactory::read_files(paths).into_iter().collect();

        Self::load_from_dicom_objects(objects?, sort_by)
    }

    fn validate_images(images: &[Image2D]) -> Result<(), VolumeLoaderError> {
        let first = &images[0];
        let first_dim = first.pixels.dim();
        if images.iter().any(|img| img.pixels.dim() != first_dim) {
            return Err(VolumeLoaderError::InconsistentDimensions);
        }
        if images
            .iter()
            .any(|img| img.frame_of_reference_uid != first.frame_of_reference_uid)
        {
            return Err(VolumeLoaderError::InconsistentFrameOfReference);
        }
        Ok(())
    }
}
