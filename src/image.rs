use ndarray::Array2;

use crate::enums::{Modality, PatientPosition, PixelRepresentation};

/// A single cross-sectional slice.
///
/// Pixel values are kept as stored in the file, indexed `[row, column]`.
/// The rescale transform is only applied by [`Image2D::scaled_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct Image2D {
    pub sop_instance_uid: String,
    pub frame_of_reference_uid: String,
    pub modality: Modality,
    pub study_instance_uid: String,
    pub series_instance_uid: String,
    pub patient_position: PatientPosition,
    /// Row spacing followed by column spacing, in mm
    pub pixel_spacing: Option<[f64; 2]>,
    pub image_position_patient: Option<[f64; 3]>,
    /// Row direction cosines followed by column direction cosines
    pub image_orientation_patient: Option<[f64; 6]>,
    pub pixel_representation: PixelRepresentation,
    pub bits_allocated: u16,
    pub instance_number: Option<i32>,
    pub rescale_slope: f64,
    pub rescale_intercept: f64,
    pub pixels: Array2<i32>,
}

impl Default for Image2D {
    fn default() -> Self {
        Self {
            sop_instance_uid: String::new(),
            frame_of_reference_uid: String::new(),
            modality: Modality::Unknown,
            study_instance_uid: String::new(),
            series_instance_uid: String::new(),
            patient_position: PatientPosition::Unknown,
            pixel_spacing: None,
            image_position_patient: None,
            image_orientation_patient: None,
            pixel_representation: PixelRepresentation::None,
            bits_allocated: 0,
            instance_number: None,
            rescale_slope: 1.0,
            rescale_intercept: 0.0,
            pixels: Array2::zeros((0, 0)),
        }
    }
}

impl Image2D {
    pub fn rows(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn columns(&self) -> usize {
        self.pixels.ncols()
    }

    /// Stored pixel value, `None` outside of the pixel grid.
    pub fn value(&self, column: usize, row: usize) -> Option<f64> {
        self.pixels.get((row, column)).map(|&v| f64::from(v))
    }

    /// Pixel value after the modality rescale transform.
    pub fn scaled_value(&self, column: usize, row: usize) -> Option<f64> {
        self.value(column, row)
            .map(|v| v.mul_add(self.rescale_slope, self.rescale_intercept))
    }

    /// Unit normal of the image plane, the cross product of the row and
    /// column direction cosines.
    pub fn normal(&self) -> Option<[f64; 3]> {
        let [rx, ry, rz, cx, cy, cz] = self.image_orientation_patient?;
        let n = [ry * cz - rz * cy, rz * cx - rx * cz, rx * cy - ry * cx];
        let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if length == 0.0 {
            return None;
        }
        Some([n[0] / length, n[1] / length, n[2] / length])
    }

    /// Distance of the image origin along the plane normal.
    ///
    /// Without an orientation the patient z axis is assumed.
    pub fn position_along_normal(&self) -> Option<f64> {
        let [x, y, z] = self.image_position_patient?;
        let [nx, ny, nz] = self.normal().unwrap_or([0.0, 0.0, 1.0]);
        Some(x * nx + y * ny + z * nz)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CtImage {
    pub image: Image2D,
    pub kvp: Option<f64>,
    pub slice_thickness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PetImage {
    pub image: Image2D,
    /// Units (0054,1001), e.g. `BQML`
    pub units: Option<String>,
    pub decay_correction: Option<String>,
    pub slice_thickness: Option<f64>,
}

impl AsRef<Image2D> for CtImage {
    fn as_ref(&self) -> &Image2D {
        &self.image
    }
}

impl AsRef<Image2D> for PetImage {
    fn as_ref(&self) -> &Image2D {
        &self.image
    }
}

impl From<CtImage> for Image2D {
    fn from(ct: CtImage) -> Self {
        ct.image
    }
}

impl From<PetImage> for Image2D {
    fn from(pet: PetImage) -> Self {
        pet.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn values_are_indexed_by_column_then_row() {
        let image = Image2D {
            pixels: array![[1, 2, 3], [4, 5, 6]],
            rescale_slope: 2.0,
            rescale_intercept: -1024.0,
            ..Default::default()
        };
        assert_eq!(image.rows(), 2);
        assert_eq!(image.columns(), 3);
        assert_eq!(image.value(2, 0), Some(3.0));
        assert_eq!(image.value(0, 1), Some(4.0));
        assert_eq!(image.value(3, 0), None);
        assert_eq!(image.value(0, 2), None);
        assert_eq!(image.scaled_value(1, 1), Some(-1014.0));
    }

    #[test]
    fn default_rescale_is_identity() {
        let image = Image2D {
            pixels: array![[-7]],
            ..Default::default()
        };
        assert_eq!(image.value(0, 0), image.scaled_value(0, 0));
    }

    #[test]
    fn normal_of_axial_and_coronal_planes() {
        let axial = Image2D {
            image_orientation_patient: Some([1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            image_position_patient: Some([-250.0, -250.0, 12.5]),
            ..Default::default()
        };
        assert_eq!(axial.normal(), Some([0.0, 0.0, 1.0]));
        assert_eq!(axial.position_along_normal(), Some(12.5));

        let coronal = Image2D {
            image_orientation_patient: Some([1.0, 0.0, 0.0, 0.0, 0.0, -1.0]),
            image_position_patient: Some([0.0, 40.0, 0.0]),
            ..Default::default()
        };
        assert_eq!(coronal.normal(), Some([0.0, 1.0, 0.0]));
        assert_eq!(coronal.position_along_normal(), Some(40.0));
    }

    #[test]
    fn degenerate_orientation_has_no_normal() {
        let image = Image2D {
            image_orientation_patient: Some([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            image_position_patient: Some([1.0, 2.0, 3.0]),
            ..Default::default()
        };
        assert_eq!(image.normal(), None);
        assert_eq!(image.position_along_normal(), Some(3.0));
    }
}
