use ndarray::Array3;

/// RT Dose: a 3D dose grid, one frame per plane.
///
/// Stored values are indexed `[frame, row, column]`, the physical dose is
/// obtained by multiplying with [`RtDose::dose_grid_scaling`].
#[derive(Debug, Clone, PartialEq)]
pub struct RtDose {
    pub sop_instance_uid: String,
    pub study_instance_uid: String,
    pub series_instance_uid: String,
    pub frame_of_reference_uid: String,
    pub patient_id: String,
    /// `GY` or `RELATIVE`
    pub dose_units: String,
    /// `PHYSICAL`, `EFFECTIVE` or `ERROR`
    pub dose_type: String,
    /// `PLAN`, `FRACTION`, `BEAM`, ...
    pub dose_summation_type: String,
    /// Row spacing followed by column spacing, in mm
    pub pixel_spacing: [f64; 2],
    pub image_position_patient: [f64; 3],
    pub image_orientation_patient: [f64; 6],
    /// Offset of each frame from the image position along the normal
    pub grid_frame_offset_vector: Vec<f64>,
    pub dose_grid_scaling: f64,
    pub bits_allocated: u16,
    pub pixels: Array3<u32>,
}

impl Default for RtDose {
    fn default() -> Self {
        Self {
            sop_instance_uid: String::new(),
            study_instance_uid: String::new(),
            series_instance_uid: String::new(),
            frame_of_reference_uid: String::new(),
            patient_id: String::new(),
            dose_units: "GY".to_owned(),
            dose_type: "PHYSICAL".to_owned(),
            dose_summation_type: "PLAN".to_owned(),
            pixel_spacing: [1.0, 1.0],
            image_position_patient: [0.0; 3],
            image_orientation_patient: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            grid_frame_offset_vector: Vec::new(),
            dose_grid_scaling: 1.0,
            bits_allocated: 32,
            pixels: Array3::zeros((0, 0, 0)),
        }
    }
}

impl RtDose {
    pub fn frames(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn rows(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn columns(&self) -> usize {
        self.pixels.dim().2
    }

    pub fn value(&self, column: usize, row: usize, frame: usize) -> Option<u32> {
        self.pixels.get((frame, row, column)).copied()
    }

    /// Dose at a voxel, in [`RtDose::dose_units`].
    pub fn dose(&self, column: usize, row: usize, frame: usize) -> Option<f64> {
        self.value(column, row, frame)
            .map(|v| f64::from(v) * self.dose_grid_scaling)
    }

    pub fn max_dose(&self) -> Option<f64> {
        self.pixels
            .iter()
            .max()
            .map(|&v| f64::from(v) * self.dose_grid_scaling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dose_is_scaled() {
        let mut pixels = Array3::zeros((2, 2, 3));
        pixels[(1, 0, 2)] = 400;
        pixels[(0, 1, 0)] = 100;
        let dose = RtDose {
            dose_grid_scaling: 0.25,
            pixels,
            ..Default::default()
        };
        assert_eq!((dose.frames(), dose.rows(), dose.columns()), (2, 2, 3));
        assert_eq!(dose.value(2, 0, 1), Some(400));
        assert_eq!(dose.dose(0, 1, 0), Some(25.0));
        assert_eq!(dose.dose(3, 0, 0), None);
        assert_eq!(dose.max_dose(), Some(100.0));
    }

    #[test]
    fn empty_grid_has_no_max() {
        assert_eq!(RtDose::default().max_dose(), None);
    }
}
