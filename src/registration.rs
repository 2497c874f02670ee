/// Spatial Registration: rigid transforms between frames of reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialRegistration {
    pub sop_instance_uid: String,
    /// Frame of reference the registered frames are mapped into
    pub frame_of_reference_uid: String,
    pub registrations: Vec<Registration>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    /// Source frame of reference of the matrices
    pub frame_of_reference_uid: String,
    pub matrices: Vec<TransformMatrix>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformMatrix {
    /// `RIGID`, `RIGID_SCALE` or `AFFINE`
    pub matrix_type: String,
    /// Row-major 4x4 homogeneous matrix
    pub values: [f64; 16],
}

impl TransformMatrix {
    pub const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    pub fn transform(&self, point: [f64; 3]) -> [f64; 3] {
        let m = &self.values;
        let [x, y, z] = point;
        [
            m[0] * x + m[1] * y + m[2] * z + m[3],
            m[4] * x + m[5] * y + m[6] * z + m[7],
            m[8] * x + m[9] * y + m[10] * z + m[11],
        ]
    }
}

impl SpatialRegistration {
    /// Registration whose source is the given frame of reference.
    pub fn registration_from(&self, frame_of_reference_uid: &str) -> Option<&Registration> {
        self.registrations
            .iter()
            .find(|r| r.frame_of_reference_uid == frame_of_reference_uid)
    }
}
