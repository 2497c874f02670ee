/// RT Structure Set: regions of interest delineated on an image series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RtStructureSet {
    pub sop_instance_uid: String,
    pub study_instance_uid: String,
    pub label: String,
    pub name: Option<String>,
    pub date: Option<String>,
    /// Frames of reference the contours are defined in
    pub frame_of_reference_uids: Vec<String>,
    pub rois: Vec<StructureSetRoi>,
    pub roi_contours: Vec<RoiContour>,
    pub observations: Vec<RoiObservation>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureSetRoi {
    pub number: i32,
    pub name: String,
    pub frame_of_reference_uid: String,
    /// `AUTOMATIC`, `SEMIAUTOMATIC` or `MANUAL`
    pub generation_algorithm: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoiContour {
    pub referenced_roi_number: i32,
    pub display_color: Option<[u8; 3]>,
    pub contours: Vec<Contour>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    /// `POINT`, `OPEN_PLANAR`, `OPEN_NONPLANAR` or `CLOSED_PLANAR`
    pub geometric_type: String,
    pub points: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoiObservation {
    pub number: i32,
    pub referenced_roi_number: i32,
    /// RT ROI Interpreted Type, e.g. `PTV` or `ORGAN`
    pub interpreted_type: Option<String>,
    pub physical_properties: Vec<RoiPhysicalProperty>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoiPhysicalProperty {
    /// e.g. `REL_ELEC_DENSITY`
    pub property: String,
    pub value: f64,
}

impl RtStructureSet {
    pub fn roi_by_name(&self, name: &str) -> Option<&StructureSetRoi> {
        self.rois.iter().find(|roi| roi.name == name)
    }

    pub fn contour_of(&self, roi_number: i32) -> Option<&RoiContour> {
        self.roi_contours
            .iter()
            .find(|c| c.referenced_roi_number == roi_number)
    }

    pub fn observation_of(&self, roi_number: i32) -> Option<&RoiObservation> {
        self.observations
            .iter()
            .find(|o| o.referenced_roi_number == roi_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_roi_number() {
        let ss = RtStructureSet {
            rois: vec![
                StructureSetRoi {
                    number: 1,
                    name: "BODY".into(),
                    ..Default::default()
                },
                StructureSetRoi {
                    number: 2,
                    name: "PTV".into(),
                    ..Default::default()
                },
            ],
            roi_contours: vec![RoiContour {
                referenced_roi_number: 2,
                display_color: Some([255, 0, 0]),
                contours: vec![],
            }],
            observations: vec![RoiObservation {
                number: 10,
                referenced_roi_number: 1,
                interpreted_type: Some("EXTERNAL".into()),
                physical_properties: vec![],
            }],
            ..Default::default()
        };
        let ptv = ss.roi_by_name("PTV").map(|roi| roi.number);
        assert_eq!(ptv, Some(2));
        assert_eq!(ss.contour_of(2).and_then(|c| c.display_color), Some([255, 0, 0]));
        assert!(ss.contour_of(1).is_none());
        assert_eq!(ss.observation_of(1).map(|o| o.number), Some(10));
        assert!(ss.roi_by_name("CTV").is_none());
    }
}
