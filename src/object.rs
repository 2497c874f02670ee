use std::path::{Path, PathBuf};

use crate::dose::RtDose;
use crate::image::{CtImage, Image2D, PetImage};
use crate::registration::SpatialRegistration;
use crate::structure_set::RtStructureSet;

/// Typed result of decoding one DICOM file.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedObject {
    Ct(CtImage),
    Pet(PetImage),
    StructureSet(RtStructureSet),
    Dose(RtDose),
    SpatialRegistration(SpatialRegistration),
}

/// Borrowed view of whichever object a [`DicomObject`] holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedObjectRef<'a> {
    Ct(&'a CtImage),
    Pet(&'a PetImage),
    StructureSet(&'a RtStructureSet),
    Dose(&'a RtDose),
    SpatialRegistration(&'a SpatialRegistration),
}

/// Container for the object read from a single file.
///
/// A file carries exactly one SOP class, so at most one slot is ever set.
/// The source path is recorded even when decoding only partially succeeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DicomObject {
    ct: Option<CtImage>,
    pet: Option<PetImage>,
    structure_set: Option<RtStructureSet>,
    dose: Option<RtDose>,
    spatial_registration: Option<SpatialRegistration>,
    path: Option<PathBuf>,
}

impl DicomObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, object: TypedObject) {
        match object {
            TypedObject::Ct(ct) => self.ct = Some(ct),
            TypedObject::Pet(pet) => self.pet = Some(pet),
            TypedObject::StructureSet(ss) => self.structure_set = Some(ss),
            TypedObject::Dose(dose) => self.dose = Some(dose),
            TypedObject::SpatialRegistration(reg) => self.spatial_registration = Some(reg),
        }
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    pub fn ct(&self) -> Option<&CtImage> {
        self.ct.as_ref()
    }

    pub fn pet(&self) -> Option<&PetImage> {
        self.pet.as_ref()
    }

    pub fn structure_set(&self) -> Option<&RtStructureSet> {
        self.structure_set.as_ref()
    }

    pub fn dose(&self) -> Option<&RtDose> {
        self.dose.as_ref()
    }

    pub fn spatial_registration(&self) -> Option<&SpatialRegistration> {
        self.spatial_registration.as_ref()
    }

    /// Absolute path of the file this object was read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.object().is_none()
    }

    pub fn object(&self) -> Option<TypedObjectRef<'_>> {
        if let Some(ct) = &self.ct {
            Some(TypedObjectRef::Ct(ct))
        } else if let Some(pet) = &self.pet {
            Some(TypedObjectRef::Pet(pet))
        } else if let Some(ss) = &self.structure_set {
            Some(TypedObjectRef::StructureSet(ss))
        } else if let Some(dose) = &self.dose {
            Some(TypedObjectRef::Dose(dose))
        } else {
            self.spatial_registration
                .as_ref()
                .map(TypedObjectRef::SpatialRegistration)
        }
    }

    /// Take the slice out of a CT or PET object.
    pub fn into_image(self) -> Option<Image2D> {
        self.ct
            .map(Image2D::from)
            .or_else(|| self.pet.map(Image2D::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_has_no_slot() {
        let obj = DicomObject::new();
        assert!(obj.is_empty());
        assert!(obj.path().is_none());
        assert!(obj.into_image().is_none());
    }

    #[test]
    fn set_fills_matching_slot() {
        let mut obj = DicomObject::new();
        obj.set(TypedObject::Dose(RtDose::default()));
        obj.set_path(PathBuf::from("/data/RD.dcm"));
        assert!(obj.dose().is_some());
        assert!(obj.ct().is_none());
        assert!(matches!(obj.object(), Some(TypedObjectRef::Dose(_))));
        assert_eq!(obj.path(), Some(Path::new("/data/RD.dcm")));
        assert!(obj.into_image().is_none());
    }

    #[test]
    fn pet_slice_can_be_taken() {
        let mut obj = DicomObject::new();
        obj.set(TypedObject::Pet(PetImage {
            image: Image2D {
                sop_instance_uid: "1.2.3".into(),
                ..Default::default()
            },
            units: Some("BQML".into()),
            decay_correction: None,
            slice_thickness: None,
        }));
        let image = obj.into_image().map(|i| i.sop_instance_uid);
        assert_eq!(image.as_deref(), Some("1.2.3"));
    }
}
