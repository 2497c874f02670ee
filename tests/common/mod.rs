#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dicom::core::value::{C, DataSetSequence};
use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};

pub fn strs(values: &[&str]) -> PrimitiveValue {
    PrimitiveValue::Strs(values.iter().map(|v| v.to_string()).collect::<C<String>>())
}

pub fn put(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: PrimitiveValue) {
    obj.put(DataElement::new(tag, vr, value));
}

pub fn put_seq(obj: &mut InMemDicomObject, tag: Tag, items: Vec<InMemDicomObject>) {
    obj.put(DataElement::new(tag, VR::SQ, DataSetSequence::from(items)));
}

/// Write `dataset` as a Part 10 file, declaring `sop_class_uid` in the
/// dataset when given.
pub fn write_file(
    dir: &Path,
    name: &str,
    sop_class_uid: Option<&str>,
    transfer_syntax: &str,
    mut dataset: InMemDicomObject,
) -> PathBuf {
    if let Some(uid) = sop_class_uid {
        put(&mut dataset, tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(uid));
    }
    let media_storage_sop_class_uid =
        sop_class_uid.unwrap_or(uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
    let file = dataset
        .with_meta(
            FileMetaTableBuilder::new()
                .media_storage_sop_class_uid(media_storage_sop_class_uid)
                .media_storage_sop_instance_uid(format!("2.25.{}", name.len()))
                .transfer_syntax(transfer_syntax),
        )
        .expect("should have built file meta group");
    let path = dir.join(name);
    file.write_to_file(&path).expect("should have written file");
    path
}

/// A 2x2 16-bit axial slice at height `z`, pixel values `[z, 1, 2, 3]`.
pub fn slice_dataset(uid: &str, modality: &str, z: i32) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    put(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(uid));
    put(&mut obj, tags::MODALITY, VR::CS, PrimitiveValue::from(modality));
    put(&mut obj, tags::STUDY_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.826.0.1.1"));
    put(&mut obj, tags::FRAME_OF_REFERENCE_UID, VR::UI, PrimitiveValue::from("1.2.826.0.1.9"));
    put(&mut obj, tags::PATIENT_POSITION, VR::CS, PrimitiveValue::from("HFS"));
    put(&mut obj, tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16));
    put(&mut obj, tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2"));
    put(&mut obj, tags::ROWS, VR::US, PrimitiveValue::from(2_u16));
    put(&mut obj, tags::COLUMNS, VR::US, PrimitiveValue::from(2_u16));
    put(&mut obj, tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16));
    put(&mut obj, tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16));
    put(&mut obj, tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16));
    put(&mut obj, tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(1_u16));
    put(&mut obj, tags::PIXEL_SPACING, VR::DS, strs(&["0.5", "0.5"]));
    let z_string = z.to_string();
    put(&mut obj, tags::IMAGE_POSITION_PATIENT, VR::DS, strs(&["-0.5", "-0.5", &z_string]));
    put(&mut obj, tags::IMAGE_ORIENTATION_PATIENT, VR::DS, strs(&["1", "0", "0", "0", "1", "0"]));
    put(&mut obj, tags::RESCALE_SLOPE, VR::DS, strs(&["1"]));
    put(&mut obj, tags::RESCALE_INTERCEPT, VR::DS, strs(&["-1024"]));
    put(
        &mut obj,
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(C::from_vec(vec![z as u16, 1, 2, 3])),
    );
    obj
}

pub fn structure_set_dataset() -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    put(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.826.0.1.30"));
    put(&mut obj, tags::MODALITY, VR::CS, PrimitiveValue::from("RTSTRUCT"));
    put(&mut obj, tags::STRUCTURE_SET_LABEL, VR::SH, PrimitiveValue::from("PLAN"));
    let mut roi = InMemDicomObject::new_empty();
    put(&mut roi, tags::ROI_NUMBER, VR::IS, strs(&["3"]));
    put(&mut roi, tags::ROI_NAME, VR::LO, PrimitiveValue::from("BODY"));
    put_seq(&mut obj, tags::STRUCTURE_SET_ROI_SEQUENCE, vec![roi]);
    obj
}

pub fn registration_dataset() -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    put(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.826.0.1.40"));
    put(&mut obj, tags::MODALITY, VR::CS, PrimitiveValue::from("REG"));
    put(&mut obj, tags::FRAME_OF_REFERENCE_UID, VR::UI, PrimitiveValue::from("1.2.826.0.1.9"));
    let mut matrix = InMemDicomObject::new_empty();
    put(
        &mut matrix,
        tags::FRAME_OF_REFERENCE_TRANSFORMATION_MATRIX,
        VR::DS,
        strs(&["1", "0", "0", "0", "0", "1", "0", "0", "0", "0", "1", "0", "0", "0", "0", "1"]),
    );
    let mut matrix_registration = InMemDicomObject::new_empty();
    put_seq(&mut matrix_registration, tags::MATRIX_SEQUENCE, vec![matrix]);
    let mut registration = InMemDicomObject::new_empty();
    put(
        &mut registration,
        tags::FRAME_OF_REFERENCE_UID,
        VR::UI,
        PrimitiveValue::from("1.2.826.0.1.8"),
    );
    put_seq(&mut registration, tags::MATRIX_REGISTRATION_SEQUENCE, vec![matrix_registration]);
    put_seq(&mut obj, tags::REGISTRATION_SEQUENCE, vec![registration]);
    obj
}
