//! Encoders from a typed object back to a raw attribute set.
//!
//! Only RT Dose can be written.

use dicom::core::value::C;
use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{DefaultDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{tags, uids};
use tracing::warn;

use crate::dose::RtDose;

/// Encode an RT Dose as an Explicit VR Little Endian file object.
///
/// Returns `None` when the dose misses a mandatory attribute or its grid
/// cannot be represented, nothing is produced in that case.
pub fn rt_dose(dose: &RtDose) -> Option<DefaultDicomObject> {
    if dose.sop_instance_uid.is_empty() {
        warn!("Cannot encode RT Dose without SOP Instance UID");
        return None;
    }
    if dose.frame_of_reference_uid.is_empty() {
        warn!("Cannot encode RT Dose {} without Frame of Reference UID", dose.sop_instance_uid);
        return None;
    }
    let (frames, rows, columns) = dose.pixels.dim();
    if frames == 0 || rows == 0 || columns == 0 {
        warn!("Cannot encode RT Dose {} with an empty grid", dose.sop_instance_uid);
        return None;
    }
    let (Ok(rows), Ok(columns)) = (u16::try_from(rows), u16::try_from(columns)) else {
        warn!("RT Dose {} grid is too large", dose.sop_instance_uid);
        return None;
    };
    let offsets = match (dose.grid_frame_offset_vector.len(), frames) {
        (0, 1) => vec![0.0],
        (n, frames) if n == frames => dose.grid_frame_offset_vector.clone(),
        (n, frames) => {
            warn!(
                "RT Dose {} has {} frames but {} frame offsets",
                dose.sop_instance_uid, frames, n
            );
            return None;
        }
    };
    if !(dose.dose_grid_scaling.is_finite() && dose.dose_grid_scaling > 0.0) {
        warn!("RT Dose {} has an invalid Dose Grid Scaling", dose.sop_instance_uid);
        return None;
    }
    let words = pixel_words(dose)?;

    let mut obj = InMemDicomObject::new_empty();
    let mut put = |tag: Tag, vr: VR, value: PrimitiveValue| {
        obj.put(DataElement::new(tag, vr, value));
    };
    put(tags::SOP_CLASS_UID, VR::UI, PrimitiveValue::from(uids::RT_DOSE_STORAGE));
    put(tags::SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(dose.sop_instance_uid.as_str()));
    put(tags::MODALITY, VR::CS, PrimitiveValue::from("RTDOSE"));
    put(tags::PATIENT_ID, VR::LO, PrimitiveValue::from(dose.patient_id.as_str()));
    put(tags::STUDY_INSTANCE_UID, VR::UI, PrimitiveValue::from(dose.study_instance_uid.as_str()));
    put(tags::SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from(dose.series_instance_uid.as_str()));
    put(
        tags::FRAME_OF_REFERENCE_UID,
        VR::UI,
        PrimitiveValue::from(dose.frame_of_reference_uid.as_str()),
    );
    put(tags::IMAGE_POSITION_PATIENT, VR::DS, decimal_strings(&dose.image_position_patient));
    put(tags::IMAGE_ORIENTATION_PATIENT, VR::DS, decimal_strings(&dose.image_orientation_patient));
    put(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16));
    put(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, PrimitiveValue::from("MONOCHROME2"));
    put(tags::NUMBER_OF_FRAMES, VR::IS, PrimitiveValue::from(frames.to_string()));
    put(
        tags::FRAME_INCREMENT_POINTER,
        VR::AT,
        PrimitiveValue::Tags(C::from_elem(tags::GRID_FRAME_OFFSET_VECTOR, 1)),
    );
    put(tags::ROWS, VR::US, PrimitiveValue::from(rows));
    put(tags::COLUMNS, VR::US, PrimitiveValue::from(columns));
    put(tags::PIXEL_SPACING, VR::DS, decimal_strings(&dose.pixel_spacing));
    put(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(dose.bits_allocated));
    put(tags::BITS_STORED, VR::US, PrimitiveValue::from(dose.bits_allocated));
    put(tags::HIGH_BIT, VR::US, PrimitiveValue::from(dose.bits_allocated - 1));
    put(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(0_u16));
    put(tags::DOSE_UNITS, VR::CS, PrimitiveValue::from(dose.dose_units.as_str()));
    put(tags::DOSE_TYPE, VR::CS, PrimitiveValue::from(dose.dose_type.as_str()));
    put(
        tags::DOSE_SUMMATION_TYPE,
        VR::CS,
        PrimitiveValue::from(dose.dose_summation_type.as_str()),
    );
    put(tags::GRID_FRAME_OFFSET_VECTOR, VR::DS, decimal_strings(&offsets));
    put(tags::DOSE_GRID_SCALING, VR::DS, decimal_strings(&[dose.dose_grid_scaling]));
    put(tags::PIXEL_DATA, VR::OW, PrimitiveValue::U16(C::from_vec(words)));

    let meta = FileMetaTableBuilder::new()
        .media_storage_sop_class_uid(uids::RT_DOSE_STORAGE)
        .media_storage_sop_instance_uid(dose.sop_instance_uid.as_str())
        .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN);
    match obj.with_meta(meta) {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("Cannot build file meta group for RT Dose {}: {}", dose.sop_instance_uid, e);
            None
        }
    }
}

/// Dose values as little endian 16-bit words.
fn pixel_words(dose: &RtDose) -> Option<Vec<u16>> {
    match dose.bits_allocated {
        16 => dose
            .pixels
            .iter()
            .map(|&v| u16::try_from(v).ok())
            .collect::<Option<Vec<_>>>()
            .or_else(|| {
                warn!("RT Dose {} has values wider than 16 bits", dose.sop_instance_uid);
                None
            }),
        32 => Some(
            dose.pixels
                .iter()
                .flat_map(|&v| [(v & 0xFFFF) as u16, (v >> 16) as u16])
                .collect(),
        ),
        bits => {
            warn!("Cannot encode RT Dose with Bits Allocated {}", bits);
            None
        }
    }
}

fn decimal_strings(values: &[f64]) -> PrimitiveValue {
    PrimitiveValue::Strs(values.iter().map(|&v| decimal_string(v)).collect())
}

/// Format a value within the 16 characters allowed for a Decimal String.
fn decimal_string(value: f64) -> String {
    let plain = value.to_string();
    if plain.len() <= 16 {
        return plain;
    }
    (0..=15)
        .rev()
        .map(|precision| format!("{value:.precision$e}"))
        .find(|s| s.len() <= 16)
        .unwrap_or(plain)
}
