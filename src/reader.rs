//! Decoders from a raw attribute set to a typed object, one per SOP class.
//!
//! A decoder returns `None` when the attribute set lacks something its class
//! cannot do without. It never fails the read: the dispatcher leaves the
//! corresponding slot of the [`DicomObject`](crate::object::DicomObject)
//! empty instead.

use dicom::object::{DefaultDicomObject, InMemDicomObject};
use dicom::pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use dicom_dictionary_std::tags;
use ndarray::{Array2, Array3};
use tracing::warn;

use crate::attributes::{
    self, float, float_array, floats, int32, items, string, string_or_empty, uint16,
};
use crate::dose::RtDose;
use crate::enums::{ByteOrder, Modality, PatientPosition, PixelRepresentation};
use crate::image::{CtImage, Image2D, PetImage};
use crate::registration::{Registration, SpatialRegistration, TransformMatrix};
use crate::structure_set::{
    Contour, RoiContour, RoiObservation, RoiPhysicalProperty, RtStructureSet, StructureSetRoi,
};

pub fn ct(file: &DefaultDicomObject, _byte_order: ByteOrder) -> Option<CtImage> {
    let image = image_2d(file)?;
    Some(CtImage {
        image,
        kvp: float(file, tags::KVP),
        slice_thickness: float(file, tags::SLICE_THICKNESS),
    })
}

pub fn pt(file: &DefaultDicomObject, _byte_order: ByteOrder) -> Option<PetImage> {
    let image = image_2d(file)?;
    Some(PetImage {
        image,
        units: string(file, tags::UNITS),
        decay_correction: string(file, tags::DECAY_CORRECTION),
        slice_thickness: float(file, tags::SLICE_THICKNESS),
    })
}

pub fn structure_set(file: &DefaultDicomObject, _byte_order: ByteOrder) -> Option<RtStructureSet> {
    let sop_instance_uid = sop_instance_uid(file)?;

    let frame_of_reference_uids = items(file, tags::REFERENCED_FRAME_OF_REFERENCE_SEQUENCE)
        .iter()
        .filter_map(|item| string(item, tags::FRAME_OF_REFERENCE_UID))
        .collect();

    let rois = items(file, tags::STRUCTURE_SET_ROI_SEQUENCE)
        .iter()
        .filter_map(|item| {
            let Some(number) = int32(item, tags::ROI_NUMBER) else {
                warn!("Skipping structure set ROI without ROI Number");
                return None;
            };
            Some(StructureSetRoi {
                number,
                name: string_or_empty(item, tags::ROI_NAME),
                frame_of_reference_uid: string_or_empty(
                    item,
                    tags::REFERENCED_FRAME_OF_REFERENCE_UID,
                ),
                generation_algorithm: string(item, tags::ROI_GENERATION_ALGORITHM),
            })
        })
        .collect();

    let roi_contours = items(file, tags::ROI_CONTOUR_SEQUENCE)
        .iter()
        .filter_map(|item| {
            let referenced_roi_number = int32(item, tags::REFERENCED_ROI_NUMBER)?;
            let display_color = attributes::ints(item, tags::ROI_DISPLAY_COLOR)
                .and_then(|rgb| match rgb[..] {
                    [r, g, b] => Some([r, g, b].map(|c| c.clamp(0, 255) as u8)),
                    _ => None,
                });
            let contours = items(item, tags::CONTOUR_SEQUENCE)
                .iter()
                .map(contour)
                .collect();
            Some(RoiContour {
                referenced_roi_number,
                display_color,
                contours,
            })
        })
        .collect();

    let observations = items(file, tags::RTROI_OBSERVATIONS_SEQUENCE)
        .iter()
        .filter_map(|item| {
            let physical_properties = items(item, tags::ROI_PHYSICAL_PROPERTIES_SEQUENCE)
                .iter()
                .filter_map(|p| {
                    Some(RoiPhysicalProperty {
                        property: string(p, tags::ROI_PHYSICAL_PROPERTY)?,
                        value: float(p, tags::ROI_PHYSICAL_PROPERTY_VALUE)?,
                    })
                })
                .collect();
            Some(RoiObservation {
                number: int32(item, tags::OBSERVATION_NUMBER)?,
                referenced_roi_number: int32(item, tags::REFERENCED_ROI_NUMBER)?,
                interpreted_type: string(item, tags::RTROI_INTERPRETED_TYPE),
                physical_properties,
            })
        })
        .collect();

    Some(RtStructureSet {
        sop_instance_uid,
        study_instance_uid: string_or_empty(file, tags::STUDY_INSTANCE_UID),
        label: string_or_empty(file, tags::STRUCTURE_SET_LABEL),
        name: string(file, tags::STRUCTURE_SET_NAME),
        date: string(file, tags::STRUCTURE_SET_DATE),
        frame_of_reference_uids,
        rois,
        roi_contours,
        observations,
    })
}

fn contour(item: &InMemDicomObject) -> Contour {
    let points: Vec<[f64; 3]> = floats(item, tags::CONTOUR_DATA)
        .unwrap_or_default()
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    if let Some(declared) = int32(item, tags::NUMBER_OF_CONTOUR_POINTS) {
        if usize::try_from(declared).ok() != Some(points.len()) {
            warn!(
                "Contour declares {} points but carries {}",
                declared,
                points.len()
            );
        }
    }
    Contour {
        geometric_type: string_or_empty(item, tags::CONTOUR_GEOMETRIC_TYPE),
        points,
    }
}

pub fn rt_dose(file: &DefaultDicomObject, byte_order: ByteOrder) -> Option<RtDose> {
    let sop_instance_uid = sop_instance_uid(file)?;
    let (Some(rows), Some(columns), Some(bits_allocated)) = (
        uint16(file, tags::ROWS),
        uint16(file, tags::COLUMNS),
        uint16(file, tags::BITS_ALLOCATED),
    ) else {
        warn!("RT Dose {} lacks its grid dimensions", sop_instance_uid);
        return None;
    };
    if bits_allocated != 16 && bits_allocated != 32 {
        warn!(
            "RT Dose {} has unsupported Bits Allocated {}",
            sop_instance_uid, bits_allocated
        );
        return None;
    }
    let (Some(pixel_spacing), Some(image_position_patient), Some(image_orientation_patient)) = (
        float_array::<2>(file, tags::PIXEL_SPACING),
        float_array::<3>(file, tags::IMAGE_POSITION_PATIENT),
        float_array::<6>(file, tags::IMAGE_ORIENTATION_PATIENT),
    ) else {
        warn!("RT Dose {} lacks its grid geometry", sop_instance_uid);
        return None;
    };
    let frames = int32(file, tags::NUMBER_OF_FRAMES)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(1);
    let (rows, columns) = (usize::from(rows), usize::from(columns));

    let mut words = decode_dose(file, byte_order, &sop_instance_uid)?;
    let voxels = frames * rows * columns;
    if words.len() < voxels {
        warn!(
            "RT Dose {} holds {} values for a {}x{}x{} grid",
            sop_instance_uid,
            words.len(),
            frames,
            rows,
            columns
        );
        return None;
    }
    words.truncate(voxels);
    let pixels = Array3::from_shape_vec((frames, rows, columns), words).ok()?;

    Some(RtDose {
        sop_instance_uid,
        study_instance_uid: string_or_empty(file, tags::STUDY_INSTANCE_UID),
        series_instance_uid: string_or_empty(file, tags::SERIES_INSTANCE_UID),
        frame_of_reference_uid: string_or_empty(file, tags::FRAME_OF_REFERENCE_UID),
        patient_id: string_or_empty(file, tags::PATIENT_ID),
        dose_units: string_or_empty(file, tags::DOSE_UNITS),
        dose_type: string_or_empty(file, tags::DOSE_TYPE),
        dose_summation_type: string_or_empty(file, tags::DOSE_SUMMATION_TYPE),
        pixel_spacing,
        image_position_patient,
        image_orientation_patient,
        grid_frame_offset_vector: floats(file, tags::GRID_FRAME_OFFSET_VECTOR).unwrap_or_default(),
        dose_grid_scaling: float(file, tags::DOSE_GRID_SCALING).unwrap_or(1.0),
        bits_allocated,
        pixels,
    })
}

pub fn spatial_registration(
    file: &DefaultDicomObject,
    _byte_order: ByteOrder,
) -> Option<SpatialRegistration> {
    let sop_instance_uid = sop_instance_uid(file)?;
    let registrations = items(file, tags::REGISTRATION_SEQUENCE)
        .iter()
        .map(|item| {
            let matrices = items(item, tags::MATRIX_REGISTRATION_SEQUENCE)
                .iter()
                .flat_map(|registration| items(registration, tags::MATRIX_SEQUENCE))
                .filter_map(|matrix| {
                    let Some(values) =
                        float_array::<16>(matrix, tags::FRAME_OF_REFERENCE_TRANSFORMATION_MATRIX)
                    else {
                        warn!("Skipping transformation matrix without 16 values");
                        return None;
                    };
                    Some(TransformMatrix {
                        matrix_type: string_or_empty(
                            matrix,
                            tags::FRAME_OF_REFERENCE_TRANSFORMATION_MATRIX_TYPE,
                        ),
                        values,
                    })
                })
                .collect();
            Registration {
                frame_of_reference_uid: string_or_empty(item, tags::FRAME_OF_REFERENCE_UID),
                matrices,
            }
        })
        .collect();

    Some(SpatialRegistration {
        sop_instance_uid,
        frame_of_reference_uid: string_or_empty(file, tags::FRAME_OF_REFERENCE_UID),
        registrations,
    })
}

/// SOP Instance UID of the dataset, falling back to the file meta group.
fn sop_instance_uid(file: &DefaultDicomObject) -> Option<String> {
    let uid = string(file, tags::SOP_INSTANCE_UID).or_else(|| {
        let uid = file
            .meta()
            .media_storage_sop_instance_uid
            .trim_end_matches(['\0', ' ']);
        (!uid.is_empty()).then(|| uid.to_owned())
    });
    if uid.is_none() {
        warn!("DICOM dataset has no SOP Instance UID");
    }
    uid
}

fn image_2d(file: &DefaultDicomObject) -> Option<Image2D> {
    let sop_instance_uid = sop_instance_uid(file)?;
    let pixel_representation =
        PixelRepresentation::from_value(uint16(file, tags::PIXEL_REPRESENTATION));
    let pixels = decode_image(file, pixel_representation, &sop_instance_uid)?;

    Some(Image2D {
        frame_of_reference_uid: string_or_empty(file, tags::FRAME_OF_REFERENCE_UID),
        modality: Modality::from_code(&string_or_empty(file, tags::MODALITY)),
        study_instance_uid: string_or_empty(file, tags::STUDY_INSTANCE_UID),
        series_instance_uid: string_or_empty(file, tags::SERIES_INSTANCE_UID),
        patient_position: PatientPosition::from_code(&string_or_empty(
            file,
            tags::PATIENT_POSITION,
        )),
        pixel_spacing: float_array(file, tags::PIXEL_SPACING),
        image_position_patient: float_array(file, tags::IMAGE_POSITION_PATIENT),
        image_orientation_patient: float_array(file, tags::IMAGE_ORIENTATION_PATIENT),
        pixel_representation,
        bits_allocated: uint16(file, tags::BITS_ALLOCATED).unwrap_or_default(),
        instance_number: int32(file, tags::INSTANCE_NUMBER),
        rescale_slope: float(file, tags::RESCALE_SLOPE).unwrap_or(1.0),
        rescale_intercept: float(file, tags::RESCALE_INTERCEPT).unwrap_or(0.0),
        sop_instance_uid,
        pixels,
    })
}

/// Stored values of the first frame, `[row, column]`, without rescaling.
fn decode_image(
    file: &DefaultDicomObject,
    pixel_representation: PixelRepresentation,
    sop_instance_uid: &str,
) -> Option<Array2<i32>> {
    let pixel_data = match file.decode_pixel_data() {
        Ok(pixel_data) => pixel_data,
        Err(e) => {
            warn!("Could not decode Pixel Data of image {}: {}", sop_instance_uid, e);
            return None;
        }
    };
    let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
    let samples: Vec<i32> = match pixel_data.to_vec_frame_with_options(0, &options) {
        Ok(samples) => samples,
        Err(e) => {
            warn!("Could not convert Pixel Data of image {}: {}", sop_instance_uid, e);
            return None;
        }
    };
    let (bits_stored, high_bit) = (pixel_data.bits_stored(), pixel_data.high_bit());
    let values = samples
        .into_iter()
        .map(|sample| {
            stored_value(sample, bits_stored, high_bit, pixel_representation.is_signed())
        })
        .collect();
    let shape = (pixel_data.rows() as usize, pixel_data.columns() as usize);
    Array2::from_shape_vec(shape, values)
        .inspect_err(|e| warn!("Image {} has an unexpected pixel layout: {}", sop_instance_uid, e))
        .ok()
}

/// Unsigned dose values of every frame in stream order.
fn decode_dose(
    file: &DefaultDicomObject,
    byte_order: ByteOrder,
    sop_instance_uid: &str,
) -> Option<Vec<u32>> {
    let pixel_data = match file.decode_pixel_data() {
        Ok(pixel_data) => pixel_data,
        Err(e) => {
            warn!("Could not decode Pixel Data of RT Dose {}: {}", sop_instance_uid, e);
            return None;
        }
    };
    if pixel_data.bits_allocated() != 32 {
        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        return pixel_data
            .to_vec_with_options(&options)
            .inspect_err(|e| {
                warn!("Could not convert Pixel Data of RT Dose {}: {}", sop_instance_uid, e)
            })
            .ok();
    }
    // 32-bit samples arrive as native 16-bit words, ordered as in the stream
    let words = pixel_data
        .data()
        .chunks_exact(4)
        .map(|c| {
            let (first, second) = (
                u16::from_ne_bytes([c[0], c[1]]),
                u16::from_ne_bytes([c[2], c[3]]),
            );
            let (high, low) = match byte_order {
                ByteOrder::Little => (second, first),
                ByteOrder::Big => (first, second),
            };
            (u32::from(high) << 16) | u32::from(low)
        })
        .collect();
    Some(words)
}

/// Extract the stored bits of a pixel sample, as delimited by Bits Stored
/// and High Bit, sign extending them when the representation is signed.
fn stored_value(sample: i32, bits_stored: u16, high_bit: u16, signed: bool) -> i32 {
    let bits = u32::from(bits_stored).clamp(1, 32);
    let shift = (u32::from(high_bit) + 1).saturating_sub(bits).min(31);
    let word = (sample as u32) >> shift;
    let word = if bits == 32 { word } else { word & ((1 << bits) - 1) };
    if signed {
        let unused = 32 - bits;
        ((word << unused) as i32) >> unused
    } else {
        word as i32
    }
}
