use std::io::ErrorKind;
use std::path::Path;

use dicom::object::{ReadError, open_file};
use dicom_dictionary_std::{tags, uids};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::attributes;
use crate::dose::RtDose;
use crate::enums::ByteOrder;
use crate::object::{DicomObject, TypedObject};
use crate::reader;
use crate::writer;

#[derive(Debug, Error)]
pub enum DicomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM read error: {0}")]
    Read(#[from] ReadError),

    #[error("DICOM write error: {0}")]
    Write(#[from] dicom::object::WriteError),
}

/// Reads DICOM files into typed objects and writes RT Dose files.
pub struct DicomFactory;

impl DicomFactory {
    /// Read one file and decode it according to its SOP Class UID.
    ///
    /// A path that does not point to a readable file yields an empty
    /// [`DicomObject`]. Files without a SOP Class UID, of an unsupported
    /// class, or that the class decoder rejects also yield an empty object,
    /// with the path recorded and the reason logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed as DICOM.
    pub fn read_file(path: impl AsRef<Path>) -> Result<DicomObject, DicomError> {
        let path = path.as_ref();
        let mut dicom_object = DicomObject::new();
        if path.is_dir() {
            debug!("Skipping directory {}", path.display());
            return Ok(dicom_object);
        }

        let file = match open_file(path) {
            Ok(file) => file,
            Err(ReadError::OpenFile { source, .. })
                if matches!(
                    source.kind(),
                    ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::PermissionDenied
                ) =>
            {
                debug!("Cannot open {}: {}", path.display(), source);
                return Ok(dicom_object);
            }
            Err(e) => return Err(e.into()),
        };
        dicom_object.set_path(std::path::absolute(path)?);
        let meta = file.meta();
        let byte_order = ByteOrder::from_transfer_syntax(&meta.transfer_syntax);

        let Some(sop_class_uid) = attributes::string(&file, tags::SOP_CLASS_UID) else {
            error!("DICOM file {} doesn't contain a SOP Class UID", path.display());
            return Ok(dicom_object);
        };

        let decoded = match sop_class_uid.as_str() {
            uids::CT_IMAGE_STORAGE => reader::ct(&file, byte_order).map(TypedObject::Ct),
            uids::POSITRON_EMISSION_TOMOGRAPHY_IMAGE_STORAGE => {
                reader::pt(&file, byte_order).map(TypedObject::Pet)
            }
            uids::RT_STRUCTURE_SET_STORAGE => {
                reader::structure_set(&file, byte_order).map(TypedObject::StructureSet)
            }
            uids::RT_DOSE_STORAGE => reader::rt_dose(&file, byte_order).map(TypedObject::Dose),
            uids::SPATIAL_REGISTRATION_STORAGE => reader::spatial_registration(&file, byte_order)
                .map(TypedObject::SpatialRegistration),
            other => {
                error!(
                    "Trying to read an unsupported DICOM file {} [SOP Class UID: {}]",
                    path.display(),
                    other
                );
                return Ok(dicom_object);
            }
        };

        match decoded {
            Some(object) => dicom_object.set(object),
            None => warn!(
                "Could not decode {} [SOP Class UID: {}]",
                path.display(),
                sop_class_uid
            ),
        }
        Ok(dicom_object)
    }

    /// Like [`DicomFactory::read_file`], an absent path yields an empty object.
    pub fn read_path(path: Option<&Path>) -> Result<DicomObject, DicomError> {
        match path {
            Some(path) => Self::read_file(path),
            None => Ok(DicomObject::new()),
        }
    }

    /// Read every file in turn, one result per path in input order.
    ///
    /// A failing file does not stop the others from being read.
    pub fn read_files(paths: &[impl AsRef<Path>]) -> Vec<Result<DicomObject, DicomError>> {
        paths.iter().map(|path| Self::read_file(path)).collect()
    }

    /// Same as [`DicomFactory::read_files`], reading the files in parallel.
    pub fn read_files_par<P>(paths: &[P]) -> Vec<Result<DicomObject, DicomError>>
    where
        P: AsRef<Path> + Sync,
    {
        paths.par_iter().map(|path| Self::read_file(path)).collect()
    }

    /// Write an RT Dose to `path`.
    ///
    /// The dose is encoded before anything touches the file system: if it
    /// cannot be encoded, `false` is returned and no file is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoded file cannot be written.
    pub fn write_dose(path: impl AsRef<Path>, dose: &RtDose) -> Result<bool, DicomError> {
        let path = path.as_ref();
        let Some(file) = writer::rt_dose(dose) else {
            error!("Unable to write RT Dose file {}", path.display());
            return Ok(false);
        };
        file.write_to_file(path)?;
        Ok(true)
    }
}
