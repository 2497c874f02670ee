//! # DICOM-RT library
//!
//! This crate reads radiotherapy DICOM files into typed objects and
//! assembles CT and PET slices into geometry-aware volumes.
//!
//! It is built on top of the dicom-rs ecosystem, which takes care of the
//! binary encoding. Each file is routed by its SOP Class UID to a decoder
//! for one of the supported classes:
//!  - CT Image Storage
//!  - Positron Emission Tomography Image Storage
//!  - RT Structure Set Storage
//!  - RT Dose Storage
//!  - Spatial Registration Storage
//!
//! Files of any other class are not an error: they produce an empty
//! [`DicomObject`] and a diagnostic through `tracing`. RT Dose objects can
//! also be written back to disk.
//!
//! Volumes ([`Image3D`]) sort their slices lazily along the slice normal,
//! so slices may be appended in any order.
//!
//! # Examples
//!
//! ## Reading a CT series into a volume
//!
//! ```no_run
//! # use dicom_rt::{VolumeLoader, SortBy};
//! let paths = ["CT.1.dcm", "CT.2.dcm", "CT.3.dcm"];
//! let mut volume = VolumeLoader::load_from_file_paths(&paths, SortBy::ImagePositionPatient)
//!     .expect("should have loaded the series");
//! let origin = volume.image_position_patient();
//! let hu = volume.scaled_value(256, 256, 1);
//! ```
//!
//! ## Reading a single object
//!
//! ```no_run
//! # use dicom_rt::DicomFactory;
//! let object = DicomFactory::read_file("RD.dcm").expect("should have parsed the file");
//! if let Some(dose) = object.dose() {
//!     println!("max dose: {:?} {}", dose.max_dose(), dose.dose_units);
//! }
//! ```

mod attributes;
pub mod dose;
pub mod enums;
pub mod factory;
pub mod image;
pub mod object;
pub mod reader;
pub mod registration;
pub mod structure_set;
pub mod volume;
pub mod volume_loader;
pub mod writer;

pub use dose::RtDose;
pub use enums::{ByteOrder, Modality, PatientPosition, PixelRepresentation, SortBy};
pub use factory::{DicomError, DicomFactory};
pub use image::{CtImage, Image2D, PetImage};
pub use object::{DicomObject, TypedObject, TypedObjectRef};
pub use registration::SpatialRegistration;
pub use structure_set::RtStructureSet;
pub use volume::{Image3D, VolumeError};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
