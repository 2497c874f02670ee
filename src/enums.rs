use std::fmt;

/// Rule used to order the slices of an [`Image3D`](crate::volume::Image3D).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Image position projected onto the slice normal.
    #[default]
    ImagePositionPatient,
    InstanceNumber,
}

/// Byte order declared by the transfer syntax of a file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    /// Derive the byte order from a transfer syntax UID.
    ///
    /// Explicit VR Big Endian is the only big endian transfer syntax,
    /// every other one (including the encapsulated ones) is little endian.
    pub fn from_transfer_syntax(uid: &str) -> Self {
        let uid = uid.trim_end_matches(['\0', ' ']);
        if uid == dicom_dictionary_std::uids::EXPLICIT_VR_BIG_ENDIAN {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Ct,
    Pt,
    Mr,
    RtStruct,
    RtDose,
    Reg,
    #[default]
    Unknown,
}

impl Modality {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "CT" => Modality::Ct,
            "PT" => Modality::Pt,
            "MR" => Modality::Mr,
            "RTSTRUCT" => Modality::RtStruct,
            "RTDOSE" => Modality::RtDose,
            "REG" => Modality::Reg,
            _ => Modality::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Modality::Ct => "CT",
            Modality::Pt => "PT",
            Modality::Mr => "MR",
            Modality::RtStruct => "RTSTRUCT",
            Modality::RtDose => "RTDOSE",
            Modality::Reg => "REG",
            Modality::Unknown => "",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Patient position relative to the imaging equipment (0018,5100).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PatientPosition {
    /// Head first supine
    Hfs,
    /// Head first prone
    Hfp,
    /// Head first decubitus right
    Hfdr,
    /// Head first decubitus left
    Hfdl,
    /// Feet first supine
    Ffs,
    /// Feet first prone
    Ffp,
    /// Feet first decubitus right
    Ffdr,
    /// Feet first decubitus left
    Ffdl,
    #[default]
    Unknown,
}

impl PatientPosition {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "HFS" => PatientPosition::Hfs,
            "HFP" => PatientPosition::Hfp,
            "HFDR" => PatientPosition::Hfdr,
            "HFDL" => PatientPosition::Hfdl,
            "FFS" => PatientPosition::Ffs,
            "FFP" => PatientPosition::Ffp,
            "FFDR" => PatientPosition::Ffdr,
            "FFDL" => PatientPosition::Ffdl,
            _ => PatientPosition::Unknown,
        }
    }
}

/// Pixel Representation (0028,0103).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PixelRepresentation {
    Unsigned,
    Signed,
    #[default]
    None,
}

impl PixelRepresentation {
    pub fn from_value(value: Option<u16>) -> Self {
        match value {
            Some(0) => PixelRepresentation::Unsigned,
            Some(1) => PixelRepresentation::Signed,
            _ => PixelRepresentation::None,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, PixelRepresentation::Signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_follows_transfer_syntax() {
        assert_eq!(
            ByteOrder::from_transfer_syntax("1.2.840.10008.1.2.2\0"),
            ByteOrder::Big
        );
        assert_eq!(
            ByteOrder::from_transfer_syntax("1.2.840.10008.1.2.1"),
            ByteOrder::Little
        );
        assert_eq!(
            ByteOrder::from_transfer_syntax("1.2.840.10008.1.2"),
            ByteOrder::Little
        );
    }

    #[test]
    fn codes_are_parsed() {
        assert_eq!(Modality::from_code("CT "), Modality::Ct);
        assert_eq!(Modality::from_code("XA"), Modality::Unknown);
        assert_eq!(PatientPosition::from_code("FFDL"), PatientPosition::Ffdl);
        assert_eq!(PatientPosition::from_code(""), PatientPosition::Unknown);
        assert_eq!(
            PixelRepresentation::from_value(Some(1)),
            PixelRepresentation::Signed
        );
        assert_eq!(PixelRepresentation::from_value(None), PixelRepresentation::None);
    }
}
