//! Typed accessors over a decoded attribute set.
//!
//! Every accessor returns `None` when the element is absent or its value
//! cannot be converted, so that decoders can decide which attributes are
//! mandatory for their object class.

use dicom::core::Tag;
use dicom::object::InMemDicomObject;

pub(crate) fn string(obj: &InMemDicomObject, tag: Tag) -> Option<String> {
    let element = obj.element(tag).ok()?;
    let value = element.to_str().ok()?;
    let value = value.trim_matches(['\0', ' ']);
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

pub(crate) fn string_or_empty(obj: &InMemDicomObject, tag: Tag) -> String {
    string(obj, tag).unwrap_or_default()
}

pub(crate) fn float(obj: &InMemDicomObject, tag: Tag) -> Option<f64> {
    floats(obj, tag)?.first().copied()
}

pub(crate) fn floats(obj: &InMemDicomObject, tag: Tag) -> Option<Vec<f64>> {
    obj.element(tag).ok()?.to_multi_float64().ok()
}

/// Multi-valued numeric attribute with an exact value multiplicity.
pub(crate) fn float_array<const N: usize>(obj: &InMemDicomObject, tag: Tag) -> Option<[f64; N]> {
    floats(obj, tag)?.try_into().ok()
}

pub(crate) fn uint16(obj: &InMemDicomObject, tag: Tag) -> Option<u16> {
    obj.element(tag).ok()?.to_int::<u16>().ok()
}

pub(crate) fn int32(obj: &InMemDicomObject, tag: Tag) -> Option<i32> {
    obj.element(tag).ok()?.to_int::<i32>().ok()
}

pub(crate) fn ints(obj: &InMemDicomObject, tag: Tag) -> Option<Vec<i32>> {
    obj.element(tag).ok()?.to_multi_int::<i32>().ok()
}

/// Items of a sequence attribute, empty when the attribute is missing.
pub(crate) fn items(obj: &InMemDicomObject, tag: Tag) -> &[InMemDicomObject] {
    obj.element(tag)
        .ok()
        .and_then(|element| element.value().items())
        .unwrap_or(&[])
}
