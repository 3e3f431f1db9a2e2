//! AudioPackFormat

use serde::{Deserialize, Serialize};

use super::common::Importance;
use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::named_type::{named_string, named_value};
use crate::parameters::impl_parameters;
use crate::{AdmError, AdmResult, AudioPackFormatId, AudioPackFormatIdValue, TypeDescriptor};

named_string! {
    AudioPackFormatName
}

named_value! {
    /// Distance in metres the normalised distances refer to
    #[derive(Copy)]
    AbsoluteDistance(f32), min 0.0
}

/// A group of channel formats rendered together, e.g. a 5.1 layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioPackFormat {
    id: AudioPackFormatId,
    name: AudioPackFormatName,
    type_descriptor: TypeDescriptor,
    importance: Option<Importance>,
    absolute_distance: Option<AbsoluteDistance>,
}

impl AudioPackFormat {
    /// New pack; the type is fixed for its lifetime
    pub fn new(name: impl Into<AudioPackFormatName>, type_descriptor: TypeDescriptor) -> Self {
        Self {
            id: AudioPackFormatId::new(type_descriptor, AudioPackFormatIdValue::default()),
            name: name.into(),
            type_descriptor,
            importance: None,
            absolute_distance: None,
        }
    }

    /// Builder form of [`Element::set_id`]
    pub fn with_id(mut self, id: AudioPackFormatId) -> AdmResult<Self> {
        self.set_id(id)?;
        Ok(self)
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.get()
    }

    #[inline]
    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.type_descriptor
    }
}

impl_parameters! {
    AudioPackFormat {
        required name: AudioPackFormatName,
        fixed type_descriptor: TypeDescriptor,
        optional importance: Importance,
        optional absolute_distance: AbsoluteDistance,
    }
}

/// Edges of an AudioPackFormat
#[derive(Debug, Clone, Default)]
pub struct PackFormatRefs {
    pub(crate) channel_formats: Vec<usize>,
    pub(crate) pack_formats: Vec<usize>,
}

impl Sealed for AudioPackFormat {}

impl Element for AudioPackFormat {
    type Id = AudioPackFormatId;
    type Refs = PackFormatRefs;

    const KIND: ElementKind = ElementKind::AudioPackFormat;

    fn id(&self) -> AudioPackFormatId {
        self.id
    }

    /// Fails with `TypeMismatch` when the type section differs from the pack type
    fn set_id(&mut self, id: AudioPackFormatId) -> AdmResult<()> {
        if id.type_descriptor() != self.type_descriptor {
            return Err(AdmError::TypeMismatch {
                expected: self.type_descriptor.to_string(),
                found: format!("{id}"),
            });
        }
        self.id = id;
        Ok(())
    }

    element_store!(pack_formats);
}

element_display!(AudioPackFormat);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ElementId;
    use crate::parameters::Parameters;

    #[test]
    fn test_id_takes_pack_type() {
        let pack = AudioPackFormat::new("Stereo", TypeDescriptor::DirectSpeakers);
        assert_eq!(pack.id().type_descriptor(), TypeDescriptor::DirectSpeakers);
        assert!(pack.id().is_unset());
    }

    #[test]
    fn test_type_mismatch() {
        let mut pack = AudioPackFormat::new("Object", TypeDescriptor::Objects);
        let wrong: AudioPackFormatId = "AP_00011001".parse().unwrap();
        assert!(matches!(pack.set_id(wrong), Err(AdmError::TypeMismatch { .. })));
        assert!(pack.id().is_unset());

        pack.set_id("AP_00031001".parse().unwrap()).unwrap();
        assert_eq!(pack.id().format(), "AP_00031001");
    }

    #[test]
    fn test_type_is_fixed() {
        let pack = AudioPackFormat::new("HOA", TypeDescriptor::Hoa);
        assert_eq!(pack.get::<TypeDescriptor>(), TypeDescriptor::Hoa);
        assert!(pack.has::<TypeDescriptor>());
        assert!(!pack.has::<AbsoluteDistance>());
    }
}
