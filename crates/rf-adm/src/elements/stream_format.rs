//! AudioStreamFormat

use serde::{Deserialize, Serialize};

use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::named_type::named_string;
use crate::parameters::impl_parameters;
use crate::{AdmResult, AudioStreamFormatId, FormatDescriptor};

named_string! {
    AudioStreamFormatName
}

/// A stream carrying one channel format or one pack format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStreamFormat {
    id: AudioStreamFormatId,
    name: AudioStreamFormatName,
    format: FormatDescriptor,
}

impl AudioStreamFormat {
    pub fn new(name: impl Into<AudioStreamFormatName>, format: FormatDescriptor) -> Self {
        Self {
            id: AudioStreamFormatId::default(),
            name: name.into(),
            format,
        }
    }

    pub fn with_id(mut self, id: AudioStreamFormatId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.get()
    }

    #[inline]
    pub fn format(&self) -> FormatDescriptor {
        self.format
    }
}

impl_parameters! {
    AudioStreamFormat {
        required name: AudioStreamFormatName,
        required format: FormatDescriptor,
    }
}

/// Edges of an AudioStreamFormat
///
/// `channel_format` and `pack_format` are mutually exclusive;
/// `track_formats` mirrors the tracks pointing at this stream.
#[derive(Debug, Clone, Default)]
pub struct StreamFormatRefs {
    pub(crate) channel_format: Option<usize>,
    pub(crate) pack_format: Option<usize>,
    pub(crate) track_formats: Vec<usize>,
}

impl Sealed for AudioStreamFormat {}

impl Element for AudioStreamFormat {
    type Id = AudioStreamFormatId;
    type Refs = StreamFormatRefs;

    const KIND: ElementKind = ElementKind::AudioStreamFormat;

    fn id(&self) -> AudioStreamFormatId {
        self.id
    }

    fn set_id(&mut self, id: AudioStreamFormatId) -> AdmResult<()> {
        self.id = id;
        Ok(())
    }

    element_store!(stream_formats);
}

element_display!(AudioStreamFormat);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;

    #[test]
    fn test_stream_parameters() {
        let mut stream = AudioStreamFormat::new("PCM_Object", FormatDescriptor::Pcm);
        assert_eq!(stream.get::<FormatDescriptor>(), FormatDescriptor::Pcm);
        stream.set(FormatDescriptor::Undefined).unwrap();
        assert_eq!(stream.format(), FormatDescriptor::Undefined);
        stream.set(AudioStreamFormatName::new("renamed")).unwrap();
        assert_eq!(stream.name(), "renamed");
    }
}
