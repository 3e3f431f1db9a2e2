//! AudioTrackFormat

use serde::{Deserialize, Serialize};

use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::named_type::named_string;
use crate::parameters::impl_parameters;
use crate::{AdmResult, AudioTrackFormatId, FormatDescriptor};

named_string! {
    AudioTrackFormatName
}

/// One track of a stream format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrackFormat {
    id: AudioTrackFormatId,
    name: AudioTrackFormatName,
    format: FormatDescriptor,
}

impl AudioTrackFormat {
    pub fn new(name: impl Into<AudioTrackFormatName>, format: FormatDescriptor) -> Self {
        Self {
            id: AudioTrackFormatId::default(),
            name: name.into(),
            format,
        }
    }

    pub fn with_id(mut self, id: AudioTrackFormatId) -> Self {
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
    AudioTrackFormat {
        required name: AudioTrackFormatName,
        required format: FormatDescriptor,
    }
}

/// Edges of an AudioTrackFormat
#[derive(Debug, Clone, Default)]
pub struct TrackFormatRefs {
    pub(crate) stream_format: Option<usize>,
}

impl Sealed for AudioTrackFormat {}

impl Element for AudioTrackFormat {
    type Id = AudioTrackFormatId;
    type Refs = TrackFormatRefs;

    const KIND: ElementKind = ElementKind::AudioTrackFormat;

    fn id(&self) -> AudioTrackFormatId {
        self.id
    }

    fn set_id(&mut self, id: AudioTrackFormatId) -> AdmResult<()> {
        self.id = id;
        Ok(())
    }

    element_store!(track_formats);
}

element_display!(AudioTrackFormat);
