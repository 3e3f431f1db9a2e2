//! AudioProgramme

use serde::{Deserialize, Serialize};

use super::common::{End, Label, Language, LoudnessMetadata, Start};
use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::named_type::{named_string, named_value};
use crate::parameters::impl_parameters;
use crate::{AdmResult, AudioProgrammeId};

named_string! {
    AudioProgrammeName
}

named_value! {
    /// Maximum ducking applied to the programme's objects, in dB
    #[derive(Copy)]
    MaxDuckingDepth(f32), range -62.0 ..= 0.0
}

/// Centre and width of the reference screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScreenGeometry {
    Polar {
        centre_azimuth: f32,
        centre_elevation: f32,
        centre_distance: f32,
        width_azimuth: f32,
    },
    Cartesian {
        centre_x: f32,
        centre_y: f32,
        centre_z: f32,
        width_x: f32,
    },
}

/// Screen the programme was produced for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceScreen {
    pub aspect_ratio: f32,
    pub geometry: ScreenGeometry,
}

impl Default for ReferenceScreen {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.78,
            geometry: ScreenGeometry::Polar {
                centre_azimuth: 0.0,
                centre_elevation: 0.0,
                centre_distance: 1.0,
                width_azimuth: 58.0,
            },
        }
    }
}

/// A complete programme: a set of contents played together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioProgramme {
    id: AudioProgrammeId,
    name: AudioProgrammeName,
    language: Option<Language>,
    start: Option<Start>,
    end: Option<End>,
    loudness_metadata: Vec<LoudnessMetadata>,
    max_ducking_depth: Option<MaxDuckingDepth>,
    reference_screen: Option<ReferenceScreen>,
    labels: Vec<Label>,
}

impl AudioProgramme {
    pub fn new(name: impl Into<AudioProgrammeName>) -> Self {
        Self {
            id: AudioProgrammeId::default(),
            name: name.into(),
            language: None,
            start: None,
            end: None,
            loudness_metadata: Vec::new(),
            max_ducking_depth: None,
            reference_screen: None,
            labels: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: AudioProgrammeId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.get()
    }
}

impl_parameters! {
    AudioProgramme {
        required name: AudioProgrammeName,
        optional language: Language,
        defaulted start: Start = Start::default(),
        optional end: End,
        vector loudness_metadata: LoudnessMetadata,
        optional max_ducking_depth: MaxDuckingDepth,
        optional reference_screen: ReferenceScreen,
        vector labels: Label,
    }
}

/// Edges of an AudioProgramme
#[derive(Debug, Clone, Default)]
pub struct ProgrammeRefs {
    pub(crate) contents: Vec<usize>,
}

impl Sealed for AudioProgramme {}

impl Element for AudioProgramme {
    type Id = AudioProgrammeId;
    type Refs = ProgrammeRefs;

    const KIND: ElementKind = ElementKind::AudioProgramme;

    fn id(&self) -> AudioProgrammeId {
        self.id
    }

    fn set_id(&mut self, id: AudioProgrammeId) -> AdmResult<()> {
        self.id = id;
        Ok(())
    }

    element_store!(programmes);
}

element_display!(AudioProgramme);
