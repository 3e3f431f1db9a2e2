//! AudioObject

use serde::{Deserialize, Serialize};

use super::common::{DialogueId, Duration, Gain, HeadLocked, Importance, Label, Start};
use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::named_type::{named_string, named_value};
use crate::parameters::impl_parameters;
use crate::{AdmResult, AudioObjectId};

named_string! {
    AudioObjectName
}

named_value! {
    /// The user may interact with the object
    #[derive(Copy, Eq, Hash)]
    Interact(bool)
}

named_value! {
    /// Ducking must not be applied to the object
    #[derive(Copy, Eq, Hash)]
    DisableDucking(bool)
}

named_value! {
    /// The object is muted
    #[derive(Copy, Eq, Hash, Default)]
    Mute(bool)
}

/// Coordinate an interaction range applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionCoordinate {
    Azimuth,
    Elevation,
    Distance,
    X,
    Y,
    Z,
}

/// Allowed range of a position interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionInteractionRange {
    pub coordinate: InteractionCoordinate,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

/// Allowed range of a gain interaction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GainInteractionRange {
    pub min: Option<Gain>,
    pub max: Option<Gain>,
}

/// `audioObjectInteraction`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioObjectInteraction {
    pub on_off_interact: bool,
    pub gain_interact: Option<bool>,
    pub position_interact: Option<bool>,
    pub gain_range: Option<GainInteractionRange>,
    pub position_ranges: Vec<PositionInteractionRange>,
}

/// An audio object: what is played, where and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioObject {
    id: AudioObjectId,
    name: AudioObjectName,
    start: Option<Start>,
    duration: Option<Duration>,
    dialogue_id: Option<DialogueId>,
    importance: Option<Importance>,
    interact: Option<Interact>,
    disable_ducking: Option<DisableDucking>,
    interaction: Option<AudioObjectInteraction>,
    gain: Option<Gain>,
    head_locked: Option<HeadLocked>,
    mute: Option<Mute>,
    labels: Vec<Label>,
}

impl AudioObject {
    pub fn new(name: impl Into<AudioObjectName>) -> Self {
        Self {
            id: AudioObjectId::default(),
            name: name.into(),
            start: None,
            duration: None,
            dialogue_id: None,
            importance: None,
            interact: None,
            disable_ducking: None,
            interaction: None,
            gain: None,
            head_locked: None,
            mute: None,
            labels: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: AudioObjectId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.get()
    }
}

impl_parameters! {
    AudioObject {
        required name: AudioObjectName,
        defaulted start: Start = Start::default(),
        optional duration: Duration,
        optional dialogue_id: DialogueId,
        optional importance: Importance,
        optional interact: Interact,
        optional disable_ducking: DisableDucking,
        optional interaction: AudioObjectInteraction,
        defaulted gain: Gain = Gain::default(),
        defaulted head_locked: HeadLocked = HeadLocked::default(),
        defaulted mute: Mute = Mute::default(),
        vector labels: Label,
    }
}

/// Edges of an AudioObject
#[derive(Debug, Clone, Default)]
pub struct ObjectRefs {
    pub(crate) objects: Vec<usize>,
    pub(crate) pack_formats: Vec<usize>,
    pub(crate) track_uids: Vec<usize>,
    pub(crate) complementary: Vec<usize>,
}

impl Sealed for AudioObject {}

impl Element for AudioObject {
    type Id = AudioObjectId;
    type Refs = ObjectRefs;

    const KIND: ElementKind = ElementKind::AudioObject;

    fn id(&self) -> AudioObjectId {
        self.id
    }

    fn set_id(&mut self, id: AudioObjectId) -> AdmResult<()> {
        self.id = id;
        Ok(())
    }

    element_store!(objects);
}

element_display!(AudioObject);
