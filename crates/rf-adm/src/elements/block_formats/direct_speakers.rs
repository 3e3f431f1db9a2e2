//! DirectSpeakers block format

use serde::{Deserialize, Serialize};

use super::impl_block_format;
use crate::elements::common::{Duration, Gain, HeadLocked, Importance, Rtime};
use crate::elements::position::{
    Cartesian, CartesianSpeakerPosition, SpeakerPosition, SphericalSpeakerPosition,
    flag_after_position, read_cartesian_flag,
};
use crate::named_type::named_string;
use crate::parameters::{HasParameter, SetParameter, UnsetParameter, impl_parameters};
use crate::{AdmResult, AudioBlockFormatId};

named_string! {
    /// Loudspeaker label, e.g. `M+030` or `urn:itu:bs:2051:0:speaker:M+030`
    SpeakerLabel
}

/// Block of a DirectSpeakers channel: one loudspeaker feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBlockFormatDirectSpeakers {
    id: AudioBlockFormatId,
    rtime: Option<Rtime>,
    duration: Option<Duration>,
    speaker_position: SpeakerPosition,
    cartesian: Option<Cartesian>,
    speaker_labels: Vec<SpeakerLabel>,
    head_locked: Option<HeadLocked>,
    gain: Option<Gain>,
    importance: Option<Importance>,
}

impl AudioBlockFormatDirectSpeakers {
    pub fn new(position: impl Into<SpeakerPosition>) -> Self {
        Self {
            id: AudioBlockFormatId::default(),
            rtime: None,
            duration: None,
            speaker_position: position.into(),
            cartesian: None,
            speaker_labels: Vec::new(),
            head_locked: None,
            gain: None,
            importance: None,
        }
    }

    pub fn with_id(mut self, id: AudioBlockFormatId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn speaker_position(&self) -> &SpeakerPosition {
        &self.speaker_position
    }

    fn set_speaker_position(&mut self, position: SpeakerPosition) {
        self.cartesian = flag_after_position(self.cartesian, position.is_cartesian());
        self.speaker_position = position;
    }
}

impl Default for AudioBlockFormatDirectSpeakers {
    fn default() -> Self {
        Self::new(SpeakerPosition::default())
    }
}

impl_block_format!(AudioBlockFormatDirectSpeakers, DirectSpeakers);

impl_parameters! {
    AudioBlockFormatDirectSpeakers {
        defaulted rtime: Rtime = Rtime::default(),
        optional duration: Duration,
        vector speaker_labels: SpeakerLabel,
        defaulted head_locked: HeadLocked = HeadLocked::default(),
        defaulted gain: Gain = Gain::default(),
        defaulted importance: Importance = Importance::default(),
    }
}

impl HasParameter<SpeakerPosition> for AudioBlockFormatDirectSpeakers {
    fn get_parameter(&self) -> Option<SpeakerPosition> {
        Some(self.speaker_position.clone())
    }

    fn has_parameter(&self) -> bool {
        true
    }
}

impl SetParameter<SpeakerPosition> for AudioBlockFormatDirectSpeakers {
    fn set_parameter(&mut self, value: SpeakerPosition) -> AdmResult<()> {
        self.set_speaker_position(value);
        Ok(())
    }
}

impl HasParameter<SphericalSpeakerPosition> for AudioBlockFormatDirectSpeakers {
    fn get_parameter(&self) -> Option<SphericalSpeakerPosition> {
        match &self.speaker_position {
            SpeakerPosition::Spherical(p) => Some(p.clone()),
            SpeakerPosition::Cartesian(_) => None,
        }
    }
}

impl SetParameter<SphericalSpeakerPosition> for AudioBlockFormatDirectSpeakers {
    fn set_parameter(&mut self, value: SphericalSpeakerPosition) -> AdmResult<()> {
        self.set_speaker_position(SpeakerPosition::Spherical(value));
        Ok(())
    }
}

impl HasParameter<CartesianSpeakerPosition> for AudioBlockFormatDirectSpeakers {
    fn get_parameter(&self) -> Option<CartesianSpeakerPosition> {
        match &self.speaker_position {
            SpeakerPosition::Cartesian(p) => Some(p.clone()),
            SpeakerPosition::Spherical(_) => None,
        }
    }
}

impl SetParameter<CartesianSpeakerPosition> for AudioBlockFormatDirectSpeakers {
    fn set_parameter(&mut self, value: CartesianSpeakerPosition) -> AdmResult<()> {
        self.set_speaker_position(SpeakerPosition::Cartesian(value));
        Ok(())
    }
}

impl HasParameter<Cartesian> for AudioBlockFormatDirectSpeakers {
    fn get_parameter(&self) -> Option<Cartesian> {
        Some(read_cartesian_flag(
            self.cartesian,
            self.speaker_position.is_cartesian(),
        ))
    }

    fn has_parameter(&self) -> bool {
        true
    }

    fn is_default_parameter(&self) -> bool {
        self.cartesian.is_none()
    }
}

impl SetParameter<Cartesian> for AudioBlockFormatDirectSpeakers {
    fn set_parameter(&mut self, value: Cartesian) -> AdmResult<()> {
        if value.get() != self.speaker_position.is_cartesian() {
            self.speaker_position = if value.get() {
                SpeakerPosition::Cartesian(CartesianSpeakerPosition::default())
            } else {
                SpeakerPosition::Spherical(SphericalSpeakerPosition::default())
            };
        }
        self.cartesian = Some(value);
        Ok(())
    }
}

impl UnsetParameter<Cartesian> for AudioBlockFormatDirectSpeakers {
    fn unset_parameter(&mut self) {
        self.cartesian = None;
    }
}
