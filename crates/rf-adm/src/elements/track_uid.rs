//! AudioTrackUid
//!
//! A track UID whose ID was explicitly set to `ATU_00000000` is the silent
//! track: it never carries a sample rate, a bit depth or a reference.

use serde::{Deserialize, Serialize};

use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::ids::ElementId;
use crate::named_type::named_value;
use crate::parameters::{HasParameter, ParameterHost, SetParameter, UnsetParameter};
use crate::{AdmError, AdmResult, AudioTrackUidId};

named_value! {
    /// Sample rate in Hz
    #[derive(Copy, Eq, Hash)]
    SampleRate(u32), min 1
}

named_value! {
    /// Bits per sample
    #[derive(Copy, Eq, Hash)]
    BitDepth(u32), range 1 ..= 64
}

/// An actual track in the file, tied to its format
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioTrackUid {
    id: AudioTrackUidId,
    silent: bool,
    sample_rate: Option<SampleRate>,
    bit_depth: Option<BitDepth>,
}

impl AudioTrackUid {
    pub fn new() -> Self {
        Self::default()
    }

    /// The silent track `ATU_00000000`
    pub fn silent() -> Self {
        Self {
            id: AudioTrackUidId::SILENT,
            silent: true,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: AudioTrackUidId) -> AdmResult<Self> {
        self.set_id(id)?;
        Ok(self)
    }

    /// True once the ID was explicitly set to 0
    #[inline]
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    fn check_not_silent(&self, what: &str) -> AdmResult<()> {
        if self.silent {
            return Err(AdmError::SilentTrackUid(format!("cannot set {what}")));
        }
        Ok(())
    }
}

impl ParameterHost for AudioTrackUid {}

macro_rules! silent_checked_parameter {
    ($param:ty, $field:ident) => {
        impl HasParameter<$param> for AudioTrackUid {
            fn get_parameter(&self) -> Option<$param> {
                self.$field
            }
        }

        impl SetParameter<$param> for AudioTrackUid {
            fn set_parameter(&mut self, value: $param) -> AdmResult<()> {
                self.check_not_silent(stringify!($param))?;
                self.$field = Some(value);
                Ok(())
            }
        }

        impl UnsetParameter<$param> for AudioTrackUid {
            fn unset_parameter(&mut self) {
                self.$field = None;
            }
        }
    };
}

silent_checked_parameter!(SampleRate, sample_rate);
silent_checked_parameter!(BitDepth, bit_depth);

/// Edges of an AudioTrackUid
///
/// `track_format` and `channel_format` are mutually exclusive.
#[derive(Debug, Clone, Default)]
pub struct TrackUidRefs {
    pub(crate) track_format: Option<usize>,
    pub(crate) channel_format: Option<usize>,
    pub(crate) pack_format: Option<usize>,
}

impl TrackUidRefs {
    fn is_empty(&self) -> bool {
        self.track_format.is_none() && self.channel_format.is_none() && self.pack_format.is_none()
    }
}

impl Sealed for AudioTrackUid {}

impl Element for AudioTrackUid {
    type Id = AudioTrackUidId;
    type Refs = TrackUidRefs;

    const KIND: ElementKind = ElementKind::AudioTrackUid;

    fn id(&self) -> AudioTrackUidId {
        self.id
    }

    /// Setting `ATU_00000000` makes the track silent; fails while a
    /// sample rate or bit depth is set
    fn set_id(&mut self, id: AudioTrackUidId) -> AdmResult<()> {
        if id == AudioTrackUidId::SILENT {
            if self.sample_rate.is_some() || self.bit_depth.is_some() {
                return Err(AdmError::SilentTrackUid(
                    "cannot set ID to 0 while sampleRate or bitDepth is set".into(),
                ));
            }
            self.silent = true;
        } else {
            self.silent = false;
        }
        self.id = id;
        Ok(())
    }

    fn needs_id(&self) -> bool {
        self.id.is_unset() && !self.silent
    }

    fn check_id_change(&self, refs: &TrackUidRefs, id: &AudioTrackUidId) -> AdmResult<()> {
        if *id == AudioTrackUidId::SILENT && !refs.is_empty() {
            return Err(AdmError::SilentTrackUid(
                "cannot set ID to 0 while references are set".into(),
            ));
        }
        Ok(())
    }

    element_store!(track_uids);
}

element_display!(AudioTrackUid);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;

    #[test]
    fn test_silent_forbids_parameters() {
        let mut uid = AudioTrackUid::new();
        uid.set_id(AudioTrackUidId::SILENT).unwrap();
        assert!(uid.is_silent());
        assert!(matches!(
            uid.set(SampleRate::new(48000).unwrap()),
            Err(AdmError::SilentTrackUid(_))
        ));
        assert!(!uid.has::<SampleRate>());
    }

    #[test]
    fn test_silent_id_rejected_with_parameters() {
        let mut uid = AudioTrackUid::new();
        uid.set(BitDepth::new(24).unwrap()).unwrap();
        assert!(matches!(
            uid.set_id(AudioTrackUidId::SILENT),
            Err(AdmError::SilentTrackUid(_))
        ));
        assert!(!uid.is_silent());

        uid.unset::<BitDepth>();
        uid.set_id(AudioTrackUidId::SILENT).unwrap();
        assert!(uid.is_silent());
    }

    #[test]
    fn test_leaving_silence() {
        let mut uid = AudioTrackUid::silent();
        uid.set_id(AudioTrackUidId::from_value(1).unwrap()).unwrap();
        assert!(!uid.is_silent());
        uid.set(SampleRate::new(48000).unwrap()).unwrap();
        assert_eq!(uid.get::<SampleRate>().get(), 48000);
    }

    #[test]
    fn test_unset_id_is_not_silent() {
        let uid = AudioTrackUid::new();
        assert!(!uid.is_silent());
        assert!(uid.needs_id());
        assert!(!AudioTrackUid::silent().needs_id());
    }

    #[test]
    fn test_check_id_change_with_refs() {
        let uid = AudioTrackUid::new();
        let refs = TrackUidRefs {
            pack_format: Some(0),
            ..TrackUidRefs::default()
        };
        assert!(uid.check_id_change(&refs, &AudioTrackUidId::SILENT).is_err());
        assert!(uid
            .check_id_change(&TrackUidRefs::default(), &AudioTrackUidId::SILENT)
            .is_ok());
    }
}
