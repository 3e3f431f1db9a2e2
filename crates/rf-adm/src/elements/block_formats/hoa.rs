//! HOA block format

use serde::{Deserialize, Serialize};

use super::impl_block_format;
use crate::AudioBlockFormatId;
use crate::elements::common::{Duration, Gain, HeadLocked, Importance, Rtime, ScreenRef};
use crate::named_type::{named_string, named_value};
use crate::parameters::impl_parameters;

named_value! {
    /// Ambisonic order
    #[derive(Copy, Eq, Ord, Hash)]
    Order(u32)
}

named_value! {
    /// Ambisonic degree, `-order ..= order`
    #[derive(Copy, Eq, Ord, Hash)]
    Degree(i32)
}

named_string! {
    /// Component normalization
    Normalization, one_of ["SN3D", "N3D", "FuMa"]
}

impl Default for Normalization {
    fn default() -> Self {
        Self(String::from("SN3D"))
    }
}

named_value! {
    /// Near-field compensation reference distance in metres, 0 disables it
    #[derive(Copy, Default)]
    NfcRefDist(f32), min 0.0
}

named_string! {
    /// Component equation, informative
    Equation
}

/// Block of an HOA channel: one ambisonic component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioBlockFormatHoa {
    id: AudioBlockFormatId,
    rtime: Option<Rtime>,
    duration: Option<Duration>,
    order: Option<Order>,
    degree: Option<Degree>,
    normalization: Option<Normalization>,
    nfc_ref_dist: Option<NfcRefDist>,
    screen_ref: Option<ScreenRef>,
    equation: Option<Equation>,
    gain: Option<Gain>,
    importance: Option<Importance>,
    head_locked: Option<HeadLocked>,
}

impl AudioBlockFormatHoa {
    pub fn new(order: Order, degree: Degree) -> Self {
        Self {
            order: Some(order),
            degree: Some(degree),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: AudioBlockFormatId) -> Self {
        self.id = id;
        self
    }
}

impl_block_format!(AudioBlockFormatHoa, Hoa);

impl_parameters! {
    AudioBlockFormatHoa {
        defaulted rtime: Rtime = Rtime::default(),
        optional duration: Duration,
        optional order: Order,
        optional degree: Degree,
        defaulted normalization: Normalization = Normalization::default(),
        defaulted nfc_ref_dist: NfcRefDist = NfcRefDist::default(),
        defaulted screen_ref: ScreenRef = ScreenRef::default(),
        optional equation: Equation,
        defaulted gain: Gain = Gain::default(),
        defaulted importance: Importance = Importance::default(),
        defaulted head_locked: HeadLocked = HeadLocked::default(),
    }
}
