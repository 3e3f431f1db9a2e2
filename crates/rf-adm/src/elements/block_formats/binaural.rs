//! Binaural block format

use serde::{Deserialize, Serialize};

use super::impl_block_format;
use crate::AudioBlockFormatId;
use crate::elements::common::{Duration, Gain, Importance, Rtime};
use crate::parameters::impl_parameters;

/// Block of a Binaural channel
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioBlockFormatBinaural {
    id: AudioBlockFormatId,
    rtime: Option<Rtime>,
    duration: Option<Duration>,
    gain: Option<Gain>,
    importance: Option<Importance>,
}

impl AudioBlockFormatBinaural {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: AudioBlockFormatId) -> Self {
        self.id = id;
        self
    }
}

impl_block_format!(AudioBlockFormatBinaural, Binaural);

impl_parameters! {
    AudioBlockFormatBinaural {
        defaulted rtime: Rtime = Rtime::default(),
        optional duration: Duration,
        defaulted gain: Gain = Gain::default(),
        defaulted importance: Importance = Importance::default(),
    }
}
