//! Matrix block format

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::impl_block_format;
use crate::elements::common::{Duration, Gain, Importance, Rtime};
use crate::parameters::impl_parameters;
use crate::{AudioBlockFormatId, AudioChannelFormatId};

/// One input of a matrix output channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixCoefficient {
    /// Input channel format, by ID
    pub input: AudioChannelFormatId,
    pub gain: Option<f64>,
    pub gain_var: Option<String>,
    /// Phase in degrees
    pub phase: Option<f64>,
    pub phase_var: Option<String>,
    /// Delay in milliseconds
    pub delay: Option<f64>,
    pub delay_var: Option<String>,
}

impl MatrixCoefficient {
    pub fn new(input: AudioChannelFormatId) -> Self {
        Self {
            input,
            gain: None,
            gain_var: None,
            phase: None,
            phase_var: None,
            delay: None,
            delay_var: None,
        }
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = Some(gain);
        self
    }
}

/// Block of a Matrix channel: a weighted sum of input channels
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioBlockFormatMatrix {
    id: AudioBlockFormatId,
    rtime: Option<Rtime>,
    duration: Option<Duration>,
    output_channel_format: Option<AudioChannelFormatId>,
    coefficients: Vec<MatrixCoefficient>,
    gain: Option<Gain>,
    importance: Option<Importance>,
}

impl AudioBlockFormatMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: AudioBlockFormatId) -> Self {
        self.id = id;
        self
    }

    /// Follow renumbered channel formats
    pub(crate) fn remap_channel_ids(
        &mut self,
        renamed: &HashMap<AudioChannelFormatId, AudioChannelFormatId>,
    ) {
        if let Some(output) = self.output_channel_format.as_mut()
            && let Some(new) = renamed.get(output)
        {
            *output = *new;
        }
        for coefficient in &mut self.coefficients {
            if let Some(new) = renamed.get(&coefficient.input) {
                coefficient.input = *new;
            }
        }
    }
}

impl_block_format!(AudioBlockFormatMatrix, Matrix);

impl_parameters! {
    AudioBlockFormatMatrix {
        defaulted rtime: Rtime = Rtime::default(),
        optional duration: Duration,
        optional output_channel_format: AudioChannelFormatId,
        vector coefficients: MatrixCoefficient,
        defaulted gain: Gain = Gain::default(),
        defaulted importance: Importance = Importance::default(),
    }
}
