//! Audio block formats
//!
//! A channel format owns an ordered list of time-windowed blocks. All blocks
//! of one channel are of the variant matching the channel's type descriptor,
//! which [`BlockFormats`] enforces by construction.

mod binaural;
mod direct_speakers;
mod hoa;
mod matrix;
mod objects;

pub use binaural::*;
pub use direct_speakers::*;
pub use hoa::*;
pub use matrix::*;
pub use objects::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::{Duration, Rtime};
use super::sealed::Sealed;
use crate::parameters::{HasParameter, ParameterHost, SetParameter};
use crate::{AudioBlockFormatId, TypeDescriptor};

/// One block variant
pub trait BlockFormat:
    Clone
    + fmt::Debug
    + ParameterHost
    + HasParameter<Rtime>
    + HasParameter<Duration>
    + SetParameter<Duration>
    + Sealed
{
    /// Type descriptor of channels holding this variant
    const TYPE: TypeDescriptor;

    fn id(&self) -> AudioBlockFormatId;

    /// Set the ID; a channel re-derives type and value when the block is added
    fn set_id(&mut self, id: AudioBlockFormatId);

    #[doc(hidden)]
    fn blocks(formats: &BlockFormats) -> Option<&Vec<Self>>;

    #[doc(hidden)]
    fn blocks_mut(formats: &mut BlockFormats) -> Option<&mut Vec<Self>>;
}

macro_rules! impl_block_format {
    ($block:ty, $variant:ident) => {
        impl $crate::elements::sealed::Sealed for $block {}

        impl $crate::elements::block_formats::BlockFormat for $block {
            const TYPE: $crate::TypeDescriptor = $crate::TypeDescriptor::$variant;

            fn id(&self) -> $crate::AudioBlockFormatId {
                self.id
            }

            fn set_id(&mut self, id: $crate::AudioBlockFormatId) {
                self.id = id;
            }

            fn blocks(
                formats: &$crate::elements::block_formats::BlockFormats,
            ) -> Option<&Vec<Self>> {
                match formats {
                    $crate::elements::block_formats::BlockFormats::$variant(blocks) => Some(blocks),
                    _ => None,
                }
            }

            fn blocks_mut(
                formats: &mut $crate::elements::block_formats::BlockFormats,
            ) -> Option<&mut Vec<Self>> {
                match formats {
                    $crate::elements::block_formats::BlockFormats::$variant(blocks) => Some(blocks),
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $block {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "AudioBlockFormat {}", self.id)
            }
        }
    };
}

pub(crate) use impl_block_format;

/// Blocks of one channel format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockFormats {
    /// Channels of undefined type hold no blocks
    Undefined,
    DirectSpeakers(Vec<AudioBlockFormatDirectSpeakers>),
    Matrix(Vec<AudioBlockFormatMatrix>),
    Objects(Vec<AudioBlockFormatObjects>),
    Hoa(Vec<AudioBlockFormatHoa>),
    Binaural(Vec<AudioBlockFormatBinaural>),
}

/// Evaluate `$body` with `$blocks` bound to the variant's vector
macro_rules! with_blocks {
    ($formats:expr, $blocks:ident => $body:expr, undefined => $undefined:expr) => {
        match $formats {
            BlockFormats::Undefined => $undefined,
            BlockFormats::DirectSpeakers($blocks) => $body,
            BlockFormats::Matrix($blocks) => $body,
            BlockFormats::Objects($blocks) => $body,
            BlockFormats::Hoa($blocks) => $body,
            BlockFormats::Binaural($blocks) => $body,
        }
    };
}

/// Rtime of a block and whether rtime / duration were set explicitly
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BlockTiming {
    pub rtime: Rtime,
    pub explicit_rtime: bool,
    pub has_duration: bool,
}

fn timings_of<B: BlockFormat>(blocks: &[B]) -> Vec<BlockTiming> {
    blocks
        .iter()
        .map(|b| BlockTiming {
            rtime: HasParameter::<Rtime>::get_parameter(b).unwrap_or_default(),
            explicit_rtime: !HasParameter::<Rtime>::is_default_parameter(b),
            has_duration: HasParameter::<Duration>::has_parameter(b),
        })
        .collect()
}

fn apply_durations_to<B: BlockFormat>(blocks: &mut [B], durations: &[Duration]) -> crate::AdmResult<()> {
    for (block, duration) in blocks.iter_mut().zip(durations) {
        block.set_parameter(*duration)?;
    }
    Ok(())
}

impl BlockFormats {
    /// Empty list for a channel of the given type
    pub fn new(type_descriptor: TypeDescriptor) -> Self {
        match type_descriptor {
            TypeDescriptor::Undefined => Self::Undefined,
            TypeDescriptor::DirectSpeakers => Self::DirectSpeakers(Vec::new()),
            TypeDescriptor::Matrix => Self::Matrix(Vec::new()),
            TypeDescriptor::Objects => Self::Objects(Vec::new()),
            TypeDescriptor::Hoa => Self::Hoa(Vec::new()),
            TypeDescriptor::Binaural => Self::Binaural(Vec::new()),
        }
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            Self::Undefined => TypeDescriptor::Undefined,
            Self::DirectSpeakers(_) => TypeDescriptor::DirectSpeakers,
            Self::Matrix(_) => TypeDescriptor::Matrix,
            Self::Objects(_) => TypeDescriptor::Objects,
            Self::Hoa(_) => TypeDescriptor::Hoa,
            Self::Binaural(_) => TypeDescriptor::Binaural,
        }
    }

    pub fn len(&self) -> usize {
        with_blocks!(self, blocks => blocks.len(), undefined => 0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// IDs of all blocks in order
    pub fn ids(&self) -> Vec<AudioBlockFormatId> {
        with_blocks!(
            self,
            blocks => blocks.iter().map(BlockFormat::id).collect(),
            undefined => Vec::new()
        )
    }

    pub fn clear(&mut self) {
        with_blocks!(self, blocks => blocks.clear(), undefined => ())
    }

    /// Remove the block at `index`
    pub fn remove(&mut self, index: usize) -> bool {
        with_blocks!(
            self,
            blocks => {
                if index < blocks.len() {
                    blocks.remove(index);
                    true
                } else {
                    false
                }
            },
            undefined => false
        )
    }

    /// Rewrite type and value of every block ID, keeping counters
    pub(crate) fn rebase_ids(&mut self, channel: &crate::AudioChannelFormatId) {
        with_blocks!(
            self,
            blocks => {
                for block in blocks.iter_mut() {
                    let id = AudioBlockFormatId::for_channel(channel, block.id().counter());
                    block.set_id(id);
                }
            },
            undefined => ()
        )
    }

    pub(crate) fn timings(&self) -> Vec<BlockTiming> {
        with_blocks!(self, blocks => timings_of(blocks), undefined => Vec::new())
    }

    pub(crate) fn apply_durations(&mut self, durations: &[Duration]) -> crate::AdmResult<()> {
        with_blocks!(self, blocks => apply_durations_to(blocks, durations), undefined => Ok(()))
    }
}
