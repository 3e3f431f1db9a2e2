//! AudioChannelFormat and its owned block formats

use log::debug;
use serde::{Deserialize, Serialize};

use super::block_formats::{BlockFormat, BlockFormats};
use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::named_type::named_string;
use crate::parameters::impl_parameters;
use crate::{
    AdmError, AdmResult, AudioBlockFormatId, AudioBlockFormatIdCounter, AudioChannelFormatId,
    AudioChannelFormatIdValue, TypeDescriptor,
};

named_string! {
    AudioChannelFormatName
}

/// Low / high pass cut-off frequencies in Hz
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frequency {
    pub low_pass: Option<f32>,
    pub high_pass: Option<f32>,
}

impl Frequency {
    pub fn low_pass(hz: f32) -> Self {
        Self {
            low_pass: Some(hz),
            high_pass: None,
        }
    }

    pub fn high_pass(hz: f32) -> Self {
        Self {
            low_pass: None,
            high_pass: Some(hz),
        }
    }
}

/// A single channel and its time-varying rendering metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioChannelFormat {
    id: AudioChannelFormatId,
    name: AudioChannelFormatName,
    type_descriptor: TypeDescriptor,
    frequency: Option<Frequency>,
    block_formats: BlockFormats,
}

impl AudioChannelFormat {
    /// New channel; the type is fixed and selects the block variant
    pub fn new(name: impl Into<AudioChannelFormatName>, type_descriptor: TypeDescriptor) -> Self {
        Self {
            id: AudioChannelFormatId::new(type_descriptor, AudioChannelFormatIdValue::default()),
            name: name.into(),
            type_descriptor,
            frequency: None,
            block_formats: BlockFormats::new(type_descriptor),
        }
    }

    pub fn with_id(mut self, id: AudioChannelFormatId) -> AdmResult<Self> {
        self.set_id(id)?;
        Ok(self)
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.get()
    }

    #[inline]
    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.type_descriptor
    }

    /// Append a block.
    ///
    /// Type and value of the block ID come from the channel. The counter
    /// starts at the block's own counter (1 when it has none) and is
    /// incremented until no sibling carries the same ID.
    pub fn add_block_format<B: BlockFormat>(&mut self, mut block: B) -> AdmResult<()> {
        if B::TYPE != self.type_descriptor {
            return Err(AdmError::TypeMismatch {
                expected: self.type_descriptor.to_string(),
                found: B::TYPE.to_string(),
            });
        }

        let requested = block.id().counter();
        let mut counter = if requested.get() == 0 {
            AudioBlockFormatIdCounter::new(1)?
        } else {
            requested
        };

        let channel = self.id;
        let siblings = B::blocks(&self.block_formats).map(Vec::as_slice).unwrap_or(&[]);
        let mut candidate = AudioBlockFormatId::for_channel(&channel, counter);
        while siblings.iter().any(|b| b.id() == candidate) {
            counter = counter.next()?;
            candidate = AudioBlockFormatId::for_channel(&channel, counter);
        }
        if requested.get() != 0 && counter != requested {
            debug!("{channel}: block counter {requested} in use, assigned {candidate}");
        }

        block.set_id(candidate);
        match B::blocks_mut(&mut self.block_formats) {
            Some(blocks) => {
                blocks.push(block);
                Ok(())
            }
            None => Err(AdmError::Invariant(format!(
                "{channel} holds no {} blocks",
                B::TYPE
            ))),
        }
    }

    /// Blocks of variant `B`; empty when `B` does not match the channel type
    pub fn block_formats<B: BlockFormat>(&self) -> &[B] {
        B::blocks(&self.block_formats).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable blocks of variant `B`.
    ///
    /// Block IDs are not re-checked afterwards; changing them through
    /// `BlockFormat::set_id` can produce duplicates.
    pub fn block_formats_mut<B: BlockFormat>(&mut self) -> &mut [B] {
        match B::blocks_mut(&mut self.block_formats) {
            Some(blocks) => blocks.as_mut_slice(),
            None => &mut [],
        }
    }

    /// All blocks, whatever their variant
    #[inline]
    pub fn blocks(&self) -> &BlockFormats {
        &self.block_formats
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut BlockFormats {
        &mut self.block_formats
    }

    pub fn remove_block_format(&mut self, index: usize) -> bool {
        self.block_formats.remove(index)
    }

    pub fn clear_block_formats(&mut self) {
        self.block_formats.clear();
    }
}

impl_parameters! {
    AudioChannelFormat {
        required name: AudioChannelFormatName,
        fixed type_descriptor: TypeDescriptor,
        optional frequency: Frequency,
    }
}

/// Channel formats have no outgoing top-level edges
#[derive(Debug, Clone, Default)]
pub struct ChannelFormatRefs;

impl Sealed for AudioChannelFormat {}

impl Element for AudioChannelFormat {
    type Id = AudioChannelFormatId;
    type Refs = ChannelFormatRefs;

    const KIND: ElementKind = ElementKind::AudioChannelFormat;

    fn id(&self) -> AudioChannelFormatId {
        self.id
    }

    /// Renumbers the owned blocks, keeping their counters
    fn set_id(&mut self, id: AudioChannelFormatId) -> AdmResult<()> {
        if id.type_descriptor() != self.type_descriptor {
            return Err(AdmError::TypeMismatch {
                expected: self.type_descriptor.to_string(),
                found: format!("{id}"),
            });
        }
        self.id = id;
        self.block_formats.rebase_ids(&id);
        Ok(())
    }

    element_store!(channel_formats);
}

element_display!(AudioChannelFormat);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Time;
    use crate::elements::block_formats::{AudioBlockFormatDirectSpeakers, AudioBlockFormatObjects};
    use crate::elements::common::Rtime;
    use crate::elements::{Position, SphericalPosition};
    use crate::ids::ElementId;
    use crate::parameters::Parameters;

    fn objects_channel() -> AudioChannelFormat {
        AudioChannelFormat::new("Object 1", TypeDescriptor::Objects)
            .with_id("AC_00031001".parse().unwrap())
            .unwrap()
    }

    fn block() -> AudioBlockFormatObjects {
        AudioBlockFormatObjects::new(Position::Spherical(SphericalPosition::default()))
    }

    #[test]
    fn test_block_counters() {
        let mut channel = objects_channel();
        for _ in 0..3 {
            channel.add_block_format(block()).unwrap();
        }
        let ids: Vec<String> = channel.blocks().ids().iter().map(|id| id.format()).collect();
        assert_eq!(
            ids,
            ["AB_00031001_00000001", "AB_00031001_00000002", "AB_00031001_00000003"]
        );

        // explicit counter colliding with an existing block is bumped
        let explicit = block().with_id("AB_00031001_00000002".parse().unwrap());
        channel.add_block_format(explicit).unwrap();
        assert_eq!(channel.blocks().ids()[3].format(), "AB_00031001_00000004");
    }

    #[test]
    fn test_explicit_counter_kept() {
        let mut channel = objects_channel();
        let explicit = block().with_id("AB_00031001_00000010".parse().unwrap());
        channel.add_block_format(explicit).unwrap();
        assert_eq!(channel.blocks().ids()[0].counter().get(), 0x10);
    }

    #[test]
    fn test_block_type_mismatch() {
        let mut channel = objects_channel();
        let result = channel.add_block_format(AudioBlockFormatDirectSpeakers::default());
        assert!(matches!(result, Err(AdmError::TypeMismatch { .. })));
        assert!(channel.blocks().is_empty());
        assert!(channel.block_formats::<AudioBlockFormatDirectSpeakers>().is_empty());
    }

    #[test]
    fn test_renumber_cascades_to_blocks() {
        let mut channel = objects_channel();
        channel.add_block_format(block()).unwrap();
        channel.add_block_format(block()).unwrap();

        channel.set_id("AC_00031002".parse().unwrap()).unwrap();
        let ids: Vec<String> = channel.blocks().ids().iter().map(|id| id.format()).collect();
        assert_eq!(ids, ["AB_00031002_00000001", "AB_00031002_00000002"]);

        assert!(matches!(
            channel.set_id("AC_00011002".parse().unwrap()),
            Err(AdmError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_block_access() {
        let mut channel = objects_channel();
        channel.add_block_format(block()).unwrap();
        channel.block_formats_mut::<AudioBlockFormatObjects>()[0]
            .set(Rtime::new(Time::from_millis(100)).unwrap())
            .unwrap();
        assert_eq!(
            channel.block_formats::<AudioBlockFormatObjects>()[0].get::<Rtime>().get(),
            Time::from_millis(100)
        );

        assert!(channel.remove_block_format(0));
        channel.add_block_format(block()).unwrap();
        channel.clear_block_formats();
        assert!(channel.blocks().is_empty());
    }
}
