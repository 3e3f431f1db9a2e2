//! Shortcuts for building common element chains

use crate::document::{Document, ElementHandle};
use crate::elements::block_formats::AudioBlockFormatObjects;
use crate::elements::{
    AudioChannelFormat, AudioObject, AudioPackFormat, AudioStreamFormat, AudioTrackFormat,
    AudioTrackUid,
};
use crate::{AdmResult, FormatDescriptor, TypeDescriptor};

/// Handles of a chain built by [`create_simple_object`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleObjectHolder {
    pub audio_object: ElementHandle<AudioObject>,
    pub audio_pack_format: ElementHandle<AudioPackFormat>,
    pub audio_channel_format: ElementHandle<AudioChannelFormat>,
    pub audio_stream_format: ElementHandle<AudioStreamFormat>,
    pub audio_track_format: ElementHandle<AudioTrackFormat>,
    pub audio_track_uid: ElementHandle<AudioTrackUid>,
}

/// Build a single-channel Objects chain named `name`.
///
/// ```text
/// AudioObject ──► AudioPackFormat ──► AudioChannelFormat (one block)
///      │                                   ▲
///      └──► AudioTrackUid ──► AudioTrackFormat ◄─► AudioStreamFormat
/// ```
///
/// The object is not referenced by any content.
pub fn create_simple_object(document: &mut Document, name: &str) -> AdmResult<SimpleObjectHolder> {
    let audio_object = document.add(AudioObject::new(name))?;
    let audio_pack_format = document.add(AudioPackFormat::new(name, TypeDescriptor::Objects))?;
    let audio_channel_format =
        document.add(AudioChannelFormat::new(name, TypeDescriptor::Objects))?;
    document
        .get_mut(audio_channel_format)?
        .add_block_format(AudioBlockFormatObjects::default())?;
    let audio_stream_format = document.add(AudioStreamFormat::new(name, FormatDescriptor::Pcm))?;
    let audio_track_format = document.add(AudioTrackFormat::new(name, FormatDescriptor::Pcm))?;
    let audio_track_uid = document.add(AudioTrackUid::new())?;

    document.add_reference(audio_object, audio_pack_format)?;
    document.add_reference(audio_object, audio_track_uid)?;
    document.add_reference(audio_pack_format, audio_channel_format)?;
    document.set_reference(audio_stream_format, audio_channel_format)?;
    document.set_reference(audio_track_format, audio_stream_format)?;
    document.set_reference(audio_track_uid, audio_track_format)?;
    document.set_reference(audio_track_uid, audio_pack_format)?;

    Ok(SimpleObjectHolder {
        audio_object,
        audio_pack_format,
        audio_channel_format,
        audio_stream_format,
        audio_track_format,
        audio_track_uid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;

    #[test]
    fn test_simple_object_is_wired() {
        let mut doc = Document::new();
        let holder = create_simple_object(&mut doc, "Voice").unwrap();

        assert_eq!(
            doc.references::<AudioPackFormat>(holder.audio_object).unwrap(),
            vec![holder.audio_pack_format]
        );
        assert_eq!(
            doc.reference::<AudioTrackFormat>(holder.audio_track_uid).unwrap(),
            Some(holder.audio_track_format)
        );
        // stream ↔ track kept in sync
        assert_eq!(
            doc.references::<AudioTrackFormat>(holder.audio_stream_format).unwrap(),
            vec![holder.audio_track_format]
        );

        let channel = doc.get(holder.audio_channel_format).unwrap();
        assert_eq!(channel.block_formats::<AudioBlockFormatObjects>().len(), 1);
        assert_eq!(channel.id().to_string(), "AC_00031001");
    }

    #[test]
    fn test_two_simple_objects_get_distinct_ids() {
        let mut doc = Document::new();
        let a = create_simple_object(&mut doc, "a").unwrap();
        let b = create_simple_object(&mut doc, "b").unwrap();

        assert_ne!(
            doc.get(a.audio_object).unwrap().id(),
            doc.get(b.audio_object).unwrap().id()
        );
        assert_eq!(
            doc.get(b.audio_track_uid).unwrap().id().to_string(),
            "ATU_00000002"
        );
    }
}
