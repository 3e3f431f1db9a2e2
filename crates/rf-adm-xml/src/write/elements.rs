//! Top-level element writers

use rf_adm::{
    AbsoluteDistance, AudioChannelFormat, AudioContent, AudioObject, AudioObjectInteraction,
    AudioPackFormat, AudioProgramme, AudioStreamFormat, AudioTrackFormat, AudioTrackUid, BitDepth,
    ContentKind, DialogueId, DisableDucking, Document, Duration, Element, ElementHandle, End,
    Frequency, Gain, HasParameter, HeadLocked, Importance, Interact, InteractionCoordinate, Label,
    Language, ListReference, LoudnessMetadata, MaxDuckingDepth, Mute, ReferenceScreen, SampleRate,
    ScreenGeometry, SingleReference, Start, format_format_definition, format_format_label,
    format_timecode, format_type_definition, format_type_label,
};

use super::blocks::blocks;
use super::value;
use crate::node::XmlNode;
use crate::values::format_bool;
use crate::WriterOptions;

// ═══════════════════════════════════════════════════════════════════════════════
// REFERENCES
// ═══════════════════════════════════════════════════════════════════════════════

/// One `name` element per listed reference, holding the target ID
fn id_refs<F, T>(document: &Document, from: ElementHandle<F>, name: &'static str) -> Vec<XmlNode>
where
    F: ListReference<T>,
    T: Element,
{
    document
        .references::<T>(from)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|handle| document.get(handle).ok())
        .map(|target| XmlNode::new(name).text(target.id()))
        .collect()
}

fn id_ref<F, T>(document: &Document, from: ElementHandle<F>, name: &'static str) -> Option<XmlNode>
where
    F: SingleReference<T>,
    T: Element,
{
    let handle = document.reference::<T>(from).ok().flatten()?;
    let target = document.get(handle).ok()?;
    Some(XmlNode::new(name).text(target.id()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRAMME / CONTENT / OBJECT
// ═══════════════════════════════════════════════════════════════════════════════

pub(super) fn programme(
    document: &Document,
    handle: ElementHandle<AudioProgramme>,
    programme: &AudioProgramme,
    options: &WriterOptions,
) -> XmlNode {
    XmlNode::new("audioProgramme")
        .attr("audioProgrammeID", programme.id())
        .attr("audioProgrammeName", programme.name())
        .opt_attr(
            "audioProgrammeLanguage",
            value::<Language, _>(programme, options).map(|l| l.get().to_string()),
        )
        .opt_attr(
            "start",
            value::<Start, _>(programme, options).map(|s| format_timecode(&s.get())),
        )
        .opt_attr(
            "end",
            value::<End, _>(programme, options).map(|e| format_timecode(&e.get())),
        )
        .opt_attr(
            "maxDuckingDepth",
            value::<MaxDuckingDepth, _>(programme, options),
        )
        .children(id_refs::<_, AudioContent>(document, handle, "audioContentIDRef"))
        .children(
            value::<Vec<LoudnessMetadata>, _>(programme, options)
                .unwrap_or_default()
                .iter()
                .map(loudness),
        )
        .opt_child(value::<ReferenceScreen, _>(programme, options).map(|s| reference_screen(&s)))
        .children(labels(programme, options, "audioProgrammeLabel"))
}

pub(super) fn content(
    document: &Document,
    handle: ElementHandle<AudioContent>,
    content: &AudioContent,
    options: &WriterOptions,
) -> XmlNode {
    XmlNode::new("audioContent")
        .attr("audioContentID", content.id())
        .attr("audioContentName", content.name())
        .opt_attr(
            "audioContentLanguage",
            value::<Language, _>(content, options).map(|l| l.get().to_string()),
        )
        .children(id_refs::<_, AudioObject>(document, handle, "audioObjectIDRef"))
        .children(
            value::<Vec<LoudnessMetadata>, _>(content, options)
                .unwrap_or_default()
                .iter()
                .map(loudness),
        )
        .opt_child(value::<ContentKind, _>(content, options).map(content_kind))
        .children(labels(content, options, "audioContentLabel"))
}

/// Inverse of the `dialogue` reader: the text is the dialogue ID
fn content_kind(kind: ContentKind) -> XmlNode {
    let dialogue_id = kind.dialogue_id();
    let attribute = if dialogue_id == DialogueId::NON_DIALOGUE {
        "nonDialogueContentKind"
    } else if dialogue_id == DialogueId::DIALOGUE {
        "dialogueContentKind"
    } else {
        "mixedContentKind"
    };
    XmlNode::new("dialogue")
        .attr(attribute, kind.value())
        .text(dialogue_id.get())
}

pub(super) fn object(
    document: &Document,
    handle: ElementHandle<AudioObject>,
    object: &AudioObject,
    options: &WriterOptions,
) -> XmlNode {
    let complementary = document
        .complementary_objects(handle)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|h| document.get(h).ok())
        .map(|o| XmlNode::new("audioComplementaryObjectIDRef").text(o.id()));

    XmlNode::new("audioObject")
        .attr("audioObjectID", object.id())
        .attr("audioObjectName", object.name())
        .opt_attr(
            "start",
            value::<Start, _>(object, options).map(|s| format_timecode(&s.get())),
        )
        .opt_attr(
            "duration",
            value::<Duration, _>(object, options).map(|d| format_timecode(&d.get())),
        )
        .opt_attr("dialogue", value::<DialogueId, _>(object, options))
        .opt_attr("importance", value::<Importance, _>(object, options))
        .opt_attr(
            "interact",
            value::<Interact, _>(object, options).map(|i| format_bool(i.get())),
        )
        .opt_attr(
            "disableDucking",
            value::<DisableDucking, _>(object, options).map(|d| format_bool(d.get())),
        )
        .children(id_refs::<_, AudioPackFormat>(document, handle, "audioPackFormatIDRef"))
        .children(id_refs::<_, AudioObject>(document, handle, "audioObjectIDRef"))
        .children(complementary)
        .children(id_refs::<_, AudioTrackUid>(document, handle, "audioTrackUIDRef"))
        .opt_child(value::<Gain, _>(object, options).map(|g| gain("gain", g)))
        .opt_child(
            value::<HeadLocked, _>(object, options)
                .map(|h| XmlNode::new("headLocked").text(format_bool(h.get()))),
        )
        .opt_child(
            value::<Mute, _>(object, options)
                .map(|m| XmlNode::new("mute").text(format_bool(m.get()))),
        )
        .children(labels(object, options, "audioObjectLabel"))
        .opt_child(value::<AudioObjectInteraction, _>(object, options).map(|i| interaction(&i)))
}

fn interaction(interaction: &AudioObjectInteraction) -> XmlNode {
    let mut node = XmlNode::new("audioObjectInteraction")
        .attr("onOffInteract", format_bool(interaction.on_off_interact))
        .opt_attr("gainInteract", interaction.gain_interact.map(format_bool))
        .opt_attr("positionInteract", interaction.position_interact.map(format_bool));

    if let Some(range) = &interaction.gain_range {
        for (bound, value) in [("min", range.min), ("max", range.max)] {
            if let Some(value) = value {
                node.push(gain("gainInteractionRange", value).attr("bound", bound));
            }
        }
    }
    for range in &interaction.position_ranges {
        for (bound, value) in [("min", range.min), ("max", range.max)] {
            if let Some(value) = value {
                node.push(
                    XmlNode::new("positionInteractionRange")
                        .attr("coordinate", coordinate_name(range.coordinate))
                        .attr("bound", bound)
                        .text(value),
                );
            }
        }
    }
    node
}

fn coordinate_name(coordinate: InteractionCoordinate) -> &'static str {
    match coordinate {
        InteractionCoordinate::Azimuth => "azimuth",
        InteractionCoordinate::Elevation => "elevation",
        InteractionCoordinate::Distance => "distance",
        InteractionCoordinate::X => "X",
        InteractionCoordinate::Y => "Y",
        InteractionCoordinate::Z => "Z",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATS
// ═══════════════════════════════════════════════════════════════════════════════

pub(super) fn pack_format(
    document: &Document,
    handle: ElementHandle<AudioPackFormat>,
    pack: &AudioPackFormat,
    options: &WriterOptions,
) -> XmlNode {
    let descriptor = pack.type_descriptor();
    XmlNode::new("audioPackFormat")
        .attr("audioPackFormatID", pack.id())
        .attr("audioPackFormatName", pack.name())
        .attr("typeLabel", format_type_label(descriptor))
        .attr("typeDefinition", format_type_definition(descriptor))
        .opt_attr("importance", value::<Importance, _>(pack, options))
        .children(id_refs::<_, AudioChannelFormat>(document, handle, "audioChannelFormatIDRef"))
        .children(id_refs::<_, AudioPackFormat>(document, handle, "audioPackFormatIDRef"))
        .opt_child(
            value::<AbsoluteDistance, _>(pack, options)
                .map(|d| XmlNode::new("absoluteDistance").text(d)),
        )
}

pub(super) fn channel_format(channel: &AudioChannelFormat, options: &WriterOptions) -> XmlNode {
    let descriptor = channel.type_descriptor();
    let mut node = XmlNode::new("audioChannelFormat")
        .attr("audioChannelFormatID", channel.id())
        .attr("audioChannelFormatName", channel.name())
        .attr("typeLabel", format_type_label(descriptor))
        .attr("typeDefinition", format_type_definition(descriptor));

    if let Some(frequency) = value::<Frequency, _>(channel, options) {
        for (definition, hz) in [("lowPass", frequency.low_pass), ("highPass", frequency.high_pass)] {
            if let Some(hz) = hz {
                node.push(
                    XmlNode::new("frequency")
                        .attr("typeDefinition", definition)
                        .text(hz),
                );
            }
        }
    }
    node.children(blocks(channel.blocks(), options))
}

pub(super) fn stream_format(
    document: &Document,
    handle: ElementHandle<AudioStreamFormat>,
    stream: &AudioStreamFormat,
) -> XmlNode {
    let format = stream.format();
    XmlNode::new("audioStreamFormat")
        .attr("audioStreamFormatID", stream.id())
        .attr("audioStreamFormatName", stream.name())
        .attr("formatLabel", format_format_label(format))
        .attr("formatDefinition", format_format_definition(format))
        .opt_child(id_ref::<_, AudioChannelFormat>(document, handle, "audioChannelFormatIDRef"))
        .opt_child(id_ref::<_, AudioPackFormat>(document, handle, "audioPackFormatIDRef"))
        .children(id_refs::<_, AudioTrackFormat>(document, handle, "audioTrackFormatIDRef"))
}

pub(super) fn track_format(
    document: &Document,
    handle: ElementHandle<AudioTrackFormat>,
    track: &AudioTrackFormat,
) -> XmlNode {
    let format = track.format();
    XmlNode::new("audioTrackFormat")
        .attr("audioTrackFormatID", track.id())
        .attr("audioTrackFormatName", track.name())
        .attr("formatLabel", format_format_label(format))
        .attr("formatDefinition", format_format_definition(format))
        .opt_child(id_ref::<_, AudioStreamFormat>(document, handle, "audioStreamFormatIDRef"))
}

pub(super) fn track_uid(
    document: &Document,
    handle: ElementHandle<AudioTrackUid>,
    uid: &AudioTrackUid,
) -> XmlNode {
    XmlNode::new("audioTrackUID")
        .attr("UID", uid.id())
        .opt_attr("sampleRate", HasParameter::<SampleRate>::get_parameter(uid))
        .opt_attr("bitDepth", HasParameter::<BitDepth>::get_parameter(uid))
        .opt_child(id_ref::<_, AudioTrackFormat>(document, handle, "audioTrackFormatIDRef"))
        .opt_child(id_ref::<_, AudioChannelFormat>(document, handle, "audioChannelFormatIDRef"))
        .opt_child(id_ref::<_, AudioPackFormat>(document, handle, "audioPackFormatIDRef"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED SUB-ELEMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// `<gain gainUnit="dB">-6</gain>`; linear gains carry no unit
pub(super) fn gain(name: &'static str, gain: Gain) -> XmlNode {
    match gain {
        Gain::Linear(value) => XmlNode::new(name).text(value),
        Gain::Db(value) => XmlNode::new(name).attr("gainUnit", "dB").text(value),
    }
}

fn labels<H: HasParameter<Vec<Label>>>(
    host: &H,
    options: &WriterOptions,
    name: &'static str,
) -> Vec<XmlNode> {
    value::<Vec<Label>, _>(host, options)
        .unwrap_or_default()
        .into_iter()
        .map(|label| {
            XmlNode::new(name)
                .opt_attr("language", label.language.map(|l| l.get().to_string()))
                .text(label.value)
        })
        .collect()
}

fn loudness(loudness: &LoudnessMetadata) -> XmlNode {
    let values = [
        ("integratedLoudness", loudness.integrated_loudness),
        ("loudnessRange", loudness.loudness_range),
        ("maxTruePeak", loudness.max_true_peak),
        ("maxMomentary", loudness.max_momentary),
        ("maxShortTerm", loudness.max_short_term),
        ("dialogueLoudness", loudness.dialogue_loudness),
    ];
    XmlNode::new("loudnessMetadata")
        .opt_attr("loudnessMethod", loudness.method.as_ref().map(|m| m.get().to_string()))
        .opt_attr("loudnessRecType", loudness.rec_type.as_ref().map(|r| r.get().to_string()))
        .opt_attr(
            "loudnessCorrectionType",
            loudness.correction_type.as_ref().map(|c| c.get().to_string()),
        )
        .children(
            values
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| XmlNode::new(name).text(v))),
        )
}

fn reference_screen(screen: &ReferenceScreen) -> XmlNode {
    let (centre, width) = match screen.geometry {
        ScreenGeometry::Polar {
            centre_azimuth,
            centre_elevation,
            centre_distance,
            width_azimuth,
        } => (
            XmlNode::new("screenCentrePosition")
                .attr("azimuth", centre_azimuth)
                .attr("elevation", centre_elevation)
                .attr("distance", centre_distance),
            XmlNode::new("screenWidth").attr("azimuth", width_azimuth),
        ),
        ScreenGeometry::Cartesian {
            centre_x,
            centre_y,
            centre_z,
            width_x,
        } => (
            XmlNode::new("screenCentrePosition")
                .attr("X", centre_x)
                .attr("Y", centre_y)
                .attr("Z", centre_z),
            XmlNode::new("screenWidth").attr("X", width_x),
        ),
    };
    XmlNode::new("audioProgrammeReferenceScreen")
        .attr("aspectRatio", screen.aspect_ratio)
        .child(centre)
        .child(width)
}
