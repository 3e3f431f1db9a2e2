//! Top-level element readers
//!
//! Each reader builds a detached element from the node's attributes and
//! sub-elements. `*IDRef` children are left for the reference phase.

use rf_adm::{
    AbsoluteDistance, AudioChannelFormat, AudioChannelFormatId, AudioContent, AudioContentId,
    AudioObject, AudioObjectId, AudioObjectInteraction, AudioPackFormat, AudioPackFormatId,
    AudioProgramme, AudioProgrammeId, AudioStreamFormat, AudioStreamFormatId, AudioTrackFormat,
    AudioTrackFormatId, AudioTrackUid, AudioTrackUidId, BitDepth, ContentKind, DialogueId,
    DisableDucking, Duration, ElementId, End, FormatDescriptor, Frequency, Gain,
    GainInteractionRange, HeadLocked, Importance, Interact, InteractionCoordinate, Label, Language,
    LoudnessCorrectionType, LoudnessMetadata, LoudnessMethod, LoudnessRecType, MaxDuckingDepth,
    Mute, Parameters, PositionInteractionRange, ReferenceScreen, SampleRate, ScreenGeometry, Start,
    TypeDescriptor, parse_format_definition, parse_format_label, parse_timecode,
    parse_type_definition, parse_type_label,
};
use roxmltree::Node;

use super::blocks::read_block_format;
use crate::values::{
    attr, check_attributes, elements, name_of, parse_attr, parse_attr_or, parse_bool,
    parse_bool_attr, parse_bool_text, parse_text, required_attr, text, unexpected,
};
use crate::{ParserOptions, XmlError, XmlResult};

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRAMME / CONTENT / OBJECT
// ═══════════════════════════════════════════════════════════════════════════════

pub(super) fn read_programme(node: Node, options: &ParserOptions) -> XmlResult<AudioProgramme> {
    check_attributes(
        node,
        &[
            "audioProgrammeID",
            "audioProgrammeName",
            "audioProgrammeLanguage",
            "start",
            "end",
            "maxDuckingDepth",
        ],
        options,
    )?;
    let id = AudioProgrammeId::parse(required_attr(node, "audioProgrammeID")?)?;
    let mut programme = AudioProgramme::new(required_attr(node, "audioProgrammeName")?).with_id(id);

    if let Some(language) = attr(node, "audioProgrammeLanguage") {
        programme.set(Language::new(language))?;
    }
    if let Some(start) = attr(node, "start") {
        programme.set(Start::new(parse_timecode(start)?)?)?;
    }
    if let Some(end) = attr(node, "end") {
        programme.set(End::new(parse_timecode(end)?)?)?;
    }
    if let Some(depth) = parse_attr::<f32>(node, "maxDuckingDepth")? {
        programme.set(MaxDuckingDepth::new(depth)?)?;
    }

    for child in elements(node) {
        match child.tag_name().name() {
            "audioContentIDRef" => {}
            "loudnessMetadata" => {
                programme.add(read_loudness(child, options)?);
            }
            "audioProgrammeReferenceScreen" => {
                programme.set(read_reference_screen(child, options)?)?;
            }
            "audioProgrammeLabel" => {
                programme.add(read_label(child));
            }
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(programme)
}

pub(super) fn read_content(node: Node, options: &ParserOptions) -> XmlResult<AudioContent> {
    check_attributes(
        node,
        &["audioContentID", "audioContentName", "audioContentLanguage"],
        options,
    )?;
    let id = AudioContentId::parse(required_attr(node, "audioContentID")?)?;
    let mut content = AudioContent::new(required_attr(node, "audioContentName")?).with_id(id);

    if let Some(language) = attr(node, "audioContentLanguage") {
        content.set(Language::new(language))?;
    }

    for child in elements(node) {
        match child.tag_name().name() {
            "audioObjectIDRef" => {}
            "loudnessMetadata" => {
                content.add(read_loudness(child, options)?);
            }
            "dialogue" => content.set(read_content_kind(child)?)?,
            "audioContentLabel" => {
                content.add(read_label(child));
            }
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(content)
}

/// `<dialogue nonDialogueContentKind="1">0</dialogue>`: the text is the
/// dialogue ID, the attribute matching it carries the kind
fn read_content_kind(node: Node) -> XmlResult<ContentKind> {
    let dialogue_id = DialogueId::new(parse_text::<u8>(node)?)?;
    let attribute = match dialogue_id.get() {
        0 => "nonDialogueContentKind",
        1 => "dialogueContentKind",
        _ => "mixedContentKind",
    };
    Ok(match parse_attr::<u8>(node, attribute)? {
        Some(value) => ContentKind::from_parts(dialogue_id, value)?,
        None => ContentKind::undefined(dialogue_id),
    })
}

pub(super) fn read_object(node: Node, options: &ParserOptions) -> XmlResult<AudioObject> {
    check_attributes(
        node,
        &[
            "audioObjectID",
            "audioObjectName",
            "start",
            "duration",
            "dialogue",
            "importance",
            "interact",
            "disableDucking",
        ],
        options,
    )?;
    let id = AudioObjectId::parse(required_attr(node, "audioObjectID")?)?;
    let mut object = AudioObject::new(required_attr(node, "audioObjectName")?).with_id(id);

    if let Some(start) = attr(node, "start") {
        object.set(Start::new(parse_timecode(start)?)?)?;
    }
    if let Some(duration) = attr(node, "duration") {
        object.set(Duration::new(parse_timecode(duration)?)?)?;
    }
    if let Some(dialogue) = parse_attr::<u8>(node, "dialogue")? {
        object.set(DialogueId::new(dialogue)?)?;
    }
    if let Some(importance) = parse_attr::<u8>(node, "importance")? {
        object.set(Importance::new(importance)?)?;
    }
    if let Some(interact) = parse_bool_attr(node, "interact")? {
        object.set(Interact::new(interact)?)?;
    }
    if let Some(disable) = parse_bool_attr(node, "disableDucking")? {
        object.set(DisableDucking::new(disable)?)?;
    }

    for child in elements(node) {
        match child.tag_name().name() {
            "audioPackFormatIDRef"
            | "audioObjectIDRef"
            | "audioComplementaryObjectIDRef"
            | "audioTrackUIDRef" => {}
            "gain" => object.set(read_gain(child)?)?,
            "headLocked" => object.set(HeadLocked::new(parse_bool_text(child)?)?)?,
            "mute" => object.set(Mute::new(parse_bool_text(child)?)?)?,
            "audioObjectLabel" => {
                object.add(read_label(child));
            }
            "audioObjectInteraction" => object.set(read_interaction(child, options)?)?,
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(object)
}

fn read_interaction(node: Node, options: &ParserOptions) -> XmlResult<AudioObjectInteraction> {
    check_attributes(
        node,
        &["onOffInteract", "gainInteract", "positionInteract"],
        options,
    )?;
    let mut interaction = AudioObjectInteraction {
        on_off_interact: parse_bool_attr(node, "onOffInteract")?.unwrap_or(false),
        gain_interact: parse_bool_attr(node, "gainInteract")?,
        position_interact: parse_bool_attr(node, "positionInteract")?,
        ..AudioObjectInteraction::default()
    };

    for child in elements(node) {
        match child.tag_name().name() {
            "gainInteractionRange" => {
                let gain = read_gain(child)?;
                let range = interaction
                    .gain_range
                    .get_or_insert_with(GainInteractionRange::default);
                if is_min_bound(child)? {
                    range.min = Some(gain);
                } else {
                    range.max = Some(gain);
                }
            }
            "positionInteractionRange" => {
                let coordinate = read_coordinate(child)?;
                let value = parse_text::<f32>(child)?;
                let index = match interaction
                    .position_ranges
                    .iter()
                    .position(|r| r.coordinate == coordinate)
                {
                    Some(index) => index,
                    None => {
                        interaction.position_ranges.push(PositionInteractionRange {
                            coordinate,
                            min: None,
                            max: None,
                        });
                        interaction.position_ranges.len() - 1
                    }
                };
                let range = &mut interaction.position_ranges[index];
                if is_min_bound(child)? {
                    range.min = Some(value);
                } else {
                    range.max = Some(value);
                }
            }
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(interaction)
}

fn is_min_bound(node: Node) -> XmlResult<bool> {
    match required_attr(node, "bound")? {
        "min" => Ok(true),
        "max" => Ok(false),
        other => Err(XmlError::InvalidValue {
            element: name_of(node),
            name: "bound".into(),
            value: other.to_string(),
        }),
    }
}

fn read_coordinate(node: Node) -> XmlResult<InteractionCoordinate> {
    Ok(match required_attr(node, "coordinate")? {
        "azimuth" => InteractionCoordinate::Azimuth,
        "elevation" => InteractionCoordinate::Elevation,
        "distance" => InteractionCoordinate::Distance,
        "X" => InteractionCoordinate::X,
        "Y" => InteractionCoordinate::Y,
        "Z" => InteractionCoordinate::Z,
        other => {
            return Err(XmlError::InvalidValue {
                element: name_of(node),
                name: "coordinate".into(),
                value: other.to_string(),
            });
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATS
// ═══════════════════════════════════════════════════════════════════════════════

pub(super) fn read_pack_format(node: Node, options: &ParserOptions) -> XmlResult<AudioPackFormat> {
    check_attributes(
        node,
        &[
            "audioPackFormatID",
            "audioPackFormatName",
            "typeLabel",
            "typeDefinition",
            "importance",
        ],
        options,
    )?;
    let id = AudioPackFormatId::parse(required_attr(node, "audioPackFormatID")?)?;
    let type_descriptor = read_type_descriptor(node, id.type_descriptor())?;
    let mut pack =
        AudioPackFormat::new(required_attr(node, "audioPackFormatName")?, type_descriptor)
            .with_id(id)?;

    if let Some(importance) = parse_attr::<u8>(node, "importance")? {
        pack.set(Importance::new(importance)?)?;
    }

    for child in elements(node) {
        match child.tag_name().name() {
            "audioChannelFormatIDRef" | "audioPackFormatIDRef" => {}
            "absoluteDistance" => pack.set(AbsoluteDistance::new(parse_text(child)?)?)?,
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(pack)
}

pub(super) fn read_channel_format(
    node: Node,
    options: &ParserOptions,
) -> XmlResult<AudioChannelFormat> {
    check_attributes(
        node,
        &[
            "audioChannelFormatID",
            "audioChannelFormatName",
            "typeLabel",
            "typeDefinition",
        ],
        options,
    )?;
    let id = AudioChannelFormatId::parse(required_attr(node, "audioChannelFormatID")?)?;
    let type_descriptor = read_type_descriptor(node, id.type_descriptor())?;
    let mut channel =
        AudioChannelFormat::new(required_attr(node, "audioChannelFormatName")?, type_descriptor)
            .with_id(id)?;

    let mut frequency: Option<Frequency> = None;
    for child in elements(node) {
        match child.tag_name().name() {
            "audioBlockFormat" => read_block_format(&mut channel, child, options)?,
            "frequency" => {
                let hz = parse_text::<f32>(child)?;
                let entry = frequency.get_or_insert_with(Frequency::default);
                match required_attr(child, "typeDefinition")? {
                    "lowPass" => entry.low_pass = Some(hz),
                    "highPass" => entry.high_pass = Some(hz),
                    other => {
                        return Err(XmlError::InvalidValue {
                            element: name_of(child),
                            name: "typeDefinition".into(),
                            value: other.to_string(),
                        });
                    }
                }
            }
            _ => unexpected(node, child, options)?,
        }
    }
    if let Some(frequency) = frequency {
        channel.set(frequency)?;
    }
    Ok(channel)
}

pub(super) fn read_stream_format(
    node: Node,
    options: &ParserOptions,
) -> XmlResult<AudioStreamFormat> {
    check_attributes(
        node,
        &[
            "audioStreamFormatID",
            "audioStreamFormatName",
            "formatLabel",
            "formatDefinition",
        ],
        options,
    )?;
    let id = AudioStreamFormatId::parse(required_attr(node, "audioStreamFormatID")?)?;
    let stream = AudioStreamFormat::new(
        required_attr(node, "audioStreamFormatName")?,
        read_format_descriptor(node)?,
    )
    .with_id(id);

    for child in elements(node) {
        match child.tag_name().name() {
            "audioChannelFormatIDRef" | "audioPackFormatIDRef" | "audioTrackFormatIDRef" => {}
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(stream)
}

pub(super) fn read_track_format(node: Node, options: &ParserOptions) -> XmlResult<AudioTrackFormat> {
    check_attributes(
        node,
        &[
            "audioTrackFormatID",
            "audioTrackFormatName",
            "formatLabel",
            "formatDefinition",
        ],
        options,
    )?;
    let id = AudioTrackFormatId::parse(required_attr(node, "audioTrackFormatID")?)?;
    let track = AudioTrackFormat::new(
        required_attr(node, "audioTrackFormatName")?,
        read_format_descriptor(node)?,
    )
    .with_id(id);

    for child in elements(node) {
        match child.tag_name().name() {
            "audioStreamFormatIDRef" => {}
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(track)
}

pub(super) fn read_track_uid(node: Node, options: &ParserOptions) -> XmlResult<AudioTrackUid> {
    check_attributes(node, &["UID", "sampleRate", "bitDepth"], options)?;
    let id = AudioTrackUidId::parse(required_attr(node, "UID")?)?;
    let mut uid = AudioTrackUid::new().with_id(id)?;

    if let Some(rate) = parse_attr::<u32>(node, "sampleRate")? {
        uid.set(SampleRate::new(rate)?)?;
    }
    if let Some(depth) = parse_attr::<u32>(node, "bitDepth")? {
        uid.set(BitDepth::new(depth)?)?;
    }

    for child in elements(node) {
        match child.tag_name().name() {
            "audioTrackFormatIDRef" | "audioChannelFormatIDRef" | "audioPackFormatIDRef" => {}
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(uid)
}

/// `typeLabel` wins over `typeDefinition`; both must agree when present.
/// Without either the type section of the ID is used.
fn read_type_descriptor(node: Node, fallback: TypeDescriptor) -> XmlResult<TypeDescriptor> {
    let label = attr(node, "typeLabel").map(parse_type_label).transpose()?;
    let definition = attr(node, "typeDefinition")
        .map(parse_type_definition)
        .transpose()?;
    match (label, definition) {
        (Some(label), Some(definition)) if label != definition => Err(XmlError::InvalidValue {
            element: name_of(node),
            name: "typeDefinition".into(),
            value: definition.to_string(),
        }),
        (Some(descriptor), _) | (None, Some(descriptor)) => Ok(descriptor),
        (None, None) => Ok(fallback),
    }
}

fn read_format_descriptor(node: Node) -> XmlResult<FormatDescriptor> {
    let label = attr(node, "formatLabel").map(parse_format_label).transpose()?;
    let definition = attr(node, "formatDefinition")
        .map(parse_format_definition)
        .transpose()?;
    match (label, definition) {
        (Some(label), Some(definition)) if label != definition => Err(XmlError::InvalidValue {
            element: name_of(node),
            name: "formatDefinition".into(),
            value: definition.to_string(),
        }),
        (Some(descriptor), _) | (None, Some(descriptor)) => Ok(descriptor),
        (None, None) => Err(XmlError::MissingAttribute {
            element: name_of(node),
            attribute: "formatLabel",
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED SUB-ELEMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// `<gain gainUnit="dB">-6</gain>`; linear without a unit
pub(super) fn read_gain(node: Node) -> XmlResult<Gain> {
    let value = parse_text::<f64>(node)?;
    match attr(node, "gainUnit") {
        None | Some("linear") => Ok(Gain::linear(value)),
        Some("dB") => Ok(Gain::db(value)),
        Some(other) => Err(XmlError::InvalidValue {
            element: name_of(node),
            name: "gainUnit".into(),
            value: other.to_string(),
        }),
    }
}

fn read_label(node: Node) -> Label {
    let label = Label::new(text(node));
    match attr(node, "language") {
        Some(language) => label.with_language(language),
        None => label,
    }
}

fn read_loudness(node: Node, options: &ParserOptions) -> XmlResult<LoudnessMetadata> {
    check_attributes(
        node,
        &["loudnessMethod", "loudnessRecType", "loudnessCorrectionType"],
        options,
    )?;
    let mut loudness = LoudnessMetadata {
        method: attr(node, "loudnessMethod").map(LoudnessMethod::new),
        rec_type: attr(node, "loudnessRecType").map(LoudnessRecType::new),
        correction_type: attr(node, "loudnessCorrectionType").map(LoudnessCorrectionType::new),
        ..LoudnessMetadata::default()
    };

    for child in elements(node) {
        let slot = match child.tag_name().name() {
            "integratedLoudness" => &mut loudness.integrated_loudness,
            "loudnessRange" => &mut loudness.loudness_range,
            "maxTruePeak" => &mut loudness.max_true_peak,
            "maxMomentary" => &mut loudness.max_momentary,
            "maxShortTerm" => &mut loudness.max_short_term,
            "dialogueLoudness" => &mut loudness.dialogue_loudness,
            _ => {
                unexpected(node, child, options)?;
                continue;
            }
        };
        *slot = Some(parse_text(child)?);
    }
    Ok(loudness)
}

/// Polar when the centre position carries `azimuth`, cartesian with `X`
fn read_reference_screen(node: Node, options: &ParserOptions) -> XmlResult<ReferenceScreen> {
    check_attributes(node, &["aspectRatio"], options)?;
    let mut centre = None;
    let mut width = None;
    for child in elements(node) {
        match child.tag_name().name() {
            "screenCentrePosition" => centre = Some(child),
            "screenWidth" => width = Some(child),
            _ => unexpected(node, child, options)?,
        }
    }

    let defaults = ReferenceScreen::default();
    let cartesian = centre.is_some_and(|c| c.has_attribute("X"));
    let geometry = if cartesian {
        ScreenGeometry::Cartesian {
            centre_x: parse_attr_or(centre, "X", 0.0)?,
            centre_y: parse_attr_or(centre, "Y", 1.0)?,
            centre_z: parse_attr_or(centre, "Z", 0.0)?,
            width_x: parse_attr_or(width, "X", 1.0)?,
        }
    } else {
        ScreenGeometry::Polar {
            centre_azimuth: parse_attr_or(centre, "azimuth", 0.0)?,
            centre_elevation: parse_attr_or(centre, "elevation", 0.0)?,
            centre_distance: parse_attr_or(centre, "distance", 1.0)?,
            width_azimuth: parse_attr_or(width, "azimuth", 58.0)?,
        }
    };
    Ok(ReferenceScreen {
        aspect_ratio: parse_attr(node, "aspectRatio")?.unwrap_or(defaults.aspect_ratio),
        geometry,
    })
}

/// `0` / `1` text flag, `None` for an empty element
pub(super) fn read_flag(node: Node) -> XmlResult<Option<bool>> {
    match text(node) {
        "" => Ok(None),
        raw => parse_bool(node, "text", raw).map(Some),
    }
}
