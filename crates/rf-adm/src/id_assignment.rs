//! Renumber every element of a document
//!
//! Common definitions (values `0x0001..=0x0FFF`) and the silent track UID keep
//! their IDs. Everything else is numbered in insertion order:
//! - programmes, contents, objects from `0x1001`, track UIDs from `1`
//! - packs and channels from `0x1001`, one counter per type
//! - streams take the type and value of their channel (or pack)
//! - tracks take the type and value of their stream, counter from `01`
//!
//! The whole plan is computed before any ID changes.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::document::{Document, Store};
use crate::elements::block_formats::BlockFormats;
use crate::elements::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Element,
};
use crate::ids::{ElementId, FIRST_ASSIGNED_VALUE};
use crate::{
    AdmError, AdmResult, AudioChannelFormatId, AudioPackFormatId, AudioStreamFormatId,
    AudioTrackFormatId, TypeDescriptor,
};

/// Highest value reserved for common definitions
const COMMON_DEFINITION_MAX: u16 = 0x0FFF;

fn is_common_definition(value: u16) -> bool {
    value != 0 && value <= COMMON_DEFINITION_MAX
}

/// New ID per arena index
type Renames<T> = Vec<(usize, <T as Element>::Id)>;

#[derive(Default)]
struct Plan {
    programmes: Renames<AudioProgramme>,
    contents: Renames<AudioContent>,
    objects: Renames<AudioObject>,
    pack_formats: Renames<AudioPackFormat>,
    channel_formats: Renames<AudioChannelFormat>,
    stream_formats: Renames<AudioStreamFormat>,
    track_formats: Renames<AudioTrackFormat>,
    track_uids: Renames<AudioTrackUid>,
}

/// Reassign the IDs of all elements of `document`
pub fn reassign_ids(document: &mut Document) -> AdmResult<()> {
    let plan = plan_ids(document)?;

    let renamed_channels: HashMap<AudioChannelFormatId, AudioChannelFormatId> = plan
        .channel_formats
        .iter()
        .filter_map(|(index, new)| {
            let old = document.channel_formats.node(*index)?.element.id();
            (old != *new).then_some((old, *new))
        })
        .collect();

    apply(&mut document.programmes, &plan.programmes)?;
    apply(&mut document.contents, &plan.contents)?;
    apply(&mut document.objects, &plan.objects)?;
    apply(&mut document.pack_formats, &plan.pack_formats)?;
    apply(&mut document.channel_formats, &plan.channel_formats)?;
    apply(&mut document.stream_formats, &plan.stream_formats)?;
    apply(&mut document.track_formats, &plan.track_formats)?;
    apply(&mut document.track_uids, &plan.track_uids)?;

    if !renamed_channels.is_empty() {
        for (_, node) in document.channel_formats.nodes_mut() {
            if let BlockFormats::Matrix(blocks) = node.element.blocks_mut() {
                for block in blocks {
                    block.remap_channel_ids(&renamed_channels);
                }
            }
        }
    }

    debug!(
        "reassigned IDs: {} programmes, {} objects, {} channel formats, {} track UIDs",
        plan.programmes.len(),
        plan.objects.len(),
        plan.channel_formats.len(),
        plan.track_uids.len()
    );
    Ok(())
}

fn apply<T: Element>(store: &mut Store<T>, renames: &Renames<T>) -> AdmResult<()> {
    for (index, id) in renames {
        if let Some(node) = store.node_mut(*index) {
            node.element.set_id(*id)?;
        }
    }
    store.reindex();
    Ok(())
}

fn plan_ids(document: &Document) -> AdmResult<Plan> {
    let mut plan = Plan {
        programmes: sequential(&document.programmes)?,
        contents: sequential(&document.contents)?,
        objects: sequential(&document.objects)?,
        ..Plan::default()
    };

    let mut next = AudioTrackUid::new().id().first_candidate();
    for (index, node) in document.track_uids.iter() {
        if node.element.is_silent() {
            continue;
        }
        plan.track_uids.push((index, next));
        next = next.next_candidate()?;
    }

    plan.pack_formats = per_type(
        &document.pack_formats,
        |pack| pack.type_descriptor(),
        |id| id.value().get(),
        AudioPackFormatId::from_parts,
    )?;
    plan.channel_formats = per_type(
        &document.channel_formats,
        |channel| channel.type_descriptor(),
        |id| id.value().get(),
        AudioChannelFormatId::from_parts,
    )?;

    let channels: HashMap<usize, AudioChannelFormatId> =
        plan.channel_formats.iter().copied().collect();
    let packs: HashMap<usize, AudioPackFormatId> = plan.pack_formats.iter().copied().collect();

    plan.stream_formats = plan_streams(document, &channels, &packs)?;
    let streams: HashMap<usize, AudioStreamFormatId> =
        plan.stream_formats.iter().copied().collect();
    plan.track_formats = plan_tracks(document, &streams)?;

    Ok(plan)
}

/// Single-section IDs numbered in insertion order
fn sequential<T: Element>(store: &Store<T>) -> AdmResult<Renames<T>> {
    let mut renames = Vec::with_capacity(store.len());
    let mut next: Option<T::Id> = None;
    for (index, node) in store.iter() {
        let id = match next {
            Some(id) => id,
            None => node.element.id().first_candidate(),
        };
        renames.push((index, id));
        next = Some(id.next_candidate()?);
    }
    Ok(renames)
}

/// Type + value IDs with one counter per type; common definitions stay
fn per_type<T: Element>(
    store: &Store<T>,
    type_of: impl Fn(&T) -> TypeDescriptor,
    value_of: impl Fn(&T::Id) -> u16,
    build: impl Fn(TypeDescriptor, u16) -> AdmResult<T::Id>,
) -> AdmResult<Renames<T>> {
    let mut counters: HashMap<TypeDescriptor, u16> = HashMap::new();
    let mut renames = Vec::with_capacity(store.len());
    for (index, node) in store.iter() {
        if is_common_definition(value_of(&node.element.id())) {
            renames.push((index, node.element.id()));
            continue;
        }
        let type_descriptor = type_of(&node.element);
        let counter = counters.entry(type_descriptor).or_insert(FIRST_ASSIGNED_VALUE);
        renames.push((index, build(type_descriptor, *counter)?));
        *counter = counter.checked_add(1).ok_or_else(|| AdmError::OutOfRange {
            name: "format ID value",
            value: format!("{type_descriptor} overflow"),
            range: "[0x1001, 0xffff]".into(),
        })?;
    }
    Ok(renames)
}

fn plan_streams(
    document: &Document,
    channels: &HashMap<usize, AudioChannelFormatId>,
    packs: &HashMap<usize, AudioPackFormatId>,
) -> AdmResult<Renames<AudioStreamFormat>> {
    let mut used: HashSet<AudioStreamFormatId> = document
        .stream_formats
        .iter()
        .map(|(_, node)| node.element.id())
        .filter(|id| is_common_definition(id.value().get()))
        .collect();

    let mut renames = Vec::new();
    for (index, node) in document.stream_formats.iter() {
        let old = node.element.id();
        if is_common_definition(old.value().get()) {
            renames.push((index, old));
            continue;
        }

        let linked = node
            .refs
            .channel_format
            .and_then(|c| channels.get(&c))
            .map(|c| (c.type_descriptor(), c.value().get()))
            .or_else(|| {
                node.refs
                    .pack_format
                    .and_then(|p| packs.get(&p))
                    .map(|p| (p.type_descriptor(), p.value().get()))
            });
        let mut id = match linked {
            Some((type_descriptor, value)) => AudioStreamFormatId::from_parts(type_descriptor, value)?,
            None => AudioStreamFormatId::from_parts(old.type_descriptor(), FIRST_ASSIGNED_VALUE)?,
        };
        while used.contains(&id) {
            id = id.next_candidate()?;
        }
        used.insert(id);
        renames.push((index, id));
    }
    Ok(renames)
}

fn plan_tracks(
    document: &Document,
    streams: &HashMap<usize, AudioStreamFormatId>,
) -> AdmResult<Renames<AudioTrackFormat>> {
    let mut used: HashSet<AudioTrackFormatId> = document
        .track_formats
        .iter()
        .map(|(_, node)| node.element.id())
        .filter(|id| is_common_definition(id.value().get()))
        .collect();

    let mut renames = Vec::new();
    for (index, node) in document.track_formats.iter() {
        let old = node.element.id();
        if is_common_definition(old.value().get()) {
            renames.push((index, old));
            continue;
        }

        let mut id = match node.refs.stream_format.and_then(|s| streams.get(&s)) {
            Some(stream) => AudioTrackFormatId::from_parts(
                stream.type_descriptor(),
                stream.value().get(),
                1,
            )?,
            None => AudioTrackFormatId::from_parts(old.type_descriptor(), FIRST_ASSIGNED_VALUE, 1)?,
        };
        // tracks of one stream share type and value and differ in the counter
        while used.contains(&id) {
            if node.refs.stream_format.is_some() {
                let counter = id.counter().next()?;
                id.set_counter(counter);
            } else {
                id = id.next_candidate()?;
            }
        }
        used.insert(id);
        renames.push((index, id));
    }
    Ok(renames)
}
