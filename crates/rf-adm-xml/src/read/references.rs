//! Second read phase: `*IDRef` children to document edges

use rf_adm::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, AudioTrackUidId, Document, Element,
    ElementHandle, ElementId, ListReference, SingleReference,
};
use roxmltree::Node;

use crate::values::{elements, required_attr, text};
use crate::{XmlError, XmlResult};

/// Wire every reference below `afe`; returns the number of new edges
pub(super) fn resolve_references(document: &mut Document, afe: Node) -> XmlResult<usize> {
    let mut edges = 0;

    for node in elements(afe) {
        edges += match node.tag_name().name() {
            "audioProgramme" => {
                let from = source::<AudioProgramme>(document, node, "audioProgrammeID")?;
                let mut added = 0;
                for child in elements(node) {
                    if child.has_tag_name("audioContentIDRef") {
                        added += add::<_, AudioContent>(document, from, child)?;
                    }
                }
                added
            }
            "audioContent" => {
                let from = source::<AudioContent>(document, node, "audioContentID")?;
                let mut added = 0;
                for child in elements(node) {
                    if child.has_tag_name("audioObjectIDRef") {
                        added += add::<_, AudioObject>(document, from, child)?;
                    }
                }
                added
            }
            "audioObject" => resolve_object(document, node)?,
            "audioPackFormat" => {
                let from = source::<AudioPackFormat>(document, node, "audioPackFormatID")?;
                let mut added = 0;
                for child in elements(node) {
                    match child.tag_name().name() {
                        "audioChannelFormatIDRef" => {
                            added += add::<_, AudioChannelFormat>(document, from, child)?
                        }
                        "audioPackFormatIDRef" => {
                            added += add::<_, AudioPackFormat>(document, from, child)?
                        }
                        _ => {}
                    }
                }
                added
            }
            "audioStreamFormat" => {
                let from = source::<AudioStreamFormat>(document, node, "audioStreamFormatID")?;
                let mut added = 0;
                for child in elements(node) {
                    match child.tag_name().name() {
                        "audioChannelFormatIDRef" => {
                            added += set::<_, AudioChannelFormat>(document, from, child)?
                        }
                        "audioPackFormatIDRef" => {
                            added += set::<_, AudioPackFormat>(document, from, child)?
                        }
                        // the track side may already have created this edge
                        "audioTrackFormatIDRef" => {
                            added += add::<_, AudioTrackFormat>(document, from, child)?
                        }
                        _ => {}
                    }
                }
                added
            }
            "audioTrackFormat" => {
                let from = source::<AudioTrackFormat>(document, node, "audioTrackFormatID")?;
                let mut added = 0;
                for child in elements(node) {
                    if child.has_tag_name("audioStreamFormatIDRef") {
                        added += set::<_, AudioStreamFormat>(document, from, child)?;
                    }
                }
                added
            }
            "audioTrackUID" => {
                let from = source::<AudioTrackUid>(document, node, "UID")?;
                let mut added = 0;
                for child in elements(node) {
                    match child.tag_name().name() {
                        "audioTrackFormatIDRef" => {
                            added += set::<_, AudioTrackFormat>(document, from, child)?
                        }
                        "audioChannelFormatIDRef" => {
                            added += set::<_, AudioChannelFormat>(document, from, child)?
                        }
                        "audioPackFormatIDRef" => {
                            added += set::<_, AudioPackFormat>(document, from, child)?
                        }
                        _ => {}
                    }
                }
                added
            }
            _ => 0,
        };
    }
    Ok(edges)
}

fn resolve_object(document: &mut Document, node: Node) -> XmlResult<usize> {
    let from = source::<AudioObject>(document, node, "audioObjectID")?;
    let mut added = 0;
    for child in elements(node) {
        match child.tag_name().name() {
            "audioObjectIDRef" => added += add::<_, AudioObject>(document, from, child)?,
            "audioPackFormatIDRef" => added += add::<_, AudioPackFormat>(document, from, child)?,
            "audioTrackUIDRef" => {
                let to = track_uid(document, child)?;
                added += usize::from(document.add_reference(from, to)?);
            }
            "audioComplementaryObjectIDRef" => {
                let to = target::<AudioObject>(document, child)?;
                added += usize::from(document.add_complementary(from, to)?);
            }
            _ => {}
        }
    }
    Ok(added)
}

/// Handle of the element whose ID is in `id_attribute`; added in phase one
fn source<T: Element>(
    document: &Document,
    node: Node,
    id_attribute: &'static str,
) -> XmlResult<ElementHandle<T>> {
    let raw = required_attr(node, id_attribute)?;
    lookup(document, raw)
}

/// Handle of the element named by an `*IDRef` text
fn target<T: Element>(document: &Document, node: Node) -> XmlResult<ElementHandle<T>> {
    lookup(document, text(node))
}

fn lookup<T: Element>(document: &Document, raw: &str) -> XmlResult<ElementHandle<T>> {
    let id = T::Id::parse(raw)?;
    document
        .lookup::<T>(&id)
        .ok_or_else(|| XmlError::UnresolvedReference {
            kind: T::KIND,
            id: raw.to_string(),
        })
}

/// The silent track UID is implied and need not be defined in the file
fn track_uid(document: &mut Document, node: Node) -> XmlResult<ElementHandle<AudioTrackUid>> {
    let raw = text(node);
    let id = AudioTrackUidId::parse(raw)?;
    match document.lookup::<AudioTrackUid>(&id) {
        Some(handle) => Ok(handle),
        None if id == AudioTrackUidId::SILENT => Ok(document.add(AudioTrackUid::silent())?),
        None => Err(XmlError::UnresolvedReference {
            kind: AudioTrackUid::KIND,
            id: raw.to_string(),
        }),
    }
}

fn add<F, T>(document: &mut Document, from: ElementHandle<F>, node: Node) -> XmlResult<usize>
where
    F: ListReference<T>,
    T: Element,
{
    let to = target::<T>(document, node)?;
    Ok(usize::from(document.add_reference(from, to)?))
}

fn set<F, T>(document: &mut Document, from: ElementHandle<F>, node: Node) -> XmlResult<usize>
where
    F: SingleReference<T>,
    T: Element,
{
    let to = target::<T>(document, node)?;
    if document.reference::<T>(from)? == Some(to) {
        return Ok(0);
    }
    document.set_reference(from, to)?;
    Ok(1)
}
