//! Document reader
//!
//! Parsing runs in two phases over the `audioFormatExtended` node:
//! 1. every top-level element is built from its attributes and sub-elements
//!    and added to a fresh [`Document`]
//! 2. the `*IDRef` children are resolved through [`Document::lookup`] and
//!    wired with the document's reference calls
//!
//! References may therefore point forwards or backwards in the file; a
//! reference to an ID that is not defined is an error.

mod blocks;
mod elements;
mod references;

use std::fs;
use std::path::Path;

use log::debug;
use rf_adm::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Document,
};
use roxmltree::Node;

use crate::values::{elements as children, unexpected};
use crate::{ParserOptions, XmlError, XmlResult};

pub(crate) const AUDIO_FORMAT_EXTENDED: &str = "audioFormatExtended";

/// Parse an ADM document from XML text
pub fn parse_document(xml: &str, options: &ParserOptions) -> XmlResult<Document> {
    let tree = roxmltree::Document::parse(xml)?;
    let node = find_audio_format_extended(tree.root_element(), options)?;
    read_audio_format_extended(node, options)
}

/// Read and parse an ADM document file
pub fn read_document_file<P: AsRef<Path>>(path: P, options: &ParserOptions) -> XmlResult<Document> {
    let xml = fs::read_to_string(path)?;
    parse_document(&xml, options)
}

/// Locate `audioFormatExtended`: the root itself, a child of the root or
/// the ITU `ebuCoreMain/coreMetadata/format` path; anywhere in the tree
/// with `recursive_node_search`
pub(crate) fn find_audio_format_extended<'a, 'input>(
    root: Node<'a, 'input>,
    options: &ParserOptions,
) -> XmlResult<Node<'a, 'input>> {
    if root.has_tag_name(AUDIO_FORMAT_EXTENDED) {
        return Ok(root);
    }
    if let Some(node) = child(root, AUDIO_FORMAT_EXTENDED) {
        return Ok(node);
    }
    if root.has_tag_name("ebuCoreMain")
        && let Some(node) = child(root, "coreMetadata")
            .and_then(|core| child(core, "format"))
            .and_then(|format| child(format, AUDIO_FORMAT_EXTENDED))
    {
        return Ok(node);
    }
    if options.recursive_node_search
        && let Some(node) = root
            .descendants()
            .find(|n| n.has_tag_name(AUDIO_FORMAT_EXTENDED))
    {
        return Ok(node);
    }
    Err(XmlError::MissingElement {
        element: AUDIO_FORMAT_EXTENDED.to_string(),
    })
}

pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    children(node).find(|n| n.has_tag_name(name))
}

/// Build a document from an `audioFormatExtended` node
pub(crate) fn read_audio_format_extended(node: Node, options: &ParserOptions) -> XmlResult<Document> {
    let mut document = Document::new();

    for element in children(node) {
        match element.tag_name().name() {
            "audioProgramme" => {
                document.add(elements::read_programme(element, options)?)?;
            }
            "audioContent" => {
                document.add(elements::read_content(element, options)?)?;
            }
            "audioObject" => {
                document.add(elements::read_object(element, options)?)?;
            }
            "audioPackFormat" => {
                document.add(elements::read_pack_format(element, options)?)?;
            }
            "audioChannelFormat" => {
                document.add(elements::read_channel_format(element, options)?)?;
            }
            "audioStreamFormat" => {
                document.add(elements::read_stream_format(element, options)?)?;
            }
            "audioTrackFormat" => {
                document.add(elements::read_track_format(element, options)?)?;
            }
            "audioTrackUID" => {
                document.add(elements::read_track_uid(element, options)?)?;
            }
            _ => unexpected(node, element, options)?,
        }
    }

    let edges = references::resolve_references(&mut document, node)?;

    debug!(
        "parsed ADM document: {} programmes, {} contents, {} objects, {} packs, {} channels, \
         {} streams, {} tracks, {} track UIDs, {} references",
        document.len::<AudioProgramme>(),
        document.len::<AudioContent>(),
        document.len::<AudioObject>(),
        document.len::<AudioPackFormat>(),
        document.len::<AudioChannelFormat>(),
        document.len::<AudioStreamFormat>(),
        document.len::<AudioTrackFormat>(),
        document.len::<AudioTrackUid>(),
        edges
    );
    Ok(document)
}
