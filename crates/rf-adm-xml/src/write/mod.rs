//! Document writer
//!
//! Elements are written grouped by kind in a fixed order (programmes,
//! contents, objects, pack formats, channel formats, stream formats, track
//! formats, track UIDs), each group in document order. Defaulted parameters
//! that were never set are left out unless
//! [`WriterOptions::write_default_values`] is on.

mod blocks;
mod elements;

use std::fs;
use std::path::Path;

use log::debug;
use rf_adm::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Document, HasParameter,
};

use crate::node::XmlNode;
use crate::{WriterOptions, XmlResult};

const ADM_VERSION: &str = "ITU-R_BS.2076-2";
const EBU_CORE_NAMESPACE: &str = "urn:ebu:metadata-schema:ebuCore_2016";

/// Serialize a document to XML text
pub fn write_document(document: &Document, options: &WriterOptions) -> String {
    let mut root = audio_format_extended(document, options);
    if options.itu_structure {
        root = itu_wrapper(root);
    }
    root.render_document(options.indent)
}

/// Serialize a document and write it to `path`
pub fn write_document_file<P: AsRef<Path>>(
    document: &Document,
    path: P,
    options: &WriterOptions,
) -> XmlResult<()> {
    fs::write(path, write_document(document, options))?;
    Ok(())
}

/// `ebuCoreMain/coreMetadata/format` around the given node
fn itu_wrapper(node: XmlNode) -> XmlNode {
    XmlNode::new("ebuCoreMain")
        .attr("xmlns", EBU_CORE_NAMESPACE)
        .child(XmlNode::new("coreMetadata").child(XmlNode::new("format").child(node)))
}

pub(crate) fn audio_format_extended(document: &Document, options: &WriterOptions) -> XmlNode {
    let mut node = XmlNode::new("audioFormatExtended").attr("version", ADM_VERSION);

    for (handle, programme) in document.iter::<AudioProgramme>() {
        node.push(elements::programme(document, handle, programme, options));
    }
    for (handle, content) in document.iter::<AudioContent>() {
        node.push(elements::content(document, handle, content, options));
    }
    for (handle, object) in document.iter::<AudioObject>() {
        node.push(elements::object(document, handle, object, options));
    }
    for (handle, pack) in document.iter::<AudioPackFormat>() {
        node.push(elements::pack_format(document, handle, pack, options));
    }
    for (_, channel) in document.iter::<AudioChannelFormat>() {
        node.push(elements::channel_format(channel, options));
    }
    for (handle, stream) in document.iter::<AudioStreamFormat>() {
        node.push(elements::stream_format(document, handle, stream));
    }
    for (handle, track) in document.iter::<AudioTrackFormat>() {
        node.push(elements::track_format(document, handle, track));
    }
    // the silent track is implied by references to it
    for (handle, uid) in document.iter::<AudioTrackUid>() {
        if !uid.is_silent() {
            node.push(elements::track_uid(document, handle, uid));
        }
    }

    debug!(
        "wrote ADM document: {} programmes, {} objects, {} channel formats",
        document.len::<AudioProgramme>(),
        document.len::<AudioObject>(),
        document.len::<AudioChannelFormat>()
    );
    node
}

/// Parameter value to write: `None` for unset values and for defaults that
/// were never set explicitly, unless defaults are requested
pub(super) fn value<P, H: HasParameter<P>>(host: &H, options: &WriterOptions) -> Option<P> {
    if host.is_default_parameter() && !options.write_default_values {
        return None;
    }
    host.get_parameter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_adm::{Gain, Parameters};

    #[test]
    fn test_value_skips_defaults() {
        let mut object = AudioObject::new("Voice");
        let options = WriterOptions::default();
        let with_defaults = WriterOptions {
            write_default_values: true,
            ..WriterOptions::default()
        };

        assert_eq!(value::<Gain, _>(&object, &options), None);
        assert_eq!(value::<Gain, _>(&object, &with_defaults), Some(Gain::linear(1.0)));

        object.set(Gain::db(-3.0)).unwrap();
        assert_eq!(value::<Gain, _>(&object, &options), Some(Gain::db(-3.0)));
    }

    #[test]
    fn test_itu_wrapper() {
        let options = WriterOptions {
            itu_structure: true,
            indent: 0,
            ..WriterOptions::default()
        };
        let xml = write_document(&Document::new(), &options);
        assert!(xml.contains(
            "<ebuCoreMain xmlns=\"urn:ebu:metadata-schema:ebuCore_2016\"><coreMetadata><format>\
             <audioFormatExtended version=\"ITU-R_BS.2076-2\"/></format></coreMetadata></ebuCoreMain>"
        ));
    }
}
