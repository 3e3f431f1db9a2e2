//! Serial ADM frames (BS.2125)
//!
//! ```xml
//! <frame>
//!   <frameHeader>
//!     <frameFormat frameFormatID="FF_00000001" start="..." duration="..." type="full"/>
//!     <transportTrackFormat transportID="TP_0001">...</transportTrackFormat>
//!   </frameHeader>
//!   <audioFormatExtended>...</audioFormatExtended>
//! </frame>
//! ```

use log::{debug, warn};
use rf_adm::{
    AudioTrack, AudioTrackUidId, ChangeStatus, ChangedId, CountToFull, Document, Duration,
    ElementId, FlowId, Frame, FrameFormat, FrameFormatId, FrameHeader, FrameType, HasParameter,
    NumIds, NumMetadataChunks, NumTracks, Parameters, Start, TimeReference, TransportId,
    TransportName, TransportTrackFormat, format_timecode, parse_timecode,
};
use roxmltree::Node;

use crate::node::XmlNode;
use crate::read::{AUDIO_FORMAT_EXTENDED, child, read_audio_format_extended};
use crate::values::{
    attr, check_attributes, elements, name_of, parse_attr, parse_value, required_attr, text,
    unexpected,
};
use crate::write::audio_format_extended;
use crate::{ParserOptions, WriterOptions, XmlError, XmlResult};

const FRAME_VERSION: &str = "ITU-R_BS.2125-1";

// ═══════════════════════════════════════════════════════════════════════════════
// READING
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse a serial ADM frame
pub fn parse_frame(xml: &str, options: &ParserOptions) -> XmlResult<Frame> {
    let tree = roxmltree::Document::parse(xml)?;
    let root = tree.root_element();
    if !root.has_tag_name("frame") {
        return Err(XmlError::MissingElement {
            element: "frame".into(),
        });
    }

    let header_node = child(root, "frameHeader").ok_or_else(|| XmlError::MissingElement {
        element: "frameHeader".into(),
    })?;
    let header = read_frame_header(header_node, options)?;

    // header-only frames carry no metadata
    let document = match child(root, AUDIO_FORMAT_EXTENDED) {
        Some(node) => read_audio_format_extended(node, options)?,
        None => Document::new(),
    };

    debug!(
        "parsed frame {} with {} transport track formats",
        header.frame_format().id(),
        header.transport_track_formats().len()
    );
    Ok(Frame::with_document(header, document))
}

fn read_frame_header(node: Node, options: &ParserOptions) -> XmlResult<FrameHeader> {
    let format_node = child(node, "frameFormat").ok_or_else(|| XmlError::MissingElement {
        element: "frameFormat".into(),
    })?;
    let mut header = FrameHeader::new(read_frame_format(format_node, options)?);

    for element in elements(node) {
        match element.tag_name().name() {
            "frameFormat" => {}
            "transportTrackFormat" => {
                let transport = read_transport_track_format(element, options)?;
                if !header.add_transport_track_format(transport) {
                    warn!(
                        "skipping duplicate transportTrackFormat {}",
                        attr(element, "transportID").unwrap_or_default()
                    );
                }
            }
            _ => unexpected(node, element, options)?,
        }
    }
    Ok(header)
}

fn read_frame_format(node: Node, options: &ParserOptions) -> XmlResult<FrameFormat> {
    check_attributes(
        node,
        &[
            "frameFormatID",
            "start",
            "duration",
            "type",
            "timeReference",
            "countToFull",
            "numMetadataChunks",
            "flowID",
        ],
        options,
    )?;
    let mut format = FrameFormat::new(
        FrameFormatId::parse(required_attr(node, "frameFormatID")?)?,
        Start::new(parse_timecode(required_attr(node, "start")?)?)?,
        Duration::new(parse_timecode(required_attr(node, "duration")?)?)?,
        FrameType::new(required_attr(node, "type")?)?,
    );

    if let Some(reference) = attr(node, "timeReference") {
        format.set(TimeReference::new(reference)?)?;
    }
    if let Some(count) = parse_attr::<u32>(node, "countToFull")? {
        format.set(CountToFull::new(count)?)?;
    }
    if let Some(chunks) = parse_attr::<u32>(node, "numMetadataChunks")? {
        format.set(NumMetadataChunks::new(chunks)?)?;
    }
    if let Some(flow) = attr(node, "flowID") {
        format.set(FlowId::new(flow))?;
    }

    for element in elements(node) {
        if !element.has_tag_name("changedIDs") {
            unexpected(node, element, options)?;
            continue;
        }
        // one `*IDRef` per changed element, status as an attribute
        for changed in elements(element) {
            let raw = required_attr(changed, "status")?;
            let status = ChangeStatus::parse(raw).ok_or_else(|| XmlError::InvalidValue {
                element: name_of(changed),
                name: "status".into(),
                value: raw.to_string(),
            })?;
            format.add(ChangedId::new(text(changed), status));
        }
    }
    Ok(format)
}

fn read_transport_track_format(
    node: Node,
    options: &ParserOptions,
) -> XmlResult<TransportTrackFormat> {
    check_attributes(
        node,
        &["transportID", "transportName", "numIDs", "numTracks"],
        options,
    )?;
    let mut transport =
        TransportTrackFormat::new(TransportId::parse(required_attr(node, "transportID")?)?);

    if let Some(name) = attr(node, "transportName") {
        transport.set(TransportName::new(name))?;
    }
    if let Some(count) = parse_attr::<u32>(node, "numIDs")? {
        transport.set(NumIds::new(count)?)?;
    }
    if let Some(count) = parse_attr::<u32>(node, "numTracks")? {
        transport.set(NumTracks::new(count)?)?;
    }

    for element in elements(node) {
        if !element.has_tag_name("audioTrack") {
            unexpected(node, element, options)?;
            continue;
        }
        let track_id = parse_value(element, "trackID", required_attr(element, "trackID")?)?;
        let mut track = AudioTrack::new(track_id);
        for uid in elements(element) {
            if uid.has_tag_name("audioTrackUIDRef") {
                track = track.with_track_uid(AudioTrackUidId::parse(text(uid))?);
            } else {
                unexpected(element, uid, options)?;
            }
        }
        transport.add(track);
    }
    Ok(transport)
}

// ═══════════════════════════════════════════════════════════════════════════════
// WRITING
// ═══════════════════════════════════════════════════════════════════════════════

/// Serialize a frame to XML text
pub fn write_frame(frame: &Frame, options: &WriterOptions) -> String {
    let header = frame.header();
    XmlNode::new("frame")
        .attr("version", FRAME_VERSION)
        .child(
            XmlNode::new("frameHeader")
                .child(frame_format(header.frame_format()))
                .children(header.transport_track_formats().iter().map(transport_track_format)),
        )
        .child(audio_format_extended(frame.document(), options))
        .render_document(options.indent)
}

fn frame_format(format: &FrameFormat) -> XmlNode {
    let changed = format.get::<Vec<ChangedId>>();
    let mut node = XmlNode::new("frameFormat")
        .attr("frameFormatID", format.id())
        .attr("start", format_timecode(&format.get::<Start>().get()))
        .attr("duration", format_timecode(&format.get::<Duration>().get()))
        .attr("type", format.get::<FrameType>().get())
        .opt_attr(
            "timeReference",
            HasParameter::<TimeReference>::get_parameter(format).map(|t| t.get().to_string()),
        )
        .opt_attr(
            "countToFull",
            HasParameter::<CountToFull>::get_parameter(format),
        )
        .opt_attr(
            "numMetadataChunks",
            HasParameter::<NumMetadataChunks>::get_parameter(format),
        )
        .opt_attr(
            "flowID",
            HasParameter::<FlowId>::get_parameter(format).map(|f| f.get().to_string()),
        );

    if !changed.is_empty() {
        let mut changed_ids = XmlNode::new("changedIDs");
        for entry in &changed {
            match id_ref_name(&entry.id) {
                Some(name) => changed_ids.push(
                    XmlNode::new(name)
                        .attr("status", entry.status.as_str())
                        .text(&entry.id),
                ),
                None => warn!("skipping changed ID with unknown kind: {}", entry.id),
            }
        }
        node.push(changed_ids);
    }
    node
}

/// `*IDRef` element name for an ID, from its prefix
fn id_ref_name(id: &str) -> Option<&'static str> {
    let (prefix, _) = id.split_once('_')?;
    Some(match prefix {
        "APR" => "audioProgrammeIDRef",
        "ACO" => "audioContentIDRef",
        "AO" => "audioObjectIDRef",
        "AP" => "audioPackFormatIDRef",
        "AC" => "audioChannelFormatIDRef",
        "AB" => "audioBlockFormatIDRef",
        "AS" => "audioStreamFormatIDRef",
        "AT" => "audioTrackFormatIDRef",
        "ATU" => "audioTrackUIDRef",
        _ => return None,
    })
}

fn transport_track_format(transport: &TransportTrackFormat) -> XmlNode {
    XmlNode::new("transportTrackFormat")
        .attr("transportID", transport.id())
        .opt_attr(
            "transportName",
            HasParameter::<TransportName>::get_parameter(transport).map(|n| n.get().to_string()),
        )
        .opt_attr("numIDs", HasParameter::<NumIds>::get_parameter(transport))
        .opt_attr("numTracks", HasParameter::<NumTracks>::get_parameter(transport))
        .children(transport.get::<Vec<AudioTrack>>().iter().map(|track| {
            XmlNode::new("audioTrack")
                .attr("trackID", track.track_id)
                .children(
                    track
                        .track_uids
                        .iter()
                        .map(|uid| XmlNode::new("audioTrackUIDRef").text(uid)),
                )
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &str = r#"<frame>
      <frameHeader>
        <frameFormat frameFormatID="FF_00000001" start="00:00:00.00000"
            duration="00:00:00.50000" type="full" countToFull="1" flowID="f-1">
          <changedIDs>
            <audioObjectIDRef status="changed">AO_1001</audioObjectIDRef>
          </changedIDs>
        </frameFormat>
        <transportTrackFormat transportID="TP_0001" numTracks="1">
          <audioTrack trackID="1">
            <audioTrackUIDRef>ATU_00000001</audioTrackUIDRef>
          </audioTrack>
        </transportTrackFormat>
      </frameHeader>
      <audioFormatExtended>
        <audioObject audioObjectID="AO_1001" audioObjectName="Voice"/>
      </audioFormatExtended>
    </frame>"#;

    #[test]
    fn test_parse_frame_header() {
        let frame = parse_frame(FRAME, &ParserOptions::default()).unwrap();
        let format = frame.header().frame_format();
        assert_eq!(format.get::<FrameType>().get(), "full");
        assert_eq!(format.get::<CountToFull>().get(), 1);
        assert_eq!(format.get::<Vec<ChangedId>>()[0].status, ChangeStatus::Changed);

        let transport = &frame.header().transport_track_formats()[0];
        let tracks = transport.get::<Vec<AudioTrack>>();
        assert_eq!(tracks[0].track_id, 1);
        assert_eq!(tracks[0].track_uids[0].format(), "ATU_00000001");
        assert_eq!(frame.document().len::<rf_adm::AudioObject>(), 1);
    }

    #[test]
    fn test_frame_round_trip() {
        let frame = parse_frame(FRAME, &ParserOptions::default()).unwrap();
        let xml = write_frame(&frame, &WriterOptions::default());
        assert!(xml.contains("<audioObjectIDRef status=\"changed\">AO_1001</audioObjectIDRef>"));

        let again = parse_frame(&xml, &ParserOptions::default()).unwrap();
        assert_eq!(again.header(), frame.header());
    }

    #[test]
    fn test_missing_header() {
        let result = parse_frame("<frame/>", &ParserOptions::default());
        assert!(matches!(result, Err(XmlError::MissingElement { .. })));
    }

    #[test]
    fn test_id_ref_names() {
        assert_eq!(id_ref_name("ATU_00000001"), Some("audioTrackUIDRef"));
        assert_eq!(id_ref_name("AT_00010001_01"), Some("audioTrackFormatIDRef"));
        assert_eq!(id_ref_name("XYZ_1"), None);
    }
}
