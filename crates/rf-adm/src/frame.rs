//! Serial ADM frames
//!
//! A frame is a document plus a header describing its position in the
//! stream (`frameFormat`) and how tracks are carried (`transportTrackFormat`).

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::elements::{Duration, Start};
use crate::named_type::{named_string, named_value};
use crate::parameters::impl_parameters;
use crate::{AudioTrackUidId, FrameFormatId, TransportId};

named_string! {
    /// Role of the frame in the stream
    FrameType, one_of ["header", "full", "divided", "intermediate", "all"]
}

named_string! {
    /// Whether times are relative to the stream or to the frame
    TimeReference, one_of ["total", "local"]
}

named_value! {
    /// Frames until the next full frame
    #[derive(Copy, Eq, Ord, Hash)]
    CountToFull(u32), min 1
}

named_value! {
    #[derive(Copy, Eq, Ord, Hash)]
    NumMetadataChunks(u32), min 1
}

named_string! {
    /// Identifier of the metadata flow, usually a UUID
    FlowId
}

named_string! {
    TransportName
}

named_value! {
    #[derive(Copy, Eq, Ord, Hash)]
    NumIds(u32)
}

named_value! {
    #[derive(Copy, Eq, Ord, Hash)]
    NumTracks(u32)
}

/// Change status of an element since the previous frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    New,
    Changed,
    Extended,
    Expired,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::New => "new",
            ChangeStatus::Changed => "changed",
            ChangeStatus::Extended => "extended",
            ChangeStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(ChangeStatus::New),
            "changed" => Some(ChangeStatus::Changed),
            "extended" => Some(ChangeStatus::Extended),
            "expired" => Some(ChangeStatus::Expired),
            _ => None,
        }
    }
}

/// One entry of `changedIDs`: an element ID string and its status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangedId {
    pub id: String,
    pub status: ChangeStatus,
}

impl ChangedId {
    pub fn new(id: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }
}

/// `frameFormat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameFormat {
    id: FrameFormatId,
    start: Start,
    duration: Duration,
    frame_type: FrameType,
    time_reference: Option<TimeReference>,
    count_to_full: Option<CountToFull>,
    num_metadata_chunks: Option<NumMetadataChunks>,
    flow_id: Option<FlowId>,
    changed_ids: Vec<ChangedId>,
}

impl FrameFormat {
    pub fn new(id: FrameFormatId, start: Start, duration: Duration, frame_type: FrameType) -> Self {
        Self {
            id,
            start,
            duration,
            frame_type,
            time_reference: None,
            count_to_full: None,
            num_metadata_chunks: None,
            flow_id: None,
            changed_ids: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> FrameFormatId {
        self.id
    }

    pub fn set_id(&mut self, id: FrameFormatId) {
        self.id = id;
    }
}

impl_parameters! {
    FrameFormat {
        required start: Start,
        required duration: Duration,
        required frame_type: FrameType,
        optional time_reference: TimeReference,
        optional count_to_full: CountToFull,
        optional num_metadata_chunks: NumMetadataChunks,
        optional flow_id: FlowId,
        vector changed_ids: ChangedId,
    }
}

/// `audioTrack` of a transport: a file track and the UIDs it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub track_id: u32,
    pub track_uids: Vec<AudioTrackUidId>,
}

impl AudioTrack {
    pub fn new(track_id: u32) -> Self {
        Self {
            track_id,
            track_uids: Vec::new(),
        }
    }

    pub fn with_track_uid(mut self, uid: AudioTrackUidId) -> Self {
        if !self.track_uids.contains(&uid) {
            self.track_uids.push(uid);
        }
        self
    }
}

/// `transportTrackFormat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportTrackFormat {
    id: TransportId,
    name: Option<TransportName>,
    num_ids: Option<NumIds>,
    num_tracks: Option<NumTracks>,
    audio_tracks: Vec<AudioTrack>,
}

impl TransportTrackFormat {
    pub fn new(id: TransportId) -> Self {
        Self {
            id,
            name: None,
            num_ids: None,
            num_tracks: None,
            audio_tracks: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> TransportId {
        self.id
    }

    pub fn set_id(&mut self, id: TransportId) {
        self.id = id;
    }
}

impl_parameters! {
    TransportTrackFormat {
        optional name: TransportName,
        optional num_ids: NumIds,
        optional num_tracks: NumTracks,
        vector audio_tracks: AudioTrack,
    }
}

/// `frameHeader`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameHeader {
    frame_format: FrameFormat,
    transport_track_formats: Vec<TransportTrackFormat>,
}

impl FrameHeader {
    pub fn new(frame_format: FrameFormat) -> Self {
        Self {
            frame_format,
            transport_track_formats: Vec::new(),
        }
    }

    pub fn frame_format(&self) -> &FrameFormat {
        &self.frame_format
    }

    pub fn frame_format_mut(&mut self) -> &mut FrameFormat {
        &mut self.frame_format
    }

    pub fn transport_track_formats(&self) -> &[TransportTrackFormat] {
        &self.transport_track_formats
    }

    /// Append a transport; false when one with the same ID exists
    pub fn add_transport_track_format(&mut self, transport: TransportTrackFormat) -> bool {
        if self.transport_track_formats.iter().any(|t| t.id == transport.id) {
            return false;
        }
        self.transport_track_formats.push(transport);
        true
    }

    pub fn transport_track_format_mut(&mut self, id: TransportId) -> Option<&mut TransportTrackFormat> {
        self.transport_track_formats.iter_mut().find(|t| t.id == id)
    }
}

/// A header and the document it describes.
///
/// Derefs to the [`Document`], so element operations work on frames directly.
#[derive(Debug)]
pub struct Frame {
    header: FrameHeader,
    document: Document,
}

impl Frame {
    pub fn new(header: FrameHeader) -> Self {
        Self::with_document(header, Document::new())
    }

    pub fn with_document(header: FrameHeader, document: Document) -> Self {
        Self { header, document }
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FrameHeader {
        &mut self.header
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_parts(self) -> (FrameHeader, Document) {
        (self.header, self.document)
    }

    /// Independent copy; the document is deep-copied
    pub fn deep_copy(&self) -> Self {
        Self {
            header: self.header.clone(),
            document: self.document.deep_copy(),
        }
    }
}

impl Deref for Frame {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.document
    }
}

impl DerefMut for Frame {
    fn deref_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}
