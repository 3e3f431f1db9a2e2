//! ADM elements
//!
//! Top-level elements are plain records: their identifiers and parameters.
//! The edges between them live in the [`Document`](crate::Document), so a
//! cloned element is always a disconnected copy.

pub mod block_formats;
mod channel_format;
mod common;
mod content;
mod object;
mod pack_format;
mod position;
mod programme;
mod stream_format;
mod track_format;
mod track_uid;

pub use channel_format::*;
pub use common::*;
pub use content::*;
pub use object::*;
pub use pack_format::*;
pub use position::*;
pub use programme::*;
pub use stream_format::*;
pub use track_format::*;
pub use track_uid::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Store};
use crate::ids::ElementId;
use crate::parameters::ParameterHost;
use crate::AdmResult;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Top-level element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    AudioProgramme,
    AudioContent,
    AudioObject,
    AudioPackFormat,
    AudioChannelFormat,
    AudioStreamFormat,
    AudioTrackFormat,
    AudioTrackUid,
}

impl ElementKind {
    pub const ALL: [Self; 8] = [
        Self::AudioProgramme,
        Self::AudioContent,
        Self::AudioObject,
        Self::AudioPackFormat,
        Self::AudioChannelFormat,
        Self::AudioStreamFormat,
        Self::AudioTrackFormat,
        Self::AudioTrackUid,
    ];

    /// XML element name
    pub fn name(self) -> &'static str {
        match self {
            Self::AudioProgramme => "AudioProgramme",
            Self::AudioContent => "AudioContent",
            Self::AudioObject => "AudioObject",
            Self::AudioPackFormat => "AudioPackFormat",
            Self::AudioChannelFormat => "AudioChannelFormat",
            Self::AudioStreamFormat => "AudioStreamFormat",
            Self::AudioTrackFormat => "AudioTrackFormat",
            Self::AudioTrackUid => "AudioTrackUid",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A top-level element owned by a [`Document`]
pub trait Element: 'static + Clone + fmt::Debug + fmt::Display + ParameterHost + sealed::Sealed {
    type Id: ElementId;

    const KIND: ElementKind;

    fn id(&self) -> Self::Id;

    /// Change the ID of a detached element.
    ///
    /// Checks that only concern the element itself run here (type section,
    /// silent track UID). Uniqueness is checked by the owning document, see
    /// [`Document::set_id`].
    fn set_id(&mut self, id: Self::Id) -> AdmResult<()>;

    /// Outgoing edges, stored by the document
    #[doc(hidden)]
    type Refs: Clone + Default + fmt::Debug;

    #[doc(hidden)]
    fn store(document: &Document) -> &Store<Self>;

    #[doc(hidden)]
    fn store_mut(document: &mut Document) -> &mut Store<Self>;

    /// True when `Document::add` should pick an ID
    #[doc(hidden)]
    fn needs_id(&self) -> bool {
        self.id().is_unset()
    }

    /// Checks on an ID change that depend on the element's edges
    #[doc(hidden)]
    fn check_id_change(&self, _refs: &Self::Refs, _id: &Self::Id) -> AdmResult<()> {
        Ok(())
    }
}

/// Store accessors and `Display` for an element
macro_rules! element_store {
    ($store:ident) => {
        fn store(document: &$crate::document::Document) -> &$crate::document::Store<Self> {
            &document.$store
        }

        fn store_mut(
            document: &mut $crate::document::Document,
        ) -> &mut $crate::document::Store<Self> {
            &mut document.$store
        }
    };
}

macro_rules! element_display {
    ($element:ty) => {
        impl std::fmt::Display for $element {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    "{} {}",
                    <Self as $crate::elements::Element>::KIND,
                    <Self as $crate::elements::Element>::id(self)
                )
            }
        }
    };
}

pub(crate) use element_display;
pub(crate) use element_store;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ElementKind::AudioTrackUid.to_string(), "AudioTrackUid");
        assert_eq!(ElementKind::ALL.len(), 8);
    }
}
