//! AudioContent and its dialogue classification

use serde::{Deserialize, Serialize};

use super::common::{DialogueId, Label, Language, LoudnessMetadata};
use super::sealed::Sealed;
use super::{Element, ElementKind, element_display, element_store};
use crate::named_type::named_string;
use crate::parameters::{HasParameter, SetParameter, UnsetParameter, impl_parameters};
use crate::{AdmError, AdmResult, AudioContentId};

named_string! {
    AudioContentName
}

macro_rules! content_kind_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum $name {
            #[default]
            $($variant = $value),+
        }

        impl $name {
            #[inline]
            pub fn value(self) -> u8 {
                self as u8
            }

            pub fn from_value(value: u8) -> AdmResult<Self> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(AdmError::InvalidValue {
                        name: stringify!($name),
                        value: value.to_string(),
                        allowed: stringify!($($value),+).to_string(),
                    }),
                }
            }
        }
    };
}

content_kind_enum! {
    /// Kind of non-dialogue content (dialogue ID 0)
    NonDialogueContentKind {
        Undefined = 0,
        Music = 1,
        Effect = 2,
    }
}

content_kind_enum! {
    /// Kind of dialogue content (dialogue ID 1)
    DialogueContentKind {
        Undefined = 0,
        StorylineDialogue = 1,
        Voiceover = 2,
        SpokenSubtitle = 3,
        AudioDescription = 4,
        Commentary = 5,
        Emergency = 6,
    }
}

content_kind_enum! {
    /// Kind of mixed content (dialogue ID 2)
    MixedContentKind {
        Undefined = 0,
        CompleteMain = 1,
        Mixed = 2,
        HearingImpaired = 3,
    }
}

/// Dialogue classification of a content; the variant is the dialogue ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    NonDialogue(NonDialogueContentKind),
    Dialogue(DialogueContentKind),
    Mixed(MixedContentKind),
}

impl ContentKind {
    pub fn dialogue_id(&self) -> DialogueId {
        match self {
            Self::NonDialogue(_) => DialogueId::NON_DIALOGUE,
            Self::Dialogue(_) => DialogueId::DIALOGUE,
            Self::Mixed(_) => DialogueId::MIXED,
        }
    }

    /// Numeric value of the kind within its dialogue ID
    pub fn value(&self) -> u8 {
        match self {
            Self::NonDialogue(k) => k.value(),
            Self::Dialogue(k) => k.value(),
            Self::Mixed(k) => k.value(),
        }
    }

    /// Kind from the `dialogue` attribute and the kind value
    pub fn from_parts(dialogue_id: DialogueId, value: u8) -> AdmResult<Self> {
        Ok(match dialogue_id.get() {
            0 => Self::NonDialogue(NonDialogueContentKind::from_value(value)?),
            1 => Self::Dialogue(DialogueContentKind::from_value(value)?),
            _ => Self::Mixed(MixedContentKind::from_value(value)?),
        })
    }

    /// Undefined kind for a dialogue ID
    pub fn undefined(dialogue_id: DialogueId) -> Self {
        match dialogue_id.get() {
            0 => Self::NonDialogue(NonDialogueContentKind::Undefined),
            1 => Self::Dialogue(DialogueContentKind::Undefined),
            _ => Self::Mixed(MixedContentKind::Undefined),
        }
    }
}

impl From<NonDialogueContentKind> for ContentKind {
    fn from(kind: NonDialogueContentKind) -> Self {
        Self::NonDialogue(kind)
    }
}

impl From<DialogueContentKind> for ContentKind {
    fn from(kind: DialogueContentKind) -> Self {
        Self::Dialogue(kind)
    }
}

impl From<MixedContentKind> for ContentKind {
    fn from(kind: MixedContentKind) -> Self {
        Self::Mixed(kind)
    }
}

/// A piece of content, e.g. the dialogue or music of a programme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioContent {
    id: AudioContentId,
    name: AudioContentName,
    language: Option<Language>,
    loudness_metadata: Vec<LoudnessMetadata>,
    kind: Option<ContentKind>,
    labels: Vec<Label>,
}

impl AudioContent {
    pub fn new(name: impl Into<AudioContentName>) -> Self {
        Self {
            id: AudioContentId::default(),
            name: name.into(),
            language: None,
            loudness_metadata: Vec::new(),
            kind: None,
            labels: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: AudioContentId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.name.get()
    }
}

impl_parameters! {
    AudioContent {
        required name: AudioContentName,
        optional language: Language,
        vector loudness_metadata: LoudnessMetadata,
        optional kind: ContentKind,
        vector labels: Label,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIALOGUE VARIANT
// ═══════════════════════════════════════════════════════════════════════════════

impl HasParameter<DialogueId> for AudioContent {
    fn get_parameter(&self) -> Option<DialogueId> {
        self.kind.map(|k| k.dialogue_id())
    }
}

impl SetParameter<DialogueId> for AudioContent {
    /// Keeps the current kind if it already has this dialogue ID
    fn set_parameter(&mut self, value: DialogueId) -> AdmResult<()> {
        if self.kind.map(|k| k.dialogue_id()) != Some(value) {
            self.kind = Some(ContentKind::undefined(value));
        }
        Ok(())
    }
}

impl UnsetParameter<DialogueId> for AudioContent {
    fn unset_parameter(&mut self) {
        self.kind = None;
    }
}

macro_rules! content_kind_parameter {
    ($kind:ident, $variant:ident) => {
        impl HasParameter<$kind> for AudioContent {
            fn get_parameter(&self) -> Option<$kind> {
                match self.kind {
                    Some(ContentKind::$variant(k)) => Some(k),
                    _ => None,
                }
            }
        }

        impl SetParameter<$kind> for AudioContent {
            fn set_parameter(&mut self, value: $kind) -> AdmResult<()> {
                self.kind = Some(ContentKind::$variant(value));
                Ok(())
            }
        }

        impl UnsetParameter<$kind> for AudioContent {
            fn unset_parameter(&mut self) {
                if matches!(self.kind, Some(ContentKind::$variant(_))) {
                    self.kind = None;
                }
            }
        }
    };
}

content_kind_parameter!(NonDialogueContentKind, NonDialogue);
content_kind_parameter!(DialogueContentKind, Dialogue);
content_kind_parameter!(MixedContentKind, Mixed);

/// Edges of an AudioContent
#[derive(Debug, Clone, Default)]
pub struct ContentRefs {
    pub(crate) objects: Vec<usize>,
}

impl Sealed for AudioContent {}

impl Element for AudioContent {
    type Id = AudioContentId;
    type Refs = ContentRefs;

    const KIND: ElementKind = ElementKind::AudioContent;

    fn id(&self) -> AudioContentId {
        self.id
    }

    fn set_id(&mut self, id: AudioContentId) -> AdmResult<()> {
        self.id = id;
        Ok(())
    }

    element_store!(contents);
}

element_display!(AudioContent);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;

    #[test]
    fn test_setting_kind_sets_dialogue_id() {
        let mut content = AudioContent::new("Dialogue");
        assert!(!content.has::<DialogueId>());

        content.set(DialogueContentKind::Commentary).unwrap();
        assert_eq!(content.get::<DialogueId>(), DialogueId::DIALOGUE);
        assert!(content.has::<DialogueContentKind>());
        assert!(!content.has::<NonDialogueContentKind>());
    }

    #[test]
    fn test_setting_kind_unsets_siblings() {
        let mut content = AudioContent::new("Music");
        content.set(DialogueContentKind::Voiceover).unwrap();
        content.set(NonDialogueContentKind::Music).unwrap();

        assert!(!content.has::<DialogueContentKind>());
        assert_eq!(content.get::<NonDialogueContentKind>(), NonDialogueContentKind::Music);
        assert_eq!(content.get::<DialogueId>(), DialogueId::NON_DIALOGUE);
    }

    #[test]
    fn test_setting_dialogue_id() {
        let mut content = AudioContent::new("Mix");
        content.set(MixedContentKind::HearingImpaired).unwrap();

        // same dialogue ID keeps the kind
        content.set(DialogueId::MIXED).unwrap();
        assert_eq!(content.get::<MixedContentKind>(), MixedContentKind::HearingImpaired);

        content.set(DialogueId::DIALOGUE).unwrap();
        assert_eq!(content.get::<DialogueContentKind>(), DialogueContentKind::Undefined);
        assert!(!content.has::<MixedContentKind>());
    }

    #[test]
    fn test_unset_kind() {
        let mut content = AudioContent::new("Fx");
        content.set(NonDialogueContentKind::Effect).unwrap();

        content.unset::<DialogueContentKind>();
        assert!(content.has::<NonDialogueContentKind>());

        content.unset::<NonDialogueContentKind>();
        assert!(!content.has::<DialogueId>());
        assert!(!content.has::<ContentKind>());
    }

    #[test]
    fn test_kind_from_parts() {
        let kind = ContentKind::from_parts(DialogueId::DIALOGUE, 4).unwrap();
        assert_eq!(kind, ContentKind::Dialogue(DialogueContentKind::AudioDescription));
        assert_eq!(kind.value(), 4);
        assert!(ContentKind::from_parts(DialogueId::MIXED, 4).is_err());
    }
}
