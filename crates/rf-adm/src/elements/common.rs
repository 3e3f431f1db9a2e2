//! Parameter types shared by several elements

use serde::{Deserialize, Serialize};

use crate::named_type::{named_string, named_value};
use crate::{AdmResult, Time};

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING
// ═══════════════════════════════════════════════════════════════════════════════

named_value! {
    /// Start time relative to the start of the file or programme
    #[derive(Copy, Eq, Ord)]
    Start(Time), non_negative
}

named_value! {
    /// End time of a programme
    #[derive(Copy, Eq, Ord)]
    End(Time), non_negative
}

named_value! {
    /// Length of an object or block
    #[derive(Copy, Eq, Ord)]
    Duration(Time), non_negative
}

named_value! {
    /// Block start relative to the start of its object
    #[derive(Copy, Eq, Ord)]
    Rtime(Time), non_negative
}

impl Default for Start {
    fn default() -> Self {
        Self(Time::ZERO)
    }
}

impl Default for Rtime {
    fn default() -> Self {
        Self(Time::ZERO)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEVELS AND FLAGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Gain, stored the way it was given
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Gain {
    Linear(f64),
    Db(f64),
}

impl Gain {
    #[inline]
    pub fn linear(value: f64) -> Self {
        Self::Linear(value)
    }

    #[inline]
    pub fn db(value: f64) -> Self {
        Self::Db(value)
    }

    /// Linear factor
    pub fn as_linear(&self) -> f64 {
        match *self {
            Self::Linear(value) => value,
            Self::Db(db) => 10f64.powf(db / 20.0),
        }
    }

    /// Level in dB
    pub fn as_db(&self) -> f64 {
        match *self {
            Self::Linear(value) => 20.0 * value.log10(),
            Self::Db(db) => db,
        }
    }

    #[inline]
    pub fn is_db(&self) -> bool {
        matches!(self, Self::Db(_))
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::Linear(1.0)
    }
}

named_value! {
    /// Relative importance, 10 being the most important
    #[derive(Copy, Eq, Ord, Hash)]
    Importance(u8), range 0 ..= 10
}

impl Default for Importance {
    fn default() -> Self {
        Self(10)
    }
}

named_value! {
    /// Rendering follows head rotation
    #[derive(Copy, Eq, Ord, Hash, Default)]
    HeadLocked(bool)
}

named_value! {
    /// Position is relative to the reference screen
    #[derive(Copy, Eq, Ord, Hash, Default)]
    ScreenRef(bool)
}

named_value! {
    /// Dialogue classification: 0 non-dialogue, 1 dialogue, 2 mixed
    #[derive(Copy, Eq, Ord, Hash)]
    DialogueId(u8), one_of [0, 1, 2]
}

impl DialogueId {
    pub const NON_DIALOGUE: Self = Self(0);
    pub const DIALOGUE: Self = Self(1);
    pub const MIXED: Self = Self(2);
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEXT
// ═══════════════════════════════════════════════════════════════════════════════

named_string! {
    /// Language code (ISO 639)
    Language
}

/// Human readable label, optionally tagged with a language
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub value: String,
    pub language: Option<Language>,
}

impl Label {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(Language::new(language));
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOUDNESS
// ═══════════════════════════════════════════════════════════════════════════════

named_string! {
    /// Loudness measurement method, e.g. "ITU-R BS.1770"
    LoudnessMethod
}

named_string! {
    /// Loudness recommendation, e.g. "EBU R128"
    LoudnessRecType
}

named_string! {
    /// How the loudness was corrected, e.g. "File-based"
    LoudnessCorrectionType
}

/// `loudnessMetadata` of a programme or content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoudnessMetadata {
    pub method: Option<LoudnessMethod>,
    pub rec_type: Option<LoudnessRecType>,
    pub correction_type: Option<LoudnessCorrectionType>,
    /// Integrated loudness in LUFS
    pub integrated_loudness: Option<f32>,
    /// Loudness range in LU
    pub loudness_range: Option<f32>,
    /// Maximum true peak in dBTP
    pub max_true_peak: Option<f32>,
    /// Maximum momentary loudness in LUFS
    pub max_momentary: Option<f32>,
    /// Maximum short-term loudness in LUFS
    pub max_short_term: Option<f32>,
    /// Dialogue loudness in LUFS
    pub dialogue_loudness: Option<f32>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// POSITION HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

named_value! {
    /// Horizontal angle in degrees, counter-clockwise from the front
    #[derive(Copy)]
    Azimuth(f32), range -180.0 ..= 180.0
}

named_value! {
    /// Vertical angle in degrees
    #[derive(Copy)]
    Elevation(f32), range -90.0 ..= 90.0
}

named_value! {
    /// Normalised distance from the listener
    #[derive(Copy)]
    Distance(f32), min 0.0
}

named_value! {
    /// Cartesian X coordinate, -1 left to +1 right
    #[derive(Copy)]
    X(f32), range -1.0 ..= 1.0
}

named_value! {
    /// Cartesian Y coordinate, -1 back to +1 front
    #[derive(Copy)]
    Y(f32), range -1.0 ..= 1.0
}

named_value! {
    /// Cartesian Z coordinate, -1 bottom to +1 top
    #[derive(Copy)]
    Z(f32), range -1.0 ..= 1.0
}

impl Default for Distance {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Default for Z {
    fn default() -> Self {
        Self(0.0)
    }
}

named_string! {
    /// Horizontal screen edge
    HorizontalEdge, one_of ["left", "right"]
}

named_string! {
    /// Vertical screen edge
    VerticalEdge, one_of ["top", "bottom"]
}

/// Locks a position to the edge of the screen
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenEdgeLock {
    pub horizontal: Option<HorizontalEdge>,
    pub vertical: Option<VerticalEdge>,
}

impl ScreenEdgeLock {
    pub fn horizontal(edge: &str) -> AdmResult<Self> {
        Ok(Self {
            horizontal: Some(HorizontalEdge::new(edge)?),
            vertical: None,
        })
    }

    pub fn vertical(edge: &str) -> AdmResult<Self> {
        Ok(Self {
            horizontal: None,
            vertical: Some(VerticalEdge::new(edge)?),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}
