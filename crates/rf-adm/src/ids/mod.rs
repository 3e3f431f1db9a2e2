//! ADM identifiers
//!
//! Every element kind has its own ID type built from 1-3 sections laid out
//! in a fixed template such as `AT_yyyyxxxx_zz`:
//! - literal characters (prefix letters and `_`) must match exactly
//! - each run of a designator (`x`, `y`, `z`) is one hex section of fixed width
//!
//! Parsing checks the length first, then the prefix, then every section.
//! Formatting zero-pads each section and renders lowercase hex.

mod element_ids;
mod format_ids;
mod frame_ids;

pub use element_ids::*;
pub use format_ids::*;
pub use frame_ids::*;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::{AdmError, AdmResult};

/// Textual layout of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdTemplate {
    /// ID type name used in error messages
    pub name: &'static str,
    /// Canonical format, e.g. `AC_yyyyxxxx`
    pub format: &'static str,
}

/// One hex section of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Section {
    designator: u8,
    start: usize,
    width: usize,
}

#[inline]
fn is_designator(b: u8) -> bool {
    matches!(b, b'x' | b'y' | b'z')
}

impl IdTemplate {
    pub const fn new(name: &'static str, format: &'static str) -> Self {
        Self { name, format }
    }

    /// Total string length
    #[inline]
    pub fn len(&self) -> usize {
        self.format.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.format.is_empty()
    }

    /// Literal prefix before the first section (`AC_`)
    pub fn prefix(&self) -> &'static str {
        let end = self
            .format
            .bytes()
            .position(is_designator)
            .unwrap_or(self.format.len());
        &self.format[..end]
    }

    fn sections(&self) -> Vec<Section> {
        let bytes = self.format.as_bytes();
        let mut sections: Vec<Section> = Vec::new();
        for (i, &b) in bytes.iter().enumerate() {
            if !is_designator(b) {
                continue;
            }
            match sections.last_mut() {
                Some(last) if last.designator == b && last.start + last.width == i => last.width += 1,
                _ => sections.push(Section {
                    designator: b,
                    start: i,
                    width: 1,
                }),
            }
        }
        sections
    }

    /// Widths of all sections in order
    pub fn section_widths(&self) -> Vec<usize> {
        self.sections().iter().map(|s| s.width).collect()
    }

    fn error(&self, input: &str, reason: impl Into<String>) -> AdmError {
        AdmError::parse(self.name, input, self.format, reason)
    }

    /// Split `input` into its raw section values
    pub fn parse(&self, input: &str) -> AdmResult<Vec<u64>> {
        if input.len() != self.format.len() {
            return Err(self.error(
                input,
                format!("expected {} characters, got {}", self.format.len(), input.len()),
            ));
        }

        let prefix = self.prefix();
        if !input.starts_with(prefix) {
            return Err(self.error(input, format!("expected prefix \"{prefix}\"")));
        }

        for (i, (t, c)) in self.format.bytes().zip(input.bytes()).enumerate() {
            if is_designator(t) {
                if !c.is_ascii_hexdigit() {
                    return Err(self.error(input, format!("invalid hex digit at position {i}")));
                }
            } else if t != c {
                return Err(self.error(
                    input,
                    format!("expected '{}' at position {i}", t as char),
                ));
            }
        }

        self.sections()
            .iter()
            .map(|s| {
                let digits = &input[s.start..s.start + s.width];
                u64::from_str_radix(digits, 16)
                    .map_err(|_| self.error(input, format!("invalid section \"{digits}\"")))
            })
            .collect()
    }

    /// Render raw section values; hex is lowercase and zero-padded
    pub fn format(&self, values: &[u64]) -> String {
        let sections = self.sections();
        debug_assert_eq!(sections.len(), values.len());

        let mut out = String::with_capacity(self.format.len());
        let mut pos = 0;
        for (section, value) in sections.iter().zip(values) {
            out.push_str(&self.format[pos..section.start]);
            out.push_str(&format!("{:0width$x}", value, width = section.width));
            pos = section.start + section.width;
        }
        out.push_str(&self.format[pos..]);
        out
    }
}

/// Identifier of a top-level element kind
pub trait ElementId:
    Copy + Eq + Ord + Hash + Default + fmt::Debug + fmt::Display + FromStr<Err = AdmError>
{
    /// Canonical template
    const TEMPLATE: IdTemplate;

    /// True for the unassigned ID (numeric value 0)
    fn is_unset(&self) -> bool;

    /// Parse the textual form
    fn parse(input: &str) -> AdmResult<Self>;

    /// Canonical textual form
    fn format(&self) -> String;

    /// First ID tried by automatic assignment; type sections are kept
    fn first_candidate(&self) -> Self;

    /// Next ID in assignment order
    fn next_candidate(&self) -> AdmResult<Self>;
}

/// First value handed out for non common-definition elements
pub const FIRST_ASSIGNED_VALUE: u16 = 0x1001;

/// Narrow a parsed section to its typed range
pub(crate) fn narrow<T: TryFrom<u64>>(template: &IdTemplate, input: &str, raw: u64) -> AdmResult<T> {
    T::try_from(raw).map_err(|_| template.error(input, format!("section value {raw:#x} too large")))
}

/// Numeric section of an ID with `0` as the unassigned value
macro_rules! id_value {
    ($(#[$meta:meta])* $name:ident($inner:ty), max $max:literal) => {
        $crate::named_type::named_value! {
            $(#[$meta])*
            #[derive(Copy, Eq, Ord, Hash, Default)]
            $name($inner), range 0 ..= $max
        }

        impl $name {
            pub const MAX: $inner = $max;

            /// Value plus one, failing past `MAX`
            pub fn next(&self) -> $crate::AdmResult<Self> {
                let next = self.0.checked_add(1).ok_or_else(|| $crate::AdmError::OutOfRange {
                    name: stringify!($name),
                    value: format!("{:#x} + 1", self.0),
                    range: format!("[0, {:#x}]", Self::MAX),
                })?;
                Self::new(next)
            }
        }
    };
}

/// `Display`, `FromStr` and string serde for an `ElementId`
macro_rules! id_text_impls {
    ($name:ident) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::ids::ElementId::format(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::AdmError;

            fn from_str(s: &str) -> $crate::AdmResult<Self> {
                <Self as $crate::ids::ElementId>::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&$crate::ids::ElementId::format(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::ids::ElementId>::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use id_text_impls;
pub(crate) use id_value;

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: IdTemplate = IdTemplate::new("AudioTrackFormatId", "AT_yyyyxxxx_zz");

    #[test]
    fn test_template_sections() {
        assert_eq!(TRACK.prefix(), "AT_");
        assert_eq!(TRACK.section_widths(), vec![4, 4, 2]);
        assert_eq!(TRACK.len(), 14);
    }

    #[test]
    fn test_template_parse() {
        assert_eq!(TRACK.parse("AT_00031001_0A").unwrap(), vec![3, 0x1001, 0x0a]);
        assert_eq!(TRACK.parse("AT_0003100f_01").unwrap(), vec![3, 0x100f, 1]);
    }

    #[test]
    fn test_template_errors() {
        let err = TRACK.parse("AT_00031001").unwrap_err();
        assert!(err.to_string().contains("AT_yyyyxxxx_zz"));

        assert!(TRACK.parse("AX_00031001_01").unwrap_err().to_string().contains("prefix"));
        assert!(TRACK.parse("AT_00031001-01").unwrap_err().to_string().contains("'_'"));
        assert!(TRACK.parse("AT_0003100g_01").unwrap_err().to_string().contains("hex"));
    }

    #[test]
    fn test_template_format() {
        assert_eq!(TRACK.format(&[1, 0xabc, 2]), "AT_00010abc_02");
    }

    fn reformat<I: ElementId>(text: &str) -> AdmResult<String> {
        let id = I::parse(text)?;
        assert_eq!(text.parse::<I>()?, id);
        Ok(id.format())
    }

    type Reformat = fn(&str) -> AdmResult<String>;

    #[test]
    fn test_every_id_kind_round_trips() {
        // (kind, canonical texts up to the section maxima, texts one past them)
        let cases: &[(Reformat, &[&str], &[&str])] = &[
            (reformat::<AudioProgrammeId>, &["APR_0001", "APR_1001", "APR_ffff"], &["APR_10000"]),
            (reformat::<AudioContentId>, &["ACO_1001", "ACO_ffff"], &["ACO_10000"]),
            (reformat::<AudioObjectId>, &["AO_1001", "AO_ffff"], &["AO_10000"]),
            (
                reformat::<AudioTrackUidId>,
                &["ATU_00000000", "ATU_00000001", "ATU_ffffffff"],
                &["ATU_100000000"],
            ),
            (
                reformat::<AudioPackFormatId>,
                &["AP_00010001", "AP_0005ffff"],
                &["AP_000510000", "AP_0006ffff"],
            ),
            (
                reformat::<AudioChannelFormatId>,
                &["AC_00031001", "AC_0005ffff"],
                &["AC_000510000"],
            ),
            (
                reformat::<AudioStreamFormatId>,
                &["AS_00011001", "AS_0005ffff"],
                &["AS_000510000"],
            ),
            (
                reformat::<AudioTrackFormatId>,
                &["AT_00011001_01", "AT_0005ffff_ff"],
                &["AT_0005ffff_100"],
            ),
            (
                reformat::<AudioBlockFormatId>,
                &["AB_00031001_00000001", "AB_0005ffff_ffffffff"],
                &["AB_0005ffff_100000000"],
            ),
            (
                reformat::<FrameFormatId>,
                &["FF_00000001", "FF_ffffffff", "FF_00000001_01", "FF_ffffffff_ff"],
                &["FF_100000000", "FF_ffffffff_100"],
            ),
            (reformat::<TransportId>, &["TP_0001", "TP_ffff"], &["TP_10000"]),
        ];

        for (reformat, valid, past) in cases {
            for text in *valid {
                assert_eq!(reformat(text).unwrap(), *text);
            }
            for text in *past {
                assert!(reformat(text).is_err(), "{text} should be rejected");
            }
        }
    }

    #[test]
    fn test_value_sections_stop_at_max() {
        assert_eq!(AudioTrackUidIdValue::MAX, 0xFFFF_FFFF);
        let max = AudioTrackUidIdValue::new(AudioTrackUidIdValue::MAX).unwrap();
        assert!(matches!(max.next(), Err(AdmError::OutOfRange { .. })));

        let max = FrameFormatIdValue::new(FrameFormatIdValue::MAX).unwrap();
        assert!(max.next().is_err());
        let max = AudioBlockFormatIdCounter::new(AudioBlockFormatIdCounter::MAX).unwrap();
        let err = max.next().unwrap_err().to_string();
        assert!(err.contains("0xffffffff"), "{err}");

        assert!(AudioObjectIdValue::new(0xFFFF).unwrap().next().is_err());
    }
}
