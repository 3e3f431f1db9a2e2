//! Type and format descriptors
//!
//! The type descriptor (`typeLabel` / `typeDefinition`) tells which kind of
//! audio a pack or channel carries and is the `yyyy` section of the format
//! IDs. The format descriptor (`formatLabel` / `formatDefinition`) is the
//! sample format of stream and track formats.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AdmError, AdmResult};

/// Audio type carried by packs, channels, streams, tracks and blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum TypeDescriptor {
    #[default]
    Undefined = 0x0000,
    DirectSpeakers = 0x0001,
    Matrix = 0x0002,
    Objects = 0x0003,
    Hoa = 0x0004,
    Binaural = 0x0005,
}

impl TypeDescriptor {
    pub const ALL: [Self; 6] = [
        Self::Undefined,
        Self::DirectSpeakers,
        Self::Matrix,
        Self::Objects,
        Self::Hoa,
        Self::Binaural,
    ];

    /// Numeric value used in labels and IDs
    #[inline]
    pub fn value(self) -> u16 {
        self as u16
    }

    /// Descriptor for a numeric value
    pub fn from_value(value: u16) -> AdmResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.value() == value)
            .ok_or_else(|| AdmError::InvalidValue {
                name: "TypeDescriptor",
                value: format!("{value:#06x}"),
                allowed: "0x0000..=0x0005".into(),
            })
    }

    /// Name used as `typeDefinition`
    pub fn definition(self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::DirectSpeakers => "DirectSpeakers",
            Self::Matrix => "Matrix",
            Self::Objects => "Objects",
            Self::Hoa => "HOA",
            Self::Binaural => "Binaural",
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition())
    }
}

/// Parse a `typeLabel` (`"0003"`)
pub fn parse_type_label(label: &str) -> AdmResult<TypeDescriptor> {
    let value = parse_label(label, "typeLabel")?;
    TypeDescriptor::from_value(value)
}

/// Format a `typeLabel` (`"0003"`)
pub fn format_type_label(descriptor: TypeDescriptor) -> String {
    format!("{:04x}", descriptor.value())
}

/// Parse a `typeDefinition` (`"Objects"`)
pub fn parse_type_definition(definition: &str) -> AdmResult<TypeDescriptor> {
    TypeDescriptor::ALL
        .into_iter()
        .find(|t| t.definition() == definition)
        .ok_or_else(|| AdmError::InvalidString {
            name: "typeDefinition",
            value: definition.to_string(),
            allowed: TypeDescriptor::ALL.map(|t| t.definition()).join(", "),
        })
}

/// Format a `typeDefinition` (`"Objects"`)
pub fn format_type_definition(descriptor: TypeDescriptor) -> String {
    descriptor.definition().to_string()
}

/// Sample format of stream and track formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(u16)]
pub enum FormatDescriptor {
    #[default]
    Undefined = 0x0000,
    Pcm = 0x0001,
}

impl FormatDescriptor {
    pub const ALL: [Self; 2] = [Self::Undefined, Self::Pcm];

    #[inline]
    pub fn value(self) -> u16 {
        self as u16
    }

    pub fn from_value(value: u16) -> AdmResult<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.value() == value)
            .ok_or_else(|| AdmError::InvalidValue {
                name: "FormatDescriptor",
                value: format!("{value:#06x}"),
                allowed: "0x0000..=0x0001".into(),
            })
    }

    /// Name used as `formatDefinition`
    pub fn definition(self) -> &'static str {
        match self {
            Self::Undefined => "Undefined",
            Self::Pcm => "PCM",
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition())
    }
}

/// Parse a `formatLabel` (`"0001"`)
pub fn parse_format_label(label: &str) -> AdmResult<FormatDescriptor> {
    let value = parse_label(label, "formatLabel")?;
    FormatDescriptor::from_value(value)
}

/// Format a `formatLabel` (`"0001"`)
pub fn format_format_label(descriptor: FormatDescriptor) -> String {
    format!("{:04x}", descriptor.value())
}

/// Parse a `formatDefinition` (`"PCM"`)
pub fn parse_format_definition(definition: &str) -> AdmResult<FormatDescriptor> {
    FormatDescriptor::ALL
        .into_iter()
        .find(|f| f.definition() == definition)
        .ok_or_else(|| AdmError::InvalidString {
            name: "formatDefinition",
            value: definition.to_string(),
            allowed: FormatDescriptor::ALL.map(|f| f.definition()).join(", "),
        })
}

/// Format a `formatDefinition` (`"PCM"`)
pub fn format_format_definition(descriptor: FormatDescriptor) -> String {
    descriptor.definition().to_string()
}

fn parse_label(label: &str, what: &'static str) -> AdmResult<u16> {
    if label.len() != 4 || !label.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AdmError::parse(what, label, "xxxx", "expected 4 hex digits"));
    }
    u16::from_str_radix(label, 16)
        .map_err(|_| AdmError::parse(what, label, "xxxx", "invalid hex digit"))
}
