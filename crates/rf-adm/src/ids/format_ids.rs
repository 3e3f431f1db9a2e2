//! Format IDs carrying a type descriptor section
//!
//! - `AP_yyyyxxxx`, `AC_yyyyxxxx`, `AS_yyyyxxxx`: type + value
//! - `AT_yyyyxxxx_zz`: type + value + 2-digit counter
//! - `AB_yyyyxxxx_zzzzzzzz`: type + value + 8-digit counter

use super::{ElementId, FIRST_ASSIGNED_VALUE, IdTemplate, id_text_impls, id_value, narrow};
use crate::{AdmResult, TypeDescriptor};

fn parse_type(template: &IdTemplate, input: &str, raw: u64) -> AdmResult<TypeDescriptor> {
    TypeDescriptor::from_value(narrow::<u16>(template, input, raw)?)
}

/// Type + value ID
macro_rules! typed_id {
    (
        $(#[$meta:meta])*
        $name:ident, $value:ident, $format:literal
    ) => {
        id_value! {
            #[doc = concat!("Numeric section of ", stringify!($name))]
            $value(u16), max 0xFFFF
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name {
            type_descriptor: TypeDescriptor,
            value: $value,
        }

        impl $name {
            pub fn new(type_descriptor: TypeDescriptor, value: $value) -> Self {
                Self {
                    type_descriptor,
                    value,
                }
            }

            /// Build from raw numbers, validating the value range
            pub fn from_parts(type_descriptor: TypeDescriptor, value: u16) -> AdmResult<Self> {
                Ok(Self::new(type_descriptor, $value::new(value)?))
            }

            #[inline]
            pub fn type_descriptor(&self) -> TypeDescriptor {
                self.type_descriptor
            }

            #[inline]
            pub fn value(&self) -> $value {
                self.value
            }

            pub fn set_type_descriptor(&mut self, type_descriptor: TypeDescriptor) {
                self.type_descriptor = type_descriptor;
            }

            pub fn set_value(&mut self, value: $value) {
                self.value = value;
            }
        }

        impl ElementId for $name {
            const TEMPLATE: IdTemplate = IdTemplate::new(stringify!($name), $format);

            fn is_unset(&self) -> bool {
                self.value.get() == 0
            }

            fn parse(input: &str) -> AdmResult<Self> {
                let raw = Self::TEMPLATE.parse(input)?;
                let type_descriptor = parse_type(&Self::TEMPLATE, input, raw[0])?;
                let value = narrow::<u16>(&Self::TEMPLATE, input, raw[1])?;
                Ok(Self::new(type_descriptor, $value::new(value)?))
            }

            fn format(&self) -> String {
                Self::TEMPLATE.format(&[
                    self.type_descriptor.value() as u64,
                    self.value.get() as u64,
                ])
            }

            fn first_candidate(&self) -> Self {
                Self::new(self.type_descriptor, $value(FIRST_ASSIGNED_VALUE))
            }

            fn next_candidate(&self) -> AdmResult<Self> {
                Ok(Self::new(self.type_descriptor, self.value.next()?))
            }
        }

        id_text_impls!($name);
    };
}

typed_id! {
    /// `AP_yyyyxxxx`
    AudioPackFormatId, AudioPackFormatIdValue, "AP_yyyyxxxx"
}

typed_id! {
    /// `AC_yyyyxxxx`
    AudioChannelFormatId, AudioChannelFormatIdValue, "AC_yyyyxxxx"
}

typed_id! {
    /// `AS_yyyyxxxx`
    AudioStreamFormatId, AudioStreamFormatIdValue, "AS_yyyyxxxx"
}

/// Type + value + counter ID
macro_rules! counted_id {
    (
        $(#[$meta:meta])*
        $name:ident, $value:ident, $counter:ident($counter_inner:ty), max $counter_max:literal, $format:literal
    ) => {
        id_value! {
            #[doc = concat!("Numeric section of ", stringify!($name))]
            $value(u16), max 0xFFFF
        }

        id_value! {
            #[doc = concat!("Counter section of ", stringify!($name))]
            $counter($counter_inner), max $counter_max
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name {
            type_descriptor: TypeDescriptor,
            value: $value,
            counter: $counter,
        }

        impl $name {
            pub fn new(type_descriptor: TypeDescriptor, value: $value, counter: $counter) -> Self {
                Self {
                    type_descriptor,
                    value,
                    counter,
                }
            }

            /// Build from raw numbers, validating ranges
            pub fn from_parts(
                type_descriptor: TypeDescriptor,
                value: u16,
                counter: $counter_inner,
            ) -> AdmResult<Self> {
                Ok(Self::new(type_descriptor, $value::new(value)?, $counter::new(counter)?))
            }

            #[inline]
            pub fn type_descriptor(&self) -> TypeDescriptor {
                self.type_descriptor
            }

            #[inline]
            pub fn value(&self) -> $value {
                self.value
            }

            #[inline]
            pub fn counter(&self) -> $counter {
                self.counter
            }

            pub fn set_type_descriptor(&mut self, type_descriptor: TypeDescriptor) {
                self.type_descriptor = type_descriptor;
            }

            pub fn set_value(&mut self, value: $value) {
                self.value = value;
            }

            pub fn set_counter(&mut self, counter: $counter) {
                self.counter = counter;
            }
        }

        impl ElementId for $name {
            const TEMPLATE: IdTemplate = IdTemplate::new(stringify!($name), $format);

            fn is_unset(&self) -> bool {
                self.value.get() == 0
            }

            fn parse(input: &str) -> AdmResult<Self> {
                let raw = Self::TEMPLATE.parse(input)?;
                let type_descriptor = parse_type(&Self::TEMPLATE, input, raw[0])?;
                let value = narrow::<u16>(&Self::TEMPLATE, input, raw[1])?;
                let counter = narrow::<$counter_inner>(&Self::TEMPLATE, input, raw[2])?;
                Ok(Self::new(type_descriptor, $value::new(value)?, $counter::new(counter)?))
            }

            fn format(&self) -> String {
                Self::TEMPLATE.format(&[
                    self.type_descriptor.value() as u64,
                    self.value.get() as u64,
                    self.counter.get() as u64,
                ])
            }

            fn first_candidate(&self) -> Self {
                let counter = if self.counter.get() == 0 { $counter(1) } else { self.counter };
                Self::new(self.type_descriptor, $value(FIRST_ASSIGNED_VALUE), counter)
            }

            fn next_candidate(&self) -> AdmResult<Self> {
                Ok(Self::new(self.type_descriptor, self.value.next()?, self.counter))
            }
        }

        id_text_impls!($name);
    };
}

counted_id! {
    /// `AT_yyyyxxxx_zz`
    AudioTrackFormatId, AudioTrackFormatIdValue, AudioTrackFormatIdCounter(u8), max 0xFF,
    "AT_yyyyxxxx_zz"
}

counted_id! {
    /// `AB_yyyyxxxx_zzzzzzzz`
    AudioBlockFormatId, AudioBlockFormatIdValue, AudioBlockFormatIdCounter(u32), max 0xFFFFFFFF,
    "AB_yyyyxxxx_zzzzzzzz"
}

impl From<AudioChannelFormatIdValue> for AudioBlockFormatIdValue {
    fn from(value: AudioChannelFormatIdValue) -> Self {
        Self(value.get())
    }
}

impl From<AudioChannelFormatIdValue> for AudioStreamFormatIdValue {
    fn from(value: AudioChannelFormatIdValue) -> Self {
        Self(value.get())
    }
}

impl From<AudioStreamFormatIdValue> for AudioTrackFormatIdValue {
    fn from(value: AudioStreamFormatIdValue) -> Self {
        Self(value.get())
    }
}

impl AudioBlockFormatId {
    /// Block ID belonging to a channel, with the given counter
    pub fn for_channel(channel: &AudioChannelFormatId, counter: AudioBlockFormatIdCounter) -> Self {
        Self::new(channel.type_descriptor(), channel.value().into(), counter)
    }

    /// True when type and value match the channel ID
    pub fn belongs_to(&self, channel: &AudioChannelFormatId) -> bool {
        self.type_descriptor == channel.type_descriptor() && self.value.get() == channel.value().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_format_id() {
        let id = AudioPackFormatId::parse("AP_00030001").unwrap();
        assert_eq!(id.type_descriptor(), TypeDescriptor::Objects);
        assert_eq!(id.value().get(), 1);
        assert_eq!(id.format(), "AP_00030001");
    }

    #[test]
    fn test_unknown_type_section() {
        assert!(AudioChannelFormatId::parse("AC_00091001").is_err());
    }

    #[test]
    fn test_track_format_id() {
        let id: AudioTrackFormatId = "AT_00010001_01".parse().unwrap();
        assert_eq!(id.type_descriptor(), TypeDescriptor::DirectSpeakers);
        assert_eq!(id.value().get(), 1);
        assert_eq!(id.counter().get(), 1);
        assert_eq!(id.to_string(), "AT_00010001_01");
    }

    #[test]
    fn test_block_format_id() {
        let id = AudioBlockFormatId::parse("AB_00031001_0000000A").unwrap();
        assert_eq!(id.counter().get(), 10);
        assert_eq!(id.format(), "AB_00031001_0000000a");

        let channel = AudioChannelFormatId::parse("AC_00031001").unwrap();
        assert!(id.belongs_to(&channel));

        let counter = AudioBlockFormatIdCounter::new(2).unwrap();
        assert_eq!(
            AudioBlockFormatId::for_channel(&channel, counter).format(),
            "AB_00031001_00000002"
        );
    }

    #[test]
    fn test_assignment_candidates() {
        let pack = AudioPackFormatId::from_parts(TypeDescriptor::Hoa, 0).unwrap();
        assert_eq!(pack.first_candidate().format(), "AP_00041001");

        let track = AudioTrackFormatId::default().first_candidate();
        assert_eq!(track.format(), "AT_00001001_01");
        assert_eq!(track.next_candidate().unwrap().format(), "AT_00001002_01");
    }

    #[test]
    fn test_lexicographic_ordering() {
        let a = AudioTrackFormatId::parse("AT_00011001_02").unwrap();
        let b = AudioTrackFormatId::parse("AT_00021001_01").unwrap();
        let c = AudioTrackFormatId::parse("AT_00021001_02").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_round_trip_lowercases() {
        for s in ["AP_0001000A", "AP_00041FFF", "AP_00051001"] {
            let id = AudioPackFormatId::parse(s).unwrap();
            assert_eq!(id.format(), format!("AP_{}", s[3..].to_lowercase()));
            assert_eq!(AudioPackFormatId::parse(&id.format()).unwrap(), id);
        }
    }
}
