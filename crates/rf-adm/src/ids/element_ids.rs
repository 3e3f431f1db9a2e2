//! Single-section IDs: programme, content, object and track UID

use super::{ElementId, FIRST_ASSIGNED_VALUE, IdTemplate, id_text_impls, id_value, narrow};
use crate::AdmResult;

/// ID made of one numeric section
macro_rules! simple_id {
    (
        $(#[$meta:meta])*
        $name:ident, $value:ident($inner:ty), max $max:literal, start $start:expr, $format:literal
    ) => {
        id_value! {
            #[doc = concat!("Numeric section of ", stringify!($name))]
            $value($inner), max $max
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name {
            value: $value,
        }

        impl $name {
            pub fn new(value: $value) -> Self {
                Self { value }
            }

            /// Build from a raw number, validating its range
            pub fn from_value(raw: $inner) -> AdmResult<Self> {
                Ok(Self::new($value::new(raw)?))
            }

            #[inline]
            pub fn value(&self) -> $value {
                self.value
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
                let value = narrow::<$inner>(&Self::TEMPLATE, input, raw[0])?;
                Ok(Self::new($value::new(value)?))
            }

            fn format(&self) -> String {
                Self::TEMPLATE.format(&[self.value.get() as u64])
            }

            fn first_candidate(&self) -> Self {
                Self::new($value($start as $inner))
            }

            fn next_candidate(&self) -> AdmResult<Self> {
                Ok(Self::new(self.value.next()?))
            }
        }

        id_text_impls!($name);
    };
}

simple_id! {
    /// `APR_xxxx`
    AudioProgrammeId, AudioProgrammeIdValue(u16), max 0xFFFF, start FIRST_ASSIGNED_VALUE, "APR_xxxx"
}

simple_id! {
    /// `ACO_xxxx`
    AudioContentId, AudioContentIdValue(u16), max 0xFFFF, start FIRST_ASSIGNED_VALUE, "ACO_xxxx"
}

simple_id! {
    /// `AO_xxxx`
    AudioObjectId, AudioObjectIdValue(u16), max 0xFFFF, start FIRST_ASSIGNED_VALUE, "AO_xxxx"
}

simple_id! {
    /// `ATU_xxxxxxxx`; value 0 is the silent track
    AudioTrackUidId, AudioTrackUidIdValue(u32), max 0xFFFFFFFF, start 1, "ATU_xxxxxxxx"
}

impl AudioTrackUidId {
    /// The silent track `ATU_00000000`
    pub const SILENT: Self = Self {
        value: AudioTrackUidIdValue(0),
    };
}
