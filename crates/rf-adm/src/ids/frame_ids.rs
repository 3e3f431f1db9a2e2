//! Serial ADM frame identifiers

use super::{ElementId, IdTemplate, id_text_impls, id_value, narrow};
use crate::{AdmError, AdmResult};

id_value! {
    /// Numeric section of FrameFormatId
    FrameFormatIdValue(u32), max 0xFFFFFFFF
}

id_value! {
    /// Chunk counter of FrameFormatId
    FrameFormatIdCounter(u8), max 0xFF
}

/// `FF_xxxxxxxx` or, with a chunk counter, `FF_xxxxxxxx_zz`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameFormatId {
    value: FrameFormatIdValue,
    counter: Option<FrameFormatIdCounter>,
}

impl FrameFormatId {
    /// Form with a chunk counter
    pub const LONG_TEMPLATE: IdTemplate = IdTemplate::new("FrameFormatId", "FF_xxxxxxxx_zz");

    pub fn new(value: FrameFormatIdValue, counter: Option<FrameFormatIdCounter>) -> Self {
        Self { value, counter }
    }

    pub fn from_parts(value: u32, counter: Option<u8>) -> AdmResult<Self> {
        let counter = counter.map(FrameFormatIdCounter::new).transpose()?;
        Ok(Self::new(FrameFormatIdValue::new(value)?, counter))
    }

    #[inline]
    pub fn value(&self) -> FrameFormatIdValue {
        self.value
    }

    #[inline]
    pub fn counter(&self) -> Option<FrameFormatIdCounter> {
        self.counter
    }

    pub fn set_value(&mut self, value: FrameFormatIdValue) {
        self.value = value;
    }

    pub fn set_counter(&mut self, counter: Option<FrameFormatIdCounter>) {
        self.counter = counter;
    }
}

impl ElementId for FrameFormatId {
    const TEMPLATE: IdTemplate = IdTemplate::new("FrameFormatId", "FF_xxxxxxxx");

    fn is_unset(&self) -> bool {
        self.value.get() == 0
    }

    fn parse(input: &str) -> AdmResult<Self> {
        let long = &Self::LONG_TEMPLATE;
        let short = &Self::TEMPLATE;

        if input.len() == long.len() {
            let raw = long.parse(input)?;
            let value = narrow::<u32>(long, input, raw[0])?;
            let counter = narrow::<u8>(long, input, raw[1])?;
            Ok(Self::new(
                FrameFormatIdValue::new(value)?,
                Some(FrameFormatIdCounter::new(counter)?),
            ))
        } else if input.len() == short.len() {
            let raw = short.parse(input)?;
            let value = narrow::<u32>(short, input, raw[0])?;
            Ok(Self::new(FrameFormatIdValue::new(value)?, None))
        } else {
            Err(AdmError::parse(
                "FrameFormatId",
                input,
                format!("{} or {}", short.format, long.format),
                format!("unexpected length {}", input.len()),
            ))
        }
    }

    fn format(&self) -> String {
        match self.counter {
            Some(counter) => {
                Self::LONG_TEMPLATE.format(&[self.value.get() as u64, counter.get() as u64])
            }
            None => Self::TEMPLATE.format(&[self.value.get() as u64]),
        }
    }

    fn first_candidate(&self) -> Self {
        Self::new(FrameFormatIdValue(1), self.counter)
    }

    fn next_candidate(&self) -> AdmResult<Self> {
        Ok(Self::new(self.value.next()?, self.counter))
    }
}

id_text_impls!(FrameFormatId);

id_value! {
    /// Numeric section of TransportId
    TransportIdValue(u16), max 0xFFFF
}

/// `TP_xxxx`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TransportId {
    value: TransportIdValue,
}

impl TransportId {
    pub fn new(value: TransportIdValue) -> Self {
        Self { value }
    }

    pub fn from_value(value: u16) -> AdmResult<Self> {
        Ok(Self::new(TransportIdValue::new(value)?))
    }

    #[inline]
    pub fn value(&self) -> TransportIdValue {
        self.value
    }
}

impl ElementId for TransportId {
    const TEMPLATE: IdTemplate = IdTemplate::new("TransportId", "TP_xxxx");

    fn is_unset(&self) -> bool {
        self.value.get() == 0
    }

    fn parse(input: &str) -> AdmResult<Self> {
        let raw = Self::TEMPLATE.parse(input)?;
        let value = narrow::<u16>(&Self::TEMPLATE, input, raw[0])?;
        Ok(Self::new(TransportIdValue::new(value)?))
    }

    fn format(&self) -> String {
        Self::TEMPLATE.format(&[self.value.get() as u64])
    }

    fn first_candidate(&self) -> Self {
        Self::new(TransportIdValue(1))
    }

    fn next_candidate(&self) -> AdmResult<Self> {
        Ok(Self::new(self.value.next()?))
    }
}

id_text_impls!(TransportId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format_short_and_long() {
        let short = FrameFormatId::parse("FF_00000001").unwrap();
        assert_eq!(short.value().get(), 1);
        assert!(short.counter().is_none());
        assert_eq!(short.format(), "FF_00000001");

        let long = FrameFormatId::parse("FF_0000000A_02").unwrap();
        assert_eq!(long.value().get(), 10);
        assert_eq!(long.counter().unwrap().get(), 2);
        assert_eq!(long.format(), "FF_0000000a_02");
    }

    #[test]
    fn test_frame_format_bad_length_names_both_forms() {
        let err = FrameFormatId::parse("FF_0001").unwrap_err().to_string();
        assert!(err.contains("FF_xxxxxxxx or FF_xxxxxxxx_zz"));
    }

    #[test]
    fn test_frame_format_missing_counter_sorts_first() {
        let a = FrameFormatId::from_parts(1, None).unwrap();
        let b = FrameFormatId::from_parts(1, Some(0)).unwrap();
        assert!(a < b);
        assert_ne!(a, b);
    }

    #[test]
    fn test_transport_id() {
        let id: TransportId = "TP_0001".parse().unwrap();
        assert_eq!(id.value().get(), 1);
        assert_eq!(id.to_string(), "TP_0001");
        assert!(TransportId::parse("TP_00001").is_err());
    }
}
