//! Named types
//!
//! Every scalar ADM attribute is a validated wrapper around one primitive.
//! Validation runs in `new`, so an element can only ever hold values that
//! passed their check:
//! - no check
//! - numeric range `[min, max]`, min-only, max-only
//! - non-negative, for any value with `is_negative()`
//! - enumerated literal values
//! - enumerated string choices

/// Define a named type wrapping a `Copy` primitive.
///
/// ```rust,ignore
/// named_value! {
///     /// Horizontal angle in degrees
///     #[derive(Copy)]
///     Azimuth(f32), range -180.0 ..= 180.0
/// }
/// ```
macro_rules! named_value {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $crate::named_type::named_value!(@define $(#[$meta])* $name, $inner, value, {
            let _ = value;
            Ok(())
        });
    };
    ($(#[$meta:meta])* $name:ident($inner:ty), range $min:literal ..= $max:literal) => {
        $crate::named_type::named_value!(@define $(#[$meta])* $name, $inner, value, {
            if (($min as $inner)..=($max as $inner)).contains(value) {
                Ok(())
            } else {
                Err($crate::AdmError::OutOfRange {
                    name: stringify!($name),
                    value: value.to_string(),
                    range: format!("[{}, {}]", $min as $inner, $max as $inner),
                })
            }
        });
    };
    ($(#[$meta:meta])* $name:ident($inner:ty), min $min:literal) => {
        $crate::named_type::named_value!(@define $(#[$meta])* $name, $inner, value, {
            if *value >= ($min as $inner) {
                Ok(())
            } else {
                Err($crate::AdmError::OutOfRange {
                    name: stringify!($name),
                    value: value.to_string(),
                    range: format!(">= {}", $min as $inner),
                })
            }
        });
    };
    ($(#[$meta:meta])* $name:ident($inner:ty), max $max:literal) => {
        $crate::named_type::named_value!(@define $(#[$meta])* $name, $inner, value, {
            if *value <= ($max as $inner) {
                Ok(())
            } else {
                Err($crate::AdmError::OutOfRange {
                    name: stringify!($name),
                    value: value.to_string(),
                    range: format!("<= {}", $max as $inner),
                })
            }
        });
    };
    ($(#[$meta:meta])* $name:ident($inner:ty), non_negative) => {
        $crate::named_type::named_value!(@define $(#[$meta])* $name, $inner, value, {
            if value.is_negative() {
                Err($crate::AdmError::OutOfRange {
                    name: stringify!($name),
                    value: value.to_string(),
                    range: ">= 0".into(),
                })
            } else {
                Ok(())
            }
        });
    };
    ($(#[$meta:meta])* $name:ident($inner:ty), one_of [$($allowed:literal),+ $(,)?]) => {
        $crate::named_type::named_value!(@define $(#[$meta])* $name, $inner, value, {
            if [$($allowed),+].contains(value) {
                Ok(())
            } else {
                Err($crate::AdmError::InvalidValue {
                    name: stringify!($name),
                    value: value.to_string(),
                    allowed: stringify!($($allowed),+).to_string(),
                })
            }
        });
    };
    (@define $(#[$meta:meta])* $name:ident, $inner:ty, $value:ident, $check:block) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, PartialOrd)]
        pub struct $name(pub(crate) $inner);

        impl $name {
            /// Create a validated value
            pub fn new($value: $inner) -> $crate::AdmResult<Self> {
                Self::validate(&$value)?;
                Ok(Self($value))
            }

            /// Check a raw value against this type's constraint
            pub fn validate($value: &$inner) -> $crate::AdmResult<()> $check

            /// Wrapped value
            #[inline]
            pub fn get(&self) -> $inner {
                self.0
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = $crate::AdmError;

            fn try_from(value: $inner) -> $crate::AdmResult<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> $inner {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <$inner as serde::Deserialize>::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Define a named type wrapping a `String`.
///
/// Without a choice list `new` is infallible; with `one_of [...]` it
/// returns `AdmResult<Self>`.
macro_rules! named_string {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[inline]
            pub fn get(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        $crate::named_type::named_string!(@common $name);

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                Ok(Self(<String as serde::Deserialize>::deserialize(deserializer)?))
            }
        }
    };
    ($(#[$meta:meta])* $name:ident, one_of [$($allowed:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) String);

        impl $name {
            /// Permitted choices
            pub const CHOICES: &'static [&'static str] = &[$($allowed),+];

            pub fn new(value: impl Into<String>) -> $crate::AdmResult<Self> {
                let value = value.into();
                Self::validate(&value)?;
                Ok(Self(value))
            }

            pub fn validate(value: &str) -> $crate::AdmResult<()> {
                if Self::CHOICES.contains(&value) {
                    Ok(())
                } else {
                    Err($crate::AdmError::InvalidString {
                        name: stringify!($name),
                        value: value.to_string(),
                        allowed: Self::CHOICES.join(", "),
                    })
                }
            }

            #[inline]
            pub fn get(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::AdmError;

            fn try_from(value: &str) -> $crate::AdmResult<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::AdmError;

            fn try_from(value: String) -> $crate::AdmResult<Self> {
                Self::new(value)
            }
        }

        $crate::named_type::named_string!(@common $name);

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
    (@common $name:ident) => {
        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }
    };
}

pub(crate) use named_string;
pub(crate) use named_value;

#[cfg(test)]
mod tests {
    use crate::AdmError;

    named_value! {
        #[derive(Copy)]
        TestAngle(f32), range -180.0 ..= 180.0
    }

    named_value! {
        #[derive(Copy)]
        TestDepth(u32), one_of [16, 24, 32]
    }

    named_value! {
        #[derive(Copy)]
        TestLevel(f32), max 0.0
    }

    named_string! {
        TestEdge, one_of ["left", "right"]
    }

    #[test]
    fn test_range_validation() {
        assert_eq!(TestAngle::new(30.0).unwrap().get(), 30.0);
        assert!(TestAngle::new(-180.0).is_ok());
        assert!(matches!(
            TestAngle::new(180.5),
            Err(AdmError::OutOfRange { name: "TestAngle", .. })
        ));
        assert!(TestAngle::new(f32::NAN).is_err());
    }

    #[test]
    fn test_literal_choices() {
        assert!(TestDepth::new(24).is_ok());
        match TestDepth::new(20) {
            Err(AdmError::InvalidValue { value, allowed, .. }) => {
                assert_eq!(value, "20");
                assert_eq!(allowed, "16, 24, 32");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_max_only() {
        assert!(TestLevel::new(-62.0).is_ok());
        assert!(TestLevel::new(0.5).is_err());
    }

    #[test]
    fn test_string_choices() {
        assert_eq!(TestEdge::new("left").unwrap().get(), "left");
        assert!(matches!(
            TestEdge::new("centre"),
            Err(AdmError::InvalidString { .. })
        ));
    }

    #[test]
    fn test_ordering_is_pointwise() {
        let a = TestAngle::new(-10.0).unwrap();
        let b = TestAngle::new(10.0).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serde_validates() {
        let ok: TestDepth = serde_json::from_str("16").unwrap();
        assert_eq!(ok.get(), 16);
        assert!(serde_json::from_str::<TestDepth>("17").is_err());
        assert_eq!(serde_json::to_string(&TestEdge::new("right").unwrap()).unwrap(), "\"right\"");
    }
}
