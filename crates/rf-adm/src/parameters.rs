//! Uniform parameter access
//!
//! Every element exposes its fields through one generic surface keyed by the
//! parameter's named type:
//!
//! ```rust,ignore
//! object.set(Importance::new(5)?)?;
//! assert!(object.has::<Importance>());
//! let gain = object.get::<Gain>();        // defaulted: always present
//! object.unset::<Importance>();
//! object.add(Label::new("Dialogue"));     // vector: set-insert
//! ```
//!
//! Fields come in four shapes, all generated by `impl_parameters!`:
//! - required: always present, no `unset`
//! - optional: `has` reflects presence, `unset` clears
//! - defaulted: always present, `is_default` until explicitly set
//! - vector: `add` / `remove` with set semantics, `has` means non-empty

use std::any::type_name;

use crate::{AdmError, AdmResult};

/// Read access to a parameter
pub trait HasParameter<P> {
    /// Current value, including the default of a defaulted field
    fn get_parameter(&self) -> Option<P>;

    fn has_parameter(&self) -> bool {
        self.get_parameter().is_some()
    }

    /// True while a defaulted field has never been set
    fn is_default_parameter(&self) -> bool {
        false
    }
}

/// Write access to a parameter
pub trait SetParameter<P> {
    fn set_parameter(&mut self, value: P) -> AdmResult<()>;
}

/// Removal of an optional, defaulted or vector parameter
pub trait UnsetParameter<P> {
    fn unset_parameter(&mut self);
}

/// Item access to a vector parameter
pub trait VectorParameter<I> {
    /// Insert unless an equal item exists; true when inserted
    fn add_item(&mut self, item: I) -> bool;

    /// Remove the first equal item; true when one was removed
    fn remove_item(&mut self, item: &I) -> bool;
}

/// Marker for types that carry parameters
pub trait ParameterHost {}

/// Generic entry point over the parameter traits
pub trait Parameters: ParameterHost {
    /// Parameter value.
    ///
    /// # Panics
    ///
    /// Panics when an optional parameter is not set; check with
    /// [`has`](Parameters::has) or use [`try_get`](Parameters::try_get).
    fn get<P>(&self) -> P
    where
        Self: HasParameter<P>,
    {
        match self.get_parameter() {
            Some(value) => value,
            None => panic!("{} is not set", type_name::<P>()),
        }
    }

    /// Parameter value, `InvalidAccess` when absent
    fn try_get<P>(&self) -> AdmResult<P>
    where
        Self: HasParameter<P>,
    {
        self.get_parameter()
            .ok_or(AdmError::InvalidAccess(type_name::<P>()))
    }

    fn has<P>(&self) -> bool
    where
        Self: HasParameter<P>,
    {
        self.has_parameter()
    }

    fn is_default<P>(&self) -> bool
    where
        Self: HasParameter<P>,
    {
        self.is_default_parameter()
    }

    fn set<P>(&mut self, value: P) -> AdmResult<()>
    where
        Self: SetParameter<P>,
    {
        self.set_parameter(value)
    }

    fn unset<P>(&mut self)
    where
        Self: UnsetParameter<P>,
    {
        self.unset_parameter()
    }

    fn add<I>(&mut self, item: I) -> bool
    where
        Self: VectorParameter<I>,
    {
        self.add_item(item)
    }

    fn remove<I>(&mut self, item: &I) -> bool
    where
        Self: VectorParameter<I>,
    {
        self.remove_item(item)
    }
}

impl<T: ParameterHost + ?Sized> Parameters for T {}

/// Set-insert into a vector field
pub(crate) fn insert_unique<I: PartialEq>(items: &mut Vec<I>, item: I) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}

/// Remove the first equal item from a vector field
pub(crate) fn remove_first<I: PartialEq>(items: &mut Vec<I>, item: &I) -> bool {
    match items.iter().position(|i| i == item) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Implement the parameter traits for the fields of a host struct.
///
/// ```rust,ignore
/// impl_parameters! {
///     AudioObject {
///         required name: AudioObjectName,
///         optional duration: Duration,
///         defaulted gain: Gain = Gain::default(),
///         vector labels: Label,
///     }
/// }
/// ```
///
/// `fixed` fields are required fields without a setter.
macro_rules! impl_parameters {
    ($host:ty { $($kind:ident $field:ident : $param:ty $(= $default:expr)?),* $(,)? }) => {
        impl $crate::parameters::ParameterHost for $host {}

        $(
            $crate::parameters::impl_parameters!(@$kind $host, $field, $param $(, $default)?);
        )*
    };
    (@fixed $host:ty, $field:ident, $param:ty) => {
        impl $crate::parameters::HasParameter<$param> for $host {
            fn get_parameter(&self) -> Option<$param> {
                Some(self.$field.clone())
            }

            fn has_parameter(&self) -> bool {
                true
            }
        }
    };
    (@required $host:ty, $field:ident, $param:ty) => {
        $crate::parameters::impl_parameters!(@fixed $host, $field, $param);

        impl $crate::parameters::SetParameter<$param> for $host {
            fn set_parameter(&mut self, value: $param) -> $crate::AdmResult<()> {
                self.$field = value;
                Ok(())
            }
        }
    };
    (@optional $host:ty, $field:ident, $param:ty) => {
        impl $crate::parameters::HasParameter<$param> for $host {
            fn get_parameter(&self) -> Option<$param> {
                self.$field.clone()
            }

            fn has_parameter(&self) -> bool {
                self.$field.is_some()
            }
        }

        impl $crate::parameters::SetParameter<$param> for $host {
            fn set_parameter(&mut self, value: $param) -> $crate::AdmResult<()> {
                self.$field = Some(value);
                Ok(())
            }
        }

        impl $crate::parameters::UnsetParameter<$param> for $host {
            fn unset_parameter(&mut self) {
                self.$field = None;
            }
        }
    };
    (@defaulted $host:ty, $field:ident, $param:ty, $default:expr) => {
        impl $crate::parameters::HasParameter<$param> for $host {
            fn get_parameter(&self) -> Option<$param> {
                Some(self.$field.clone().unwrap_or_else(|| $default))
            }

            fn has_parameter(&self) -> bool {
                true
            }

            fn is_default_parameter(&self) -> bool {
                self.$field.is_none()
            }
        }

        impl $crate::parameters::SetParameter<$param> for $host {
            fn set_parameter(&mut self, value: $param) -> $crate::AdmResult<()> {
                self.$field = Some(value);
                Ok(())
            }
        }

        impl $crate::parameters::UnsetParameter<$param> for $host {
            fn unset_parameter(&mut self) {
                self.$field = None;
            }
        }
    };
    (@vector $host:ty, $field:ident, $item:ty) => {
        impl $crate::parameters::HasParameter<Vec<$item>> for $host {
            fn get_parameter(&self) -> Option<Vec<$item>> {
                Some(self.$field.clone())
            }

            fn has_parameter(&self) -> bool {
                !self.$field.is_empty()
            }
        }

        impl $crate::parameters::SetParameter<Vec<$item>> for $host {
            fn set_parameter(&mut self, value: Vec<$item>) -> $crate::AdmResult<()> {
                self.$field.clear();
                for item in value {
                    $crate::parameters::insert_unique(&mut self.$field, item);
                }
                Ok(())
            }
        }

        impl $crate::parameters::UnsetParameter<Vec<$item>> for $host {
            fn unset_parameter(&mut self) {
                self.$field.clear();
            }
        }

        impl $crate::parameters::VectorParameter<$item> for $host {
            fn add_item(&mut self, item: $item) -> bool {
                $crate::parameters::insert_unique(&mut self.$field, item)
            }

            fn remove_item(&mut self, item: &$item) -> bool {
                $crate::parameters::remove_first(&mut self.$field, item)
            }
        }
    };
}

pub(crate) use impl_parameters;
