//! Block positions
//!
//! Objects and DirectSpeakers blocks carry exactly one position, either
//! spherical (azimuth / elevation / distance) or cartesian (X / Y / Z). The
//! active variant decides the coordinate system; the separate [`Cartesian`]
//! flag of a block is derived from it unless set explicitly.

use serde::{Deserialize, Serialize};

use super::common::{Azimuth, Distance, Elevation, ScreenEdgeLock, X, Y, Z};
use crate::named_type::named_value;

named_value! {
    /// Coordinate system flag of a block
    #[derive(Copy, Eq, Ord, Hash, Default)]
    Cartesian(bool)
}

// ═══════════════════════════════════════════════════════════════════════════════
// OBJECTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Polar object position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphericalPosition {
    pub azimuth: Azimuth,
    pub elevation: Elevation,
    pub distance: Distance,
    pub screen_edge_lock: ScreenEdgeLock,
}

impl SphericalPosition {
    pub fn new(azimuth: Azimuth, elevation: Elevation) -> Self {
        Self {
            azimuth,
            elevation,
            distance: Distance::default(),
            screen_edge_lock: ScreenEdgeLock::default(),
        }
    }

    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = distance;
        self
    }
}

impl Default for SphericalPosition {
    fn default() -> Self {
        Self::new(Azimuth(0.0), Elevation(0.0))
    }
}

/// Cartesian object position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianPosition {
    pub x: X,
    pub y: Y,
    pub z: Z,
    pub screen_edge_lock: ScreenEdgeLock,
}

impl CartesianPosition {
    pub fn new(x: X, y: Y) -> Self {
        Self {
            x,
            y,
            z: Z::default(),
            screen_edge_lock: ScreenEdgeLock::default(),
        }
    }

    pub fn with_z(mut self, z: Z) -> Self {
        self.z = z;
        self
    }
}

impl Default for CartesianPosition {
    fn default() -> Self {
        Self::new(X(0.0), Y(0.0))
    }
}

/// Position of an Objects block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Position {
    Spherical(SphericalPosition),
    Cartesian(CartesianPosition),
}

impl Position {
    #[inline]
    pub fn is_cartesian(&self) -> bool {
        matches!(self, Self::Cartesian(_))
    }

    pub fn spherical(&self) -> Option<&SphericalPosition> {
        match self {
            Self::Spherical(p) => Some(p),
            Self::Cartesian(_) => None,
        }
    }

    pub fn cartesian(&self) -> Option<&CartesianPosition> {
        match self {
            Self::Cartesian(p) => Some(p),
            Self::Spherical(_) => None,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::Spherical(SphericalPosition::default())
    }
}

impl From<SphericalPosition> for Position {
    fn from(value: SphericalPosition) -> Self {
        Self::Spherical(value)
    }
}

impl From<CartesianPosition> for Position {
    fn from(value: CartesianPosition) -> Self {
        Self::Cartesian(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIRECT SPEAKERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Value with optional lower and upper bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounded<T> {
    pub value: T,
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Bounded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            min: None,
            max: None,
        }
    }

    pub fn with_bounds(value: T, min: T, max: T) -> Self {
        Self {
            value,
            min: Some(min),
            max: Some(max),
        }
    }
}

/// Polar loudspeaker position with optional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphericalSpeakerPosition {
    pub azimuth: Bounded<Azimuth>,
    pub elevation: Bounded<Elevation>,
    pub distance: Bounded<Distance>,
    pub screen_edge_lock: ScreenEdgeLock,
}

impl SphericalSpeakerPosition {
    pub fn new(azimuth: Azimuth, elevation: Elevation) -> Self {
        Self {
            azimuth: Bounded::new(azimuth),
            elevation: Bounded::new(elevation),
            distance: Bounded::new(Distance::default()),
            screen_edge_lock: ScreenEdgeLock::default(),
        }
    }
}

impl Default for SphericalSpeakerPosition {
    fn default() -> Self {
        Self::new(Azimuth(0.0), Elevation(0.0))
    }
}

/// Cartesian loudspeaker position with optional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianSpeakerPosition {
    pub x: Bounded<X>,
    pub y: Bounded<Y>,
    pub z: Bounded<Z>,
    pub screen_edge_lock: ScreenEdgeLock,
}

impl CartesianSpeakerPosition {
    pub fn new(x: X, y: Y, z: Z) -> Self {
        Self {
            x: Bounded::new(x),
            y: Bounded::new(y),
            z: Bounded::new(z),
            screen_edge_lock: ScreenEdgeLock::default(),
        }
    }
}

impl Default for CartesianSpeakerPosition {
    fn default() -> Self {
        Self::new(X(0.0), Y(0.0), Z(0.0))
    }
}

/// Position of a DirectSpeakers block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpeakerPosition {
    Spherical(SphericalSpeakerPosition),
    Cartesian(CartesianSpeakerPosition),
}

impl SpeakerPosition {
    #[inline]
    pub fn is_cartesian(&self) -> bool {
        matches!(self, Self::Cartesian(_))
    }
}

impl Default for SpeakerPosition {
    fn default() -> Self {
        Self::Spherical(SphericalSpeakerPosition::default())
    }
}

impl From<SphericalSpeakerPosition> for SpeakerPosition {
    fn from(value: SphericalSpeakerPosition) -> Self {
        Self::Spherical(value)
    }
}

impl From<CartesianSpeakerPosition> for SpeakerPosition {
    fn from(value: CartesianSpeakerPosition) -> Self {
        Self::Cartesian(value)
    }
}

/// Flag as read: the explicit value, otherwise inferred from the position
pub(crate) fn read_cartesian_flag(flag: Option<Cartesian>, position_is_cartesian: bool) -> Cartesian {
    flag.unwrap_or(Cartesian(position_is_cartesian))
}

/// Flag after a concrete position was set; an unset flag stays unset
pub(crate) fn flag_after_position(flag: Option<Cartesian>, cartesian: bool) -> Option<Cartesian> {
    flag.map(|_| Cartesian(cartesian))
}
