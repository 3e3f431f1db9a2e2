//! Objects block format

use serde::{Deserialize, Serialize};

use super::impl_block_format;
use crate::elements::common::{Duration, Gain, HeadLocked, Importance, Rtime, ScreenRef};
use crate::elements::position::{
    Cartesian, CartesianPosition, Position, SphericalPosition, flag_after_position,
    read_cartesian_flag,
};
use crate::named_type::named_value;
use crate::parameters::{HasParameter, SetParameter, UnsetParameter, impl_parameters};
use crate::{AdmResult, AudioBlockFormatId, Time};

named_value! {
    /// Spread along azimuth (degrees) or X
    #[derive(Copy, Default)]
    Width(f32), min 0.0
}

named_value! {
    /// Spread along elevation (degrees) or Z
    #[derive(Copy, Default)]
    Height(f32), min 0.0
}

named_value! {
    /// Spread along distance or Y
    #[derive(Copy, Default)]
    Depth(f32), min 0.0
}

named_value! {
    /// Diffuseness, 0 fully direct to 1 fully diffuse
    #[derive(Copy, Default)]
    Diffuse(f32), range 0.0 ..= 1.0
}

named_value! {
    /// Distance within which the object snaps to the nearest speaker
    #[derive(Copy)]
    MaxDistance(f32), range 0.0 ..= 2.0
}

named_value! {
    /// Divergence amount
    #[derive(Copy)]
    Divergence(f32), range 0.0 ..= 1.0
}

named_value! {
    /// Divergence spread in degrees
    #[derive(Copy)]
    AzimuthRange(f32), range 0.0 ..= 180.0
}

named_value! {
    /// Divergence spread in cartesian units
    #[derive(Copy)]
    PositionRange(f32), range 0.0 ..= 1.0
}

/// Snap to the nearest loudspeaker
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelLock {
    pub max_distance: Option<MaxDistance>,
}

/// Phantom-source divergence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDivergence {
    pub value: Divergence,
    pub azimuth_range: Option<AzimuthRange>,
    pub position_range: Option<PositionRange>,
}

impl ObjectDivergence {
    pub fn new(value: Divergence) -> Self {
        Self {
            value,
            azimuth_range: None,
            position_range: None,
        }
    }
}

/// Interpolation to the block position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JumpPosition {
    pub flag: bool,
    pub interpolation_length: Option<Time>,
}

/// Loudspeaker region excluded from rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Zone {
    Cartesian {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
        min_z: f32,
        max_z: f32,
    },
    Spherical {
        min_elevation: f32,
        max_elevation: f32,
        min_azimuth: f32,
        max_azimuth: f32,
    },
}

/// Block of an Objects channel: a positioned, time-windowed source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBlockFormatObjects {
    id: AudioBlockFormatId,
    rtime: Option<Rtime>,
    duration: Option<Duration>,
    position: Position,
    cartesian: Option<Cartesian>,
    width: Option<Width>,
    height: Option<Height>,
    depth: Option<Depth>,
    gain: Option<Gain>,
    diffuse: Option<Diffuse>,
    channel_lock: Option<ChannelLock>,
    object_divergence: Option<ObjectDivergence>,
    jump_position: Option<JumpPosition>,
    screen_ref: Option<ScreenRef>,
    importance: Option<Importance>,
    head_locked: Option<HeadLocked>,
    zone_exclusion: Vec<Zone>,
}

impl AudioBlockFormatObjects {
    pub fn new(position: impl Into<Position>) -> Self {
        Self {
            id: AudioBlockFormatId::default(),
            rtime: None,
            duration: None,
            position: position.into(),
            cartesian: None,
            width: None,
            height: None,
            depth: None,
            gain: None,
            diffuse: None,
            channel_lock: None,
            object_divergence: None,
            jump_position: None,
            screen_ref: None,
            importance: None,
            head_locked: None,
            zone_exclusion: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: AudioBlockFormatId) -> Self {
        self.id = id;
        self
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    fn set_position(&mut self, position: Position) {
        self.cartesian = flag_after_position(self.cartesian, position.is_cartesian());
        self.position = position;
    }
}

impl Default for AudioBlockFormatObjects {
    fn default() -> Self {
        Self::new(Position::default())
    }
}

impl_block_format!(AudioBlockFormatObjects, Objects);

impl_parameters! {
    AudioBlockFormatObjects {
        defaulted rtime: Rtime = Rtime::default(),
        optional duration: Duration,
        defaulted width: Width = Width::default(),
        defaulted height: Height = Height::default(),
        defaulted depth: Depth = Depth::default(),
        defaulted gain: Gain = Gain::default(),
        defaulted diffuse: Diffuse = Diffuse::default(),
        optional channel_lock: ChannelLock,
        optional object_divergence: ObjectDivergence,
        optional jump_position: JumpPosition,
        defaulted screen_ref: ScreenRef = ScreenRef::default(),
        defaulted importance: Importance = Importance::default(),
        defaulted head_locked: HeadLocked = HeadLocked::default(),
        vector zone_exclusion: Zone,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// POSITION VARIANT
// ═══════════════════════════════════════════════════════════════════════════════

impl HasParameter<Position> for AudioBlockFormatObjects {
    fn get_parameter(&self) -> Option<Position> {
        Some(self.position.clone())
    }

    fn has_parameter(&self) -> bool {
        true
    }
}

impl SetParameter<Position> for AudioBlockFormatObjects {
    fn set_parameter(&mut self, value: Position) -> AdmResult<()> {
        self.set_position(value);
        Ok(())
    }
}

impl HasParameter<SphericalPosition> for AudioBlockFormatObjects {
    fn get_parameter(&self) -> Option<SphericalPosition> {
        self.position.spherical().cloned()
    }
}

impl SetParameter<SphericalPosition> for AudioBlockFormatObjects {
    fn set_parameter(&mut self, value: SphericalPosition) -> AdmResult<()> {
        self.set_position(Position::Spherical(value));
        Ok(())
    }
}

impl HasParameter<CartesianPosition> for AudioBlockFormatObjects {
    fn get_parameter(&self) -> Option<CartesianPosition> {
        self.position.cartesian().cloned()
    }
}

impl SetParameter<CartesianPosition> for AudioBlockFormatObjects {
    fn set_parameter(&mut self, value: CartesianPosition) -> AdmResult<()> {
        self.set_position(Position::Cartesian(value));
        Ok(())
    }
}

impl HasParameter<Cartesian> for AudioBlockFormatObjects {
    fn get_parameter(&self) -> Option<Cartesian> {
        Some(read_cartesian_flag(self.cartesian, self.position.is_cartesian()))
    }

    fn has_parameter(&self) -> bool {
        true
    }

    fn is_default_parameter(&self) -> bool {
        self.cartesian.is_none()
    }
}

impl SetParameter<Cartesian> for AudioBlockFormatObjects {
    fn set_parameter(&mut self, value: Cartesian) -> AdmResult<()> {
        if value.get() != self.position.is_cartesian() {
            self.position = if value.get() {
                Position::Cartesian(CartesianPosition::default())
            } else {
                Position::Spherical(SphericalPosition::default())
            };
        }
        self.cartesian = Some(value);
        Ok(())
    }
}

impl UnsetParameter<Cartesian> for AudioBlockFormatObjects {
    fn unset_parameter(&mut self) {
        self.cartesian = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::common::{Azimuth, Elevation, X, Y};
    use crate::parameters::Parameters;

    fn spherical(azimuth: f32) -> SphericalPosition {
        SphericalPosition::new(Azimuth::new(azimuth).unwrap(), Elevation::new(0.0).unwrap())
    }

    fn cartesian(x: f32) -> CartesianPosition {
        CartesianPosition::new(X::new(x).unwrap(), Y::new(1.0).unwrap())
    }

    #[test]
    fn test_defaults() {
        let block = AudioBlockFormatObjects::new(spherical(30.0));
        assert_eq!(block.get::<Width>().get(), 0.0);
        assert_eq!(block.get::<Gain>(), Gain::Linear(1.0));
        assert_eq!(block.get::<Importance>().get(), 10);
        assert!(!block.get::<ScreenRef>().get());
        assert!(block.is_default::<Rtime>());
        assert!(!block.has::<Duration>());
    }

    #[test]
    fn test_flag_inferred_when_unset() {
        let mut block = AudioBlockFormatObjects::new(spherical(30.0));
        assert!(!block.get::<Cartesian>().get());
        assert!(block.is_default::<Cartesian>());

        block.set(cartesian(0.5)).unwrap();
        assert!(block.get::<Cartesian>().get());
        // still inferred, not explicit
        assert!(block.is_default::<Cartesian>());
        assert!(!block.has::<SphericalPosition>());
    }

    #[test]
    fn test_setting_flag_constructs_position() {
        let mut block = AudioBlockFormatObjects::new(spherical(30.0));
        block.set(Cartesian(true)).unwrap();
        assert!(block.has::<CartesianPosition>());
        assert_eq!(block.get::<CartesianPosition>(), CartesianPosition::default());
        assert!(!block.has::<SphericalPosition>());

        block.set(Cartesian(false)).unwrap();
        assert_eq!(block.get::<SphericalPosition>(), SphericalPosition::default());
    }

    #[test]
    fn test_setting_flag_keeps_matching_position() {
        let mut block = AudioBlockFormatObjects::new(cartesian(0.5));
        block.set(Cartesian(true)).unwrap();
        assert_eq!(block.get::<CartesianPosition>(), cartesian(0.5));
    }

    #[test]
    fn test_explicit_flag_follows_position() {
        let mut block = AudioBlockFormatObjects::new(cartesian(0.5));
        block.set(Cartesian(true)).unwrap();

        block.set(spherical(-30.0)).unwrap();
        assert!(!block.is_default::<Cartesian>());
        assert!(!block.get::<Cartesian>().get());
        assert!(!block.has::<CartesianPosition>());

        block.set(Position::from(cartesian(-0.5))).unwrap();
        assert!(block.get::<Cartesian>().get());
    }

    #[test]
    fn test_unset_flag_reverts_to_inference() {
        let mut block = AudioBlockFormatObjects::new(cartesian(0.5));
        block.set(Cartesian(false)).unwrap();
        block.unset::<Cartesian>();
        assert!(!block.get::<Cartesian>().get());
        assert!(block.is_default::<Cartesian>());
    }

    #[test]
    fn test_zone_exclusion_vector() {
        let zone = Zone::Spherical {
            min_elevation: 0.0,
            max_elevation: 30.0,
            min_azimuth: -30.0,
            max_azimuth: 30.0,
        };
        let mut block = AudioBlockFormatObjects::default();
        assert!(block.add(zone));
        assert!(!block.add(zone));
        assert_eq!(block.get::<Vec<Zone>>().len(), 1);
    }

    #[test]
    fn test_divergence_and_lock() {
        let mut block = AudioBlockFormatObjects::default();
        let mut divergence = ObjectDivergence::new(Divergence::new(0.5).unwrap());
        divergence.azimuth_range = Some(AzimuthRange::new(45.0).unwrap());
        block.set(divergence.clone()).unwrap();
        block.set(ChannelLock {
            max_distance: Some(MaxDistance::new(1.0).unwrap()),
        })
        .unwrap();

        assert_eq!(block.get::<ObjectDivergence>(), divergence);
        assert!(block.has::<ChannelLock>());
        assert!(MaxDistance::new(2.5).is_err());
    }
}
