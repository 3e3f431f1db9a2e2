//! `audioBlockFormat` readers, one per channel type

use rf_adm::block_formats::{
    AudioBlockFormatBinaural, AudioBlockFormatDirectSpeakers, AudioBlockFormatHoa,
    AudioBlockFormatMatrix, AudioBlockFormatObjects, AzimuthRange, BlockFormat, ChannelLock,
    Degree, Depth, Diffuse, Divergence, Equation, Height, JumpPosition, MatrixCoefficient,
    MaxDistance, NfcRefDist, Normalization, ObjectDivergence, Order, PositionRange, SpeakerLabel,
    Width, Zone,
};
use rf_adm::{
    AdmResult, AudioBlockFormatId, AudioChannelFormat, AudioChannelFormatId, Azimuth, Bounded,
    Cartesian, CartesianPosition, CartesianSpeakerPosition, Distance, Duration, Elevation,
    ElementId, HeadLocked, HorizontalEdge, Importance, Parameters, Position, Rtime,
    ScreenEdgeLock, ScreenRef, SetParameter, SpeakerPosition, SphericalPosition,
    SphericalSpeakerPosition, Time, TypeDescriptor, VerticalEdge, X, Y, Z, parse_timecode,
};
use roxmltree::Node;

use super::elements::{read_flag, read_gain};
use crate::values::{
    attr, check_attributes, elements, name_of, parse_attr, parse_bool_text, parse_text,
    parse_value, required_attr, text, unexpected,
};
use crate::{ParserOptions, XmlError, XmlResult};

/// Read one block and append it to `channel`; the variant follows the
/// channel's type
pub(super) fn read_block_format(
    channel: &mut AudioChannelFormat,
    node: Node,
    options: &ParserOptions,
) -> XmlResult<()> {
    check_attributes(node, &["audioBlockFormatID", "rtime", "duration"], options)?;
    let id = attr(node, "audioBlockFormatID")
        .map(AudioBlockFormatId::parse)
        .transpose()?;

    match channel.type_descriptor() {
        TypeDescriptor::DirectSpeakers => {
            channel.add_block_format(timed(read_direct_speakers(node, options)?, node, id)?)?
        }
        TypeDescriptor::Matrix => {
            channel.add_block_format(timed(read_matrix(node, options)?, node, id)?)?
        }
        TypeDescriptor::Objects => {
            channel.add_block_format(timed(read_objects(node, options)?, node, id)?)?
        }
        TypeDescriptor::Hoa => channel.add_block_format(timed(read_hoa(node, options)?, node, id)?)?,
        TypeDescriptor::Binaural => {
            channel.add_block_format(timed(read_binaural(node, options)?, node, id)?)?
        }
        TypeDescriptor::Undefined => {
            return Err(XmlError::InvalidValue {
                element: name_of(node),
                name: "typeDefinition".into(),
                value: TypeDescriptor::Undefined.to_string(),
            });
        }
    }
    Ok(())
}

/// Apply the ID and the `rtime` / `duration` window shared by all variants
fn timed<B>(mut block: B, node: Node, id: Option<AudioBlockFormatId>) -> XmlResult<B>
where
    B: BlockFormat + SetParameter<Rtime>,
{
    if let Some(id) = id {
        block.set_id(id);
    }
    if let Some(rtime) = attr(node, "rtime") {
        block.set(Rtime::new(parse_timecode(rtime)?)?)?;
    }
    if let Some(duration) = attr(node, "duration") {
        block.set(Duration::new(parse_timecode(duration)?)?)?;
    }
    Ok(block)
}

// ═══════════════════════════════════════════════════════════════════════════════
// POSITIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
struct Bound {
    value: Option<f32>,
    min: Option<f32>,
    max: Option<f32>,
}

impl Bound {
    fn bounded<T>(self, default: f32, make: impl Fn(f32) -> AdmResult<T>) -> XmlResult<Bounded<T>> {
        Ok(Bounded {
            value: make(self.value.unwrap_or(default))?,
            min: self.min.map(&make).transpose()?,
            max: self.max.map(&make).transpose()?,
        })
    }
}

/// `position` sub-elements collected before the block position is built
#[derive(Debug, Clone, Default)]
struct Coordinates {
    azimuth: Bound,
    elevation: Bound,
    distance: Bound,
    x: Bound,
    y: Bound,
    z: Bound,
    screen_edge_lock: ScreenEdgeLock,
}

impl Coordinates {
    /// `<position coordinate="azimuth" bound="min" screenEdgeLock="left">-30</position>`
    fn read(&mut self, node: Node) -> XmlResult<()> {
        let value = parse_text::<f32>(node)?;
        let slot = match required_attr(node, "coordinate")? {
            "azimuth" => &mut self.azimuth,
            "elevation" => &mut self.elevation,
            "distance" => &mut self.distance,
            "X" => &mut self.x,
            "Y" => &mut self.y,
            "Z" => &mut self.z,
            other => return Err(invalid(node, "coordinate", other)),
        };
        match attr(node, "bound") {
            None => slot.value = Some(value),
            Some("min") => slot.min = Some(value),
            Some("max") => slot.max = Some(value),
            Some(other) => return Err(invalid(node, "bound", other)),
        }

        match attr(node, "screenEdgeLock") {
            Some(edge @ ("left" | "right")) => {
                self.screen_edge_lock.horizontal = Some(HorizontalEdge::new(edge)?);
            }
            Some(edge) => self.screen_edge_lock.vertical = Some(VerticalEdge::new(edge)?),
            None => {}
        }
        Ok(())
    }

    fn has_cartesian_values(&self) -> bool {
        self.x.value.is_some() || self.y.value.is_some() || self.z.value.is_some()
    }

    fn object_position(self, cartesian: bool) -> XmlResult<Position> {
        Ok(if cartesian {
            Position::Cartesian(CartesianPosition {
                x: X::new(self.x.value.unwrap_or(0.0))?,
                y: Y::new(self.y.value.unwrap_or(0.0))?,
                z: Z::new(self.z.value.unwrap_or(0.0))?,
                screen_edge_lock: self.screen_edge_lock,
            })
        } else {
            Position::Spherical(SphericalPosition {
                azimuth: Azimuth::new(self.azimuth.value.unwrap_or(0.0))?,
                elevation: Elevation::new(self.elevation.value.unwrap_or(0.0))?,
                distance: Distance::new(self.distance.value.unwrap_or(1.0))?,
                screen_edge_lock: self.screen_edge_lock,
            })
        })
    }

    fn speaker_position(self, cartesian: bool) -> XmlResult<SpeakerPosition> {
        Ok(if cartesian {
            SpeakerPosition::Cartesian(CartesianSpeakerPosition {
                x: self.x.bounded(0.0, X::new)?,
                y: self.y.bounded(0.0, Y::new)?,
                z: self.z.bounded(0.0, Z::new)?,
                screen_edge_lock: self.screen_edge_lock,
            })
        } else {
            SpeakerPosition::Spherical(SphericalSpeakerPosition {
                azimuth: self.azimuth.bounded(0.0, Azimuth::new)?,
                elevation: self.elevation.bounded(0.0, Elevation::new)?,
                distance: self.distance.bounded(1.0, Distance::new)?,
                screen_edge_lock: self.screen_edge_lock,
            })
        })
    }
}

fn invalid(node: Node, name: &str, value: &str) -> XmlError {
    XmlError::InvalidValue {
        element: name_of(node),
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn required_f32(node: Node, name: &'static str) -> XmlResult<f32> {
    parse_value(node, name, required_attr(node, name)?)
}

// ═══════════════════════════════════════════════════════════════════════════════
// VARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

fn read_objects(node: Node, options: &ParserOptions) -> XmlResult<AudioBlockFormatObjects> {
    let mut block = AudioBlockFormatObjects::default();
    let mut coordinates = Coordinates::default();
    let mut cartesian = None;

    for child in elements(node) {
        match child.tag_name().name() {
            "position" => coordinates.read(child)?,
            "cartesian" => cartesian = Some(parse_bool_text(child)?),
            "width" => block.set(Width::new(parse_text(child)?)?)?,
            "height" => block.set(Height::new(parse_text(child)?)?)?,
            "depth" => block.set(Depth::new(parse_text(child)?)?)?,
            "gain" => block.set(read_gain(child)?)?,
            "diffuse" => block.set(Diffuse::new(parse_text(child)?)?)?,
            "channelLock" => {
                if read_flag(child)?.unwrap_or(true) {
                    let max_distance = parse_attr::<f32>(child, "maxDistance")?
                        .map(MaxDistance::new)
                        .transpose()?;
                    block.set(ChannelLock { max_distance })?;
                }
            }
            "objectDivergence" => {
                let mut divergence = ObjectDivergence::new(Divergence::new(parse_text(child)?)?);
                divergence.azimuth_range = parse_attr::<f32>(child, "azimuthRange")?
                    .map(AzimuthRange::new)
                    .transpose()?;
                divergence.position_range = parse_attr::<f32>(child, "positionRange")?
                    .map(PositionRange::new)
                    .transpose()?;
                block.set(divergence)?;
            }
            "jumpPosition" => {
                let interpolation_length = parse_attr::<f64>(child, "interpolationLength")?
                    .map(|secs| Time::from_nanos((secs * 1e9).round() as i64));
                block.set(JumpPosition {
                    flag: read_flag(child)?.unwrap_or(true),
                    interpolation_length,
                })?;
            }
            "screenRef" => block.set(ScreenRef::new(parse_bool_text(child)?)?)?,
            "importance" => block.set(Importance::new(parse_text(child)?)?)?,
            "headLocked" => block.set(HeadLocked::new(parse_bool_text(child)?)?)?,
            "zoneExclusion" => {
                for zone in elements(child) {
                    if zone.has_tag_name("zone") {
                        block.add(read_zone(zone)?);
                    } else {
                        unexpected(child, zone, options)?;
                    }
                }
            }
            _ => unexpected(node, child, options)?,
        }
    }

    let is_cartesian = cartesian.unwrap_or(coordinates.has_cartesian_values());
    block.set(coordinates.object_position(is_cartesian)?)?;
    if let Some(flag) = cartesian {
        block.set(Cartesian::new(flag)?)?;
    }
    Ok(block)
}

fn read_zone(node: Node) -> XmlResult<Zone> {
    if node.has_attribute("minX") {
        Ok(Zone::Cartesian {
            min_x: required_f32(node, "minX")?,
            max_x: required_f32(node, "maxX")?,
            min_y: required_f32(node, "minY")?,
            max_y: required_f32(node, "maxY")?,
            min_z: required_f32(node, "minZ")?,
            max_z: required_f32(node, "maxZ")?,
        })
    } else {
        Ok(Zone::Spherical {
            min_elevation: required_f32(node, "minElevation")?,
            max_elevation: required_f32(node, "maxElevation")?,
            min_azimuth: required_f32(node, "minAzimuth")?,
            max_azimuth: required_f32(node, "maxAzimuth")?,
        })
    }
}

fn read_direct_speakers(
    node: Node,
    options: &ParserOptions,
) -> XmlResult<AudioBlockFormatDirectSpeakers> {
    let mut block = AudioBlockFormatDirectSpeakers::default();
    let mut coordinates = Coordinates::default();
    let mut cartesian = None;

    for child in elements(node) {
        match child.tag_name().name() {
            "speakerLabel" => {
                block.add(SpeakerLabel::new(text(child)));
            }
            "position" => coordinates.read(child)?,
            "cartesian" => cartesian = Some(parse_bool_text(child)?),
            "headLocked" => block.set(HeadLocked::new(parse_bool_text(child)?)?)?,
            "gain" => block.set(read_gain(child)?)?,
            "importance" => block.set(Importance::new(parse_text(child)?)?)?,
            _ => unexpected(node, child, options)?,
        }
    }

    let is_cartesian = cartesian.unwrap_or(coordinates.has_cartesian_values());
    block.set(coordinates.speaker_position(is_cartesian)?)?;
    if let Some(flag) = cartesian {
        block.set(Cartesian::new(flag)?)?;
    }
    Ok(block)
}

fn read_hoa(node: Node, options: &ParserOptions) -> XmlResult<AudioBlockFormatHoa> {
    let mut block = AudioBlockFormatHoa::default();
    for child in elements(node) {
        match child.tag_name().name() {
            "order" => block.set(Order::new(parse_text(child)?)?)?,
            "degree" => block.set(Degree::new(parse_text(child)?)?)?,
            "normalization" => block.set(Normalization::new(text(child))?)?,
            "nfcRefDist" => block.set(NfcRefDist::new(parse_text(child)?)?)?,
            "screenRef" => block.set(ScreenRef::new(parse_bool_text(child)?)?)?,
            "equation" => block.set(Equation::new(text(child)))?,
            "gain" => block.set(read_gain(child)?)?,
            "importance" => block.set(Importance::new(parse_text(child)?)?)?,
            "headLocked" => block.set(HeadLocked::new(parse_bool_text(child)?)?)?,
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(block)
}

fn read_matrix(node: Node, options: &ParserOptions) -> XmlResult<AudioBlockFormatMatrix> {
    let mut block = AudioBlockFormatMatrix::new();
    for child in elements(node) {
        match child.tag_name().name() {
            "outputChannelFormatIDRef" => block.set(AudioChannelFormatId::parse(text(child))?)?,
            "matrix" => {
                for coefficient in elements(child) {
                    if coefficient.has_tag_name("coefficient") {
                        block.add(read_coefficient(coefficient, options)?);
                    } else {
                        unexpected(child, coefficient, options)?;
                    }
                }
            }
            "gain" => block.set(read_gain(child)?)?,
            "importance" => block.set(Importance::new(parse_text(child)?)?)?,
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(block)
}

/// `<coefficient gain="0.707" phaseVar="p">AC_00010001</coefficient>`
fn read_coefficient(node: Node, options: &ParserOptions) -> XmlResult<MatrixCoefficient> {
    check_attributes(
        node,
        &["gain", "gainVar", "phase", "phaseVar", "delay", "delayVar"],
        options,
    )?;
    let mut coefficient = MatrixCoefficient::new(AudioChannelFormatId::parse(text(node))?);
    coefficient.gain = parse_attr(node, "gain")?;
    coefficient.gain_var = attr(node, "gainVar").map(str::to_string);
    coefficient.phase = parse_attr(node, "phase")?;
    coefficient.phase_var = attr(node, "phaseVar").map(str::to_string);
    coefficient.delay = parse_attr(node, "delay")?;
    coefficient.delay_var = attr(node, "delayVar").map(str::to_string);
    Ok(coefficient)
}

fn read_binaural(node: Node, options: &ParserOptions) -> XmlResult<AudioBlockFormatBinaural> {
    let mut block = AudioBlockFormatBinaural::new();
    for child in elements(node) {
        match child.tag_name().name() {
            "gain" => block.set(read_gain(child)?)?,
            "importance" => block.set(Importance::new(parse_text(child)?)?)?,
            _ => unexpected(node, child, options)?,
        }
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_adm::Gain;

    fn read_into(channel: &mut AudioChannelFormat, xml: &str) -> XmlResult<()> {
        let tree = roxmltree::Document::parse(xml).unwrap();
        read_block_format(channel, tree.root_element(), &ParserOptions::default())
    }

    fn objects_channel() -> AudioChannelFormat {
        AudioChannelFormat::new("Object", TypeDescriptor::Objects)
            .with_id("AC_00031001".parse().unwrap())
            .unwrap()
    }

    #[test]
    fn test_objects_block_spherical() {
        let mut channel = objects_channel();
        read_into(
            &mut channel,
            r#"<audioBlockFormat audioBlockFormatID="AB_00031001_00000001"
                   rtime="00:00:00.00000" duration="00:00:01.00000">
                 <position coordinate="azimuth" screenEdgeLock="left">30</position>
                 <position coordinate="elevation">10</position>
                 <width>15</width>
                 <gain gainUnit="dB">-3</gain>
                 <jumpPosition interpolationLength="0.05">1</jumpPosition>
               </audioBlockFormat>"#,
        )
        .unwrap();

        let block = &channel.block_formats::<AudioBlockFormatObjects>()[0];
        let position = block.get::<SphericalPosition>();
        assert_eq!(position.azimuth.get(), 30.0);
        assert_eq!(position.distance.get(), 1.0);
        assert!(position.screen_edge_lock.horizontal.is_some());
        assert_eq!(block.get::<Width>().get(), 15.0);
        assert_eq!(block.get::<Gain>(), Gain::db(-3.0));
        assert_eq!(block.get::<Duration>().get(), Time::from_secs(1));
        assert_eq!(
            block.get::<JumpPosition>().interpolation_length,
            Some(Time::from_millis(50))
        );
        assert!(!block.get::<Cartesian>().get());
    }

    #[test]
    fn test_objects_block_cartesian_from_coordinates() {
        let mut channel = objects_channel();
        read_into(
            &mut channel,
            r#"<audioBlockFormat audioBlockFormatID="AB_00031001_00000001">
                 <cartesian>1</cartesian>
                 <position coordinate="X">-0.5</position>
                 <position coordinate="Y">1.0</position>
                 <zoneExclusion>
                   <zone minX="-1" maxX="1" minY="-1" maxY="0" minZ="-1" maxZ="1"/>
                 </zoneExclusion>
               </audioBlockFormat>"#,
        )
        .unwrap();

        let block = &channel.block_formats::<AudioBlockFormatObjects>()[0];
        assert!(block.get::<Cartesian>().get());
        assert!(!block.is_default::<Cartesian>());
        assert_eq!(block.get::<CartesianPosition>().x.get(), -0.5);
        assert_eq!(block.get::<Vec<Zone>>().len(), 1);
    }

    #[test]
    fn test_direct_speakers_bounds() {
        let mut channel = AudioChannelFormat::new("FrontLeft", TypeDescriptor::DirectSpeakers)
            .with_id("AC_00011001".parse().unwrap())
            .unwrap();
        read_into(
            &mut channel,
            r#"<audioBlockFormat audioBlockFormatID="AB_00011001_00000001">
                 <speakerLabel>M+030</speakerLabel>
                 <position coordinate="azimuth">30</position>
                 <position coordinate="azimuth" bound="min">22</position>
                 <position coordinate="azimuth" bound="max">38</position>
                 <position coordinate="elevation">0</position>
               </audioBlockFormat>"#,
        )
        .unwrap();

        let block = &channel.block_formats::<AudioBlockFormatDirectSpeakers>()[0];
        let position = block.get::<SphericalSpeakerPosition>();
        assert_eq!(position.azimuth.value.get(), 30.0);
        assert_eq!(position.azimuth.min.map(|a| a.get()), Some(22.0));
        assert_eq!(block.get::<Vec<SpeakerLabel>>()[0].get(), "M+030");
    }

    #[test]
    fn test_matrix_coefficients() {
        let mut channel = AudioChannelFormat::new("Mid", TypeDescriptor::Matrix)
            .with_id("AC_00021001".parse().unwrap())
            .unwrap();
        read_into(
            &mut channel,
            r#"<audioBlockFormat audioBlockFormatID="AB_00021001_00000001">
                 <matrix>
                   <coefficient gain="0.5">AC_00010001</coefficient>
                   <coefficient gain="0.5" phaseVar="phi">AC_00010002</coefficient>
                 </matrix>
               </audioBlockFormat>"#,
        )
        .unwrap();

        let block = &channel.block_formats::<AudioBlockFormatMatrix>()[0];
        let coefficients = block.get::<Vec<MatrixCoefficient>>();
        assert_eq!(coefficients.len(), 2);
        assert_eq!(coefficients[1].phase_var.as_deref(), Some("phi"));
    }

    #[test]
    fn test_hoa_normalization_choice() {
        let mut channel = AudioChannelFormat::new("W", TypeDescriptor::Hoa)
            .with_id("AC_00041001".parse().unwrap())
            .unwrap();
        let result = read_into(
            &mut channel,
            r#"<audioBlockFormat><order>0</order><degree>0</degree>
                 <normalization>MaxN</normalization></audioBlockFormat>"#,
        );
        assert!(matches!(result, Err(XmlError::Adm(_))));
    }
}
