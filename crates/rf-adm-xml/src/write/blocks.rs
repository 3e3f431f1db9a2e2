//! `audioBlockFormat` writers

use std::fmt::Display;

use rf_adm::block_formats::{
    AudioBlockFormatBinaural, AudioBlockFormatDirectSpeakers, AudioBlockFormatHoa,
    AudioBlockFormatMatrix, AudioBlockFormatObjects, BlockFormat, BlockFormats, ChannelLock,
    Degree, Depth, Diffuse, Equation, Height, JumpPosition, MatrixCoefficient, NfcRefDist,
    Normalization, ObjectDivergence, Order, SpeakerLabel, Width, Zone,
};
use rf_adm::{
    AudioChannelFormatId, Bounded, Cartesian, Duration, Gain, HasParameter, HeadLocked,
    Importance, Position, Rtime, ScreenEdgeLock, ScreenRef, SpeakerPosition, format_timecode,
};

use super::elements::gain;
use super::value;
use crate::node::XmlNode;
use crate::values::format_bool;
use crate::WriterOptions;

/// One node per block, in channel order
pub(super) fn blocks(formats: &BlockFormats, options: &WriterOptions) -> Vec<XmlNode> {
    match formats {
        BlockFormats::Undefined => Vec::new(),
        BlockFormats::DirectSpeakers(blocks) => {
            blocks.iter().map(|b| direct_speakers(b, options)).collect()
        }
        BlockFormats::Matrix(blocks) => blocks.iter().map(|b| matrix(b, options)).collect(),
        BlockFormats::Objects(blocks) => blocks.iter().map(|b| objects(b, options)).collect(),
        BlockFormats::Hoa(blocks) => blocks.iter().map(|b| hoa(b, options)).collect(),
        BlockFormats::Binaural(blocks) => blocks.iter().map(|b| binaural(b, options)).collect(),
    }
}

fn timed<B: BlockFormat>(block: &B, options: &WriterOptions) -> XmlNode {
    XmlNode::new("audioBlockFormat")
        .attr("audioBlockFormatID", block.id())
        .opt_attr(
            "rtime",
            value::<Rtime, _>(block, options).map(|r| format_timecode(&r.get())),
        )
        .opt_attr(
            "duration",
            value::<Duration, _>(block, options).map(|d| format_timecode(&d.get())),
        )
}

fn flag(name: &'static str, value: bool) -> XmlNode {
    XmlNode::new(name).text(format_bool(value))
}

fn text_child<T: Display>(name: &'static str, value: Option<T>) -> Option<XmlNode> {
    value.map(|v| XmlNode::new(name).text(v))
}

fn gain_child<H: HasParameter<Gain>>(block: &H, options: &WriterOptions) -> Option<XmlNode> {
    value::<Gain, _>(block, options).map(|g| gain("gain", g))
}

fn importance_child<H: HasParameter<Importance>>(
    block: &H,
    options: &WriterOptions,
) -> Option<XmlNode> {
    text_child("importance", value::<Importance, _>(block, options))
}

fn head_locked_child<H: HasParameter<HeadLocked>>(
    block: &H,
    options: &WriterOptions,
) -> Option<XmlNode> {
    value::<HeadLocked, _>(block, options).map(|h| flag("headLocked", h.get()))
}

fn cartesian_child<H: HasParameter<Cartesian>>(
    block: &H,
    options: &WriterOptions,
) -> Option<XmlNode> {
    value::<Cartesian, _>(block, options).map(|c| flag("cartesian", c.get()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// POSITIONS
// ═══════════════════════════════════════════════════════════════════════════════

fn coordinate(name: &'static str, value: impl Display, lock: Option<&str>) -> XmlNode {
    XmlNode::new("position")
        .attr("coordinate", name)
        .opt_attr("screenEdgeLock", lock)
        .text(value)
}

/// Horizontal lock on azimuth / X, vertical lock on elevation / Z
fn edges(lock: &ScreenEdgeLock) -> (Option<&str>, Option<&str>) {
    (
        lock.horizontal.as_ref().map(|e| e.get()),
        lock.vertical.as_ref().map(|e| e.get()),
    )
}

fn object_position(position: &Position) -> Vec<XmlNode> {
    match position {
        Position::Spherical(p) => {
            let (horizontal, vertical) = edges(&p.screen_edge_lock);
            vec![
                coordinate("azimuth", p.azimuth, horizontal),
                coordinate("elevation", p.elevation, vertical),
                coordinate("distance", p.distance, None),
            ]
        }
        Position::Cartesian(p) => {
            let (horizontal, vertical) = edges(&p.screen_edge_lock);
            vec![
                coordinate("X", p.x, horizontal),
                coordinate("Y", p.y, None),
                coordinate("Z", p.z, vertical),
            ]
        }
    }
}

fn bounded<T: Display + Copy>(
    nodes: &mut Vec<XmlNode>,
    name: &'static str,
    value: &Bounded<T>,
    lock: Option<&str>,
) {
    nodes.push(coordinate(name, value.value, lock));
    for (bound, limit) in [("min", value.min), ("max", value.max)] {
        if let Some(limit) = limit {
            nodes.push(coordinate(name, limit, None).attr("bound", bound));
        }
    }
}

fn speaker_position(position: &SpeakerPosition) -> Vec<XmlNode> {
    let mut nodes = Vec::new();
    match position {
        SpeakerPosition::Spherical(p) => {
            let (horizontal, vertical) = edges(&p.screen_edge_lock);
            bounded(&mut nodes, "azimuth", &p.azimuth, horizontal);
            bounded(&mut nodes, "elevation", &p.elevation, vertical);
            bounded(&mut nodes, "distance", &p.distance, None);
        }
        SpeakerPosition::Cartesian(p) => {
            let (horizontal, vertical) = edges(&p.screen_edge_lock);
            bounded(&mut nodes, "X", &p.x, horizontal);
            bounded(&mut nodes, "Y", &p.y, None);
            bounded(&mut nodes, "Z", &p.z, vertical);
        }
    }
    nodes
}

// ═══════════════════════════════════════════════════════════════════════════════
// VARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

fn objects(block: &AudioBlockFormatObjects, options: &WriterOptions) -> XmlNode {
    let zones: Vec<Zone> = HasParameter::<Vec<Zone>>::get_parameter(block).unwrap_or_default();

    timed(block, options)
        .opt_child(cartesian_child(block, options))
        .children(object_position(block.position()))
        .opt_child(text_child("width", value::<Width, _>(block, options)))
        .opt_child(text_child("height", value::<Height, _>(block, options)))
        .opt_child(text_child("depth", value::<Depth, _>(block, options)))
        .opt_child(gain_child(block, options))
        .opt_child(text_child("diffuse", value::<Diffuse, _>(block, options)))
        .opt_child(value::<ChannelLock, _>(block, options).map(|lock| {
            XmlNode::new("channelLock")
                .opt_attr("maxDistance", lock.max_distance)
                .text(1)
        }))
        .opt_child(value::<ObjectDivergence, _>(block, options).map(|divergence| {
            XmlNode::new("objectDivergence")
                .opt_attr("azimuthRange", divergence.azimuth_range)
                .opt_attr("positionRange", divergence.position_range)
                .text(divergence.value)
        }))
        .opt_child(value::<JumpPosition, _>(block, options).map(|jump| {
            XmlNode::new("jumpPosition")
                .opt_attr(
                    "interpolationLength",
                    jump.interpolation_length.map(|t| t.as_secs_f64()),
                )
                .text(format_bool(jump.flag))
        }))
        .opt_child(value::<ScreenRef, _>(block, options).map(|s| flag("screenRef", s.get())))
        .opt_child(importance_child(block, options))
        .opt_child((!zones.is_empty()).then(|| {
            XmlNode::new("zoneExclusion").children(zones.iter().map(zone))
        }))
        .opt_child(head_locked_child(block, options))
}

fn zone(zone: &Zone) -> XmlNode {
    match *zone {
        Zone::Cartesian {
            min_x,
            max_x,
            min_y,
            max_y,
            min_z,
            max_z,
        } => XmlNode::new("zone")
            .attr("minX", min_x)
            .attr("maxX", max_x)
            .attr("minY", min_y)
            .attr("maxY", max_y)
            .attr("minZ", min_z)
            .attr("maxZ", max_z),
        Zone::Spherical {
            min_elevation,
            max_elevation,
            min_azimuth,
            max_azimuth,
        } => XmlNode::new("zone")
            .attr("minElevation", min_elevation)
            .attr("maxElevation", max_elevation)
            .attr("minAzimuth", min_azimuth)
            .attr("maxAzimuth", max_azimuth),
    }
}

fn direct_speakers(block: &AudioBlockFormatDirectSpeakers, options: &WriterOptions) -> XmlNode {
    let labels = HasParameter::<Vec<SpeakerLabel>>::get_parameter(block).unwrap_or_default();

    timed(block, options)
        .opt_child(cartesian_child(block, options))
        .children(labels.iter().map(|l| XmlNode::new("speakerLabel").text(l.get())))
        .children(speaker_position(block.speaker_position()))
        .opt_child(head_locked_child(block, options))
        .opt_child(gain_child(block, options))
        .opt_child(importance_child(block, options))
}

fn hoa(block: &AudioBlockFormatHoa, options: &WriterOptions) -> XmlNode {
    timed(block, options)
        .opt_child(text_child(
            "equation",
            value::<Equation, _>(block, options).map(|e| e.get().to_string()),
        ))
        .opt_child(text_child("order", value::<Order, _>(block, options)))
        .opt_child(text_child("degree", value::<Degree, _>(block, options)))
        .opt_child(text_child(
            "normalization",
            value::<Normalization, _>(block, options).map(|n| n.get().to_string()),
        ))
        .opt_child(text_child("nfcRefDist", value::<NfcRefDist, _>(block, options)))
        .opt_child(value::<ScreenRef, _>(block, options).map(|s| flag("screenRef", s.get())))
        .opt_child(gain_child(block, options))
        .opt_child(importance_child(block, options))
        .opt_child(head_locked_child(block, options))
}

fn matrix(block: &AudioBlockFormatMatrix, options: &WriterOptions) -> XmlNode {
    let coefficients =
        HasParameter::<Vec<MatrixCoefficient>>::get_parameter(block).unwrap_or_default();

    timed(block, options)
        .opt_child(text_child(
            "outputChannelFormatIDRef",
            value::<AudioChannelFormatId, _>(block, options),
        ))
        .opt_child((!coefficients.is_empty()).then(|| {
            XmlNode::new("matrix").children(coefficients.iter().map(coefficient))
        }))
        .opt_child(gain_child(block, options))
        .opt_child(importance_child(block, options))
}

fn coefficient(coefficient: &MatrixCoefficient) -> XmlNode {
    XmlNode::new("coefficient")
        .opt_attr("gain", coefficient.gain)
        .opt_attr("gainVar", coefficient.gain_var.as_deref())
        .opt_attr("phase", coefficient.phase)
        .opt_attr("phaseVar", coefficient.phase_var.as_deref())
        .opt_attr("delay", coefficient.delay)
        .opt_attr("delayVar", coefficient.delay_var.as_deref())
        .text(coefficient.input)
}

fn binaural(block: &AudioBlockFormatBinaural, options: &WriterOptions) -> XmlNode {
    timed(block, options)
        .opt_child(gain_child(block, options))
        .opt_child(importance_child(block, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_adm::{
        Azimuth, CartesianPosition, Elevation, Parameters, SphericalSpeakerPosition, Time, X, Y,
    };

    fn render(node: XmlNode) -> String {
        node.render_document(0)
    }

    #[test]
    fn test_cartesian_flag_only_when_explicit() {
        let block = AudioBlockFormatObjects::new(CartesianPosition::new(
            X::new(0.5).unwrap(),
            Y::new(1.0).unwrap(),
        ));
        let xml = render(objects(&block, &WriterOptions::default()));
        assert!(!xml.contains("<cartesian>"));
        assert!(xml.contains("<position coordinate=\"X\">0.5</position>"));

        let mut block = block;
        block.set(Cartesian::new(true).unwrap()).unwrap();
        let xml = render(objects(&block, &WriterOptions::default()));
        assert!(xml.contains("<cartesian>1</cartesian>"));
    }

    #[test]
    fn test_block_timing_attributes() {
        let mut block = AudioBlockFormatBinaural::new();
        let xml = render(binaural(&block, &WriterOptions::default()));
        assert!(!xml.contains("rtime="));

        block.set(Rtime::new(Time::from_millis(500)).unwrap()).unwrap();
        block.set(Duration::new(Time::from_secs(2)).unwrap()).unwrap();
        let xml = render(binaural(&block, &WriterOptions::default()));
        assert!(xml.contains("rtime=\"00:00:00.50000\""));
        assert!(xml.contains("duration=\"00:00:02.00000\""));
    }

    #[test]
    fn test_speaker_bounds() {
        let mut position =
            SphericalSpeakerPosition::new(Azimuth::new(30.0).unwrap(), Elevation::new(0.0).unwrap());
        position.azimuth.min = Some(Azimuth::new(22.0).unwrap());
        let block = AudioBlockFormatDirectSpeakers::new(position);

        let xml = render(direct_speakers(&block, &WriterOptions::default()));
        assert!(xml.contains("<position coordinate=\"azimuth\" bound=\"min\">22</position>"));
    }

    #[test]
    fn test_zone_exclusion_group() {
        let mut block = AudioBlockFormatObjects::default();
        let xml = render(objects(&block, &WriterOptions::default()));
        assert!(!xml.contains("zoneExclusion"));

        block.add(Zone::Spherical {
            min_elevation: 0.0,
            max_elevation: 30.0,
            min_azimuth: -30.0,
            max_azimuth: 30.0,
        });
        let xml = render(objects(&block, &WriterOptions::default()));
        assert!(xml.contains("<zoneExclusion><zone minElevation=\"0\""));
    }
}
