//! Block format duration back-fill
//!
//! Every channel format reachable from a programme gets explicit block
//! durations: each block lasts until the next block's rtime, the last one
//! until the end of the channel's effective duration. The effective duration
//! is the Duration of the innermost object on the route, or the length of
//! the file / programme when that object has none.
//!
//! All durations are computed before the first one is written.

use std::collections::BTreeMap;

use log::debug;

use crate::document::Document;
use crate::elements::{
    AudioChannelFormat, AudioObject, AudioProgramme, Duration, Element, End, Start,
};
use crate::parameters::Parameters;
use crate::route_tracer::{Route, RouteTracer};
use crate::{AdmError, AdmResult, Time, TypeDescriptor};

/// Back-fill using one length for all programmes, e.g. the file length
pub fn update_block_format_durations(document: &mut Document, file_length: Time) -> AdmResult<()> {
    let routes = RouteTracer::new(document).trace_all()?;
    let plan = compute(document, &routes, |_| Ok(file_length))?;
    apply(document, plan)
}

/// Back-fill using each programme's `End - Start` as its length
pub fn update_block_format_durations_from_programmes(document: &mut Document) -> AdmResult<()> {
    let routes = RouteTracer::new(document).trace_all()?;
    let plan = compute(document, &routes, |route| programme_length(document, route))?;
    apply(document, plan)
}

fn programme_length(document: &Document, route: &Route) -> AdmResult<Time> {
    let handle = route
        .programme()
        .ok_or_else(|| AdmError::Invariant("route without programme".into()))?;
    let programme = document.get::<AudioProgramme>(handle)?;
    let end = programme
        .try_get::<End>()
        .map_err(|_| AdmError::MissingProgrammeEnd(programme.id().to_string()))?;
    Ok(end.get() - programme.get::<Start>().get())
}

/// Channel arena index → new block durations
type Plan = BTreeMap<usize, Vec<Duration>>;

fn compute(
    document: &Document,
    routes: &[Route],
    length: impl Fn(&Route) -> AdmResult<Time>,
) -> AdmResult<Plan> {
    let mut effective: BTreeMap<usize, Time> = BTreeMap::new();

    for route in routes {
        let (Some(channel), Some(object)) = (route.channel_format(), route.last_object()) else {
            continue;
        };
        let object = document.get::<AudioObject>(object)?;
        let duration = match object.try_get::<Duration>() {
            Ok(duration) => duration.get(),
            Err(_) => length(route)?,
        };

        let index = channel.index();
        let channel = document.get::<AudioChannelFormat>(channel)?;
        if channel.type_descriptor() == TypeDescriptor::Undefined {
            return Err(AdmError::UnhandledTypeDefinition(channel.to_string()));
        }

        match effective.get(&index) {
            Some(first) if *first != duration => {
                return Err(AdmError::InconsistentDuration {
                    channel: channel.id().to_string(),
                    first: first.to_string(),
                    second: duration.to_string(),
                });
            }
            Some(_) => {}
            None => {
                effective.insert(index, duration);
            }
        }
    }

    let mut plan = Plan::new();
    for (index, duration) in effective {
        let channel = document.node::<AudioChannelFormat>(index)?;
        let timings = channel.element.blocks().timings();
        // a lone block without timing covers the whole object already
        if timings.iter().all(|t| !t.explicit_rtime && !t.has_duration) {
            continue;
        }

        let mut durations = Vec::with_capacity(timings.len());
        for (i, timing) in timings.iter().enumerate() {
            let end = timings.get(i + 1).map_or(duration, |next| next.rtime.get());
            let length = end - timing.rtime.get();
            if length.is_negative() {
                return Err(AdmError::Invariant(format!(
                    "block {i} of {} starts after its end ({} > {end})",
                    channel.element,
                    timing.rtime.get()
                )));
            }
            durations.push(Duration::new(length)?);
        }
        plan.insert(index, durations);
    }

    Ok(plan)
}

fn apply(document: &mut Document, plan: Plan) -> AdmResult<()> {
    for (index, durations) in plan {
        let channel = document.node_mut::<AudioChannelFormat>(index)?;
        channel.element.blocks_mut().apply_durations(&durations)?;
        debug!(
            "set {} block durations of {}",
            durations.len(),
            channel.element
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementHandle;
    use crate::elements::block_formats::AudioBlockFormatObjects;
    use crate::elements::{AudioContent, AudioTrackUid, Position, Rtime, SphericalPosition};

    fn block_at(ms: i64) -> AudioBlockFormatObjects {
        let mut block = AudioBlockFormatObjects::new(Position::Spherical(SphericalPosition::default()));
        block.set(Rtime::new(Time::from_millis(ms)).unwrap()).unwrap();
        block
    }

    /// programme → content → object → uid → channel, returning object and channel
    fn wire(
        doc: &mut Document,
        programme: ElementHandle<AudioProgramme>,
        channel: ElementHandle<AudioChannelFormat>,
    ) -> ElementHandle<AudioObject> {
        let content = doc.add(AudioContent::new("c")).unwrap();
        let object = doc.add(AudioObject::new("o")).unwrap();
        let uid = doc.add(AudioTrackUid::new()).unwrap();
        doc.add_reference(programme, content).unwrap();
        doc.add_reference(content, object).unwrap();
        doc.add_reference(object, uid).unwrap();
        doc.set_reference(uid, channel).unwrap();
        object
    }

    fn objects_channel(doc: &mut Document, rtimes: &[i64]) -> ElementHandle<AudioChannelFormat> {
        let channel = doc
            .add(AudioChannelFormat::new("ch", TypeDescriptor::Objects))
            .unwrap();
        for &ms in rtimes {
            doc.get_mut(channel).unwrap().add_block_format(block_at(ms)).unwrap();
        }
        channel
    }

    fn durations(doc: &Document, channel: ElementHandle<AudioChannelFormat>) -> Vec<Time> {
        doc.get(channel)
            .unwrap()
            .block_formats::<AudioBlockFormatObjects>()
            .iter()
            .map(|b| b.get::<Duration>().get())
            .collect()
    }

    #[test]
    fn test_file_length() {
        let mut doc = Document::new();
        let programme = doc.add(AudioProgramme::new("p")).unwrap();
        let channel = objects_channel(&mut doc, &[0, 100]);
        wire(&mut doc, programme, channel);

        update_block_format_durations(&mut doc, Time::from_secs(5)).unwrap();
        assert_eq!(
            durations(&doc, channel),
            [Time::from_millis(100), Time::from_millis(4900)]
        );
    }

    #[test]
    fn test_object_duration_wins() {
        let mut doc = Document::new();
        let programme = doc.add(AudioProgramme::new("p")).unwrap();
        let channel = objects_channel(&mut doc, &[0, 500]);
        let object = wire(&mut doc, programme, channel);
        doc.get_mut(object)
            .unwrap()
            .set(Duration::new(Time::from_secs(2)).unwrap())
            .unwrap();

        update_block_format_durations(&mut doc, Time::from_secs(60)).unwrap();
        assert_eq!(
            durations(&doc, channel),
            [Time::from_millis(500), Time::from_millis(1500)]
        );
    }

    #[test]
    fn test_programme_window() {
        let mut doc = Document::new();
        let programme = doc.add(AudioProgramme::new("p")).unwrap();
        let channel = objects_channel(&mut doc, &[0]);
        wire(&mut doc, programme, channel);

        assert!(matches!(
            update_block_format_durations_from_programmes(&mut doc),
            Err(AdmError::MissingProgrammeEnd(_))
        ));

        let mut p = doc.get_mut(programme).unwrap();
        p.set(Start::new(Time::from_secs(1)).unwrap()).unwrap();
        p.set(End::new(Time::from_secs(11)).unwrap()).unwrap();
        update_block_format_durations_from_programmes(&mut doc).unwrap();
        assert_eq!(durations(&doc, channel), [Time::from_secs(10)]);
    }

    #[test]
    fn test_inconsistent_durations_write_nothing() {
        let mut doc = Document::new();
        let programme = doc.add(AudioProgramme::new("p")).unwrap();
        let channel = objects_channel(&mut doc, &[0, 100]);
        let first = wire(&mut doc, programme, channel);
        let second = wire(&mut doc, programme, channel);
        doc.get_mut(first)
            .unwrap()
            .set(Duration::new(Time::from_secs(1)).unwrap())
            .unwrap();
        doc.get_mut(second)
            .unwrap()
            .set(Duration::new(Time::from_secs(2)).unwrap())
            .unwrap();

        assert!(matches!(
            update_block_format_durations(&mut doc, Time::from_secs(5)),
            Err(AdmError::InconsistentDuration { .. })
        ));
        let blocks = doc
            .get(channel)
            .unwrap()
            .block_formats::<AudioBlockFormatObjects>()
            .to_vec();
        assert!(blocks.iter().all(|b| !b.has::<Duration>()));
    }

    #[test]
    fn test_undefined_channel_type() {
        let mut doc = Document::new();
        let programme = doc.add(AudioProgramme::new("p")).unwrap();
        let channel = doc
            .add(AudioChannelFormat::new("ch", TypeDescriptor::Undefined))
            .unwrap();
        wire(&mut doc, programme, channel);

        assert!(matches!(
            update_block_format_durations(&mut doc, Time::from_secs(5)),
            Err(AdmError::UnhandledTypeDefinition(_))
        ));
    }

    #[test]
    fn test_untimed_single_block_skipped() {
        let mut doc = Document::new();
        let programme = doc.add(AudioProgramme::new("p")).unwrap();
        let channel = doc
            .add(AudioChannelFormat::new("ch", TypeDescriptor::Objects))
            .unwrap();
        doc.get_mut(channel)
            .unwrap()
            .add_block_format(AudioBlockFormatObjects::default())
            .unwrap();
        wire(&mut doc, programme, channel);

        update_block_format_durations(&mut doc, Time::from_secs(5)).unwrap();
        let block = &doc.get(channel).unwrap().block_formats::<AudioBlockFormatObjects>()[0];
        assert!(!block.has::<Duration>());
    }
}
