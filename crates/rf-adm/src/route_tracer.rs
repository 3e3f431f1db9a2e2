//! Routes from programmes down to channel formats
//!
//! A route is one path `AudioProgramme → AudioContent → AudioObject+ →
//! AudioTrackUid → (AudioTrackFormat → AudioStreamFormat →)
//! AudioChannelFormat`. Nested objects each contribute their own routes.

use log::trace;

use crate::document::{Document, ElementHandle};
use crate::elements::{
    AudioChannelFormat, AudioContent, AudioObject, AudioProgramme, AudioStreamFormat,
    AudioTrackFormat, AudioTrackUid,
};
use crate::AdmResult;

/// One step of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteElement {
    Programme(ElementHandle<AudioProgramme>),
    Content(ElementHandle<AudioContent>),
    Object(ElementHandle<AudioObject>),
    TrackUid(ElementHandle<AudioTrackUid>),
    TrackFormat(ElementHandle<AudioTrackFormat>),
    StreamFormat(ElementHandle<AudioStreamFormat>),
    ChannelFormat(ElementHandle<AudioChannelFormat>),
}

/// A complete programme-to-channel path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    elements: Vec<RouteElement>,
}

impl Route {
    #[inline]
    pub fn elements(&self) -> &[RouteElement] {
        &self.elements
    }

    pub fn programme(&self) -> Option<ElementHandle<AudioProgramme>> {
        self.elements.iter().find_map(|e| match e {
            RouteElement::Programme(h) => Some(*h),
            _ => None,
        })
    }

    /// Innermost object on the route
    pub fn last_object(&self) -> Option<ElementHandle<AudioObject>> {
        self.elements.iter().rev().find_map(|e| match e {
            RouteElement::Object(h) => Some(*h),
            _ => None,
        })
    }

    pub fn track_uid(&self) -> Option<ElementHandle<AudioTrackUid>> {
        self.elements.iter().find_map(|e| match e {
            RouteElement::TrackUid(h) => Some(*h),
            _ => None,
        })
    }

    pub fn channel_format(&self) -> Option<ElementHandle<AudioChannelFormat>> {
        match self.elements.last() {
            Some(RouteElement::ChannelFormat(h)) => Some(*h),
            _ => None,
        }
    }
}

/// Enumerates the routes of a document
pub struct RouteTracer<'a> {
    document: &'a Document,
}

impl<'a> RouteTracer<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Routes of every programme, in document order
    pub fn trace_all(&self) -> AdmResult<Vec<Route>> {
        let mut routes = Vec::new();
        for programme in self.document.handles::<AudioProgramme>() {
            routes.extend(self.trace(programme)?);
        }
        Ok(routes)
    }

    /// Routes starting at one programme
    pub fn trace(&self, programme: ElementHandle<AudioProgramme>) -> AdmResult<Vec<Route>> {
        let index = self.document.index_of(programme)?;
        let node = self.document.node::<AudioProgramme>(index)?;

        let mut routes = Vec::new();
        let mut path = vec![RouteElement::Programme(programme)];
        for &content in &node.refs.contents {
            let Some(content_node) = self.document.contents.node(content) else {
                continue;
            };
            path.push(RouteElement::Content(self.document.handle(content)));
            for &object in &content_node.refs.objects {
                self.trace_object(object, &mut path, &mut routes);
            }
            path.pop();
        }

        trace!("{} routes from {}", routes.len(), node.element);
        Ok(routes)
    }

    fn trace_object(&self, object: usize, path: &mut Vec<RouteElement>, routes: &mut Vec<Route>) {
        let Some(node) = self.document.objects.node(object) else {
            return;
        };
        path.push(RouteElement::Object(self.document.handle(object)));

        for &uid in &node.refs.track_uids {
            match self.trace_track_uid(uid) {
                Some(tail) => {
                    let mut elements = path.clone();
                    elements.extend(tail);
                    routes.push(Route { elements });
                }
                None => trace!("{}: track UID #{uid} does not reach a channel format", node.element),
            }
        }
        for &nested in &node.refs.objects {
            self.trace_object(nested, path, routes);
        }

        path.pop();
    }

    fn trace_track_uid(&self, uid: usize) -> Option<Vec<RouteElement>> {
        let document = self.document;
        let refs = &document.track_uids.node(uid)?.refs;
        let mut tail = vec![RouteElement::TrackUid(document.handle(uid))];

        if let Some(channel) = refs.channel_format {
            tail.push(RouteElement::ChannelFormat(document.handle(channel)));
            return Some(tail);
        }

        let track = refs.track_format?;
        tail.push(RouteElement::TrackFormat(document.handle(track)));
        let stream = document.track_formats.node(track)?.refs.stream_format?;
        tail.push(RouteElement::StreamFormat(document.handle(stream)));
        let channel = document.stream_formats.node(stream)?.refs.channel_format?;
        tail.push(RouteElement::ChannelFormat(document.handle(channel)));
        Some(tail)
    }
}
