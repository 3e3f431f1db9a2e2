//! Reference edges between top-level elements
//!
//! Every edge kind is one impl of [`ListReference`] (ordered set of targets)
//! or [`SingleReference`] (one optional target). Mutations run their checks
//! first and only then touch the document, so a failed call leaves it as it
//! was:
//! - object → object, object ⇢ complementary object and pack → pack refuse
//!   edges that close a loop
//! - track UID → track format | channel format and stream → channel format
//!   | pack format are exclusive pairs
//! - a silent track UID takes no reference at all
//! - stream → track formats and track → stream are kept in sync
//!
//! A target may be a handle or a detached element, which is added to the
//! document first.

use std::collections::HashSet;

use log::debug;

use crate::document::{Document, ElementHandle, ReferenceSync, Store};
use crate::elements::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Element, ElementKind,
};
use crate::{AdmError, AdmResult};

// ═══════════════════════════════════════════════════════════════════════════════
// EDGE TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered, duplicate-free edge list from `Self` to `To`
pub trait ListReference<To: Element>: Element {
    #[doc(hidden)]
    fn list(refs: &Self::Refs) -> &Vec<usize>;

    #[doc(hidden)]
    fn list_mut(refs: &mut Self::Refs) -> &mut Vec<usize>;

    /// Checks before an existing element is appended
    #[doc(hidden)]
    fn check_add(_document: &Document, _from: usize, _to: usize) -> AdmResult<()> {
        Ok(())
    }

    #[doc(hidden)]
    fn after_add(_document: &mut Document, _from: usize, _to: usize) {}

    #[doc(hidden)]
    fn after_remove(_document: &mut Document, _from: usize, _to: usize) {}
}

/// Single optional edge from `Self` to `To`
pub trait SingleReference<To: Element>: Element {
    #[doc(hidden)]
    fn slot(refs: &Self::Refs) -> Option<usize>;

    #[doc(hidden)]
    fn slot_mut(refs: &mut Self::Refs) -> &mut Option<usize>;

    /// Checks on the source before the edge is set; `requested` names the target
    #[doc(hidden)]
    fn check_set(_document: &Document, _from: usize, _requested: &str) -> AdmResult<()> {
        Ok(())
    }

    #[doc(hidden)]
    fn after_set(_document: &mut Document, _from: usize, _previous: Option<usize>, _to: usize) {}

    #[doc(hidden)]
    fn after_unset(_document: &mut Document, _from: usize, _previous: usize) {}
}

// ═══════════════════════════════════════════════════════════════════════════════
// TARGETS
// ═══════════════════════════════════════════════════════════════════════════════

#[doc(hidden)]
pub enum Resolved<T> {
    Owned(usize),
    Detached(T),
}

/// Something that can be referenced: a handle, or a detached element
pub trait ReferenceTarget {
    type Element: Element;

    #[doc(hidden)]
    fn resolve(self, document: &Document) -> AdmResult<Resolved<Self::Element>>;
}

impl<T: Element> ReferenceTarget for ElementHandle<T> {
    type Element = T;

    fn resolve(self, document: &Document) -> AdmResult<Resolved<T>> {
        document.index_of(self).map(Resolved::Owned)
    }
}

impl<T: Element> ReferenceTarget for T {
    type Element = T;

    fn resolve(self, document: &Document) -> AdmResult<Resolved<T>> {
        document.prepare(self).map(Resolved::Detached)
    }
}

/// Check if adding `from → to` would close a loop (DFS from `to`)
fn would_create_cycle<T: Element>(
    store: &Store<T>,
    from: usize,
    to: usize,
    edges: impl Fn(&T::Refs) -> &Vec<usize>,
) -> bool {
    let mut visited = HashSet::new();
    let mut stack = vec![to];

    while let Some(current) = stack.pop() {
        if current == from {
            return true;
        }
        if visited.insert(current)
            && let Some(node) = store.node(current)
        {
            stack.extend(edges(&node.refs).iter().copied());
        }
    }

    false
}

fn cycle_error<T: Element>(document: &Document, from: usize, to: usize) -> AdmError {
    AdmError::ReferenceCycle {
        from: describe::<T>(document, from),
        to: describe::<T>(document, to),
    }
}

fn describe<T: Element>(document: &Document, index: usize) -> String {
    T::store(document)
        .node(index)
        .map(|node| node.element.to_string())
        .unwrap_or_else(|| T::KIND.to_string())
}

impl Document {
    fn commit<T: Element>(&mut self, target: Resolved<T>) -> usize {
        match target {
            Resolved::Owned(index) => index,
            Resolved::Detached(element) => {
                debug!("adding referenced {element} to the document");
                self.insert(element).index()
            }
        }
    }

    fn describe_target<T: Element>(&self, target: &Resolved<T>) -> String {
        match target {
            Resolved::Owned(index) => describe::<T>(self, *index),
            Resolved::Detached(element) => element.to_string(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LIST EDGES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Append a reference; `Ok(false)` when it already exists
    pub fn add_reference<F, R>(&mut self, from: ElementHandle<F>, to: R) -> AdmResult<bool>
    where
        F: ListReference<R::Element>,
        R: ReferenceTarget,
    {
        let from = self.index_of(from)?;
        let target = to.resolve(self)?;
        if let Resolved::Owned(to) = target {
            if F::list(&self.node::<F>(from)?.refs).contains(&to) {
                return Ok(false);
            }
            F::check_add(self, from, to)?;
        }

        let to = self.commit(target);
        F::list_mut(&mut self.node_mut::<F>(from)?.refs).push(to);
        F::after_add(self, from, to);
        Ok(true)
    }

    /// Remove a reference; `Ok(false)` when there was none
    pub fn remove_reference<F, T>(
        &mut self,
        from: ElementHandle<F>,
        to: ElementHandle<T>,
    ) -> AdmResult<bool>
    where
        F: ListReference<T>,
        T: Element,
    {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        let list = F::list_mut(&mut self.node_mut::<F>(from)?.refs);
        let Some(position) = list.iter().position(|&i| i == to) else {
            return Ok(false);
        };
        list.remove(position);
        F::after_remove(self, from, to);
        Ok(true)
    }

    /// Referenced elements of kind `T`, in insertion order
    pub fn references<T: Element>(
        &self,
        from: ElementHandle<impl ListReference<T>>,
    ) -> AdmResult<Vec<ElementHandle<T>>> {
        self.list_handles(from)
    }

    fn list_handles<F: ListReference<T>, T: Element>(
        &self,
        from: ElementHandle<F>,
    ) -> AdmResult<Vec<ElementHandle<T>>> {
        let from = self.index_of(from)?;
        let list = F::list(&self.node::<F>(from)?.refs);
        Ok(list.iter().map(|&i| self.handle(i)).collect())
    }

    /// Remove every reference of kind `T`
    pub fn clear_references<T: Element>(
        &mut self,
        from: ElementHandle<impl ListReference<T>>,
    ) -> AdmResult<()> {
        for to in self.list_handles::<_, T>(from)? {
            self.remove_reference(from, to)?;
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SINGLE EDGES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Set a single reference, replacing the previous target
    pub fn set_reference<F, R>(&mut self, from: ElementHandle<F>, to: R) -> AdmResult<()>
    where
        F: SingleReference<R::Element>,
        R: ReferenceTarget,
    {
        let from = self.index_of(from)?;
        let target = to.resolve(self)?;
        F::check_set(self, from, &self.describe_target(&target))?;

        let previous = F::slot(&self.node::<F>(from)?.refs);
        if let Resolved::Owned(to) = target
            && previous == Some(to)
        {
            return Ok(());
        }

        let to = self.commit(target);
        *F::slot_mut(&mut self.node_mut::<F>(from)?.refs) = Some(to);
        F::after_set(self, from, previous, to);
        Ok(())
    }

    /// Current target of a single reference
    pub fn reference<T: Element>(
        &self,
        from: ElementHandle<impl SingleReference<T>>,
    ) -> AdmResult<Option<ElementHandle<T>>> {
        self.slot_handle(from)
    }

    fn slot_handle<F: SingleReference<T>, T: Element>(
        &self,
        from: ElementHandle<F>,
    ) -> AdmResult<Option<ElementHandle<T>>> {
        let from = self.index_of(from)?;
        Ok(F::slot(&self.node::<F>(from)?.refs).map(|i| self.handle(i)))
    }

    /// Clear a single reference; `Ok(false)` when it was not set
    pub fn unset_reference<T: Element>(
        &mut self,
        from: ElementHandle<impl SingleReference<T>>,
    ) -> AdmResult<bool> {
        self.clear_slot::<_, T>(from)
    }

    fn clear_slot<F: SingleReference<T>, T: Element>(
        &mut self,
        from: ElementHandle<F>,
    ) -> AdmResult<bool> {
        let from = self.index_of(from)?;
        match F::slot_mut(&mut self.node_mut::<F>(from)?.refs).take() {
            Some(previous) => {
                F::after_unset(self, from, previous);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // COMPLEMENTARY OBJECTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Add a complementary object; a loop domain of its own
    pub fn add_complementary(
        &mut self,
        from: ElementHandle<AudioObject>,
        to: impl ReferenceTarget<Element = AudioObject>,
    ) -> AdmResult<bool> {
        let from = self.index_of(from)?;
        let target = to.resolve(self)?;
        if let Resolved::Owned(to) = target {
            if self.node::<AudioObject>(from)?.refs.complementary.contains(&to) {
                return Ok(false);
            }
            if would_create_cycle(&self.objects, from, to, |refs| &refs.complementary) {
                return Err(cycle_error::<AudioObject>(self, from, to));
            }
        }

        let to = self.commit(target);
        self.node_mut::<AudioObject>(from)?.refs.complementary.push(to);
        Ok(true)
    }

    pub fn remove_complementary(
        &mut self,
        from: ElementHandle<AudioObject>,
        to: ElementHandle<AudioObject>,
    ) -> AdmResult<bool> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        let list = &mut self.node_mut::<AudioObject>(from)?.refs.complementary;
        match list.iter().position(|&i| i == to) {
            Some(position) => {
                list.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn complementary_objects(
        &self,
        from: ElementHandle<AudioObject>,
    ) -> AdmResult<Vec<ElementHandle<AudioObject>>> {
        let from = self.index_of(from)?;
        let list = &self.node::<AudioObject>(from)?.refs.complementary;
        Ok(list.iter().map(|&i| self.handle(i)).collect())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REMOVAL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Drop every edge pointing at `index` of `kind`
    pub(crate) fn detach_incoming(&mut self, kind: ElementKind, index: usize) {
        let drop_from = |list: &mut Vec<usize>| list.retain(|&i| i != index);
        let clear = |slot: &mut Option<usize>| {
            if *slot == Some(index) {
                *slot = None;
            }
        };

        match kind {
            ElementKind::AudioProgramme => {}
            ElementKind::AudioContent => {
                self.programmes.refs_mut().for_each(|r| drop_from(&mut r.contents));
            }
            ElementKind::AudioObject => {
                self.contents.refs_mut().for_each(|r| drop_from(&mut r.objects));
                self.objects.refs_mut().for_each(|r| {
                    drop_from(&mut r.objects);
                    drop_from(&mut r.complementary);
                });
            }
            ElementKind::AudioPackFormat => {
                self.objects.refs_mut().for_each(|r| drop_from(&mut r.pack_formats));
                self.pack_formats.refs_mut().for_each(|r| drop_from(&mut r.pack_formats));
                self.stream_formats.refs_mut().for_each(|r| clear(&mut r.pack_format));
                self.track_uids.refs_mut().for_each(|r| clear(&mut r.pack_format));
            }
            ElementKind::AudioChannelFormat => {
                self.pack_formats.refs_mut().for_each(|r| drop_from(&mut r.channel_formats));
                self.stream_formats.refs_mut().for_each(|r| clear(&mut r.channel_format));
                self.track_uids.refs_mut().for_each(|r| clear(&mut r.channel_format));
            }
            ElementKind::AudioStreamFormat => {
                self.track_formats.refs_mut().for_each(|r| clear(&mut r.stream_format));
            }
            ElementKind::AudioTrackFormat => {
                self.stream_formats.refs_mut().for_each(|r| drop_from(&mut r.track_formats));
                self.track_uids.refs_mut().for_each(|r| clear(&mut r.track_format));
            }
            ElementKind::AudioTrackUid => {
                self.objects.refs_mut().for_each(|r| drop_from(&mut r.track_uids));
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EDGE DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════════════

macro_rules! list_reference {
    ($from:ty => $to:ty, $field:ident) => {
        impl ListReference<$to> for $from {
            fn list(refs: &Self::Refs) -> &Vec<usize> {
                &refs.$field
            }

            fn list_mut(refs: &mut Self::Refs) -> &mut Vec<usize> {
                &mut refs.$field
            }
        }
    };
    ($from:ty => $to:ty, $field:ident, acyclic) => {
        impl ListReference<$to> for $from {
            fn list(refs: &Self::Refs) -> &Vec<usize> {
                &refs.$field
            }

            fn list_mut(refs: &mut Self::Refs) -> &mut Vec<usize> {
                &mut refs.$field
            }

            fn check_add(document: &Document, from: usize, to: usize) -> AdmResult<()> {
                if would_create_cycle(<$from>::store(document), from, to, |refs| &refs.$field) {
                    return Err(cycle_error::<$from>(document, from, to));
                }
                Ok(())
            }
        }
    };
}

list_reference!(AudioProgramme => AudioContent, contents);
list_reference!(AudioContent => AudioObject, objects);
list_reference!(AudioObject => AudioObject, objects, acyclic);
list_reference!(AudioObject => AudioPackFormat, pack_formats);
list_reference!(AudioObject => AudioTrackUid, track_uids);
list_reference!(AudioPackFormat => AudioChannelFormat, channel_formats);
list_reference!(AudioPackFormat => AudioPackFormat, pack_formats, acyclic);

/// `MutuallyExclusiveReferences` when the sibling slot of an exclusive pair is set
fn check_exclusive<Other: Element>(
    document: &Document,
    element: String,
    sibling: Option<usize>,
    requested: &str,
) -> AdmResult<()> {
    match sibling {
        Some(existing) => Err(AdmError::MutuallyExclusiveReferences {
            element,
            existing: describe::<Other>(document, existing),
            requested: requested.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_track_uid(
    document: &Document,
    from: usize,
    requested: &str,
    sibling: impl Fn(&crate::elements::TrackUidRefs) -> Option<usize>,
) -> AdmResult<(String, Option<usize>)> {
    let node = document.node::<AudioTrackUid>(from)?;
    if node.element.is_silent() {
        return Err(AdmError::SilentTrackUid(format!(
            "cannot reference {requested}"
        )));
    }
    Ok((node.element.to_string(), sibling(&node.refs)))
}

impl SingleReference<AudioTrackFormat> for AudioTrackUid {
    fn slot(refs: &Self::Refs) -> Option<usize> {
        refs.track_format
    }

    fn slot_mut(refs: &mut Self::Refs) -> &mut Option<usize> {
        &mut refs.track_format
    }

    fn check_set(document: &Document, from: usize, requested: &str) -> AdmResult<()> {
        let (element, sibling) = check_track_uid(document, from, requested, |r| r.channel_format)?;
        check_exclusive::<AudioChannelFormat>(document, element, sibling, requested)
    }
}

impl SingleReference<AudioChannelFormat> for AudioTrackUid {
    fn slot(refs: &Self::Refs) -> Option<usize> {
        refs.channel_format
    }

    fn slot_mut(refs: &mut Self::Refs) -> &mut Option<usize> {
        &mut refs.channel_format
    }

    fn check_set(document: &Document, from: usize, requested: &str) -> AdmResult<()> {
        let (element, sibling) = check_track_uid(document, from, requested, |r| r.track_format)?;
        check_exclusive::<AudioTrackFormat>(document, element, sibling, requested)
    }
}

impl SingleReference<AudioPackFormat> for AudioTrackUid {
    fn slot(refs: &Self::Refs) -> Option<usize> {
        refs.pack_format
    }

    fn slot_mut(refs: &mut Self::Refs) -> &mut Option<usize> {
        &mut refs.pack_format
    }

    fn check_set(document: &Document, from: usize, requested: &str) -> AdmResult<()> {
        check_track_uid(document, from, requested, |_| None).map(|_| ())
    }
}

fn stream_sibling(
    document: &Document,
    from: usize,
    sibling: impl Fn(&crate::elements::StreamFormatRefs) -> Option<usize>,
) -> AdmResult<(String, Option<usize>)> {
    let node = document.node::<AudioStreamFormat>(from)?;
    Ok((node.element.to_string(), sibling(&node.refs)))
}

impl SingleReference<AudioChannelFormat> for AudioStreamFormat {
    fn slot(refs: &Self::Refs) -> Option<usize> {
        refs.channel_format
    }

    fn slot_mut(refs: &mut Self::Refs) -> &mut Option<usize> {
        &mut refs.channel_format
    }

    fn check_set(document: &Document, from: usize, requested: &str) -> AdmResult<()> {
        let (element, sibling) = stream_sibling(document, from, |r| r.pack_format)?;
        check_exclusive::<AudioPackFormat>(document, element, sibling, requested)
    }
}

impl SingleReference<AudioPackFormat> for AudioStreamFormat {
    fn slot(refs: &Self::Refs) -> Option<usize> {
        refs.pack_format
    }

    fn slot_mut(refs: &mut Self::Refs) -> &mut Option<usize> {
        &mut refs.pack_format
    }

    fn check_set(document: &Document, from: usize, requested: &str) -> AdmResult<()> {
        let (element, sibling) = stream_sibling(document, from, |r| r.channel_format)?;
        check_exclusive::<AudioChannelFormat>(document, element, sibling, requested)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STREAM ↔ TRACK
// ═══════════════════════════════════════════════════════════════════════════════

fn unlink_track(document: &mut Document, stream: usize, track: usize) {
    if let Some(node) = document.stream_formats.node_mut(stream) {
        node.refs.track_formats.retain(|&i| i != track);
    }
}

impl ListReference<AudioTrackFormat> for AudioStreamFormat {
    fn list(refs: &Self::Refs) -> &Vec<usize> {
        &refs.track_formats
    }

    fn list_mut(refs: &mut Self::Refs) -> &mut Vec<usize> {
        &mut refs.track_formats
    }

    fn after_add(document: &mut Document, from: usize, to: usize) {
        match document.reference_sync() {
            ReferenceSync::Bidirectional => {
                let previous = document
                    .track_formats
                    .node_mut(to)
                    .and_then(|node| node.refs.stream_format.replace(from));
                if let Some(previous) = previous
                    && previous != from
                {
                    unlink_track(document, previous, to);
                }
            }
        }
    }

    fn after_remove(document: &mut Document, from: usize, to: usize) {
        match document.reference_sync() {
            ReferenceSync::Bidirectional => {
                if let Some(node) = document.track_formats.node_mut(to)
                    && node.refs.stream_format == Some(from)
                {
                    node.refs.stream_format = None;
                }
            }
        }
    }
}

impl SingleReference<AudioStreamFormat> for AudioTrackFormat {
    fn slot(refs: &Self::Refs) -> Option<usize> {
        refs.stream_format
    }

    fn slot_mut(refs: &mut Self::Refs) -> &mut Option<usize> {
        &mut refs.stream_format
    }

    fn after_set(document: &mut Document, from: usize, previous: Option<usize>, to: usize) {
        match document.reference_sync() {
            ReferenceSync::Bidirectional => {
                if let Some(previous) = previous {
                    unlink_track(document, previous, from);
                }
                if let Some(node) = document.stream_formats.node_mut(to)
                    && !node.refs.track_formats.contains(&from)
                {
                    node.refs.track_formats.push(from);
                }
            }
        }
    }

    fn after_unset(document: &mut Document, from: usize, previous: usize) {
        match document.reference_sync() {
            ReferenceSync::Bidirectional => unlink_track(document, previous, from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::SampleRate;
    use crate::parameters::Parameters;
    use crate::{AudioTrackUidId, FormatDescriptor, TypeDescriptor};

    #[test]
    fn test_object_cycle_leaves_no_edge() {
        let mut doc = Document::new();
        let o1 = doc.add(AudioObject::new("o1")).unwrap();
        let o2 = doc.add(AudioObject::new("o2")).unwrap();
        let o3 = doc.add(AudioObject::new("o3")).unwrap();

        assert!(doc.add_reference(o1, o2).unwrap());
        assert!(doc.add_reference(o2, o3).unwrap());
        let err = doc.add_reference(o3, o1).unwrap_err();
        assert!(matches!(err, AdmError::ReferenceCycle { .. }));
        assert!(doc.references::<AudioObject>(o3).unwrap().is_empty());
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut doc = Document::new();
        let pack = doc
            .add(AudioPackFormat::new("p", TypeDescriptor::Objects))
            .unwrap();
        assert!(matches!(
            doc.add_reference(pack, pack),
            Err(AdmError::ReferenceCycle { .. })
        ));
    }

    #[test]
    fn test_duplicate_reference() {
        let mut doc = Document::new();
        let programme = doc.add(AudioProgramme::new("p")).unwrap();
        let content = doc.add(AudioContent::new("c")).unwrap();
        assert!(doc.add_reference(programme, content).unwrap());
        assert!(!doc.add_reference(programme, content).unwrap());
        assert_eq!(doc.references::<AudioContent>(programme).unwrap(), vec![content]);
    }

    #[test]
    fn test_complementary_is_separate_domain() {
        let mut doc = Document::new();
        let a = doc.add(AudioObject::new("a")).unwrap();
        let b = doc.add(AudioObject::new("b")).unwrap();

        doc.add_reference(a, b).unwrap();
        // nested b -> a would loop, the complementary edge does not
        assert!(doc.add_complementary(b, a).unwrap());
        assert!(matches!(
            doc.add_complementary(a, b),
            Err(AdmError::ReferenceCycle { .. })
        ));
        assert_eq!(doc.complementary_objects(b).unwrap(), vec![a]);
        assert!(doc.remove_complementary(b, a).unwrap());
    }

    #[test]
    fn test_auto_parenting() {
        let mut doc = Document::new();
        let object = doc.add(AudioObject::new("o")).unwrap();
        doc.add_reference(object, AudioPackFormat::new("p", TypeDescriptor::Objects))
            .unwrap();
        assert_eq!(doc.len::<AudioPackFormat>(), 1);
        let packs = doc.references::<AudioPackFormat>(object).unwrap();
        assert_eq!(doc.get(packs[0]).unwrap().name(), "p");
    }

    #[test]
    fn test_cross_document_reference() {
        let mut one = Document::new();
        let mut two = Document::new();
        let object = one.add(AudioObject::new("o")).unwrap();
        let uid = two.add(AudioTrackUid::new()).unwrap();
        assert!(matches!(
            one.add_reference(object, uid),
            Err(AdmError::CrossDocumentReference { .. })
        ));
    }

    #[test]
    fn test_mutually_exclusive_track_uid() {
        let mut doc = Document::new();
        let uid = doc.add(AudioTrackUid::new()).unwrap();
        let track = doc
            .add(AudioTrackFormat::new("t", FormatDescriptor::Pcm))
            .unwrap();
        let channel = doc
            .add(AudioChannelFormat::new("c", TypeDescriptor::Objects))
            .unwrap();

        doc.set_reference(uid, track).unwrap();
        let err = doc.set_reference(uid, channel).unwrap_err();
        match err {
            AdmError::MutuallyExclusiveReferences { existing, requested, .. } => {
                assert!(existing.starts_with("AudioTrackFormat"));
                assert!(requested.starts_with("AudioChannelFormat"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(doc.reference::<AudioTrackFormat>(uid).unwrap(), Some(track));
        assert_eq!(doc.reference::<AudioChannelFormat>(uid).unwrap(), None);

        doc.unset_reference::<AudioTrackFormat>(uid).unwrap();
        doc.set_reference(uid, channel).unwrap();
    }

    #[test]
    fn test_mutually_exclusive_stream() {
        let mut doc = Document::new();
        let stream = doc
            .add(AudioStreamFormat::new("s", FormatDescriptor::Pcm))
            .unwrap();
        doc.set_reference(stream, AudioPackFormat::new("p", TypeDescriptor::Hoa))
            .unwrap();
        let channel = AudioChannelFormat::new("c", TypeDescriptor::Hoa);
        assert!(matches!(
            doc.set_reference(stream, channel),
            Err(AdmError::MutuallyExclusiveReferences { .. })
        ));
        // the rejected detached channel was not added
        assert_eq!(doc.len::<AudioChannelFormat>(), 0);
    }

    #[test]
    fn test_stream_track_sync() {
        let mut doc = Document::new();
        let s1 = doc
            .add(AudioStreamFormat::new("s1", FormatDescriptor::Pcm))
            .unwrap();
        let s2 = doc
            .add(AudioStreamFormat::new("s2", FormatDescriptor::Pcm))
            .unwrap();
        let track = doc
            .add(AudioTrackFormat::new("t", FormatDescriptor::Pcm))
            .unwrap();

        doc.add_reference(s1, track).unwrap();
        assert_eq!(doc.reference::<AudioStreamFormat>(track).unwrap(), Some(s1));

        // moving the track updates both streams
        doc.set_reference(track, s2).unwrap();
        assert!(doc.references::<AudioTrackFormat>(s1).unwrap().is_empty());
        assert_eq!(doc.references::<AudioTrackFormat>(s2).unwrap(), vec![track]);

        doc.remove_reference(s2, track).unwrap();
        assert_eq!(doc.reference::<AudioStreamFormat>(track).unwrap(), None);

        doc.set_reference(track, s1).unwrap();
        doc.unset_reference::<AudioStreamFormat>(track).unwrap();
        assert!(doc.references::<AudioTrackFormat>(s1).unwrap().is_empty());
    }

    #[test]
    fn test_silent_track_uid_transitions() {
        let mut doc = Document::new();
        let uid = doc.add(AudioTrackUid::new()).unwrap();
        doc.set_reference(uid, AudioPackFormat::new("p", TypeDescriptor::Objects))
            .unwrap();

        // references block the silent ID
        assert!(matches!(
            doc.set_id(uid, AudioTrackUidId::SILENT),
            Err(AdmError::SilentTrackUid(_))
        ));
        doc.unset_reference::<AudioPackFormat>(uid).unwrap();
        doc.set_id(uid, AudioTrackUidId::SILENT).unwrap();

        // silent tracks take no references or parameters
        let track = doc
            .add(AudioTrackFormat::new("t", FormatDescriptor::Pcm))
            .unwrap();
        assert!(matches!(
            doc.set_reference(uid, track),
            Err(AdmError::SilentTrackUid(_))
        ));
        assert!(matches!(
            doc.get_mut(uid).unwrap().set(SampleRate::new(48000).unwrap()),
            Err(AdmError::SilentTrackUid(_))
        ));

        // objects may still point at the silent track
        let object = doc.add(AudioObject::new("o")).unwrap();
        assert!(doc.add_reference(object, uid).unwrap());
    }

    #[test]
    fn test_remove_detaches_edges() {
        let mut doc = Document::new();
        let content = doc.add(AudioContent::new("c")).unwrap();
        let object = doc.add(AudioObject::new("o")).unwrap();
        let uid = doc.add(AudioTrackUid::new()).unwrap();
        doc.add_reference(content, object).unwrap();
        doc.add_reference(object, uid).unwrap();

        doc.remove(object).unwrap();
        assert!(doc.references::<AudioObject>(content).unwrap().is_empty());
        // no cascade
        assert!(doc.contains(uid));
    }

    #[test]
    fn test_clear_references() {
        let mut doc = Document::new();
        let pack = doc
            .add(AudioPackFormat::new("p", TypeDescriptor::DirectSpeakers))
            .unwrap();
        for name in ["L", "R"] {
            doc.add_reference(pack, AudioChannelFormat::new(name, TypeDescriptor::DirectSpeakers))
                .unwrap();
        }
        assert_eq!(doc.references::<AudioChannelFormat>(pack).unwrap().len(), 2);
        doc.clear_references::<AudioChannelFormat>(pack).unwrap();
        assert!(doc.references::<AudioChannelFormat>(pack).unwrap().is_empty());
        assert_eq!(doc.len::<AudioChannelFormat>(), 2);
    }
}
