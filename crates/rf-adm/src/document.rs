//! Document: owner of all top-level elements
//!
//! Elements live in one arena per kind. Edges between them are arena indices
//! kept next to each element, so the graph may contain cycles in its shape
//! (stream ↔ track) without any ownership cycle. Callers hold typed
//! [`ElementHandle`]s tagged with the document they came from.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::elements::block_formats::BlockFormat;
use crate::elements::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Element,
};
use crate::ids::ElementId;
use crate::parameters::{HasParameter, ParameterHost, SetParameter, UnsetParameter, VectorParameter};
use crate::{AdmError, AdmResult};

static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(1);

fn next_document_uid() -> u64 {
    NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed)
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Typed reference to an element owned by a [`Document`]
pub struct ElementHandle<T> {
    document: u64,
    index: usize,
    _kind: PhantomData<fn() -> T>,
}

impl<T> ElementHandle<T> {
    fn new(document: u64, index: usize) -> Self {
        Self {
            document,
            index,
            _kind: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for ElementHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ElementHandle<T> {}

impl<T> PartialEq for ElementHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document && self.index == other.index
    }
}

impl<T> Eq for ElementHandle<T> {}

impl<T> Hash for ElementHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.hash(state);
        self.index.hash(state);
    }
}

impl<T: Element> fmt::Debug for ElementHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", T::KIND, self.index, self.document)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// An element and its outgoing edges
#[derive(Debug)]
pub(crate) struct Node<T: Element> {
    pub element: T,
    pub refs: T::Refs,
}

impl<T: Element> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            refs: self.refs.clone(),
        }
    }
}

/// Arena of one element kind; indices are never reused
#[derive(Debug)]
pub struct Store<T: Element> {
    slots: Vec<Option<Node<T>>>,
    ids: HashMap<T::Id, usize>,
}

impl<T: Element> Default for Store<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            ids: HashMap::new(),
        }
    }
}

impl<T: Element> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            ids: self.ids.clone(),
        }
    }
}

impl<T: Element> Store<T> {
    pub(crate) fn node(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub(crate) fn lookup(&self, id: &T::Id) -> Option<usize> {
        self.ids.get(id).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &Node<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (i, node)))
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = (usize, &mut Node<T>)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|node| (i, node)))
    }

    pub(crate) fn refs_mut(&mut self) -> impl Iterator<Item = &mut T::Refs> {
        self.slots.iter_mut().flatten().map(|node| &mut node.refs)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    fn insert(&mut self, element: T) -> usize {
        let index = self.slots.len();
        self.ids.insert(element.id(), index);
        self.slots.push(Some(Node {
            element,
            refs: T::Refs::default(),
        }));
        index
    }

    fn take(&mut self, index: usize) -> Option<Node<T>> {
        let node = self.slots.get_mut(index)?.take()?;
        if self.ids.get(&node.element.id()) == Some(&index) {
            self.ids.remove(&node.element.id());
        }
        Some(node)
    }

    fn rekey(&mut self, old: &T::Id, new: T::Id, index: usize) {
        if self.ids.get(old) == Some(&index) {
            self.ids.remove(old);
        }
        self.ids.insert(new, index);
    }

    /// Rebuild the ID map after IDs changed in place
    pub(crate) fn reindex(&mut self) {
        self.ids = self.iter().map(|(i, node)| (node.element.id(), i)).collect();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// How paired references are kept consistent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferenceSync {
    /// Setting either side of a stream ↔ track link updates the other
    #[default]
    Bidirectional,
}

/// Owner of a complete ADM element graph
#[derive(Debug)]
pub struct Document {
    uid: u64,
    sync: ReferenceSync,
    pub(crate) programmes: Store<AudioProgramme>,
    pub(crate) contents: Store<AudioContent>,
    pub(crate) objects: Store<AudioObject>,
    pub(crate) pack_formats: Store<AudioPackFormat>,
    pub(crate) channel_formats: Store<AudioChannelFormat>,
    pub(crate) stream_formats: Store<AudioStreamFormat>,
    pub(crate) track_formats: Store<AudioTrackFormat>,
    pub(crate) track_uids: Store<AudioTrackUid>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            uid: next_document_uid(),
            sync: ReferenceSync::default(),
            programmes: Store::default(),
            contents: Store::default(),
            objects: Store::default(),
            pack_formats: Store::default(),
            channel_formats: Store::default(),
            stream_formats: Store::default(),
            track_formats: Store::default(),
            track_uids: Store::default(),
        }
    }

    /// Independent copy with an isomorphic graph.
    ///
    /// Handles of `self` do not resolve in the copy; look elements up by ID.
    pub fn deep_copy(&self) -> Self {
        Self {
            uid: next_document_uid(),
            sync: self.sync,
            programmes: self.programmes.clone(),
            contents: self.contents.clone(),
            objects: self.objects.clone(),
            pack_formats: self.pack_formats.clone(),
            channel_formats: self.channel_formats.clone(),
            stream_formats: self.stream_formats.clone(),
            track_formats: self.track_formats.clone(),
            track_uids: self.track_uids.clone(),
        }
    }

    #[inline]
    pub fn reference_sync(&self) -> ReferenceSync {
        self.sync
    }

    pub fn set_reference_sync(&mut self, sync: ReferenceSync) {
        self.sync = sync;
    }

    /// Add an element, assigning an ID when it has none
    pub fn add<T: Element>(&mut self, element: T) -> AdmResult<ElementHandle<T>> {
        let element = self.prepare(element)?;
        Ok(self.insert(element))
    }

    /// Fallible half of `add`: ID assignment and uniqueness
    pub(crate) fn prepare<T: Element>(&self, mut element: T) -> AdmResult<T> {
        let store = T::store(self);
        if element.needs_id() {
            let mut candidate = element.id().first_candidate();
            while store.lookup(&candidate).is_some() {
                candidate = candidate.next_candidate()?;
            }
            element.set_id(candidate)?;
            debug!("assigned {candidate} to new {}", T::KIND);
        } else if store.lookup(&element.id()).is_some() {
            return Err(AdmError::DuplicateId {
                kind: T::KIND,
                id: element.id().to_string(),
            });
        }
        Ok(element)
    }

    /// Infallible half of `add`; `element` must come from `prepare`
    pub(crate) fn insert<T: Element>(&mut self, element: T) -> ElementHandle<T> {
        let index = T::store_mut(self).insert(element);
        self.handle(index)
    }

    #[inline]
    pub(crate) fn handle<T>(&self, index: usize) -> ElementHandle<T> {
        ElementHandle::new(self.uid, index)
    }

    /// Arena index of a handle of this document
    pub(crate) fn index_of<T: Element>(&self, handle: ElementHandle<T>) -> AdmResult<usize> {
        if handle.document != self.uid {
            return Err(AdmError::CrossDocumentReference { kind: T::KIND });
        }
        match T::store(self).node(handle.index) {
            Some(_) => Ok(handle.index),
            None => Err(AdmError::ElementNotFound { kind: T::KIND }),
        }
    }

    pub(crate) fn node<T: Element>(&self, index: usize) -> AdmResult<&Node<T>> {
        T::store(self)
            .node(index)
            .ok_or(AdmError::ElementNotFound { kind: T::KIND })
    }

    pub(crate) fn node_mut<T: Element>(&mut self, index: usize) -> AdmResult<&mut Node<T>> {
        T::store_mut(self)
            .node_mut(index)
            .ok_or(AdmError::ElementNotFound { kind: T::KIND })
    }

    pub fn get<T: Element>(&self, handle: ElementHandle<T>) -> AdmResult<&T> {
        let index = self.index_of(handle)?;
        Ok(&self.node::<T>(index)?.element)
    }

    /// Parameter access; IDs change through [`Document::set_id`]
    pub fn get_mut<T: Element>(&mut self, handle: ElementHandle<T>) -> AdmResult<ElementMut<'_, T>> {
        let index = self.index_of(handle)?;
        Ok(ElementMut {
            element: &mut self.node_mut::<T>(index)?.element,
        })
    }

    pub fn lookup<T: Element>(&self, id: &T::Id) -> Option<ElementHandle<T>> {
        T::store(self).lookup(id).map(|index| self.handle(index))
    }

    pub fn contains<T: Element>(&self, handle: ElementHandle<T>) -> bool {
        self.index_of(handle).is_ok()
    }

    /// Elements of one kind in insertion order
    pub fn elements<T: Element>(&self) -> impl Iterator<Item = &T> {
        T::store(self).iter().map(|(_, node)| &node.element)
    }

    /// Handles of one kind in insertion order
    pub fn handles<T: Element>(&self) -> Vec<ElementHandle<T>> {
        T::store(self).iter().map(|(i, _)| self.handle(i)).collect()
    }

    pub fn iter<T: Element>(&self) -> impl Iterator<Item = (ElementHandle<T>, &T)> {
        T::store(self)
            .iter()
            .map(|(i, node)| (self.handle(i), &node.element))
    }

    pub fn len<T: Element>(&self) -> usize {
        T::store(self).len()
    }

    /// True when no element of any kind is present
    pub fn is_empty(&self) -> bool {
        self.programmes.len() == 0
            && self.contents.len() == 0
            && self.objects.len() == 0
            && self.pack_formats.len() == 0
            && self.channel_formats.len() == 0
            && self.stream_formats.len() == 0
            && self.track_formats.len() == 0
            && self.track_uids.len() == 0
    }

    /// Change an element's ID.
    ///
    /// Fails with `DuplicateId` when another element of the kind uses `id`,
    /// and with the element's own checks (type section, silent track UID).
    pub fn set_id<T: Element>(&mut self, handle: ElementHandle<T>, id: T::Id) -> AdmResult<()> {
        let index = self.index_of(handle)?;
        let node = self.node::<T>(index)?;
        let old = node.element.id();
        if old == id {
            return Ok(());
        }
        if T::store(self).lookup(&id).is_some_and(|other| other != index) {
            return Err(AdmError::DuplicateId {
                kind: T::KIND,
                id: id.to_string(),
            });
        }
        node.element.check_id_change(&node.refs, &id)?;

        let store = T::store_mut(self);
        if let Some(node) = store.node_mut(index) {
            node.element.set_id(id)?;
        }
        store.rekey(&old, id, index);
        Ok(())
    }

    /// Remove an element and every edge to or from it.
    ///
    /// Elements it referenced stay in the document.
    pub fn remove<T: Element>(&mut self, handle: ElementHandle<T>) -> AdmResult<T> {
        let index = self.index_of(handle)?;
        self.detach_incoming(T::KIND, index);
        T::store_mut(self)
            .take(index)
            .map(|node| node.element)
            .ok_or(AdmError::ElementNotFound { kind: T::KIND })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MUTABLE ACCESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Mutable view of an owned element.
///
/// Forwards parameter access; the ID can only change through the document,
/// which keeps it unique.
pub struct ElementMut<'a, T: Element> {
    element: &'a mut T,
}

impl<T: Element> Deref for ElementMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.element
    }
}

impl<T: Element> fmt::Debug for ElementMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.element, f)
    }
}

impl<T: Element> ParameterHost for ElementMut<'_, T> {}

impl<P, T: Element + HasParameter<P>> HasParameter<P> for ElementMut<'_, T> {
    fn get_parameter(&self) -> Option<P> {
        self.element.get_parameter()
    }

    fn has_parameter(&self) -> bool {
        self.element.has_parameter()
    }

    fn is_default_parameter(&self) -> bool {
        self.element.is_default_parameter()
    }
}

impl<P, T: Element + SetParameter<P>> SetParameter<P> for ElementMut<'_, T> {
    fn set_parameter(&mut self, value: P) -> AdmResult<()> {
        self.element.set_parameter(value)
    }
}

impl<P, T: Element + UnsetParameter<P>> UnsetParameter<P> for ElementMut<'_, T> {
    fn unset_parameter(&mut self) {
        self.element.unset_parameter()
    }
}

impl<I, T: Element + VectorParameter<I>> VectorParameter<I> for ElementMut<'_, T> {
    fn add_item(&mut self, item: I) -> bool {
        self.element.add_item(item)
    }

    fn remove_item(&mut self, item: &I) -> bool {
        self.element.remove_item(item)
    }
}

impl ElementMut<'_, AudioChannelFormat> {
    pub fn add_block_format<B: BlockFormat>(&mut self, block: B) -> AdmResult<()> {
        self.element.add_block_format(block)
    }

    pub fn block_formats_mut<B: BlockFormat>(&mut self) -> &mut [B] {
        self.element.block_formats_mut()
    }

    pub fn remove_block_format(&mut self, index: usize) -> bool {
        self.element.remove_block_format(index)
    }

    pub fn clear_block_formats(&mut self) {
        self.element.clear_block_formats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Importance;
    use crate::parameters::Parameters;
    use crate::{AudioObjectId, AudioPackFormatId, AudioTrackUidId, TypeDescriptor};

    #[test]
    fn test_add_assigns_ids() {
        let mut doc = Document::new();
        let a = doc.add(AudioObject::new("a")).unwrap();
        let b = doc.add(AudioObject::new("b")).unwrap();
        assert_eq!(doc.get(a).unwrap().id().format(), "AO_1001");
        assert_eq!(doc.get(b).unwrap().id().format(), "AO_1002");

        let uid = doc.add(AudioTrackUid::new()).unwrap();
        assert_eq!(doc.get(uid).unwrap().id().format(), "ATU_00000001");

        let pack = doc
            .add(AudioPackFormat::new("p", TypeDescriptor::Objects))
            .unwrap();
        assert_eq!(doc.get(pack).unwrap().id().format(), "AP_00031001");
    }

    #[test]
    fn test_assignment_skips_used_ids() {
        let mut doc = Document::new();
        let explicit = AudioObjectId::from_value(0x1001).unwrap();
        doc.add(AudioObject::new("explicit").with_id(explicit)).unwrap();
        let auto = doc.add(AudioObject::new("auto")).unwrap();
        assert_eq!(doc.get(auto).unwrap().id().format(), "AO_1002");
    }

    #[test]
    fn test_duplicate_id() {
        let mut doc = Document::new();
        let id = AudioObjectId::from_value(0x1005).unwrap();
        doc.add(AudioObject::new("a").with_id(id)).unwrap();
        let err = doc.add(AudioObject::new("b").with_id(id)).unwrap_err();
        assert!(matches!(err, AdmError::DuplicateId { .. }));
        assert_eq!(doc.len::<AudioObject>(), 1);
    }

    #[test]
    fn test_set_id() {
        let mut doc = Document::new();
        let a = doc.add(AudioObject::new("a")).unwrap();
        let b = doc.add(AudioObject::new("b")).unwrap();
        let b_id = doc.get(b).unwrap().id();

        assert!(matches!(doc.set_id(a, b_id), Err(AdmError::DuplicateId { .. })));

        let new_id = AudioObjectId::from_value(0x2000).unwrap();
        doc.set_id(a, new_id).unwrap();
        assert_eq!(doc.lookup::<AudioObject>(&new_id), Some(a));
        assert!(doc
            .lookup::<AudioObject>(&AudioObjectId::from_value(0x1001).unwrap())
            .is_none());
    }

    #[test]
    fn test_set_id_type_mismatch_leaves_document() {
        let mut doc = Document::new();
        let pack = doc
            .add(AudioPackFormat::new("p", TypeDescriptor::Objects))
            .unwrap();
        let wrong: AudioPackFormatId = "AP_00011001".parse().unwrap();
        assert!(matches!(doc.set_id(pack, wrong), Err(AdmError::TypeMismatch { .. })));
        assert_eq!(doc.get(pack).unwrap().id().format(), "AP_00031001");
        assert!(doc.lookup::<AudioPackFormat>(&wrong).is_none());
    }

    #[test]
    fn test_cross_document_handle() {
        let mut one = Document::new();
        let two = Document::new();
        let object = one.add(AudioObject::new("a")).unwrap();
        assert!(matches!(
            two.get(object),
            Err(AdmError::CrossDocumentReference { .. })
        ));
    }

    #[test]
    fn test_remove() {
        let mut doc = Document::new();
        let a = doc.add(AudioObject::new("a")).unwrap();
        let removed = doc.remove(a).unwrap();
        assert_eq!(removed.name(), "a");
        assert!(!doc.contains(a));
        assert!(matches!(doc.get(a), Err(AdmError::ElementNotFound { .. })));
        assert!(doc.is_empty());

        // the freed ID can be used again
        doc.add(AudioObject::new("b").with_id(removed.id())).unwrap();
    }

    #[test]
    fn test_element_mut_forwards_parameters() {
        let mut doc = Document::new();
        let a = doc.add(AudioObject::new("a")).unwrap();
        doc.get_mut(a)
            .unwrap()
            .set(Importance::new(3).unwrap())
            .unwrap();
        assert_eq!(doc.get(a).unwrap().get::<Importance>().get(), 3);
    }

    #[test]
    fn test_silent_uid_added_without_assignment() {
        let mut doc = Document::new();
        let silent = doc.add(AudioTrackUid::silent()).unwrap();
        assert_eq!(doc.get(silent).unwrap().id(), AudioTrackUidId::SILENT);
        let next = doc.add(AudioTrackUid::new()).unwrap();
        assert_eq!(doc.get(next).unwrap().id().format(), "ATU_00000001");
    }

    #[test]
    fn test_iteration_order() {
        let mut doc = Document::new();
        for name in ["x", "y", "z"] {
            doc.add(AudioObject::new(name)).unwrap();
        }
        let names: Vec<&str> = doc.elements::<AudioObject>().map(|o| o.name()).collect();
        assert_eq!(names, ["x", "y", "z"]);
        assert_eq!(doc.handles::<AudioObject>().len(), 3);

        let pairs: Vec<_> = doc.iter::<AudioObject>().collect();
        assert_eq!(pairs[1].1.name(), "y");
        assert_eq!(doc.get(pairs[1].0).unwrap().name(), "y");
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut doc = Document::new();
        let a = doc.add(AudioObject::new("a")).unwrap();
        let id = doc.get(a).unwrap().id();

        let mut copy = doc.deep_copy();
        assert!(copy.get(a).is_err());
        let copied = copy.lookup::<AudioObject>(&id).unwrap();
        copy.get_mut(copied)
            .unwrap()
            .set(Importance::new(1).unwrap())
            .unwrap();
        assert!(!doc.get(a).unwrap().has::<Importance>());
    }
}
