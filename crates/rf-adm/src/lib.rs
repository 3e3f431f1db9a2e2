//! rf-adm: Audio Definition Model object model
//!
//! Typed ADM elements (ITU-R BS.2076 / BS.2125), their identifiers and the
//! reference graph between them. A [`Document`] owns every top-level element
//! and enforces the graph invariants on each mutation:
//! - IDs are unique per element kind; missing IDs are assigned from `0x1001`
//! - object → object, complementary object and pack → pack edges never cycle
//! - track UID → track format / channel format and stream format → channel
//!   format / pack format are mutually exclusive pairs
//! - stream format ↔ track format edges stay in sync
//! - the silent track UID (`ATU_00000000`) carries no parameters or references
//!
//! ```rust,ignore
//! let mut doc = Document::new();
//! let programme = doc.add(AudioProgramme::new("Main"))?;
//! let content = doc.add(AudioContent::new("Dialogue"))?;
//! doc.add_reference(programme, content)?;
//! doc.add_reference(content, AudioObject::new("Voice"))?; // added to doc
//! ```

mod named_type;

mod block_durations;
mod document;
mod error;
mod frame;
mod id_assignment;
mod references;
mod route_tracer;
mod time;
mod type_descriptor;
mod utilities;

pub mod elements;
pub mod ids;
pub mod parameters;

pub use block_durations::*;
pub use document::{Document, ElementHandle, ElementMut, ReferenceSync};
pub use elements::*;
pub use error::*;
pub use frame::*;
pub use id_assignment::*;
pub use ids::*;
pub use parameters::{HasParameter, Parameters, SetParameter, UnsetParameter, VectorParameter};
pub use references::{ListReference, ReferenceTarget, Resolved, SingleReference};
pub use route_tracer::*;
pub use time::*;
pub use type_descriptor::*;
pub use utilities::*;
