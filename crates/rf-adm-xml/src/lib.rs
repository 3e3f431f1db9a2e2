//! rf-adm-xml: XML codec for the ADM object model
//!
//! Reads and writes `audioFormatExtended` documents (ITU-R BS.2076) and
//! serial ADM frames (ITU-R BS.2125) on top of [`rf_adm::Document`].
//!
//! ```rust,ignore
//! let document = parse_document(&xml, &ParserOptions::default())?;
//! let xml = write_document(&document, &WriterOptions::default());
//! ```

mod error;
mod frame;
mod node;
mod options;
mod read;
mod values;
mod write;

pub use error::*;
pub use frame::*;
pub use options::*;
pub use read::{parse_document, read_document_file};
pub use write::{write_document, write_document_file};
