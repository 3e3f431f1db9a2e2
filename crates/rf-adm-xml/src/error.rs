//! Error types for the XML codec

use rf_adm::{AdmError, ElementKind};
use thiserror::Error;

/// XML codec error type
#[derive(Error, Debug)]
pub enum XmlError {
    /// Input is not well-formed XML
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The object model rejected a value or reference
    #[error(transparent)]
    Adm(#[from] AdmError),

    #[error("missing <{element}> element")]
    MissingElement { element: String },

    #[error("<{element}> is missing attribute {attribute}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// Attribute or element text that does not parse as the expected type
    #[error("invalid {name} on <{element}>: \"{value}\"")]
    InvalidValue {
        element: String,
        name: String,
        value: String,
    },

    /// Unknown element, only reported in strict mode
    #[error("unexpected <{element}> in <{parent}>")]
    UnexpectedElement { parent: String, element: String },

    /// Unknown attribute, only reported in strict mode
    #[error("unexpected attribute {attribute} on <{element}>")]
    UnexpectedAttribute { element: String, attribute: String },

    /// `*IDRef` naming an element that is not in the document
    #[error("unresolved reference to {kind} {id}")]
    UnresolvedReference { kind: ElementKind, id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations
pub type XmlResult<T> = Result<T, XmlError>;
