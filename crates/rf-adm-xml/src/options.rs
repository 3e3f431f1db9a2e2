//! Reader and writer options
//!
//! Both option sets are plain serde structs so tools can keep them next to
//! their other settings as JSON.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Options for [`parse_document`](crate::parse_document) and
/// [`parse_frame`](crate::parse_frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Look for `audioFormatExtended` anywhere in the tree, not only at the
    /// root, below it or in the ITU `ebuCoreMain` wrapper
    pub recursive_node_search: bool,
    /// Fail on unknown elements and attributes instead of skipping them
    pub strict: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            recursive_node_search: false,
            strict: false,
        }
    }
}

impl ParserOptions {
    /// Load options from a JSON file, defaults when missing or unreadable
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        load_json(path)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        save_json(self, path)
    }
}

/// Options for [`write_document`](crate::write_document) and
/// [`write_frame`](crate::write_frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Wrap the output in `ebuCoreMain/coreMetadata/format`
    pub itu_structure: bool,
    /// Also write defaulted parameters that were never set
    pub write_default_values: bool,
    /// Spaces per nesting level; 0 writes everything on one line
    pub indent: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            itu_structure: false,
            write_default_values: false,
            indent: 2,
        }
    }
}

impl WriterOptions {
    /// Load options from a JSON file, defaults when missing or unreadable
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        load_json(path)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        save_json(self, path)
    }
}

fn load_json<T: DeserializeOwned + Default, P: AsRef<Path>>(path: P) -> T {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> io::Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let parser = ParserOptions::default();
        assert!(!parser.recursive_node_search);
        assert!(!parser.strict);

        let writer = WriterOptions::default();
        assert!(!writer.itu_structure);
        assert!(!writer.write_default_values);
        assert_eq!(writer.indent, 2);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let writer: WriterOptions = serde_json::from_str(r#"{"itu_structure": true}"#).unwrap();
        assert!(writer.itu_structure);
        assert_eq!(writer.indent, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let options = ParserOptions::load_from("/nonexistent/rf-adm-xml/parser.json");
        assert_eq!(options, ParserOptions::default());
    }
}
