//! Element tree built by the writers and rendered to text

use std::fmt::Display;

/// One XML element with attributes, optional text and children
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlNode {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Display) -> Self {
        self.attributes.push((name, value.to_string()));
        self
    }

    pub fn opt_attr(self, name: &'static str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn text(mut self, value: impl Display) -> Self {
        self.text = Some(value.to_string());
        self
    }

    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn opt_child(self, child: Option<XmlNode>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    pub fn children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Render with an XML declaration
    pub fn render_document(&self, indent: usize) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        if indent > 0 {
            out.push('\n');
        }
        self.write_to(&mut out, indent, 0);
        out
    }

    fn write_to(&self, out: &mut String, indent: usize, depth: usize) {
        let pad = " ".repeat(indent * depth);
        out.push_str(&pad);
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, xml_escape(value)));
        }

        if self.children.is_empty() {
            match &self.text {
                Some(text) => {
                    out.push('>');
                    out.push_str(&xml_escape(text));
                    out.push_str(&format!("</{}>", self.name));
                }
                None => out.push_str("/>"),
            }
        } else {
            out.push('>');
            if indent > 0 {
                out.push('\n');
            }
            if let Some(text) = &self.text {
                out.push_str(&xml_escape(text));
            }
            for child in &self.children {
                child.write_to(out, indent, depth + 1);
            }
            out.push_str(&pad);
            out.push_str(&format!("</{}>", self.name));
        }

        if indent > 0 {
            out.push('\n');
        }
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
