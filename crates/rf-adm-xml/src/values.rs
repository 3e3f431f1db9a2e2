//! Attribute and text conversions shared by the readers

use std::str::FromStr;

use log::warn;
use roxmltree::Node;

use crate::{ParserOptions, XmlError, XmlResult};

/// Element children of `node`
pub(crate) fn elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// Local element name, for error messages
pub(crate) fn name_of(node: Node) -> String {
    node.tag_name().name().to_string()
}

pub(crate) fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

pub(crate) fn required_attr<'a>(node: Node<'a, '_>, name: &'static str) -> XmlResult<&'a str> {
    node.attribute(name).ok_or_else(|| XmlError::MissingAttribute {
        element: name_of(node),
        attribute: name,
    })
}

/// Trimmed element text, empty when there is none
pub(crate) fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().map(str::trim).unwrap_or("")
}

fn invalid(node: Node, name: &str, value: &str) -> XmlError {
    XmlError::InvalidValue {
        element: name_of(node),
        name: name.to_string(),
        value: value.to_string(),
    }
}

pub(crate) fn parse_value<T: FromStr>(node: Node, name: &str, raw: &str) -> XmlResult<T> {
    raw.trim().parse().map_err(|_| invalid(node, name, raw))
}

pub(crate) fn parse_attr<T: FromStr>(node: Node, name: &str) -> XmlResult<Option<T>> {
    attr(node, name)
        .map(|raw| parse_value(node, name, raw))
        .transpose()
}

pub(crate) fn parse_attr_or<T: FromStr>(node: Option<Node>, name: &str, default: T) -> XmlResult<T> {
    match node {
        Some(node) => Ok(parse_attr(node, name)?.unwrap_or(default)),
        None => Ok(default),
    }
}

pub(crate) fn parse_text<T: FromStr>(node: Node) -> XmlResult<T> {
    parse_value(node, "text", text(node))
}

/// ADM flags are `0` / `1`; `true` / `false` are accepted as well
pub(crate) fn parse_bool(node: Node, name: &str, raw: &str) -> XmlResult<bool> {
    match raw.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(invalid(node, name, raw)),
    }
}

pub(crate) fn parse_bool_attr(node: Node, name: &str) -> XmlResult<Option<bool>> {
    attr(node, name)
        .map(|raw| parse_bool(node, name, raw))
        .transpose()
}

pub(crate) fn parse_bool_text(node: Node) -> XmlResult<bool> {
    parse_bool(node, "text", text(node))
}

#[inline]
pub(crate) fn format_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Report an element the reader does not know
pub(crate) fn unexpected(parent: Node, child: Node, options: &ParserOptions) -> XmlResult<()> {
    if options.strict {
        return Err(XmlError::UnexpectedElement {
            parent: name_of(parent),
            element: name_of(child),
        });
    }
    warn!("skipping unknown <{}> in <{}>", name_of(child), name_of(parent));
    Ok(())
}

/// Report attributes outside `known`; namespaced attributes are ignored
pub(crate) fn check_attributes(node: Node, known: &[&str], options: &ParserOptions) -> XmlResult<()> {
    for attribute in node.attributes() {
        if attribute.namespace().is_some() || known.contains(&attribute.name()) {
            continue;
        }
        if options.strict {
            return Err(XmlError::UnexpectedAttribute {
                element: name_of(node),
                attribute: attribute.name().to_string(),
            });
        }
        warn!("skipping unknown attribute {} on <{}>", attribute.name(), name_of(node));
    }
    Ok(())
}
