//! Decoding of exiftool's `-xmlFormat` output into a generic tree.
//!
//! Tag and attribute names come out namespace-expanded in Clark notation
//! (`{http://ns.exiftool.org/File/1.0/}FileName`), which is what the
//! namespace-stripping step in the reader keys off.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::reader::NsReader;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// The RDF namespace wrapping every exiftool XML response.
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Reserved key prefix for XML attributes.
pub const ATTR_PREFIX: char = '@';

/// Reserved key for text content that appears alongside children or
/// attributes.
pub const TEXT_KEY: &str = "#text";

/// One decoded XML element subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlTree {
    /// A childless, attribute-less element with no text.
    Empty,
    /// A childless, attribute-less element: just its trimmed text.
    Text(String),
    /// An element with children, attributes, or both. Attributes appear under
    /// `@`-prefixed keys, trailing text under [`TEXT_KEY`].
    Node(BTreeMap<String, XmlChild>),
}

/// A child slot inside a [`XmlTree::Node`]. Tags that repeat under the same
/// parent collapse into `Many`, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    One(XmlTree),
    Many(Vec<XmlTree>),
}

/// An open element being accumulated during the event walk.
struct Frame {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<(String, XmlTree)>,
}

impl Frame {
    fn new(tag: String, attrs: Vec<(String, String)>) -> Self {
        Self {
            tag,
            attrs,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Collapse the finished frame into a tree node.
    fn finish(self) -> XmlTree {
        let text = self.text.trim().to_string();

        if self.children.is_empty() && self.attrs.is_empty() {
            return if text.is_empty() {
                XmlTree::Empty
            } else {
                XmlTree::Text(text)
            };
        }

        // Group children by tag, keeping document order within each tag.
        let mut grouped: BTreeMap<String, Vec<XmlTree>> = BTreeMap::new();
        for (tag, child) in self.children {
            grouped.entry(tag).or_default().push(child);
        }

        let mut map: BTreeMap<String, XmlChild> = grouped
            .into_iter()
            .map(|(tag, mut trees)| {
                let slot = if trees.len() == 1 {
                    XmlChild::One(trees.swap_remove(0))
                } else {
                    XmlChild::Many(trees)
                };
                (tag, slot)
            })
            .collect();

        for (name, value) in self.attrs {
            map.insert(format!("{ATTR_PREFIX}{name}"), XmlChild::One(XmlTree::Text(value)));
        }

        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), XmlChild::One(XmlTree::Text(text)));
        }

        XmlTree::Node(map)
    }
}

/// Decode an XML document into its root tag name and decoded subtree.
pub fn decode(xml: &str) -> Result<(String, XmlTree)> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, XmlTree)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = expanded_name(&reader, e.name());
                let attrs = read_attrs(&reader, &e)?;
                stack.push(Frame::new(tag, attrs));
            }
            Event::Empty(e) => {
                let tag = expanded_name(&reader, e.name());
                let attrs = read_attrs(&reader, &e)?;
                let tree = Frame::new(tag.clone(), attrs).finish();
                attach(&mut stack, &mut root, tag, tree);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedXml("unbalanced closing tag".into()))?;
                let tag = frame.tag.clone();
                let tree = frame.finish();
                attach(&mut stack, &mut root, tag, tree);
            }
            Event::Text(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::MalformedXml("unclosed element at end of input".into()));
    }
    root.ok_or_else(|| Error::MalformedXml("no root element".into()))
}

/// Attach a finished subtree to its parent, or record it as the document root.
fn attach(
    stack: &mut Vec<Frame>,
    root: &mut Option<(String, XmlTree)>,
    tag: String,
    tree: XmlTree,
) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push((tag, tree));
    } else if root.is_none() {
        *root = Some((tag, tree));
    }
}

/// Resolve a qualified name to Clark notation (`{uri}local`), or the bare
/// local name when no namespace is bound.
fn expanded_name(reader: &NsReader<&[u8]>, name: QName<'_>) -> String {
    let (ns, local) = reader.resolve_element(name);
    let local = String::from_utf8_lossy(local.into_inner()).into_owned();
    match ns {
        ResolveResult::Bound(Namespace(uri)) => {
            format!("{{{}}}{}", String::from_utf8_lossy(uri), local)
        }
        _ => local,
    }
}

/// Collect an element's attributes with namespace-expanded names, skipping
/// the `xmlns` declarations themselves.
fn read_attrs(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::MalformedXml(err.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let (ns, local) = reader.resolve_attribute(attr.key);
        let local = String::from_utf8_lossy(local.into_inner()).into_owned();
        let name = match ns {
            ResolveResult::Bound(Namespace(uri)) => {
                format!("{{{}}}{}", String::from_utf8_lossy(uri), local)
            }
            _ => local,
        };
        let value = attr
            .unescape_value()
            .map_err(|err| Error::MalformedXml(err.to_string()))?
            .into_owned();
        attrs.push((name, value));
    }

    Ok(attrs)
}

/// Pull the `rdf:Description` children out of a decoded exiftool response.
/// A single Description is promoted to a one-element vec.
pub fn rdf_descriptions(root_tag: &str, tree: XmlTree) -> Result<Vec<XmlTree>> {
    let rdf_tag = format!("{{{RDF_NS}}}RDF");
    if root_tag != rdf_tag {
        return Err(Error::MalformedXml(format!(
            "unexpected root element \"{root_tag}\""
        )));
    }

    let XmlTree::Node(mut map) = tree else {
        // An RDF root with no Descriptions at all decodes to Empty.
        return Ok(Vec::new());
    };

    match map.remove(&format!("{{{RDF_NS}}}Description")) {
        Some(XmlChild::One(tree)) => Ok(vec![tree]),
        Some(XmlChild::Many(trees)) => Ok(trees),
        None => Ok(Vec::new()),
    }
}
