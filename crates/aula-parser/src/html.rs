//! HTML fragment model for the component parser.
//!
//! Word-processor conversion emits flat fragments with many top-level
//! siblings (`<p>`, `<ul>`, ...). Parsing wraps the fragment in a full
//! document so html5ever gives the siblings a single parent, then the
//! parser walks the element children of `<body>` in order.

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::parser::ParserError;

/// A parsed HTML fragment. Only the top-level element siblings are
/// exposed; everything else is reached through the per-element
/// accessors.
pub struct Fragment {
    dom: RcDom,
}

/// Parse a fragment of HTML (not a full document).
pub fn parse_fragment(html: &str) -> Fragment {
    let wrapped = format!(
        "<!DOCTYPE html><html><head></head><body>{}</body></html>",
        html
    );
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(wrapped.as_bytes());
    Fragment { dom }
}

impl Fragment {
    /// Top-level siblings of the fragment, in document order: element
    /// nodes plus non-whitespace text nodes (authors sometimes leave
    /// markers as bare text between blocks). Comments and blank runs
    /// are skipped.
    pub fn children(&self) -> Vec<Handle> {
        let Some(body) = find_first_element(&self.dom.document, "body") else {
            return Vec::new();
        };
        let children = body
            .children
            .borrow()
            .iter()
            .filter(|child| match child.data {
                NodeData::Element { .. } => true,
                NodeData::Text { ref contents } => !contents.borrow().trim().is_empty(),
                _ => false,
            })
            .cloned()
            .collect();
        children
    }
}

/// True for text nodes.
pub fn is_text(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Text { .. })
}

/// Element children of a node, skipping text/comment nodes.
pub fn element_children(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Lowercase local tag name, or `None` for non-element nodes.
pub fn tag_name(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref().to_lowercase()),
        _ => None,
    }
}

/// Concatenated text content of a node and its descendants.
pub fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { ref contents } = handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Serialize a node including its own tag.
pub fn outer_html(handle: &Handle) -> Result<String, ParserError> {
    serialize_scope(handle, TraversalScope::IncludeNode)
}

/// Serialize only the children of a node.
pub fn inner_html(handle: &Handle) -> Result<String, ParserError> {
    serialize_scope(handle, TraversalScope::ChildrenOnly(None))
}

fn serialize_scope(handle: &Handle, scope: TraversalScope) -> Result<String, ParserError> {
    let mut bytes = Vec::new();
    let serializable: SerializableHandle = handle.clone().into();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    serialize(&mut bytes, &serializable, opts)?;
    Ok(String::from_utf8(bytes)?)
}

fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: ref qname, .. } = handle.data {
        if qname.local.as_ref() == name {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_first_element(child, name) {
            return Some(found);
        }
    }
    None
}
