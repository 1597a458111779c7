//! Two-level parser: topic/section region extraction and the recursive
//! component parser for body sections.
//!
//! The component parser walks the top-level sibling list with a
//! non-backtracking cursor. Marker spans that stretch across several
//! siblings are collected as raw HTML and re-parsed recursively, so
//! nesting falls out of the recursion instead of a regex state machine.
//! Every sibling is visited at most once: a consumed span always moves
//! the cursor past its closing marker.

use markup5ever_rcdom::Handle;
use thiserror::Error;

use crate::ast::{ContentNode, LessonDocument, Section, Topic};
use crate::diagnostics::Diagnostic;
use crate::html;
use crate::markers::{self, Marker};

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("html serialization error")]
    Serialize(#[from] std::io::Error),
    #[error("serialized html was not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Markers recognized in their block form (open marker alone in a
/// paragraph, close marker in a later sibling). Everything else
/// degrades to [`ContentNode::Unknown`].
const BLOCK_COMPONENTS: [&str; 5] = ["citacao", "destaque", "modal", "carrossel", "referencias"];

/// Result of a whole-document parse: the AST plus every non-fatal
/// report collected along the way.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub document: LessonDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses raw converted HTML into the document AST.
///
/// Each `{{TOPICO}}` region becomes one topic, keyed from 1 in
/// discovery order. Without any topic markers the whole input is
/// treated as a single synthetic topic.
pub fn parse_document(html_input: &str) -> ParseOutput {
    let mut diagnostics = Vec::new();
    let mut document = LessonDocument::default();

    let regions = markers::extract_regions(html_input, "topico");
    if markers::count_opens(html_input, "topico") > regions.len() {
        diagnostics.push(Diagnostic::unmatched_marker("TOPICO"));
    }
    if regions.is_empty() {
        let topic = parse_topic(html_input, 1, &mut diagnostics);
        document.insert(1, topic);
    } else {
        for (idx, region) in regions.iter().enumerate() {
            let topic = parse_topic(region, idx + 1, &mut diagnostics);
            document.insert(idx + 1, topic);
        }
    }

    ParseOutput {
        document,
        diagnostics,
    }
}

/// Splits one topic into `{{SECAO}}` regions and classifies each by
/// position: first = header, last = footer, everything between = body.
/// A single-section topic is header-only. A section that fails to
/// parse is omitted (no placeholder) and reported; the rest of the
/// topic survives.
pub fn parse_topic(topic_html: &str, topic_idx: usize, diagnostics: &mut Vec<Diagnostic>) -> Topic {
    let sections = markers::extract_regions(topic_html, "secao");
    if markers::count_opens(topic_html, "secao") > sections.len() {
        diagnostics.push(Diagnostic::unmatched_marker("SECAO"));
    }
    let count = sections.len();
    let mut topic = Topic::default();

    for (idx, sec_html) in sections.iter().enumerate() {
        match classify_section(idx, count, sec_html, diagnostics) {
            Ok(section) => topic.insert(idx + 1, section),
            Err(err) => diagnostics.push(Diagnostic::section_skipped(
                topic_idx,
                idx + 1,
                &err.to_string(),
            )),
        }
    }

    topic
}

fn classify_section(
    idx: usize,
    count: usize,
    sec_html: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Section, ParserError> {
    if idx == 0 {
        Ok(Section::Header {
            topic_title: markers::extract_field(sec_html, "titulo_topico")
                .unwrap_or_default()
                .to_string(),
            lesson_title: markers::extract_field(sec_html, "titulo_aula")
                .unwrap_or_default()
                .to_string(),
        })
    } else if idx == count - 1 {
        Ok(Section::Footer {
            previous: markers::extract_link_attr(sec_html, "anterior").unwrap_or_default(),
            next: markers::extract_link_attr(sec_html, "proximo").unwrap_or_default(),
        })
    } else {
        Ok(Section::Body {
            content: parse_body(sec_html, diagnostics)?,
        })
    }
}

/// Recursively parses a body fragment into content nodes.
pub fn parse_body(
    fragment_html: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<ContentNode>, ParserError> {
    let fragment = html::parse_fragment(fragment_html);
    let siblings = fragment.children();
    let mut nodes = Vec::new();

    let mut i = 0;
    while i < siblings.len() {
        let el = &siblings[i];
        let tag = html::tag_name(el).unwrap_or_default();
        let text = html::text_content(el).trim().to_lowercase();
        // Markers normally arrive wrapped in a <p>, but converters also
        // leave them as bare text between blocks; both carry markers.
        let marker_candidate = tag == "p" || html::is_text(el);

        // Recognized components in block form.
        if marker_candidate {
            if let Some(marker) = Marker::parse(&text) {
                if marker.attr.is_none() && BLOCK_COMPONENTS.contains(&marker.name.as_str()) {
                    let (inner, end) = collect_span(&siblings, i + 1, &marker.name, diagnostics)?;
                    let children = parse_body(&inner, diagnostics)?;
                    nodes.push(block_node(&marker.name, children));
                    i = end + 1;
                    continue;
                }
            }
        }

        // Links come in three layouts: fully inline, open + content
        // with the close elsewhere, and the classic three-paragraph
        // form. All collapse to the same node.
        if marker_candidate && text.contains("{{link") {
            let raw = content_html(el)?;
            if let Some((url, inner_html)) = markers::parse_inline_link(&raw) {
                nodes.push(ContentNode::Link { url, inner_html });
                i += 1;
                continue;
            }
            if let Some((url, opening_rest)) = markers::parse_link_open(&raw) {
                let (inner_html, end) =
                    collect_link_span(&siblings, i + 1, opening_rest, diagnostics)?;
                nodes.push(ContentNode::Link { url, inner_html });
                i = end + 1;
                continue;
            }
        }

        // Any other complete {{tag}}...{{/tag}} pair inside a single
        // sibling: forward-compatible unknown component.
        let raw = content_html(el)?;
        if let Some((name, content)) = markers::find_inline_span(&raw) {
            nodes.push(ContentNode::Unknown {
                tag: name,
                raw_content: content,
            });
            i += 1;
            continue;
        }

        // Unknown component in block form.
        if marker_candidate {
            if let Some(marker) = Marker::parse(&text) {
                if marker.attr.is_none() {
                    let (inner, end) = collect_span(&siblings, i + 1, &marker.name, diagnostics)?;
                    nodes.push(ContentNode::Unknown {
                        tag: marker.name,
                        raw_content: inner,
                    });
                    i = end + 1;
                    continue;
                }
            }
        }

        match tag.as_str() {
            "p" => {
                let inner = html::inner_html(el)?.trim().to_string();
                if !inner.is_empty() {
                    nodes.push(ContentNode::Paragraph { html: inner });
                }
            }
            "ul" | "ol" => {
                nodes.push(ContentNode::List {
                    ordered: tag == "ol",
                    items: list_items(el)?,
                });
            }
            // Any other top-level node is ignored.
            _ => {}
        }
        i += 1;
    }

    Ok(nodes)
}

/// The marker-bearing HTML of a sibling: inner HTML for elements, the
/// text itself for bare text nodes.
fn content_html(el: &Handle) -> Result<String, ParserError> {
    if html::is_text(el) {
        Ok(html::text_content(el))
    } else {
        html::inner_html(el)
    }
}

/// Collects the raw HTML of siblings from `start` up to the sibling
/// whose text is `{{/name}}`. Returns the collected span and the index
/// of the last consumed sibling (the close marker). Without a close
/// marker the span runs to end-of-siblings and a diagnostic is
/// recorded.
fn collect_span(
    siblings: &[Handle],
    start: usize,
    name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(String, usize), ParserError> {
    let mut inner = String::new();
    let mut i = start;
    while i < siblings.len() {
        let text = html::text_content(&siblings[i]);
        if Marker::parse_close(text.trim()).as_deref() == Some(name) {
            return Ok((inner, i));
        }
        inner.push_str(&html::outer_html(&siblings[i])?);
        i += 1;
    }
    diagnostics.push(Diagnostic::unterminated_span(name));
    Ok((inner, siblings.len() - 1))
}

/// Link spans concatenate paragraph *inner* HTML so that the three
/// authoring layouts produce the same node. The sibling containing the
/// close marker contributes whatever precedes the marker.
fn collect_link_span(
    siblings: &[Handle],
    start: usize,
    opening_rest: String,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(String, usize), ParserError> {
    let mut inner = opening_rest;
    let mut i = start;
    while i < siblings.len() {
        let sib = &siblings[i];
        let part = if html::tag_name(sib).as_deref() == Some("p") {
            html::inner_html(sib)?
        } else {
            html::outer_html(sib)?
        };
        if markers::contains_link_close(&part) {
            inner.push_str(&markers::remove_link_close(&part));
            return Ok((inner.trim().to_string(), i));
        }
        inner.push_str(&part);
        i += 1;
    }
    diagnostics.push(Diagnostic::unterminated_span("link"));
    Ok((inner.trim().to_string(), siblings.len() - 1))
}

fn block_node(name: &str, children: Vec<ContentNode>) -> ContentNode {
    match name {
        "citacao" => ContentNode::Quote { children },
        "destaque" => ContentNode::Callout { children },
        "modal" => ContentNode::Modal { children },
        "referencias" => ContentNode::References { children },
        "carrossel" => ContentNode::Carousel {
            slides: children.into_iter().map(|node| vec![node]).collect(),
        },
        _ => unreachable!("{} is not a block component", name),
    }
}

fn list_items(el: &Handle) -> Result<Vec<String>, ParserError> {
    let mut items = Vec::new();
    for li in html::element_children(el) {
        if html::tag_name(&li).as_deref() == Some("li") {
            let inner = html::inner_html(&li)?.trim().to_string();
            if !inner.is_empty() {
                items.push(inner);
            }
        }
    }
    Ok(items)
}
