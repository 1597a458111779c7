//! AST produced by the parsing stage.
//!
//! A lesson document is an ordered map of topics, a topic is an ordered
//! map of sections, and a body section owns a list of content nodes.
//! Both maps are keyed by 1-based indices; `BTreeMap<usize, _>` keeps
//! iteration numeric by construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parsed unit of body content. `type_name` values double as the
/// render-registry keys and keep the original marker vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    Paragraph {
        html: String,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    /// `{{citacao}}` span.
    Quote {
        children: Vec<ContentNode>,
    },
    /// `{{destaque}}` span.
    Callout {
        children: Vec<ContentNode>,
    },
    /// `{{modal}}` span.
    Modal {
        children: Vec<ContentNode>,
    },
    /// `{{referencias}}` span.
    References {
        children: Vec<ContentNode>,
    },
    /// `{{carrossel}}` span; each top-level node of the span becomes
    /// one slide.
    Carousel {
        slides: Vec<Vec<ContentNode>>,
    },
    /// `{{link [url="..."]}}` span in any of its three layouts.
    Link {
        url: String,
        inner_html: String,
    },
    /// Any `{{tag}}...{{/tag}}` pair outside the recognized set. Keeps
    /// the original tag name and raw inner content so unimplemented
    /// components survive the round trip.
    Unknown {
        tag: String,
        raw_content: String,
    },
}

impl ContentNode {
    /// Registry key for this node. These are the marker names authors
    /// write, so a registered renderer lines up with the authored
    /// vocabulary.
    pub fn type_name(&self) -> &'static str {
        match self {
            ContentNode::Paragraph { .. } => "paragrafo",
            ContentNode::List { .. } => "lista",
            ContentNode::Quote { .. } => "citacao",
            ContentNode::Callout { .. } => "destaque",
            ContentNode::Modal { .. } => "modal",
            ContentNode::References { .. } => "referencias",
            ContentNode::Carousel { .. } => "carrossel",
            ContentNode::Link { .. } => "link",
            ContentNode::Unknown { .. } => "desconhecida",
        }
    }
}

/// One structural role within a topic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Section {
    Header {
        topic_title: String,
        lesson_title: String,
    },
    Body {
        content: Vec<ContentNode>,
    },
    /// Navigation targets; an empty string means the link is absent.
    Footer {
        previous: String,
        next: String,
    },
}

/// A topic: ordered sections keyed from 1. The first section is always
/// the header and the last the footer; with a single section only the
/// header exists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub sections: BTreeMap<usize, Section>,
}

impl Topic {
    pub fn insert(&mut self, index: usize, section: Section) {
        self.sections.insert(index, section);
    }

    /// The header section, if the topic has one.
    pub fn header(&self) -> Option<&Section> {
        self.sections
            .values()
            .find(|s| matches!(s, Section::Header { .. }))
    }

    /// Title pair from the header, defaulting to empty strings.
    pub fn titles(&self) -> (&str, &str) {
        match self.header() {
            Some(Section::Header {
                topic_title,
                lesson_title,
            }) => (topic_title, lesson_title),
            _ => ("", ""),
        }
    }

    /// Display title used for file naming and listings: the lesson
    /// title when present, otherwise `Topico_{index}`.
    pub fn display_title(&self, index: usize) -> String {
        let (_, lesson_title) = self.titles();
        if lesson_title.is_empty() {
            format!("Topico_{}", index)
        } else {
            lesson_title.to_string()
        }
    }
}

/// The whole document: topics keyed from 1 in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonDocument {
    pub topics: BTreeMap<usize, Topic>,
}

impl LessonDocument {
    pub fn insert(&mut self, index: usize, topic: Topic) {
        self.topics.insert(index, topic);
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Topics in numeric index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Topic)> {
        self.topics.iter().map(|(k, v)| (*k, v))
    }
}
