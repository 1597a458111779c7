//! Non-fatal parse reports.
//!
//! Malformed authoring degrades gracefully: a span without its close
//! marker still yields best-effort content and a section that fails to
//! parse is omitted. Each such decision is recorded here so the caller
//! can surface it; none of them abort a conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A component span reached end-of-siblings before its close
    /// marker.
    UnterminatedSpan,
    /// A section failed to parse and was left out of the topic.
    SectionSkipped,
    /// An open marker never found its pair during region extraction.
    UnmatchedMarker,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Diagnostic {
    pub fn unterminated_span(name: &str) -> Self {
        Diagnostic {
            kind: DiagnosticKind::UnterminatedSpan,
            detail: format!("no closing marker {{{{/{}}}}} before end of section", name),
        }
    }

    pub fn section_skipped(topic: usize, section: usize, reason: &str) -> Self {
        Diagnostic {
            kind: DiagnosticKind::SectionSkipped,
            detail: format!("topic {}, section {}: {}", topic, section, reason),
        }
    }

    pub fn unmatched_marker(name: &str) -> Self {
        Diagnostic {
            kind: DiagnosticKind::UnmatchedMarker,
            detail: format!("{{{{{}}}}} opened but never closed; region dropped", name),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.detail)
    }
}
