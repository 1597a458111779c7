//! The `{{...}}` marker grammar.
//!
//! Authors demarcate structure inside the converted document with
//! moustache-style markers: paired regions (`{{TOPICO}}...{{/TOPICO}}`),
//! self-closing markers with attributes (`{{ANTERIOR link="URL"}}`) and
//! component markers (`{{modal}}`, `{{link url="..."}}`). Everything is
//! case-insensitive and tolerates whitespace inside the braces. This
//! module is the single place that knows the grammar; the parser only
//! works with the typed results.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MARKER_OPEN: Regex = Regex::new(
        r#"(?is)^\{\{\s*([a-zA-Z0-9_]+)(?:\s+([a-zA-Z0-9_]+)=['"]?(.*?)['"]?)?\s*\}\}$"#
    )
    .unwrap();
    static ref MARKER_CLOSE: Regex =
        Regex::new(r"(?i)^\{\{\s*/\s*([a-zA-Z0-9_]+)\s*\}\}$").unwrap();
    static ref INLINE_OPEN: Regex =
        Regex::new(r"(?i)\{\{\s*([a-zA-Z0-9_]+)\s*\}\}").unwrap();
    static ref LINK_INLINE: Regex = Regex::new(
        r#"(?is)\{\{\s*link(?:\s+url=['"]?(.*?)['"]?)?\s*\}\}(.*?)\{\{\s*/link\s*\}\}"#
    )
    .unwrap();
    static ref LINK_OPEN: Regex =
        Regex::new(r#"(?is)\{\{\s*link(?:\s+url=['"]?(.*?)['"]?)?\s*\}\}(.*)$"#).unwrap();
    static ref LINK_CLOSE: Regex = Regex::new(r"(?i)\{\{\s*/\s*link\s*\}\}").unwrap();
    static ref ANCHOR_HREF: Regex =
        Regex::new(r#"(?is)<a[^>]+href=["']?([^"'>\s]+)["']?[^>]*>.*?</a>"#).unwrap();
}

/// A parsed opening marker: lowercased name plus at most one
/// `key=value` attribute. Attribute values may carry embedded HTML,
/// since word processors tend to auto-link URLs typed inside marker
/// text.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub name: String,
    pub attr: Option<(String, String)>,
}

impl Marker {
    /// Parses a whole trimmed string as an opening marker.
    pub fn parse(text: &str) -> Option<Marker> {
        let caps = MARKER_OPEN.captures(text.trim())?;
        let name = caps[1].to_lowercase();
        let attr = match (caps.get(2), caps.get(3)) {
            (Some(k), Some(v)) => Some((k.as_str().to_lowercase(), v.as_str().to_string())),
            _ => None,
        };
        Some(Marker { name, attr })
    }

    /// Parses a whole trimmed string as a closing marker, returning the
    /// lowercased name.
    pub fn parse_close(text: &str) -> Option<String> {
        MARKER_CLOSE
            .captures(text.trim())
            .map(|caps| caps[1].to_lowercase())
    }

    /// True when the marker is the bare `{{name}}` form.
    pub fn is_bare(&self, name: &str) -> bool {
        self.attr.is_none() && self.name == name
    }
}

fn region_regex(name: &str) -> Regex {
    let name = regex::escape(name);
    Regex::new(&format!(
        r"(?is)\{{\{{\s*{name}\s*\}}\}}(.*?)\{{\{{\s*/\s*{name}\s*\}}\}}"
    ))
    .unwrap()
}

fn close_regex(name: &str) -> Regex {
    let name = regex::escape(name);
    Regex::new(&format!(r"(?is)\{{\{{\s*/\s*{name}\s*\}}\}}")).unwrap()
}

/// Returns every substring strictly between matching
/// `{{name}}`/`{{/name}}` pairs, in document order. The scan is
/// non-greedy (the first close terminates a region); an unmatched open
/// marker yields no region.
pub fn extract_regions<'a>(html: &'a str, name: &str) -> Vec<&'a str> {
    region_regex(name)
        .captures_iter(html)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect()
}

/// Number of `{{name}}` open markers in the input. Compared against the
/// extracted region count to detect a dangling open.
pub fn count_opens(html: &str, name: &str) -> usize {
    let name = regex::escape(name);
    let re = Regex::new(&format!(r"(?is)\{{\{{\s*{name}\s*\}}\}}")).unwrap();
    re.find_iter(html).count()
}

/// First region for `name`, trimmed. Used for the header title fields.
pub fn extract_field<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    region_regex(name)
        .captures(html)
        .map(|caps| caps.get(1).unwrap().as_str().trim())
}

/// `link=` attribute of a self-closing marker such as
/// `{{ANTERIOR link="URL"}}`.
pub fn extract_link_attr(html: &str, name: &str) -> Option<String> {
    let name = regex::escape(name);
    let re = Regex::new(&format!(
        r#"(?is)\{{\{{\s*{name}\s+link=['"]?(.*?)['"]?\s*\}}\}}"#
    ))
    .unwrap();
    re.captures(html).map(|caps| caps[1].to_string())
}

/// Finds a complete `{{tag}}...{{/tag}}` pair inside one HTML string,
/// returning the lowercased tag and the trimmed content between the
/// markers.
pub fn find_inline_span(html: &str) -> Option<(String, String)> {
    let caps = INLINE_OPEN.captures(html)?;
    let name = caps[1].to_lowercase();
    let after_open = caps.get(0).unwrap().end();
    let m = close_regex(&name).find(&html[after_open..])?;
    let content = html[after_open..after_open + m.start()].trim().to_string();
    Some((name, content))
}

/// Fully inline `{{link}}` form: open, content and close in one string.
pub fn parse_inline_link(html: &str) -> Option<(String, String)> {
    LINK_INLINE.captures(html).map(|caps| {
        let url = resolve_url(caps.get(1).map_or("", |m| m.as_str()));
        let inner = caps[2].trim().to_string();
        (url, inner)
    })
}

/// Open `{{link}}` marker with trailing content; the close lives in a
/// later sibling (or nowhere).
pub fn parse_link_open(html: &str) -> Option<(String, String)> {
    LINK_OPEN.captures(html).map(|caps| {
        let url = resolve_url(caps.get(1).map_or("", |m| m.as_str()));
        let rest = caps[2].trim().to_string();
        (url, rest)
    })
}

pub fn contains_link_close(html: &str) -> bool {
    LINK_CLOSE.is_match(html)
}

pub fn remove_link_close(html: &str) -> String {
    LINK_CLOSE.replace(html, "").into_owned()
}

/// Resolves a raw `url=` value. Word processors usually wrap the typed
/// URL in an anchor, so an embedded `<a href="X">...</a>` reduces to
/// `X`; otherwise the value is used as-is.
pub fn resolve_url(raw: &str) -> String {
    let raw = raw.trim();
    let stripped = ANCHOR_HREF.replace(raw, "$1");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        raw.to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_marker() {
        let m = Marker::parse("{{modal}}").unwrap();
        assert_eq!(m.name, "modal");
        assert!(m.attr.is_none());
        assert!(m.is_bare("modal"));
    }

    #[test]
    fn parse_marker_is_case_insensitive_and_whitespace_tolerant() {
        let m = Marker::parse("{{  CarRossel  }}").unwrap();
        assert_eq!(m.name, "carrossel");
    }

    #[test]
    fn parse_marker_with_attribute() {
        let m = Marker::parse(r#"{{link url="https://example.com"}}"#).unwrap();
        assert_eq!(m.name, "link");
        assert_eq!(
            m.attr,
            Some(("url".to_string(), "https://example.com".to_string()))
        );
    }

    #[test]
    fn parse_rejects_partial_matches() {
        assert!(Marker::parse("before {{modal}}").is_none());
        assert!(Marker::parse("{{modal}} after").is_none());
        assert!(Marker::parse("{{/modal}}").is_none());
    }

    #[test]
    fn parse_close_marker() {
        assert_eq!(Marker::parse_close("{{/modal}}").unwrap(), "modal");
        assert_eq!(Marker::parse_close("{{ / MODAL }}").unwrap(), "modal");
        assert!(Marker::parse_close("{{modal}}").is_none());
    }

    #[test]
    fn extract_regions_finds_all_pairs_in_order() {
        let html = "<p>{{TOPICO}}A{{/TOPICO}}</p><p>x</p>{{TOPICO}}B{{/TOPICO}}";
        assert_eq!(extract_regions(html, "topico"), vec!["A", "B"]);
    }

    #[test]
    fn extract_regions_is_non_greedy() {
        let html = "{{SECAO}}first{{/SECAO}}{{SECAO}}second{{/SECAO}}";
        assert_eq!(extract_regions(html, "secao"), vec!["first", "second"]);
    }

    #[test]
    fn extract_regions_drops_unmatched_open() {
        let html = "{{TOPICO}}closed{{/TOPICO}}{{TOPICO}}dangling";
        assert_eq!(extract_regions(html, "topico"), vec!["closed"]);
    }

    #[test]
    fn extract_regions_spans_newlines_and_tags() {
        let html = "{{ topico }}\n<p>line one</p>\n<p>line two</p>\n{{ /TOPICO }}";
        assert_eq!(
            extract_regions(html, "topico"),
            vec!["\n<p>line one</p>\n<p>line two</p>\n"]
        );
    }

    #[test]
    fn close_markers_tolerate_space_after_the_slash() {
        assert_eq!(
            extract_regions("{{SECAO}}a{{ / secao }}", "secao"),
            vec!["a"]
        );
        assert!(contains_link_close("{{ / LINK }}"));
        assert_eq!(
            find_inline_span("{{nota}}x{{ / nota }}").unwrap(),
            ("nota".to_string(), "x".to_string())
        );
    }

    #[test]
    fn count_opens_sees_dangling_markers() {
        let html = "{{TOPICO}}a{{/TOPICO}}{{TOPICO}}dangling";
        assert_eq!(count_opens(html, "topico"), 2);
        assert_eq!(extract_regions(html, "topico").len(), 1);
    }

    #[test]
    fn extract_field_takes_first_region() {
        let html = "{{TITULO_AULA}}Minha Aula{{/TITULO_AULA}}";
        assert_eq!(extract_field(html, "titulo_aula"), Some("Minha Aula"));
        assert_eq!(extract_field(html, "titulo_topico"), None);
    }

    #[test]
    fn extract_link_attr_reads_self_closing_marker() {
        let html = r#"<p>{{ANTERIOR link="pagina1.html"}}</p>"#;
        assert_eq!(
            extract_link_attr(html, "anterior").unwrap(),
            "pagina1.html"
        );
        assert!(extract_link_attr(html, "proximo").is_none());
    }

    #[test]
    fn find_inline_span_matches_any_tag_pair() {
        let html = "{{futuro}}<strong>A</strong>{{/futuro}}";
        let (name, content) = find_inline_span(html).unwrap();
        assert_eq!(name, "futuro");
        assert_eq!(content, "<strong>A</strong>");
    }

    #[test]
    fn find_inline_span_requires_matching_close() {
        assert!(find_inline_span("{{futuro}} no close").is_none());
        assert!(find_inline_span("{{a}}x{{/b}}").is_none());
    }

    #[test]
    fn inline_link_with_explicit_url() {
        let (url, inner) =
            parse_inline_link(r#"{{link url="https://example.com"}}Click here{{/link}}"#)
                .unwrap();
        assert_eq!(url, "https://example.com");
        assert_eq!(inner, "Click here");
    }

    #[test]
    fn inline_link_url_strips_embedded_anchor() {
        let html = r#"{{link url=<a href="https://example.com">https://example.com</a>}}Ver{{/link}}"#;
        let (url, inner) = parse_inline_link(html).unwrap();
        assert_eq!(url, "https://example.com");
        assert_eq!(inner, "Ver");
    }

    #[test]
    fn link_open_without_close_captures_rest() {
        let (url, rest) = parse_link_open("{{link}}conteudo").unwrap();
        assert_eq!(url, "");
        assert_eq!(rest, "conteudo");
    }

    #[test]
    fn link_close_detection_and_removal() {
        assert!(contains_link_close("<p>x {{/link}}</p>"));
        assert_eq!(remove_link_close("<p>x {{/link}}</p>"), "<p>x </p>");
        assert!(!contains_link_close("<p>x</p>"));
    }

    #[test]
    fn resolve_url_prefers_anchor_href() {
        assert_eq!(
            resolve_url(r#"<a href="https://a.com/b">texto</a>"#),
            "https://a.com/b"
        );
        assert_eq!(resolve_url("https://plain.com"), "https://plain.com");
        assert_eq!(resolve_url(""), "");
    }
}
