//! Built-in component renderers and the per-topic page assembler.
//!
//! Structural chrome and the bigger components go through Tera
//! templates; small nodes (paragraphs, lists, links, the unknown
//! placeholder) are formatted directly. Inner HTML reaching this layer
//! came from the controlled authoring conversion and is emitted
//! verbatim; only titles, attributes and URLs are escaped/encoded.

use nanoid::nanoid;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tera::Context;

use aula_parser::{ContentNode, Section, Topic};

use crate::error::RenderError;
use crate::registry::{render_nodes, ComponentRegistry, RenderContext};

pub const ID_ALPHABET: [char; 62] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j',
    'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1',
    '2', '3', '4', '5', '6', '7', '8', '9',
];

/// DOM ids are decorative; 4 random alphanumerics are plenty and the
/// collision risk within one page is accepted.
pub const ID_LENGTH: usize = 4;

pub fn random_id(len: usize) -> String {
    nanoid!(len, &ID_ALPHABET)
}

/// `encodeURI`-equivalent set: encode controls, space, quotes and the
/// unsafe brackets, keep URI reserved characters intact.
const ENCODE_URI_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'[')
    .add(b']')
    .add(b'%');

pub fn encode_uri(url: &str) -> String {
    utf8_percent_encode(url, ENCODE_URI_SET).to_string()
}

/// Entity-escapes exactly `& < > " '` for text placed into attributes.
/// Tera's autoescaper additionally rewrites `/`, which would mangle
/// URLs, so escaped values bypass it with `| safe`.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The registry with every built-in renderer. Keys are the authored
/// marker vocabulary (see `ContentNode::type_name`).
pub fn builtins() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();

    registry.register("paragrafo", |node, _ctx| {
        let ContentNode::Paragraph { html } = node else {
            unreachable!()
        };
        Ok(format!("<p>{}</p>", html))
    });

    registry.register("lista", |node, _ctx| {
        let ContentNode::List { ordered, items } = node else {
            unreachable!()
        };
        let tag = if *ordered { "ol" } else { "ul" };
        let mut out = format!("<{} class=\"lista-check\">", tag);
        for item in items {
            out.push_str(&format!("<li>{}</li>", item));
        }
        out.push_str(&format!("</{}>", tag));
        Ok(out)
    });

    registry.register("citacao", |node, ctx| {
        let ContentNode::Quote { children } = node else {
            unreachable!()
        };
        // Direct paragraph children pick up the quote class; anything
        // else nested inside renders as usual.
        let mut body = String::new();
        for child in children {
            match child {
                ContentNode::Paragraph { html } => {
                    body.push_str(&format!("<p class=\"p-citacao\">{}</p>", html));
                }
                other => body.push_str(&ctx.registry.render(other, ctx)?),
            }
        }
        Ok(format!(
            "<div><div class=\"citacao-texto\">{}</div></div>",
            body
        ))
    });

    registry.register("destaque", |node, ctx| {
        let ContentNode::Callout { children } = node else {
            unreachable!()
        };
        let mut c = Context::new();
        c.insert("body", &render_nodes(children, ctx)?);
        ctx.templates.render("destaque.html", &c)
    });

    registry.register("modal", |node, ctx| {
        let ContentNode::Modal { children } = node else {
            unreachable!()
        };
        let mut c = Context::new();
        c.insert("id", &format!("modal-{}", random_id(ID_LENGTH)));
        c.insert("body", &render_nodes(children, ctx)?);
        ctx.templates.render("modal.html", &c)
    });

    registry.register("referencias", |node, ctx| {
        let ContentNode::References { children } = node else {
            unreachable!()
        };
        let mut c = Context::new();
        c.insert("body", &render_nodes(children, ctx)?);
        ctx.templates.render("referencias.html", &c)
    });

    registry.register("carrossel", |node, ctx| {
        let ContentNode::Carousel { slides } = node else {
            unreachable!()
        };
        let rendered: Vec<String> = slides
            .iter()
            .map(|slide| render_nodes(slide, ctx))
            .collect::<Result<_, _>>()?;
        let mut c = Context::new();
        c.insert("id", &format!("carousel-{}", random_id(ID_LENGTH)));
        c.insert("slides", &rendered);
        ctx.templates.render("carrossel.html", &c)
    });

    registry.register("link", |node, _ctx| {
        let ContentNode::Link { url, inner_html } = node else {
            unreachable!()
        };
        let href = escape_attr(&encode_uri(url));
        Ok(format!(
            "<a class=\"link-externo\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            href, inner_html
        ))
    });

    registry.register("desconhecida", |node, _ctx| {
        let ContentNode::Unknown { tag, raw_content } = node else {
            unreachable!()
        };
        Ok(format!(
            "<div class=\"desconhecida\"><h1>{{{{{}}}}}</h1><p class=\"aviso-em-breve\">Componente em breve</p>{}</div>",
            tag, raw_content
        ))
    });

    registry
}

/// Renders one topic into a complete standalone HTML document: head,
/// header, body sections in numeric order, footer (when the topic has
/// one), closing scripts.
pub fn render_topic(topic: &Topic, ctx: &RenderContext) -> Result<String, RenderError> {
    let (topic_title, lesson_title) = topic.titles();

    let mut page = String::new();

    let mut head = Context::new();
    head.insert("page_title", &format!("{} - {}", topic_title, lesson_title));
    page.push_str(&ctx.templates.render("head.html", &head)?);

    for section in topic.sections.values() {
        match section {
            Section::Header {
                topic_title,
                lesson_title,
            } => {
                let mut c = Context::new();
                c.insert("topic_title", topic_title);
                c.insert("lesson_title", lesson_title);
                page.push_str(&ctx.templates.render("header.html", &c)?);
            }
            Section::Body { content } => {
                let mut c = Context::new();
                c.insert("inner", &render_nodes(content, ctx)?);
                page.push_str(&ctx.templates.render("body_section.html", &c)?);
            }
            Section::Footer { previous, next } => {
                let mut c = Context::new();
                c.insert("previous", &escape_attr(&encode_uri(previous)));
                c.insert("next", &escape_attr(&encode_uri(next)));
                page.push_str(&ctx.templates.render("footer.html", &c)?);
            }
        }
    }

    page.push_str(&ctx.templates.render("scripts.html", &Context::new())?);
    Ok(page)
}
