//! End-to-end pipeline tests: authored HTML in, pages and titles out.

use aulas::{DiagnosticKind, LessonCompiler};
use regex::Regex;

fn lesson_html() -> String {
    let topic1 = r#"{{TOPICO}}
{{SECAO}}
<p>{{TITULO_TOPICO}}Tópico 1{{/TITULO_TOPICO}}</p>
<p>{{TITULO_AULA}}Minha Aula{{/TITULO_AULA}}</p>
{{/SECAO}}
{{SECAO}}
<p>Introdução com <strong>ênfase</strong>.</p>
<p>{{modal}}</p>
<p>Dentro do modal</p>
<p>{{/modal}}</p>
<p>{{link url="https://example.com"}}Click here{{/link}}</p>
{{/SECAO}}
{{SECAO}}
<p>{{PROXIMO link="topico2.html"}}</p>
{{/SECAO}}
{{/TOPICO}}"#;
    let topic2 = r#"{{TOPICO}}
{{SECAO}}
<p>{{TITULO_TOPICO}}Tópico 2{{/TITULO_TOPICO}}</p>
{{/SECAO}}
{{SECAO}}
<p>{{futuro}}</p>
<p>A</p>
<p>{{/futuro}}</p>
{{/SECAO}}
{{SECAO}}
<p>{{ANTERIOR link="topico1.html"}}</p>
{{/SECAO}}
{{/TOPICO}}"#;
    format!("{}\n{}", topic1, topic2)
}

#[test]
fn converts_a_two_topic_lesson() {
    let compiler = LessonCompiler::new().unwrap();
    let out = compiler.process(&lesson_html()).unwrap();

    assert_eq!(out.pages.len(), 2);
    assert_eq!(out.titles, vec!["Minha Aula", "Topico_2"]);
    assert!(out.diagnostics.is_empty());

    let first = &out.pages[0];
    assert!(first.starts_with("<!DOCTYPE html>"));
    assert!(first.contains("<title>Tópico 1 - Minha Aula</title>"));
    assert!(first.contains("Introdução com <strong>ênfase</strong>."));
    assert!(Regex::new(r#"id="modal-[A-Za-z0-9]{4}""#).unwrap().is_match(first));
    assert!(first.contains("<p>Dentro do modal</p>"));
    assert!(first.contains(r#"href="https://example.com""#));
    assert!(first.contains("Click here"));
    assert!(first.contains(r#"data-link="topico2.html""#));

    // Second topic: unknown marker degrades to a visible placeholder.
    let second = &out.pages[1];
    assert!(second.contains("{{futuro}}"));
    assert!(second.contains("Componente em breve"));
    assert!(second.contains(r#"data-link="topico1.html""#));
}

#[test]
fn input_without_markers_becomes_one_page() {
    let compiler = LessonCompiler::new().unwrap();
    let out = compiler.process("<p>texto solto</p>").unwrap();
    assert_eq!(out.pages.len(), 1);
    assert_eq!(out.titles, vec!["Topico_1"]);
    assert!(out.pages[0].trim_end().ends_with("</html>"));
}

#[test]
fn unterminated_span_surfaces_a_diagnostic_not_an_error() {
    let html = r#"{{TOPICO}}
{{SECAO}}{{/SECAO}}
{{SECAO}}
<p>{{modal}}</p>
<p>sem fechamento</p>
{{/SECAO}}
{{SECAO}}{{/SECAO}}
{{/TOPICO}}"#;
    let compiler = LessonCompiler::new().unwrap();
    let out = compiler.process(html).unwrap();
    assert_eq!(out.pages.len(), 1);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::UnterminatedSpan);
    assert!(out.pages[0].contains("<p>sem fechamento</p>"));
}

#[test]
fn custom_component_renderer_can_be_registered() {
    let mut compiler = LessonCompiler::new().unwrap();
    compiler.registry_mut().register("video", |node, _ctx| {
        let aulas::ContentNode::Unknown { raw_content, .. } = node else {
            unreachable!()
        };
        Ok(format!("<div class=\"video-embed\">{}</div>", raw_content))
    });

    let html = r#"{{SECAO}}{{/SECAO}}{{SECAO}}<p>{{video}}</p><p>src</p><p>{{/video}}</p>{{/SECAO}}{{SECAO}}{{/SECAO}}"#;
    let out = compiler.process(html).unwrap();
    assert!(out.pages[0].contains("<div class=\"video-embed\"><p>src</p></div>"));
    assert!(!out.pages[0].contains("Componente em breve"));
}

#[test]
fn rerender_differs_only_in_generated_ids() {
    let compiler = LessonCompiler::new().unwrap();
    let first = compiler.process(&lesson_html()).unwrap();
    let second = compiler.process(&lesson_html()).unwrap();

    let id = Regex::new(r"(modal|carousel)-[A-Za-z0-9]{4}").unwrap();
    for (a, b) in first.pages.iter().zip(second.pages.iter()) {
        assert_eq!(id.replace_all(a, "$1-____"), id.replace_all(b, "$1-____"));
    }
    assert_eq!(first.titles, second.titles);
}
