//! Markdown for user-written text: project descriptions and bios.

use dioxus::prelude::*;
use pulldown_cmark::{Event, Options, Parser};

fn parser_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

/// Render to HTML. Raw HTML in the source is shown as text, never injected.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, parser_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html_out = String::new();
    pulldown_cmark::html::push_html(&mut html_out, parser);
    html_out
}

#[component]
pub fn Markdown(source: String, #[props(default = "".to_string())] class: String) -> Element {
    let html = render_markdown(&source);
    rsx! {
        div {
            class: "markdown {class}",
            dangerous_inner_html: "{html}",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_basic_markdown() {
        let html = render_markdown("# Hola\n\nUn **proyecto** ~~viejo~~");
        assert!(html.contains("<h1>Hola</h1>"));
        assert!(html.contains("<strong>proyecto</strong>"));
        assert!(html.contains("<del>viejo</del>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>\n\nTexto <b>x</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }
}
