use pulldown_cmark::{html, Event, Options, Parser};
use scraper::{ElementRef, Html, Node};

/// Elements that never have content and are written self-closed.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Render a markdown chapter to an XHTML body fragment.
///
/// Fenced code blocks and tables are enabled, and single newlines inside a
/// paragraph become line breaks. Raw HTML in the source is allowed; the whole
/// fragment is re-parsed and written back out as XML, so unclosed tags, bare
/// attributes and named entities come out well-formed.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        event => event,
    });

    let mut body = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body, parser);
    to_xhtml(&body)
}

/// Re-serialise an HTML fragment as XHTML.
fn to_xhtml(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let mut out = String::with_capacity(fragment.len() + fragment.len() / 8);
    write_children(parsed.root_element(), &mut out);
    out
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&html_escape::encode_text(&**text)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out);
                }
            }
            Node::Comment(comment) => {
                // `--` isn't allowed inside an XML comment
                out.push_str("<!--");
                out.push_str(&comment.replace("--", "- -"));
                out.push_str("-->");
            }
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&name) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    write_children(element, out);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
