//! Chapter document rendering for EPUB.

use crate::sinks::epub::config::EPUB;
use crate::source::ContentUnit;

/// Wrap a chapter's rendered body in a complete XHTML document.
pub fn render(config: &EPUB, unit: &ContentUnit) -> String {
    let title = html_escape::encode_text(&unit.title);
    let heading = if config.chapter_headings {
        format!("<h1>{title}</h1>\n")
    } else {
        String::new()
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
    <meta charset="UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body>
<section id="{id}">
{heading}{body}
</section>
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(&config.language),
        id = crate::source::sanitise_id(&unit.id),
        body = unit.body,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    fn book(chapter_headings: bool) -> EPUB {
        EPUB {
            identifier: "libro".to_string(),
            title: "Libro".to_string(),
            language: "es".to_string(),
            authors: Vec::default(),
            description: String::new(),
            publisher: String::new(),
            source_url: String::new(),
            content_dir: PathBuf::from("content"),
            outfile: PathBuf::from("libro.epub"),
            cover_image: None,
            chapter_headings,
            theme: Default::default(),
            chapters: Vec::default(),
        }
    }

    fn unit() -> ContentUnit {
        ContentUnit {
            id: "intro".to_string(),
            title: "Introducción & <contexto>".to_string(),
            slug: "introduccion".to_string(),
            body: "<p>Hola</p>\n".to_string(),
        }
    }

    #[test]
    fn can_render_chapter_with_heading() {
        let html = render(&book(true), &unit());
        assert!(html.contains("<h1>Introducción &amp; &lt;contexto&gt;</h1>\n<p>Hola</p>"));
        assert!(html.contains("<title>Introducción &amp; &lt;contexto&gt;</title>"));
        assert!(html.contains(r#"<section id="intro">"#));
        assert!(html.contains(r#"href="stylesheet.css""#));
    }

    #[test]
    fn can_render_chapter_without_heading() {
        let html = render(&book(false), &unit());
        assert!(!html.contains("<h1>"));
        assert!(html.contains("<p>Hola</p>"));
    }
}
