//! CSS generation for EPUB books.
//!
//! Every document in the book links the one stylesheet generated here. Serif
//! body text, sans headings, and the theme's accent on headings, links, and
//! quotes. Code blocks take their colours from the theme so a book can use
//! either a light or an editor-like dark palette.

use super::config::BookTheme;

/// Generate the complete CSS stylesheet for the book.
pub fn generate_stylesheet(theme: &BookTheme) -> String {
    let mut css = String::with_capacity(2048);
    css.push_str(&generate_base_styles(theme));
    css.push_str(&generate_code_styles(theme));
    css.push_str(COVER_STYLES);
    css
}

fn generate_base_styles(theme: &BookTheme) -> String {
    format!(
        r#"@namespace epub "http://www.idpf.org/2007/ops";

body {{
    font-family: Georgia, serif;
    line-height: 1.6;
    margin: 1em;
}}

h1, h2, h3, h4, h5, h6 {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    margin-top: 1.5em;
    margin-bottom: 0.5em;
    color: #333;
}}

h1 {{
    font-size: 2em;
    border-bottom: 2px solid {accent};
    padding-bottom: 0.3em;
}}

h2 {{
    font-size: 1.5em;
    color: {accent};
}}

h3 {{
    font-size: 1.3em;
}}

blockquote {{
    border-left: 4px solid {accent};
    margin-left: 0;
    padding-left: 20px;
    font-style: italic;
    color: #666;
}}

a {{
    color: {accent};
    text-decoration: none;
}}

ul, ol {{
    padding-left: 30px;
}}

li {{
    margin-bottom: 0.5em;
}}

table {{
    border-collapse: collapse;
    margin: 1em 0;
}}

th, td {{
    border: 1px solid #ddd;
    padding: 4px 8px;
}}
"#,
        accent = theme.accent,
    )
}

fn generate_code_styles(theme: &BookTheme) -> String {
    let foreground = theme
        .code_foreground
        .as_deref()
        .map(|colour| format!("\n    color: {colour};"))
        .unwrap_or_default();

    format!(
        r#"
code {{
    background-color: {inline};
    padding: 2px 6px;
    border-radius: 3px;
    font-family: "Courier New", monospace;
    font-size: 0.9em;
}}

pre {{
    background-color: {background};{foreground}
    padding: 15px;
    border-radius: 5px;
    overflow-x: auto;
    line-height: 1.4;
    border: 1px solid {border};
}}

pre code {{
    background-color: transparent;
    color: inherit;
    padding: 0;
    display: block;
}}
"#,
        inline = theme.inline_code_background,
        background = theme.code_background,
        border = theme.code_border,
    )
}

const COVER_STYLES: &str = r#"
.cover {
    margin: 0;
    padding: 0;
    text-align: center;
}

.cover img {
    max-width: 100%;
    max-height: 100%;
}
"#;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_generate_light_stylesheet() {
        let css = generate_stylesheet(&BookTheme::default());
        assert!(css.contains("border-bottom: 2px solid #0066cc;"));
        assert!(css.contains("background-color: #f4f4f4;\n    padding: 15px;"));
        assert!(css.contains("border: 1px solid #ddd;"));
    }

    #[test]
    fn can_generate_dark_code_stylesheet() {
        let css = generate_stylesheet(&BookTheme::dark_code("#3178C6"));
        assert!(css.contains("color: #3178C6;"));
        assert!(css.contains("background-color: #1e1e1e;\n    color: #d4d4d4;"));
        assert!(css.contains("border: 1px solid #333;"));
    }
}
