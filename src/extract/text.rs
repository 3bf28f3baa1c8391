use scraper::ElementRef;

/// The visible text of an element: all descendant text, whitespace runs
/// collapsed to a single space, trimmed.
pub fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove each of `symbols` from `text` and trim the result.
///
/// The HTML pages decorate headings with emoji that the PDF's base fonts
/// can't draw; this is how they are dropped before layout.
pub fn strip_symbols(text: &str, symbols: &[&str]) -> String {
    let mut text = text.to_string();
    for symbol in symbols {
        text = text.replace(symbol, "");
    }
    text.trim().to_string()
}

/// Remove a leading label such as `Email:` and trim what remains.
pub fn strip_label(text: &str, label: &str) -> String {
    text.replace(label, "").trim().to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn can_collapse_nested_text() {
        let html = Html::parse_fragment("<p>  <b>Duración:</b>\n   60 minutos  </p>");
        let p = Selector::parse("p").expect("valid selector");
        let p = html.select(&p).next().expect("has a paragraph");
        assert_eq!(text_of(p), "Duración: 60 minutos");
    }

    #[test]
    fn can_strip_symbols() {
        assert_eq!(strip_symbols("🎁 BONUS ✨", &["🎁", "✨"]), "BONUS");
        assert_eq!(strip_symbols("plain", &["🎁"]), "plain");
    }

    #[test]
    fn can_strip_labels() {
        assert_eq!(strip_label("Email: hola@fixter.org", "Email:"), "hola@fixter.org");
    }
}
