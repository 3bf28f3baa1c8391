//! Cover page rendering for EPUB.
//!
//! A single full-page image. The page is marked with EPUB's cover reference
//! type so e-readers show it in library views.

use crate::sinks::epub::config::EPUB;

/// Render the cover page for the image stored in the book as `image_href`.
pub fn render(config: &EPUB, image_href: &str) -> String {
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
<div class="cover">
<img src="{href}" alt="{title}"/>
</div>
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(&config.language),
        title = html_escape::encode_double_quoted_attribute(&config.title),
        href = html_escape::encode_double_quoted_attribute(image_href),
    )
}

/// The image's name inside the book, keeping its extension.
pub fn image_href(path: &std::path::Path) -> String {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
    {
        Some(ext) => format!("images/cover.{ext}"),
        None => "images/cover".to_string(),
    }
}

/// Determine MIME type from file extension.
pub fn mime_from_path(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::Path;

    #[test]
    fn can_name_cover_images() {
        assert_eq!(image_href(Path::new("/tmp/llamaindex_cover.JPG")), "images/cover.jpg");
        assert_eq!(mime_from_path(Path::new("/tmp/llamaindex_cover.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("cover")), "application/octet-stream");
    }
}
