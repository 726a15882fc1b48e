//! HTML extraction for the dictionary pages
//!
//! This module handles the three page shapes the crawler reads:
//! - The category index (`#categories`, top-level list items only)
//! - Category listings (anchors inside `#search-row`)
//! - Sign pages (`<video>` sources)

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// An anchor as found in the page: target and text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// Extracts the top-level category anchors from the category index page
///
/// Only anchors that are direct children of the direct `<li>` children of
/// `#categories` are returned; nested sub-category lists are ignored.
///
/// # Returns
///
/// * `Some(anchors)` - The index was found (possibly empty)
/// * `None` - The page has no `#categories` element
///
/// # Example
///
/// ```
/// use sign_harvest::crawler::extract_category_anchors;
///
/// let html = r#"<ul id="categories"><li><a href="/cat/1/">Animales</a></li></ul>"#;
/// let anchors = extract_category_anchors(html).unwrap();
/// assert_eq!(anchors[0].href, "/cat/1/");
/// assert_eq!(anchors[0].text, "Animales");
/// ```
pub fn extract_category_anchors(html: &str) -> Option<Vec<Anchor>> {
    let document = Html::parse_document(html);

    let root_selector = Selector::parse("#categories").ok()?;
    document.select(&root_selector).next()?;

    let anchor_selector = Selector::parse("#categories > li > a[href]").ok()?;
    Some(collect_anchors(&document, &anchor_selector))
}

/// Extracts all anchors of a category listing page
///
/// # Returns
///
/// * `Some(anchors)` - Anchors inside `#search-row`, in page order
/// * `None` - The page has no `#search-row` element
pub fn extract_listing_anchors(html: &str) -> Option<Vec<Anchor>> {
    let document = Html::parse_document(html);

    let row_selector = Selector::parse("#search-row").ok()?;
    document.select(&row_selector).next()?;

    let anchor_selector = Selector::parse("#search-row a[href]").ok()?;
    Some(collect_anchors(&document, &anchor_selector))
}

fn collect_anchors(document: &Html, selector: &Selector) -> Vec<Anchor> {
    document
        .select(selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(Anchor::new(href, element.text().collect::<String>()))
        })
        .collect()
}

/// Extracts the video sources of a sign page as absolute URLs
///
/// Each `<video>` contributes its `src`, or the first `<source src>` inside it
/// when the element itself has none. Relative sources resolve against `page_url`.
///
/// # Example
///
/// ```
/// use sign_harvest::crawler::extract_video_sources;
/// use url::Url;
///
/// let html = r#"<video src="/media/hola.mp4"></video>"#;
/// let page = Url::parse("https://example.com/es.es/word/1/hola/").unwrap();
/// assert_eq!(
///     extract_video_sources(html, &page),
///     vec!["https://example.com/media/hola.mp4".to_string()]
/// );
/// ```
pub fn extract_video_sources(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let (Ok(video_selector), Ok(source_selector)) =
        (Selector::parse("video"), Selector::parse("source[src]"))
    else {
        return Vec::new();
    };

    document
        .select(&video_selector)
        .filter_map(|video| video_source(video, &source_selector))
        .filter_map(|src| resolve_source(src, page_url))
        .collect()
}

fn video_source<'a>(video: ElementRef<'a>, source_selector: &Selector) -> Option<&'a str> {
    video.value().attr("src").or_else(|| {
        video
            .select(source_selector)
            .next()
            .and_then(|source| source.value().attr("src"))
    })
}

/// Resolves a media source against the page URL, skipping empty values
fn resolve_source(src: &str, page_url: &Url) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    page_url.join(src).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/es.es/word/1/hola/").unwrap()
    }

    #[test]
    fn test_category_anchors_top_level_only() {
        let html = r#"
            <html><body>
            <ul id="categories">
                <li><a href="/cat/1/">Animales</a>
                    <ul><li><a href="/cat/1/2/">Mamíferos</a></li></ul>
                </li>
                <li><a href="/cat/3/">Colores</a></li>
                <li><span><a href="/cat/4/">Nested</a></span></li>
            </ul>
            <a href="/elsewhere/">Elsewhere</a>
            </body></html>
        "#;

        let anchors = extract_category_anchors(html).unwrap();
        assert_eq!(
            anchors,
            vec![
                Anchor::new("/cat/1/", "Animales"),
                Anchor::new("/cat/3/", "Colores"),
            ]
        );
    }

    #[test]
    fn test_missing_category_index() {
        let html = r#"<html><body><ul><li><a href="/cat/1/">x</a></li></ul></body></html>"#;
        assert_eq!(extract_category_anchors(html), None);
    }

    #[test]
    fn test_listing_anchors_keep_raw_text() {
        let html = "<div id=\"search-row\">\
            <a href=\"/es.es/word/1/hola/\">\n  <strong>Hola</strong>\n\n  <em>Interjección</em>\n</a>\
            <a href=\"?p=2\">Siguiente</a>\
            <a>no href</a>\
            </div>\
            <a href=\"/outside/\">Outside</a>";

        let anchors = extract_listing_anchors(html).unwrap();
        assert_eq!(
            anchors,
            vec![
                Anchor::new("/es.es/word/1/hola/", "\n  Hola\n\n  Interjección\n"),
                Anchor::new("?p=2", "Siguiente"),
            ]
        );
    }

    #[test]
    fn test_missing_search_row() {
        assert_eq!(extract_listing_anchors("<html><body></body></html>"), None);
    }

    #[test]
    fn test_video_sources() {
        let html = r#"
            <video src="https://media.example.com/hola.mp4"></video>
            <video><source src="/media/hola-2.mp4" type="video/mp4"></video>
            <video></video>
        "#;

        assert_eq!(
            extract_video_sources(html, &page_url()),
            vec![
                "https://media.example.com/hola.mp4".to_string(),
                "https://example.com/media/hola-2.mp4".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_video() {
        let html = r#"<html><body><img src="/hola.png"></body></html>"#;
        assert!(extract_video_sources(html, &page_url()).is_empty());
    }
}
