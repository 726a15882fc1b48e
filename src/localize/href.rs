//! Rewriting sign links between locales

/// Path segment that introduces a sign id
const WORD_SEGMENT: &str = "/word/";

/// Replaces the locale segment of a site-relative href
///
/// Only the first `/<source>/` segment is replaced; an href without it is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use sign_harvest::localize::localized_href;
///
/// assert_eq!(
///     localized_href("/es.es/word/123/hola/?q=hola", "es.es", "en.us"),
///     "/en.us/word/123/hola/?q=hola"
/// );
/// ```
pub fn localized_href(href: &str, source_locale: &str, target_locale: &str) -> String {
    let needle = format!("/{}/", source_locale);
    match href.find(&needle) {
        Some(start) => format!(
            "{}/{}/{}",
            &href[..start],
            target_locale,
            &href[start + needle.len()..]
        ),
        None => href.to_string(),
    }
}

/// Truncates a sign URL right after its `/word/<id>/` part
///
/// Sign URLs carry the gloss slug and query after the id, both of which are
/// locale-specific; the id alone resolves in every locale. URLs without a
/// complete `/word/<id>/` part are returned unchanged.
///
/// # Examples
///
/// ```
/// use sign_harvest::localize::sign_base_url;
///
/// assert_eq!(
///     sign_base_url("https://example.com/en.us/word/123/hola/?q=hola"),
///     "https://example.com/en.us/word/123/"
/// );
/// ```
pub fn sign_base_url(url: &str) -> String {
    if let Some(word_pos) = url.find(WORD_SEGMENT) {
        let id_start = word_pos + WORD_SEGMENT.len();
        if let Some(slash) = url[id_start..].find('/') {
            return url[..id_start + slash + 1].to_string();
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_href() {
        assert_eq!(
            localized_href("/es.es/word/7/perro/", "es.es", "pt.br"),
            "/pt.br/word/7/perro/"
        );
    }

    #[test]
    fn test_localized_href_replaces_first_segment_only() {
        assert_eq!(
            localized_href("/es.es/word/7/es.es/", "es.es", "fr.fr"),
            "/fr.fr/word/7/es.es/"
        );
    }

    #[test]
    fn test_localized_href_without_locale() {
        assert_eq!(localized_href("/word/7/perro/", "es.es", "fr.fr"), "/word/7/perro/");
        // Substring matches inside other segments are not locales
        assert_eq!(localized_href("/xes.es/word/7/", "es.es", "fr.fr"), "/xes.es/word/7/");
    }

    #[test]
    fn test_sign_base_url() {
        assert_eq!(
            sign_base_url("https://example.com/es.es/word/42/gato/?q=gato&cls=1"),
            "https://example.com/es.es/word/42/"
        );
        assert_eq!(
            sign_base_url("https://example.com/es.es/word/42/"),
            "https://example.com/es.es/word/42/"
        );
    }

    #[test]
    fn test_sign_base_url_without_word() {
        assert_eq!(
            sign_base_url("https://example.com/es.es/search/"),
            "https://example.com/es.es/search/"
        );
        assert_eq!(
            sign_base_url("https://example.com/es.es/word/42"),
            "https://example.com/es.es/word/42"
        );
    }
}
