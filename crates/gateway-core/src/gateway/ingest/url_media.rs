//! Embedded media URL detection in free-form message text.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static MEDIA_URL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://[^\s]+?\.(?:jpg|jpeg|png|gif|webp)").ok()
});

/// All image URLs in `text`, in order of appearance.
pub fn extract_media_urls(text: &str) -> Vec<String> {
    match MEDIA_URL_RE.as_ref() {
        Some(re) => re.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        None => Vec::new(),
    }
}

/// Remove the first occurrence of each URL, then trim the result.
/// Inner whitespace around a removed URL is left as is.
pub fn strip_urls(text: &str, urls: &[String]) -> String {
    let mut stripped = text.to_string();
    for url in urls {
        stripped = stripped.replacen(url.as_str(), "", 1);
    }
    stripped.trim().to_string()
}

/// Last path segment without query or fragment.
pub fn display_name_from_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    parsed
        .path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_image_urls_in_order() {
        let text = "compare https://x.com/a.png and http://y.org/pics/b.JPEG please";
        assert_eq!(
            extract_media_urls(text),
            vec!["https://x.com/a.png".to_string(), "http://y.org/pics/b.JPEG".to_string()]
        );
    }

    #[test]
    fn test_ignores_non_media_urls() {
        assert!(extract_media_urls("read https://example.com/docs/page.html").is_empty());
        assert!(extract_media_urls("no links here").is_empty());
    }

    #[test]
    fn test_strip_keeps_inner_spacing() {
        let text = "see https://x.com/a.png cool";
        let urls = extract_media_urls(text);
        assert_eq!(strip_urls(text, &urls), "see  cool");
    }

    #[test]
    fn test_strip_url_only_message_is_empty() {
        let text = "  https://x.com/a.gif  ";
        let urls = extract_media_urls(text);
        assert_eq!(strip_urls(text, &urls), "");
    }

    #[test]
    fn test_display_name_from_url() {
        assert_eq!(
            display_name_from_url("https://x.com/img/cat.png?size=large#top"),
            Some("cat.png".to_string())
        );
        assert_eq!(display_name_from_url("https://x.com/"), None);
    }
}
