//! Configuration utility functions.

/// Split a free-text comma list into trimmed, non-empty entries.
///
/// # Examples
/// ```ignore
/// split_list(" a.com, ,https://b.com ") -> ["a.com", "https://b.com"]
/// split_list("")                        -> []
/// ```
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Origin root (`scheme://host[:port]/`) of an absolute URL.
///
/// Returns `None` if the URL is invalid or has no host.
///
/// # Examples
/// ```ignore
/// origin_root("https://example.com/blog/")    -> Some("https://example.com/")
/// origin_root("http://localhost:8080/a/b")    -> Some("http://localhost:8080/")
/// origin_root("invalid")                      -> None
/// ```
pub fn origin_root(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str).ok()?;
    parsed.host_str()?;
    Some(format!("{}/", parsed.origin().ascii_serialization()))
}

/// Join a path segment onto a base URL or path.
pub fn join_path(base: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

/// Check that a string is an absolute http(s) URL.
pub fn is_http_url(url_str: &str) -> bool {
    url::Url::parse(url_str)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" example.com, ,https://fonts.gstatic.com "),
            vec!["example.com", "https://fonts.gstatic.com"]
        );
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn test_origin_root() {
        assert_eq!(
            origin_root("https://example.com/blog/").as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(
            origin_root("http://localhost:8080/a/b?q=1").as_deref(),
            Some("http://localhost:8080/")
        );
        assert_eq!(origin_root("invalid-url"), None);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("https://ex.com/blog/", "wp-content"), "https://ex.com/blog/wp-content");
        assert_eq!(join_path("/", "/wp-content"), "/wp-content");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com"));
        assert!(is_http_url("http://localhost:5277/blog"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("/blog"));
    }
}
