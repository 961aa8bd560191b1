use url::Url;

/// Parse an absolute `http`/`https` URL, rejecting every other scheme.
pub fn parse_http_url(input: &str) -> Option<Url> {
    Url::parse(input.trim())
        .ok()
        .filter(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
}

/// Normalize a page URL for identity comparisons.
///
/// Drops the fragment and any trailing slash on the path. Falls back to
/// trimming trailing slashes if the input cannot be parsed.
pub fn normalize_page_url(input: &str) -> String {
    match Url::parse(input.trim()) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => input.trim().trim_end_matches('/').to_string(),
    }
}

/// Whether two URLs point at the same page.
pub fn same_page(a: &str, b: &str) -> bool {
    normalize_page_url(a) == normalize_page_url(b)
}

/// Whether the URL belongs to a Google property (search chrome, cache, translate...).
pub fn is_google_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.trim_start_matches("www.");
        host == "google.com"
            || host.starts_with("google.")
            || host.ends_with(".google.com")
            || host == "webcache.googleusercontent.com"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_http_url("https://example.com/shoes").is_some());
        assert!(parse_http_url("  http://example.com ").is_some());
    }

    #[test]
    fn rejects_other_schemes_and_relative_urls() {
        for input in [
            "ftp://example.com",
            "javascript:alert(1)",
            "/relative/path",
            "example.com",
            "",
        ] {
            assert!(parse_http_url(input).is_none(), "{input} should be rejected");
        }
    }

    #[test]
    fn normalizes_trailing_slash_and_fragment() {
        assert_eq!(
            normalize_page_url("https://example.com/shoes/#reviews"),
            "https://example.com/shoes"
        );
        assert_eq!(normalize_page_url("https://example.com/"), "https://example.com");
    }

    #[test]
    fn trims_trailing_slash_when_parse_fails() {
        assert_eq!(normalize_page_url("example.com/"), "example.com");
    }

    #[test]
    fn same_page_ignores_cosmetic_differences() {
        assert!(same_page("https://example.com/shoes", "https://example.com/shoes/"));
        assert!(same_page("https://EXAMPLE.com/shoes", "https://example.com/shoes#top"));
        assert!(!same_page("https://example.com/shoes", "https://example.com/boots"));
        assert!(!same_page("https://example.com/?a=1", "https://example.com/?a=2"));
    }

    #[test]
    fn detects_google_hosts() {
        let google = Url::parse("https://www.google.com/search?q=x").unwrap();
        let maps = Url::parse("https://maps.google.com/").unwrap();
        let other = Url::parse("https://googleblog.example.org/").unwrap();
        assert!(is_google_host(&google));
        assert!(is_google_host(&maps));
        assert!(!is_google_host(&other));
    }
}
