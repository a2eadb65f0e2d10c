use url::Url;

/// File extensions that never lead to crawlable documentation pages.
const BINARY_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "pdf", "zip", "tar", "gz", "mp4", "webm",
];

/// Canonicalize a discovered href relative to the page it appeared on.
///
/// Strips any fragment (fragments never affect page identity), resolves
/// relative and protocol-relative references against `base`, and rejects
/// non-crawlable schemes. Returns `None` when the href is empty or points
/// at `mailto:`/`tel:` targets.
pub fn normalize(base: &Url, href: &str) -> Option<Url> {
    if href.trim().is_empty() {
        return None;
    }

    let href = href.split('#').next().unwrap_or("").trim();

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}

/// The host[:port] portion of a URL, used as the crawl's site identity.
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Whether a link belongs to the same site as the crawl's reference authority.
///
/// A link with no network location of its own (a purely relative reference)
/// is always same-site. Otherwise the link's host[:port] must equal the
/// reference exactly. Schemes are not compared here; the crawl engine
/// additionally pins the start URL's scheme when enqueuing.
pub fn same_site(netloc: &str, link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => match url.host_str() {
            Some(_) => authority(&url) == netloc,
            None => true,
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Whether a URL points at a binary or media asset we never enqueue.
pub fn is_binary_asset(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    match path.rsplit_once('.') {
        Some((_, ext)) => BINARY_EXTENSIONS.contains(&ext),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://docs.example.com/guide/intro.html").unwrap()
    }

    #[test]
    fn absolute_fragment_free_urls_are_unchanged() {
        let url = "https://docs.example.com/guide/setup.html";
        assert_eq!(normalize(&base(), url).unwrap().as_str(), url);
    }

    #[test]
    fn fragments_are_stripped() {
        assert_eq!(
            normalize(&base(), "page.html#section"),
            normalize(&base(), "page.html")
        );
    }

    #[test]
    fn relative_references_resolve_against_base() {
        assert_eq!(
            normalize(&base(), "../api/widgets.html").unwrap().as_str(),
            "https://docs.example.com/api/widgets.html"
        );
    }

    #[test]
    fn protocol_relative_references_take_base_scheme() {
        assert_eq!(
            normalize(&base(), "//cdn.example.com/page").unwrap().as_str(),
            "https://cdn.example.com/page"
        );
    }

    #[test]
    fn empty_and_non_crawlable_hrefs_are_rejected() {
        assert_eq!(normalize(&base(), ""), None);
        assert_eq!(normalize(&base(), "   "), None);
        assert_eq!(normalize(&base(), "mailto:docs@example.com"), None);
        assert_eq!(normalize(&base(), "tel:+1-555-0100"), None);
    }

    #[test]
    fn relative_links_are_always_same_site() {
        assert!(same_site("docs.example.com", "/guide/setup.html"));
        assert!(same_site("docs.example.com", "setup.html"));
    }

    #[test]
    fn foreign_hosts_are_never_same_site() {
        assert!(!same_site(
            "docs.example.com",
            "https://blog.example.com/post"
        ));
        assert!(!same_site("docs.example.com", "https://example.com/"));
    }

    #[test]
    fn matching_hosts_are_same_site() {
        assert!(same_site(
            "docs.example.com",
            "https://docs.example.com/guide/"
        ));
    }

    #[test]
    fn ports_are_part_of_the_authority() {
        assert!(same_site("localhost:8000", "http://localhost:8000/docs/"));
        assert!(!same_site("localhost:8000", "http://localhost:9000/docs/"));
    }

    #[test]
    fn binary_assets_are_detected_case_insensitively() {
        let pdf = Url::parse("https://docs.example.com/manual.PDF").unwrap();
        let png = Url::parse("https://docs.example.com/img/logo.png").unwrap();
        let page = Url::parse("https://docs.example.com/guide.html").unwrap();
        assert!(is_binary_asset(&pdf));
        assert!(is_binary_asset(&png));
        assert!(!is_binary_asset(&page));
    }
}
