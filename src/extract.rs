use dom_query::Document;

/// Candidate containers for a page's substantive content, tried in priority
/// order. The first one whose text is non-empty after trimming wins; adding a
/// new heuristic means appending a selector here, not restructuring control
/// flow.
const MAIN_SELECTORS: &[&str] = &[
    "main",
    "article",
    "div[role=main]",
    "div[class*='content']",
    "div[class*='main-content']",
    "div[id*='content']",
];

/// Elements removed outright from the selected subtree.
const STRIP_SELECTOR: &str = "script, style, nav, form, footer, header, noscript";

/// Class names marking page chrome rather than content.
const JUNK_CLASSES: &[&str] = &[
    "edit-on-github",
    "sidebar",
    "toc",
    "breadcrumbs",
    "page-nav",
    "nav",
    "site-footer",
    "site-header",
];

/// Select the best-guess main-content subtree of a parsed page and return it
/// cleaned, serialized as a detached HTML fragment.
///
/// Falls back to the document body (or the whole document) when no candidate
/// selector matches. Returns `None` when even the fallback yields no markup,
/// which excludes the page from the crawl result.
pub fn extract_main(doc: &Document) -> Option<String> {
    for selector in MAIN_SELECTORS {
        if let Some(candidate) = doc.select(selector).iter().next() {
            if !candidate.text().trim().is_empty() {
                return non_empty(clean_fragment(&candidate.html()));
            }
        }
    }

    let body = doc.select("body");
    if body.exists() {
        return non_empty(clean_fragment(&body.html()));
    }
    non_empty(clean_fragment(&doc.html().to_string()))
}

/// Structural cleaning pass: drop scripts, styles, navigation and other page
/// chrome by tag and class. Never attempts semantic judgment of relevance.
pub fn clean_fragment(markup: &str) -> String {
    let fragment = Document::from(markup);

    fragment.select(STRIP_SELECTOR).remove();
    for class in JUNK_CLASSES {
        fragment.select(&format!(".{class}")).remove();
    }

    fragment.select("body").inner_html().trim().to_string()
}

/// Page title from the `<title>` element, falling back to the URL string.
pub fn page_title(doc: &Document, url: &str) -> String {
    let title = doc.select("title").text();
    let title = title.trim();
    if title.is_empty() {
        url.to_string()
    } else {
        title.to_string()
    }
}

fn non_empty(fragment: String) -> Option<String> {
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_element_wins_over_body() {
        let doc = Document::from(
            "<html><body><nav>menu</nav><main><p>Real content</p></main></body></html>",
        );
        let fragment = extract_main(&doc).unwrap();
        assert!(fragment.contains("Real content"));
        assert!(!fragment.contains("menu"));
    }

    #[test]
    fn article_is_used_when_main_is_absent() {
        let doc = Document::from("<body><article><p>From the article</p></article></body>");
        let fragment = extract_main(&doc).unwrap();
        assert!(fragment.contains("From the article"));
    }

    #[test]
    fn empty_main_falls_through_to_next_selector() {
        let doc = Document::from(
            "<body><main>   </main><article><p>Fallback text</p></article></body>",
        );
        let fragment = extract_main(&doc).unwrap();
        assert!(fragment.contains("Fallback text"));
    }

    #[test]
    fn role_main_container_is_recognized() {
        let doc = Document::from("<body><div role=\"main\"><p>Role text</p></div></body>");
        let fragment = extract_main(&doc).unwrap();
        assert!(fragment.contains("Role text"));
    }

    #[test]
    fn content_class_container_is_recognized() {
        let doc = Document::from(
            "<body><div class=\"page-content\"><p>Classed text</p></div></body>",
        );
        let fragment = extract_main(&doc).unwrap();
        assert!(fragment.contains("Classed text"));
    }

    #[test]
    fn body_is_the_last_resort() {
        let doc = Document::from("<body><p>Plain body text</p></body>");
        let fragment = extract_main(&doc).unwrap();
        assert!(fragment.contains("Plain body text"));
    }

    #[test]
    fn page_with_no_usable_content_yields_none() {
        let doc = Document::from("<body><script>var x = 1;</script></body>");
        assert_eq!(extract_main(&doc), None);
    }

    #[test]
    fn cleaning_removes_chrome_by_tag_and_class() {
        let cleaned = clean_fragment(
            "<main><script>x()</script><div class=\"sidebar\">links</div>\
             <div class=\"breadcrumbs\">a / b</div><p>Kept</p></main>",
        );
        assert!(cleaned.contains("Kept"));
        assert!(!cleaned.contains("x()"));
        assert!(!cleaned.contains("links"));
        assert!(!cleaned.contains("a / b"));
    }

    #[test]
    fn title_falls_back_to_url() {
        let with_title = Document::from("<head><title> Widgets </title></head><body></body>");
        assert_eq!(
            page_title(&with_title, "https://docs.example.com/w"),
            "Widgets"
        );

        let without_title = Document::from("<body><p>x</p></body>");
        assert_eq!(
            page_title(&without_title, "https://docs.example.com/w"),
            "https://docs.example.com/w"
        );
    }
}
