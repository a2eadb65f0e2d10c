use std::collections::HashSet;

use chrono::Local;
use dom_query::Document;
use slug::slugify;

use crate::crawler::PageRecord;

/// Longest slug kept when synthesizing heading identifiers.
const MAX_SLUG_LEN: usize = 60;

/// Hard page break between the blocks of the assembled document.
const PAGE_BREAK: &str = "<div style=\"page-break-after: always;\"></div>";

/// Print stylesheet embedded in the assembled document.
const BOOK_CSS: &str = r#"
    body { font-family: "DejaVu Sans", "Arial", sans-serif; margin: 2cm; font-size: 12pt; color: #222; }
    h1 { font-size: 20pt; margin-top: 0.5em; margin-bottom: 0.3em; }
    h2 { font-size: 16pt; margin-top: 0.6em; }
    .title-page { text-align: center; margin-top: 6cm; }
    .title-page h1 { font-size: 36pt; margin-bottom: 0.2em; }
    .toc { margin-top: 2cm; }
    .toc ul { list-style: none; padding-left: 0; }
    .toc a { text-decoration: none; color: #1a0dab; }
    .chapter { margin-top: 1em; }
    .source-url { font-size: 9pt; color: #555; margin-bottom: 0.5em; }
    pre { white-space: pre-wrap; word-wrap: break-word; background: #f7f7f7; padding: 0.5em; border-radius: 4px; }
    code { font-family: monospace; }
"#;

struct TocEntry {
    title: String,
    anchor: String,
}

/// Assemble crawled pages into one book-shaped HTML document: title page,
/// table of contents, then one chapter per page in crawl order.
///
/// Guarantees: every TOC anchor resolves to exactly one chapter id, every
/// heading id is unique document-wide, and chapter order equals the order
/// pages were first successfully fetched.
pub fn assemble(pages: &[PageRecord], book_title: &str, author: Option<&str>) -> String {
    let mut toc_entries: Vec<TocEntry> = Vec::new();
    let mut chapters: Vec<String> = Vec::new();
    let mut used_heading_ids: HashSet<String> = HashSet::new();

    for (i, page) in pages.iter().enumerate() {
        let index = i + 1;
        let fragment = Document::from(page.content.as_str());

        for heading in fragment.select("h1, h2, h3, h4, h5, h6").iter() {
            let missing = heading
                .attr("id")
                .map_or(true, |id| id.trim().is_empty());
            if missing {
                let base = format!("page{index}-{}", heading_slug(&heading.text()));
                heading.set_attr("id", &unique_id(base, &mut used_heading_ids));
            } else if let Some(id) = heading.attr("id") {
                used_heading_ids.insert(id.to_string());
            }
        }

        let chapter_title = fragment
            .select("h1, h2, h3")
            .iter()
            .next()
            .map(|h| h.text().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| page.title.clone());

        let chapter_id = format!("chapter-{index}");
        toc_entries.push(TocEntry {
            title: chapter_title.clone(),
            anchor: chapter_id.clone(),
        });

        let content = fragment.select("body").inner_html();
        chapters.push(format!(
            "<section class=\"chapter\" id=\"{chapter_id}\">\n\
             <h1>{title}</h1>\n\
             <div class=\"source-url\">Source: <a href=\"{url}\">{url}</a></div>\n\
             {content}</section>\n{PAGE_BREAK}",
            title = escape_html(&chapter_title),
            url = page.url,
            content = content.trim(),
        ));
    }

    let mut title_block = format!(
        "<div class=\"title-page\"><h1>{}</h1>",
        escape_html(book_title)
    );
    if let Some(author) = author {
        title_block.push_str(&format!(
            "<div class=\"author\">By {}</div>",
            escape_html(author)
        ));
    }
    title_block.push_str(&format!(
        "<div class=\"meta\">Generated: {}</div></div>{PAGE_BREAK}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    let mut toc_block = String::from("<div class=\"toc\"><h2>Index / Table of Contents</h2><ul>");
    for entry in &toc_entries {
        toc_block.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>\n",
            entry.anchor,
            escape_html(&entry.title)
        ));
    }
    toc_block.push_str(&format!("</ul></div>{PAGE_BREAK}"));

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{BOOK_CSS}</style></head><body>{title_block}{toc_block}{body}</body></html>",
        title = escape_html(book_title),
        body = chapters.join("\n"),
    )
}

/// Slug for a heading id: non-alphanumeric runs collapse to `-`, truncated to
/// a bounded length. The page-index prefix supplied by the caller keeps equal
/// heading text on different pages from colliding.
fn heading_slug(text: &str) -> String {
    let mut slug = slugify(text.trim());
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Disambiguate repeated heading text within one page with a numeric suffix.
fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
