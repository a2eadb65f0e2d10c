use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use colored::*;
use dom_query::Document;
use tracing::{debug, info, warn};
use url::Url;

use crate::extract;
use crate::fetcher::Fetch;
use crate::link;

/// One successfully crawled page. Immutable once recorded; the position in
/// the crawl result becomes the chapter position in the assembled book.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub url: Url,
    pub title: String,
    pub content: String,
}

/// Bounded breadth-first crawler over a single site.
///
/// The crawl is a sequential loop: each fetch suspends the pipeline until it
/// completes or times out, and the configured delay throttles the request
/// rate between pages. Per-URL failures are terminal for that URL and never
/// abort the crawl; a partial result is a valid result.
pub struct Crawler<F> {
    fetcher: F,
    max_pages: usize,
    delay: Duration,
    allowed_prefix: Option<String>,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(
        fetcher: F,
        max_pages: usize,
        delay: Duration,
        allowed_prefix: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            max_pages,
            delay,
            allowed_prefix,
        }
    }

    /// Crawl internal pages starting from `start_url`, in discovery order.
    ///
    /// Visited counts fetched and rejected URLs alike, so the page cap bounds
    /// the number of distinct URLs considered, not just successes.
    pub async fn crawl(&self, start_url: &Url) -> Vec<PageRecord> {
        let netloc = link::authority(start_url);
        let origin = format!("{}://{}", start_url.scheme(), netloc);

        let mut frontier: VecDeque<Url> = VecDeque::from([start_url.clone()]);
        let mut queued: HashSet<Url> = HashSet::from([start_url.clone()]);
        let mut visited: HashSet<Url> = HashSet::new();
        let mut pages: Vec<PageRecord> = Vec::new();

        while visited.len() < self.max_pages {
            let Some(url) = frontier.pop_front() else {
                break;
            };
            if visited.contains(&url) {
                continue;
            }

            if !link::same_site(&netloc, url.as_str()) {
                visited.insert(url);
                continue;
            }
            if let Some(prefix) = &self.allowed_prefix {
                if !url.as_str().starts_with(prefix.as_str()) {
                    debug!("Outside allowed prefix, skipping {}", url.as_str());
                    visited.insert(url);
                    continue;
                }
            }

            let fetched = match self.fetcher.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(err) => {
                    warn!("Request failed for {}: {:#}", url.as_str(), err);
                    visited.insert(url);
                    continue;
                }
            };
            if fetched.status != 200 {
                debug!("Skipping {} (status {})", url.as_str(), fetched.status);
                visited.insert(url);
                continue;
            }

            let doc = Document::from(fetched.body);
            let title = extract::page_title(&doc, url.as_str());
            let Some(content) = extract::extract_main(&doc) else {
                debug!("No usable content in {}", url.as_str());
                visited.insert(url);
                continue;
            };

            info!("Crawled \"{}\"", url.as_str().green());
            pages.push(PageRecord {
                url: url.clone(),
                title,
                content,
            });
            visited.insert(url.clone());

            for anchor in doc.select("a[href]").iter() {
                let Some(href) = anchor.attr("href") else {
                    continue;
                };
                let Some(resolved) = link::normalize(&url, &href) else {
                    continue;
                };
                if !link::same_site(&netloc, resolved.as_str()) {
                    continue;
                }
                if link::is_binary_asset(&resolved) {
                    continue;
                }
                // The start URL's scheme is pinned: an https variant of an
                // http site is treated as a different site.
                if !resolved.as_str().starts_with(&origin) {
                    continue;
                }
                if visited.contains(&resolved) || !queued.insert(resolved.clone()) {
                    continue;
                }
                frontier.push_back(resolved);
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        pages
    }

    /// Fetch an explicit list of URLs in order, without link discovery.
    ///
    /// Used by no-crawl mode. The same extraction pipeline and inter-request
    /// delay apply; duplicate URLs keep their first position.
    pub async fn fetch_list(&self, urls: &[Url]) -> Vec<PageRecord> {
        let mut seen: HashSet<Url> = HashSet::new();
        let mut pages: Vec<PageRecord> = Vec::new();

        for url in urls {
            if !seen.insert(url.clone()) {
                continue;
            }

            info!("Fetching {}", url.as_str().green());
            let fetched = match self.fetcher.fetch(url).await {
                Ok(fetched) => fetched,
                Err(err) => {
                    warn!("Request failed for {}: {:#}", url.as_str(), err);
                    continue;
                }
            };
            if fetched.status != 200 {
                warn!("Skipped {} (status {})", url.as_str(), fetched.status);
                continue;
            }

            let doc = Document::from(fetched.body);
            let title = extract::page_title(&doc, url.as_str());
            let Some(content) = extract::extract_main(&doc) else {
                debug!("No usable content in {}", url.as_str());
                continue;
            };

            pages.push(PageRecord {
                url: url.clone(),
                title,
                content,
            });

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        pages
    }
}
