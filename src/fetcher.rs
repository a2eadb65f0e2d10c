use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

const USER_AGENT: &str = "docpress/0.1";

/// A fetched page: HTTP status plus the raw markup body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Contract the crawl engine needs from the network layer: one GET with a
/// bounded timeout, returning status and raw markup or a transport failure.
#[async_trait]
pub trait Fetch {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage>;
}

/// HTTP fetcher over a per-crawl `reqwest` client. The client carries the
/// request headers and timeout for the lifetime of one crawl invocation.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("read body of {url}"))?;

        Ok(FetchedPage { status, body })
    }
}
