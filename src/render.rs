use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures_util::StreamExt;
use tokio::fs;
use tracing::{debug, error};
use url::Url;

/// Fixed page geometry for the rendered book: A4 with 2 cm margins.
/// Chromium takes these in inches.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub paper_width: f64,
    pub paper_height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl Default for PdfOptions {
    fn default() -> Self {
        const A4_WIDTH_IN: f64 = 8.27;
        const A4_HEIGHT_IN: f64 = 11.69;
        const MARGIN_2CM_IN: f64 = 0.79;
        Self {
            paper_width: A4_WIDTH_IN,
            paper_height: A4_HEIGHT_IN,
            margin_top: MARGIN_2CM_IN,
            margin_right: MARGIN_2CM_IN,
            margin_bottom: MARGIN_2CM_IN,
            margin_left: MARGIN_2CM_IN,
        }
    }
}

/// Renders an assembled HTML document to a paginated PDF through headless
/// Chromium. Page-break markers in the document become hard page breaks.
pub struct Renderer {
    pdf_options: PdfOptions,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            pdf_options: PdfOptions::default(),
        }
    }

    pub async fn render(&self, html: &str, output: &Path, base_url: Option<&Url>) -> Result<()> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|e| anyhow!("Failed to create browser config: {}", e))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser: {}", e))?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(err) = h {
                    // Skip the common websocket deserialization noise
                    let err_str = err.to_string();
                    if !err_str.contains("data did not match any variant")
                        && !err_str.contains("untagged enum Message")
                    {
                        error!("Browser handler error: {}", err);
                    } else {
                        debug!("Chrome protocol message ignored: {}", err);
                    }
                }
            }
        });

        let result = self.render_internal(&browser, html, output, base_url).await;

        browser.close().await.ok();
        handle.abort();

        result
    }

    async fn render_internal(
        &self,
        browser: &Browser,
        html: &str,
        output: &Path,
        base_url: Option<&Url>,
    ) -> Result<()> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow!("Failed to create new page: {}", e))?;

        let html = match base_url {
            Some(base) => with_base_href(html, base),
            None => html.to_string(),
        };

        page.set_content(html.as_str())
            .await
            .map_err(|e| anyhow!("Failed to set document content: {}", e))?;

        // Give layout and remote assets a moment to settle
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let params = PrintToPdfParams {
            paper_width: Some(self.pdf_options.paper_width),
            paper_height: Some(self.pdf_options.paper_height),
            margin_top: Some(self.pdf_options.margin_top),
            margin_right: Some(self.pdf_options.margin_right),
            margin_bottom: Some(self.pdf_options.margin_bottom),
            margin_left: Some(self.pdf_options.margin_left),
            print_background: Some(true),
            ..Default::default()
        };

        let pdf_data = page
            .pdf(params)
            .await
            .map_err(|e| anyhow!("Failed to generate PDF: {}", e))?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| anyhow!("Failed to create directory: {}", e))?;
            }
        }

        fs::write(output, pdf_data)
            .await
            .map_err(|e| anyhow!("Failed to write PDF to {}: {}", output.display(), e))?;

        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Inject a `<base href>` so relative asset references in crawled fragments
/// resolve against the crawled site.
fn with_base_href(html: &str, base: &Url) -> String {
    html.replacen("<head>", &format!("<head><base href=\"{base}\">"), 1)
}
