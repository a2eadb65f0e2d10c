use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use colored::*;
use docpress::{book, Crawler, HttpFetcher, Renderer};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::fs;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

#[derive(Parser)]
#[command(name = "docpress")]
#[command(about = "Build an organized PDF book from a documentation website")]
#[command(version = "0.1.0")]
struct Args {
    /// Starting URL for the documentation crawl
    #[arg(short = 's', long = "start-url", default_value = "https://docs.flutter.dev")]
    start_url: String,

    /// Output PDF filename
    #[arg(short = 'o', long = "output", default_value = "documentation_book.pdf")]
    output: String,

    /// Maximum number of pages to crawl
    #[arg(long = "max-pages", default_value = "200")]
    max_pages: usize,

    /// Delay between requests in seconds
    #[arg(long = "delay", default_value = "0.4", value_parser = parse_seconds)]
    delay: f64,

    /// Request timeout in seconds
    #[arg(short = 't', long = "timeout", default_value = "20.0", value_parser = parse_seconds)]
    timeout: f64,

    /// Do not crawl; expect --urls-file with the pages to include
    #[arg(long = "no-crawl")]
    no_crawl: bool,

    /// File containing newline-separated URLs to include (used with --no-crawl)
    #[arg(long = "urls-file")]
    urls_file: Option<String>,

    /// Title to put on the PDF book
    #[arg(long = "book-title", default_value = "Documentation Book")]
    book_title: String,

    /// Author/creator name for the title page
    #[arg(long = "author")]
    author: Option<String>,

    /// Only include URLs that start with this prefix (useful to limit to /docs/)
    #[arg(long = "allowed-prefix")]
    allowed_prefix: Option<String>,
}

fn parse_seconds(s: &str) -> Result<f64, String> {
    let value = s.parse::<f64>().map_err(|_| "Not a number.")?;
    if value < 0.0 {
        return Err("Must be zero or positive number.".to_string());
    }
    Ok(value)
}

async fn read_urls_file(path: &str) -> Result<Vec<Url>> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read URLs file '{}'", path))?;

    let mut urls = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Url::parse(line) {
            Ok(url) => urls.push(url),
            Err(e) => warn!("Ignoring invalid URL '{}': {}", line, e),
        }
    }
    Ok(urls)
}

async fn run(args: Args) -> Result<()> {
    let start_url = Url::parse(&args.start_url)
        .with_context(|| format!("Invalid start URL '{}'", args.start_url))?;

    let fetcher = HttpFetcher::new(Duration::from_secs_f64(args.timeout))?;
    let crawler = Crawler::new(
        fetcher,
        args.max_pages,
        Duration::from_secs_f64(args.delay),
        args.allowed_prefix.clone(),
    );

    let pages = if args.no_crawl {
        let urls_file = args
            .urls_file
            .as_deref()
            .ok_or_else(|| anyhow!("--no-crawl requires --urls-file with URLs to include"))?;
        let urls = read_urls_file(urls_file).await?;
        crawler.fetch_list(&urls).await
    } else {
        info!("Crawling \"{}\"", start_url.as_str().green());
        crawler.crawl(&start_url).await
    };

    if pages.is_empty() {
        bail!("No pages collected");
    }

    info!("Building book HTML with {} pages...", pages.len());
    let html = book::assemble(&pages, &args.book_title, args.author.as_deref());

    let output = PathBuf::from(&args.output);
    info!("Converting to PDF (this may take a while)...");
    Renderer::new().render(&html, &output, Some(&start_url)).await?;

    info!("Done. PDF saved to: {}", output.display().to_string().green());
    Ok(())
}

#[tokio::main]
async fn main() {
    // Set up logging with chromiumoxide errors suppressed
    let filter = EnvFilter::from_default_env()
        .add_directive("chromiumoxide::conn=off".parse().unwrap())
        .add_directive("chromiumoxide::handler=off".parse().unwrap())
        .add_directive("docpress=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{}", format!("Error: {}", e).red());
        process::exit(1);
    }
}
