//! # docpress
//!
//! A CLI utility that crawls a documentation website and presses it into a
//! single PDF book with a generated title page and table of contents.
//!
//! ## Pipeline
//!
//! - Bounded breadth-first crawl over one site, discovery order preserved
//! - Main-content extraction with a priority-ordered selector fallback chain
//! - Deterministic book assembly: title page, TOC, one chapter per page
//! - PDF rendering through headless Chromium
//!
//! ## Usage
//!
//! ```bash
//! docpress --start-url https://docs.flutter.dev --output flutter_docs.pdf
//! ```

pub mod book;
pub mod crawler;
pub mod extract;
pub mod fetcher;
pub mod link;
pub mod render;

pub use crawler::{Crawler, PageRecord};
pub use fetcher::{Fetch, FetchedPage, HttpFetcher};
pub use render::Renderer;
