use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Why a fetch did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchFailure {
    Timeout,
    Connect,
    HttpStatus(u16),
    Other(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "request timed out"),
            FetchFailure::Connect => write!(f, "connection failed"),
            FetchFailure::HttpStatus(code) => write!(f, "HTTP {}", code),
            FetchFailure::Other(desc) => write!(f, "{}", desc),
        }
    }
}

/// An outbound link discovered in a page, already resolved and normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub internal: bool,
}

/// An `<img>` element with the attributes the checks care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub src: Option<String>,
    pub alt: Option<String>,
}

/// One fetched, parsed document. Built once by the orchestrator from a fetch
/// outcome and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Normalized URL this page was dispatched under.
    pub url: String,
    /// URL actually reached after redirects, when it differs.
    pub final_url: Option<String>,
    pub status: u16,
    /// Response headers, keys lowercased.
    pub headers: HashMap<String, String>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical: Option<String>,
    pub noindex: bool,
    pub nofollow: bool,
    /// (level, text) pairs in document order, levels 1-6.
    pub headings: Vec<(u8, String)>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    /// Byte length of the HTML body.
    pub html_bytes: usize,
    /// Stylesheets loaded in `<head>` without media gating.
    pub render_blocking_css: usize,
    /// External scripts without `async` or `defer`.
    pub render_blocking_js: usize,
    pub fetch_duration: Duration,
    /// Set when the fetch for this URL failed; such pages carry no parsed
    /// fields beyond url/status/headers.
    pub fetch_error: Option<FetchFailure>,
}

impl Page {
    pub fn new(url: String) -> Self {
        Self {
            url,
            final_url: None,
            status: 0,
            headers: HashMap::new(),
            title: None,
            meta_description: None,
            canonical: None,
            noindex: false,
            nofollow: false,
            headings: Vec::new(),
            links: Vec::new(),
            images: Vec::new(),
            html_bytes: 0,
            render_blocking_css: 0,
            render_blocking_js: 0,
            fetch_duration: Duration::from_secs(0),
            fetch_error: None,
        }
    }

    pub fn with_failure(url: String, failure: FetchFailure) -> Self {
        let status = match failure {
            FetchFailure::HttpStatus(code) => code,
            _ => 0,
        };
        let mut page = Self::new(url);
        page.status = status;
        page.fetch_error = Some(failure);
        page
    }

    /// 2xx/3xx pages count as successfully fetched.
    pub fn is_ok(&self) -> bool {
        self.fetch_error.is_none() && (200..400).contains(&self.status)
    }

    pub fn internal_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.internal)
    }

    pub fn h1_count(&self) -> usize {
        self.headings.iter().filter(|(level, _)| *level == 1).count()
    }
}
