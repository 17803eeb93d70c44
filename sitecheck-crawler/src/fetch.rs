use crate::error::{CrawlError, Result};
use crate::page::FetchFailure;
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

const REDIRECT_LIMIT: usize = 5;

/// A successful (2xx/3xx) response, body already read.
#[derive(Debug)]
pub struct FetchedResponse {
    pub status: u16,
    /// Header map with lowercased keys.
    pub headers: HashMap<String, String>,
    pub body: String,
    /// URL the request ended up at after redirects.
    pub final_url: String,
    pub elapsed: Duration,
}

/// Outcome of one bounded GET. Never retried; a failure is terminal for the
/// URL within the run.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(FetchedResponse),
    Failure(FetchFailure),
}

/// Performs single bounded GETs with distinct connect and overall timeouts.
/// Connection setup fails fast while slow-but-connected servers get the full
/// request timeout.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(user_agent: &str, connect_timeout: Duration, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_LIMIT))
            .build()
            .map_err(CrawlError::HttpError)?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!("Fetching {}", url);
        let start = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::Failure(classify_error(&e)),
        };

        let status = response.status().as_u16();
        if status >= 400 {
            return FetchOutcome::Failure(FetchFailure::HttpStatus(status));
        }

        let final_url = response.url().to_string();
        let headers = header_map(&response);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::Failure(classify_error(&e)),
        };

        FetchOutcome::Success(FetchedResponse {
            status,
            headers,
            body,
            final_url,
            elapsed: start.elapsed(),
        })
    }
}

fn classify_error(e: &reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Connect
    } else {
        FetchFailure::Other(e.to_string())
    }
}

fn header_map(response: &reqwest::Response) -> HashMap<String, String> {
    response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}
