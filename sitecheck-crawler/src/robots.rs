//! robots.txt retrieval and policy evaluation.
//!
//! The policy is fetched once per crawl with a short timeout and fails open:
//! a missing, unreachable or malformed robots.txt yields an allow-all policy
//! so one inaccessible file never blocks the whole crawl.

use crate::fetch::{FetchOutcome, Fetcher};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cap on declared crawl-delays, the common crawler convention. Also keeps
/// absurd values representable as a Duration.
const MAX_CRAWL_DELAY_SECS: f64 = 60.0;

#[derive(Debug, Clone)]
struct Rule {
    allow: bool,
    path: String,
}

#[derive(Debug, Clone, Default)]
struct Group {
    agents: Vec<String>,
    rules: Vec<Rule>,
    crawl_delay: Option<f64>,
}

/// Allow/deny and crawl-delay policy for one domain.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// False when robots.txt was absent or unreadable (allow-all fallback).
    found: bool,
    groups: Vec<Group>,
    sitemaps: Vec<String>,
    user_agent_token: String,
}

impl RobotsPolicy {
    /// Allow-all policy used when robots.txt cannot be retrieved.
    pub fn allow_all(user_agent_token: &str) -> Self {
        Self {
            found: false,
            groups: Vec::new(),
            sitemaps: Vec::new(),
            user_agent_token: user_agent_token.to_ascii_lowercase(),
        }
    }

    /// Fetch `{site_root}/robots.txt` and parse it. Any failure falls back
    /// to allow-all.
    pub async fn fetch(fetcher: &Fetcher, site_root: &str, user_agent_token: &str) -> Self {
        let robots_url = format!("{}/robots.txt", site_root.trim_end_matches('/'));
        match fetcher.fetch(&robots_url).await {
            FetchOutcome::Success(resp) => {
                info!("Parsed robots.txt from {}", robots_url);
                Self::parse(&resp.body, user_agent_token)
            }
            FetchOutcome::Failure(f) => {
                info!("No usable robots.txt at {} ({}), allowing all", robots_url, f);
                Self::allow_all(user_agent_token)
            }
        }
    }

    pub fn parse(content: &str, user_agent_token: &str) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut sitemaps = Vec::new();
        let mut current = Group::default();
        let mut in_agent_run = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim().to_ascii_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    // Consecutive user-agent lines share one group; a new
                    // run after rules starts a fresh group.
                    if !in_agent_run && !(current.agents.is_empty() && current.rules.is_empty()) {
                        groups.push(std::mem::take(&mut current));
                    }
                    current.agents.push(value.to_ascii_lowercase());
                    in_agent_run = true;
                }
                "allow" | "disallow" => {
                    in_agent_run = false;
                    if !value.is_empty() {
                        current.rules.push(Rule {
                            allow: field == "allow",
                            path: value.to_string(),
                        });
                    }
                }
                "crawl-delay" => {
                    in_agent_run = false;
                    match value.parse::<f64>() {
                        Ok(delay) if delay.is_finite() && delay >= 0.0 => {
                            current.crawl_delay = Some(delay.min(MAX_CRAWL_DELAY_SECS));
                        }
                        _ => warn!("Ignoring unusable crawl-delay value: {}", value),
                    }
                }
                "sitemap" => sitemaps.push(value.to_string()),
                _ => {}
            }
        }
        if !(current.agents.is_empty() && current.rules.is_empty()) {
            groups.push(current);
        }

        Self {
            found: true,
            groups,
            sitemaps,
            user_agent_token: user_agent_token.to_ascii_lowercase(),
        }
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Whether a path may be fetched. Longest matching rule wins; Allow wins
    /// a tie, per the common interpretation of the robots exclusion protocol.
    pub fn is_allowed(&self, path: &str) -> bool {
        let Some(group) = self.matching_group() else {
            return true;
        };

        let mut best: Option<&Rule> = None;
        for rule in &group.rules {
            if path.starts_with(rule.path.as_str()) {
                let better = match best {
                    None => true,
                    Some(b) => {
                        rule.path.len() > b.path.len()
                            || (rule.path.len() == b.path.len() && rule.allow && !b.allow)
                    }
                };
                if better {
                    best = Some(rule);
                }
            }
        }
        match best {
            Some(rule) => {
                if !rule.allow {
                    debug!("robots.txt denies {} (rule {})", path, rule.path);
                }
                rule.allow
            }
            None => true,
        }
    }

    /// Crawl-delay for our user agent, if the matched group declares one.
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.matching_group()
            .and_then(|g| g.crawl_delay)
            .map(Duration::from_secs_f64)
    }

    /// The group addressed to our user agent, falling back to `*`.
    fn matching_group(&self) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| {
                g.agents
                    .iter()
                    .any(|a| a != "*" && self.user_agent_token.contains(a.as_str()))
            })
            .or_else(|| {
                self.groups
                    .iter()
                    .find(|g| g.agents.iter().any(|a| a == "*"))
            })
    }
}
