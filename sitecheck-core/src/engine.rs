//! Runs the rule evaluators over a finished crawl and assembles the final
//! audit result. A misbehaving check is isolated: it is skipped and recorded,
//! never allowed to take the whole audit down.

use crate::checks::{Check, CheckContext};
use crate::model::{AuditResult, Issue};
use crate::score;
use sitecheck_crawler::CrawlOutcome;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AuditOutput {
    pub result: AuditResult,
    /// Names of checks that panicked and were excluded from the result.
    pub skipped_checks: Vec<String>,
}

pub fn audit(outcome: &CrawlOutcome) -> AuditOutput {
    let ctx = CheckContext {
        site: &outcome.site,
        pages: &outcome.pages,
        robots_found: outcome.robots_found,
        sitemap_found: outcome.sitemap_found,
    };

    let mut issues: Vec<Issue> = Vec::new();
    let mut skipped_checks = Vec::new();

    for check in Check::all() {
        match panic::catch_unwind(AssertUnwindSafe(|| check.evaluate(&ctx))) {
            Ok(found) => {
                debug!(check = check.name(), issues = found.len(), "check complete");
                issues.extend(found);
            }
            Err(_) => {
                warn!(check = check.name(), "check panicked, skipping its results");
                skipped_checks.push(check.name().to_string());
            }
        }
    }

    let pages_scanned = outcome.pages.iter().filter(|p| p.is_ok()).count();
    let result = score::build_result(outcome.site.clone(), pages_scanned, issues);

    AuditOutput {
        result,
        skipped_checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_crawler::Page;

    fn outcome_with(pages: Vec<Page>) -> CrawlOutcome {
        CrawlOutcome {
            site: "https://example.com/".to_string(),
            pages,
            skipped: Vec::new(),
            robots_found: true,
            sitemap_found: true,
            crawl_delay: None,
        }
    }

    fn healthy_page(url: &str) -> Page {
        let mut p = Page::new(url.to_string());
        p.status = 200;
        p.title = Some("A title that is exactly the right length for search".to_string());
        p.meta_description = Some("d".repeat(155));
        p.canonical = Some(url.to_string());
        p.headings.push((1, "Welcome".to_string()));
        p.headers
            .insert("strict-transport-security".into(), "max-age=63072000".into());
        p.headers
            .insert("content-security-policy".into(), "default-src 'self'".into());
        p.headers
            .insert("x-content-type-options".into(), "nosniff".into());
        p
    }

    #[test]
    fn clean_crawl_yields_full_score_and_no_skips() {
        let outcome = outcome_with(vec![healthy_page("https://example.com/")]);
        let output = audit(&outcome);
        assert!(output.skipped_checks.is_empty());
        assert_eq!(output.result.health_score, 100);
        assert_eq!(output.result.grade, "A");
        assert!(output.result.issues.is_empty());
    }

    #[test]
    fn failure_pages_are_not_counted_as_scanned() {
        let mut pages = vec![healthy_page("https://example.com/")];
        pages.push(Page::with_failure(
            "https://example.com/dead".into(),
            sitecheck_crawler::FetchFailure::HttpStatus(404),
        ));
        let output = audit(&outcome_with(pages));
        assert_eq!(output.result.pages_scanned, 1);
    }

    #[test]
    fn missing_description_reported_once_with_the_page_attached() {
        let mut page = healthy_page("https://example.com/");
        page.meta_description = None;
        let output = audit(&outcome_with(vec![page]));
        let desc_issues: Vec<_> = output
            .result
            .issues
            .iter()
            .filter(|i| i.title == "Missing meta description")
            .collect();
        assert_eq!(desc_issues.len(), 1);
        assert_eq!(desc_issues[0].affected_pages, vec!["https://example.com/"]);
    }

    #[test]
    fn issues_come_back_in_category_order() {
        let mut page = healthy_page("https://example.com/");
        page.meta_description = None;
        page.headers.remove("content-security-policy");
        let output = audit(&outcome_with(vec![page]));
        let ranks: Vec<u8> = output
            .result
            .issues
            .iter()
            .map(|i| i.category.rank())
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }
}
