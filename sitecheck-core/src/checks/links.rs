//! Broken internal link detection. Consults the full page set to resolve
//! whether each internal target actually fetched, not just the source page.

use super::CheckContext;
use crate::model::{Category, Issue, Severity};
use std::collections::BTreeMap;

pub fn evaluate(ctx: &CheckContext) -> Vec<Issue> {
    // target URL -> source URLs that link to it
    let mut broken: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for source in ctx.ok_pages() {
        for link in source.internal_links() {
            let Some(target) = ctx.pages.iter().find(|p| p.url == link.url) else {
                // Target never fetched (budget or scope); nothing to judge
                continue;
            };
            if !target.is_ok() {
                broken
                    .entry(target.url.clone())
                    .or_default()
                    .push(source.url.clone());
            }
        }
    }

    if broken.is_empty() {
        return Vec::new();
    }

    let mut affected = Vec::new();
    let mut lines = Vec::new();
    for (target, mut sources) in broken {
        sources.sort();
        sources.dedup();
        lines.push(format!("{} (linked from {})", target, sources.join(", ")));
        affected.push(target);
    }

    vec![Issue::new(
        Severity::Critical,
        Category::Links,
        "Broken internal links",
        format!(
            "{} internal link target(s) did not return a successful response: {}",
            affected.len(),
            lines.join("; ")
        ),
        "Fix or remove links to pages that return errors, or redirect them to a live URL.",
        affected,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_crawler::{FetchFailure, Link, Page};

    fn linked_page(url: &str, targets: &[&str]) -> Page {
        let mut p = Page::new(url.to_string());
        p.status = 200;
        p.links = targets
            .iter()
            .map(|t| Link {
                url: t.to_string(),
                internal: true,
            })
            .collect();
        p
    }

    fn ctx(pages: &[Page]) -> CheckContext<'_> {
        CheckContext {
            site: "https://example.com/",
            pages,
            robots_found: true,
            sitemap_found: true,
        }
    }

    #[test]
    fn broken_target_reported_once_with_source() {
        let pages = vec![
            linked_page("https://example.com/a", &["https://example.com/b"]),
            Page::with_failure("https://example.com/b".into(), FetchFailure::HttpStatus(404)),
        ];
        let issues = evaluate(&ctx(&pages));
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.affected_pages, vec!["https://example.com/b"]);
        assert!(issue.description.contains("linked from https://example.com/a"));
    }

    #[test]
    fn multiple_sources_collapse_into_one_issue() {
        let pages = vec![
            linked_page("https://example.com/a", &["https://example.com/dead"]),
            linked_page("https://example.com/b", &["https://example.com/dead"]),
            Page::with_failure(
                "https://example.com/dead".into(),
                FetchFailure::HttpStatus(500),
            ),
        ];
        let issues = evaluate(&ctx(&pages));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].affected_pages.len(), 1);
    }

    #[test]
    fn unfetched_targets_are_not_judged() {
        let pages = vec![linked_page(
            "https://example.com/a",
            &["https://example.com/never-visited"],
        )];
        assert!(evaluate(&ctx(&pages)).is_empty());
    }

    #[test]
    fn healthy_targets_produce_nothing() {
        let pages = vec![
            linked_page("https://example.com/a", &["https://example.com/b"]),
            linked_page("https://example.com/b", &[]),
        ];
        assert!(evaluate(&ctx(&pages)).is_empty());
    }
}
