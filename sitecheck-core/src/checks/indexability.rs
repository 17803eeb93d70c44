//! Indexability signals: robots meta conflicts, missing canonicals, and the
//! site-level robots.txt/sitemap presence checks.

use super::CheckContext;
use crate::model::{Category, Issue, Severity};
use sitecheck_crawler::urls::normalize_url;

pub fn evaluate(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut conflicting = Vec::new();
    let mut noindexed = Vec::new();
    let mut missing_canonical = Vec::new();

    for page in ctx.ok_pages() {
        if page.noindex {
            noindexed.push(page.url.clone());
            // noindex plus a canonical pointing at another URL sends search
            // engines contradictory instructions
            if let Some(canonical) = &page.canonical
                && let Some(canonical) = normalize_url(canonical)
                && canonical != page.url
            {
                conflicting.push(page.url.clone());
            }
        }
        if page.canonical.is_none() {
            missing_canonical.push(page.url.clone());
        }
    }

    if !conflicting.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            Category::Indexability,
            "Conflicting indexability signals",
            format!(
                "{} page(s) are marked noindex while declaring a canonical URL elsewhere.",
                conflicting.len()
            ),
            "Pick one signal: drop the noindex directive or point the canonical at the page itself.",
            conflicting,
        ));
    }
    if !noindexed.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::Indexability,
            "Pages excluded by noindex",
            format!("{} page(s) carry a noindex robots directive.", noindexed.len()),
            "Confirm these pages are intentionally hidden from search engines.",
            noindexed,
        ));
    }
    if !missing_canonical.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::Indexability,
            "Missing canonical link",
            format!(
                "{} page(s) declare no <link rel=\"canonical\">.",
                missing_canonical.len()
            ),
            "Add a self-referencing canonical link to guard against duplicate-URL indexing.",
            missing_canonical,
        ));
    }

    // Site-level signals, attributed to the domain root rather than any page
    let root = ctx.site.trim_end_matches('/');
    if !ctx.robots_found {
        issues.push(Issue::new(
            Severity::Info,
            Category::Indexability,
            "robots.txt not found",
            "The site has no robots.txt; crawlers receive no crawl guidance.".to_string(),
            "Serve a robots.txt at the domain root, even a permissive one.",
            vec![format!("{}/robots.txt", root)],
        ));
    }
    if !ctx.sitemap_found {
        issues.push(Issue::new(
            Severity::Info,
            Category::Indexability,
            "XML sitemap not found",
            "No sitemap was advertised in robots.txt or found at /sitemap.xml.".to_string(),
            "Publish an XML sitemap and reference it from robots.txt.",
            vec![format!("{}/sitemap.xml", root)],
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_crawler::Page;

    fn page(url: &str) -> Page {
        let mut p = Page::new(url.to_string());
        p.status = 200;
        p.canonical = Some(url.to_string());
        p
    }

    fn ctx<'a>(pages: &'a [Page], robots: bool, sitemap: bool) -> CheckContext<'a> {
        CheckContext {
            site: "https://example.com/",
            pages,
            robots_found: robots,
            sitemap_found: sitemap,
        }
    }

    #[test]
    fn noindex_with_foreign_canonical_is_a_conflict() {
        let mut p = page("https://example.com/a");
        p.noindex = true;
        p.canonical = Some("https://example.com/other".to_string());
        let pages = [p];
        let issues = evaluate(&ctx(&pages, true, true));
        let conflict = issues
            .iter()
            .find(|i| i.title == "Conflicting indexability signals")
            .unwrap();
        assert_eq!(conflict.affected_pages, vec!["https://example.com/a"]);
    }

    #[test]
    fn self_canonical_with_noindex_is_not_a_conflict() {
        let mut p = page("https://example.com/a");
        p.noindex = true;
        let pages = [p];
        let issues = evaluate(&ctx(&pages, true, true));
        assert!(!issues.iter().any(|i| i.title == "Conflicting indexability signals"));
        assert!(issues.iter().any(|i| i.title == "Pages excluded by noindex"));
    }

    #[test]
    fn missing_robots_and_sitemap_are_site_level() {
        let pages = [page("https://example.com/")];
        let issues = evaluate(&ctx(&pages, false, false));
        let robots = issues.iter().find(|i| i.title == "robots.txt not found").unwrap();
        assert_eq!(robots.affected_pages, vec!["https://example.com/robots.txt"]);
        let sitemap = issues.iter().find(|i| i.title == "XML sitemap not found").unwrap();
        assert_eq!(sitemap.affected_pages, vec!["https://example.com/sitemap.xml"]);
    }
}
