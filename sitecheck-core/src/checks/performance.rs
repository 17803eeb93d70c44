//! Page weight and render-blocking resource rules.

use super::CheckContext;
use crate::model::{Category, Issue, Severity};

const HTML_WARN_BYTES: usize = 200 * 1024;
const HTML_CRITICAL_BYTES: usize = 500 * 1024;
const RENDER_BLOCKING_LIMIT: usize = 4;

fn kib(bytes: usize) -> usize {
    bytes / 1024
}

pub fn evaluate(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut very_large: Vec<(String, usize)> = Vec::new();
    let mut large: Vec<(String, usize)> = Vec::new();
    let mut blocking: Vec<(String, usize, usize)> = Vec::new();

    for page in ctx.ok_pages() {
        if page.html_bytes > HTML_CRITICAL_BYTES {
            very_large.push((page.url.clone(), page.html_bytes));
        } else if page.html_bytes > HTML_WARN_BYTES {
            large.push((page.url.clone(), page.html_bytes));
        }
        let total = page.render_blocking_css + page.render_blocking_js;
        if total > RENDER_BLOCKING_LIMIT {
            blocking.push((page.url.clone(), page.render_blocking_css, page.render_blocking_js));
        }
    }

    if !very_large.is_empty() {
        let detail = very_large
            .iter()
            .map(|(url, bytes)| format!("{} ({} KiB)", url, kib(*bytes)))
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(Issue::new(
            Severity::Critical,
            Category::Performance,
            "Very large HTML document",
            format!("HTML exceeds {} KiB: {}", kib(HTML_CRITICAL_BYTES), detail),
            "Trim inline assets and markup; pages this heavy hurt both crawl budget and load time.",
            very_large.into_iter().map(|(url, _)| url).collect(),
        ));
    }
    if !large.is_empty() {
        let detail = large
            .iter()
            .map(|(url, bytes)| format!("{} ({} KiB)", url, kib(*bytes)))
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(Issue::new(
            Severity::Warning,
            Category::Performance,
            "Large HTML document",
            format!("HTML exceeds {} KiB: {}", kib(HTML_WARN_BYTES), detail),
            "Reduce page weight by moving inline styles and scripts into cacheable assets.",
            large.into_iter().map(|(url, _)| url).collect(),
        ));
    }
    if !blocking.is_empty() {
        let detail = blocking
            .iter()
            .map(|(url, css, js)| format!("{} ({} css, {} js)", url, css, js))
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(Issue::new(
            Severity::Warning,
            Category::Performance,
            "Too many render-blocking resources",
            format!(
                "More than {} render-blocking stylesheets/scripts: {}",
                RENDER_BLOCKING_LIMIT, detail
            ),
            "Defer non-critical scripts and inline or media-gate critical CSS.",
            blocking.into_iter().map(|(url, _, _)| url).collect(),
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_crawler::Page;

    fn page(url: &str, bytes: usize, css: usize, js: usize) -> Page {
        let mut p = Page::new(url.to_string());
        p.status = 200;
        p.html_bytes = bytes;
        p.render_blocking_css = css;
        p.render_blocking_js = js;
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
    fn measured_value_appears_in_description() {
        let pages = [page("https://example.com/big", 600 * 1024, 0, 0)];
        let issues = evaluate(&ctx(&pages));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].description.contains("600 KiB"));
    }

    #[test]
    fn thresholds_split_warning_from_critical() {
        let pages = [
            page("https://example.com/big", 300 * 1024, 0, 0),
            page("https://example.com/huge", 900 * 1024, 0, 0),
            page("https://example.com/fine", 50 * 1024, 0, 0),
        ];
        let issues = evaluate(&ctx(&pages));
        assert_eq!(issues.len(), 2);
        let critical = issues.iter().find(|i| i.severity == Severity::Critical).unwrap();
        assert_eq!(critical.affected_pages, vec!["https://example.com/huge"]);
        let warning = issues.iter().find(|i| i.severity == Severity::Warning).unwrap();
        assert_eq!(warning.affected_pages, vec!["https://example.com/big"]);
    }

    #[test]
    fn render_blocking_over_limit_flagged_with_counts() {
        let pages = [page("https://example.com/", 1024, 3, 2)];
        let issues = evaluate(&ctx(&pages));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("3 css, 2 js"));
    }

    #[test]
    fn at_limit_is_fine() {
        let pages = [page("https://example.com/", 1024, 2, 2)];
        assert!(evaluate(&ctx(&pages)).is_empty());
    }
}
