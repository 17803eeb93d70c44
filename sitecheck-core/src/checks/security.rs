//! Passive security posture checks: transport security and the expected
//! response headers.

use super::CheckContext;
use crate::model::{Category, Issue, Severity};

pub fn evaluate(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    let is_https = ctx.site.starts_with("https://");
    if !is_https {
        issues.push(Issue::new(
            Severity::Critical,
            Category::Security,
            "Site not served over HTTPS",
            "The primary URL uses plain HTTP; traffic can be read or altered in transit.".to_string(),
            "Obtain a TLS certificate and redirect all HTTP traffic to HTTPS.",
            vec![ctx.site.to_string()],
        ));
    }

    let mut missing_hsts = Vec::new();
    let mut missing_csp = Vec::new();
    let mut missing_clickjacking = Vec::new();
    let mut missing_nosniff = Vec::new();

    for page in ctx.ok_pages() {
        let headers = &page.headers;
        if is_https && !headers.contains_key("strict-transport-security") {
            missing_hsts.push(page.url.clone());
        }
        if !headers.contains_key("content-security-policy") {
            missing_csp.push(page.url.clone());
            // X-Frame-Options is redundant when a CSP frame-ancestors
            // directive exists, so only count it alongside a missing CSP
            if !headers.contains_key("x-frame-options") {
                missing_clickjacking.push(page.url.clone());
            }
        }
        if !headers.contains_key("x-content-type-options") {
            missing_nosniff.push(page.url.clone());
        }
    }

    if !missing_hsts.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            Category::Security,
            "Missing Strict-Transport-Security header",
            format!("{} page(s) omit the HSTS header.", missing_hsts.len()),
            "Send Strict-Transport-Security so browsers refuse to downgrade to HTTP.",
            missing_hsts,
        ));
    }
    if !missing_clickjacking.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            Category::Security,
            "Missing clickjacking protection",
            format!(
                "{} page(s) send neither X-Frame-Options nor a Content-Security-Policy.",
                missing_clickjacking.len()
            ),
            "Add 'X-Frame-Options: SAMEORIGIN' or a CSP frame-ancestors directive.",
            missing_clickjacking,
        ));
    }
    if !missing_csp.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::Security,
            "Missing Content-Security-Policy header",
            format!("{} page(s) omit a Content-Security-Policy.", missing_csp.len()),
            "Define a CSP to limit where scripts and other resources may load from.",
            missing_csp,
        ));
    }
    if !missing_nosniff.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::Security,
            "Missing X-Content-Type-Options header",
            format!("{} page(s) omit X-Content-Type-Options.", missing_nosniff.len()),
            "Send 'X-Content-Type-Options: nosniff' to stop MIME sniffing.",
            missing_nosniff,
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitecheck_crawler::Page;

    fn page_with_headers(url: &str, headers: &[(&str, &str)]) -> Page {
        let mut p = Page::new(url.to_string());
        p.status = 200;
        for (k, v) in headers {
            p.headers.insert(k.to_string(), v.to_string());
        }
        p
    }

    fn ctx<'a>(site: &'a str, pages: &'a [Page]) -> CheckContext<'a> {
        CheckContext {
            site,
            pages,
            robots_found: true,
            sitemap_found: true,
        }
    }

    #[test]
    fn http_site_is_critical() {
        let pages = [page_with_headers("http://example.com/", &[])];
        let issues = evaluate(&ctx("http://example.com/", &pages));
        let https = issues
            .iter()
            .find(|i| i.title == "Site not served over HTTPS")
            .unwrap();
        assert_eq!(https.severity, Severity::Critical);
        // No HSTS complaint on a plain-HTTP site
        assert!(!issues.iter().any(|i| i.title.contains("Strict-Transport")));
    }

    #[test]
    fn fully_hardened_page_produces_nothing() {
        let pages = [page_with_headers(
            "https://example.com/",
            &[
                ("strict-transport-security", "max-age=63072000"),
                ("content-security-policy", "default-src 'self'"),
                ("x-content-type-options", "nosniff"),
            ],
        )];
        assert!(evaluate(&ctx("https://example.com/", &pages)).is_empty());
    }

    #[test]
    fn csp_counts_as_clickjacking_protection() {
        let pages = [page_with_headers(
            "https://example.com/",
            &[
                ("strict-transport-security", "max-age=63072000"),
                ("content-security-policy", "frame-ancestors 'none'"),
                ("x-content-type-options", "nosniff"),
            ],
        )];
        let issues = evaluate(&ctx("https://example.com/", &pages));
        assert!(!issues.iter().any(|i| i.title == "Missing clickjacking protection"));
    }

    #[test]
    fn bare_page_collects_all_header_issues() {
        let pages = [page_with_headers("https://example.com/", &[])];
        let issues = evaluate(&ctx("https://example.com/", &pages));
        let titles: Vec<_> = issues.iter().map(|i| i.title.as_str()).collect();
        assert!(titles.contains(&"Missing Strict-Transport-Security header"));
        assert!(titles.contains(&"Missing clickjacking protection"));
        assert!(titles.contains(&"Missing Content-Security-Policy header"));
        assert!(titles.contains(&"Missing X-Content-Type-Options header"));
    }
}
