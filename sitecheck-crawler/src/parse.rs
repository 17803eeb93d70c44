//! Best-effort HTML extraction into a [`Page`] record. Malformed markup
//! never fails past this boundary; missing fields stay `None`.

use crate::fetch::FetchedResponse;
use crate::page::{Image, Link, Page};
use crate::urls::{resolve_href, same_host};
use scraper::{Html, Selector};

fn sel(css: &str) -> Selector {
    // Selectors are compile-time constants in this module; a parse failure
    // is a programming error, not input-dependent.
    Selector::parse(css).expect("static selector")
}

/// Build a [`Page`] from a successful fetch. `seed_host` classifies links
/// as internal or external.
pub fn parse_page(url: &str, seed_host: &str, resp: FetchedResponse) -> Page {
    let mut page = Page::new(url.to_string());
    page.status = resp.status;
    page.html_bytes = resp.body.len();
    page.fetch_duration = resp.elapsed;
    if resp.final_url != url {
        page.final_url = Some(resp.final_url.clone());
    }
    page.headers = resp.headers;

    let is_html = page
        .headers
        .get("content-type")
        .map(|ct| ct.contains("text/html"))
        .unwrap_or(true);
    if !is_html {
        return page;
    }

    let document = Html::parse_document(&resp.body);
    let base = resp.final_url.as_str();

    if let Some(title) = document.select(&sel("title")).next() {
        let text = title.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            page.title = Some(text);
        }
    }

    extract_meta(&document, &mut page);
    extract_canonical(&document, &mut page);
    extract_headings(&document, &mut page);
    extract_links(&document, base, seed_host, &mut page);
    extract_images(&document, &mut page);
    extract_render_blocking(&document, &mut page);

    page
}

fn extract_meta(document: &Html, page: &mut Page) {
    for meta in document.select(&sel("meta")) {
        let Some(name) = meta.value().attr("name") else {
            continue;
        };
        let content = meta.value().attr("content").unwrap_or("").trim();
        match name.to_ascii_lowercase().as_str() {
            "description" => {
                if !content.is_empty() && page.meta_description.is_none() {
                    page.meta_description = Some(content.to_string());
                }
            }
            "robots" => {
                let directives = content.to_ascii_lowercase();
                if directives.contains("noindex") || directives.contains("none") {
                    page.noindex = true;
                }
                if directives.contains("nofollow") || directives.contains("none") {
                    page.nofollow = true;
                }
            }
            _ => {}
        }
    }
}

fn extract_canonical(document: &Html, page: &mut Page) {
    for link in document.select(&sel("link")) {
        if let Some(rel) = link.value().attr("rel")
            && rel.to_ascii_lowercase().split_whitespace().any(|r| r == "canonical")
            && let Some(href) = link.value().attr("href")
        {
            let href = href.trim();
            if !href.is_empty() {
                page.canonical = Some(href.to_string());
                return;
            }
        }
    }
}

fn extract_headings(document: &Html, page: &mut Page) {
    for level in 1..=6u8 {
        let selector = sel(&format!("h{}", level));
        for heading in document.select(&selector) {
            let text = heading.text().collect::<String>().trim().to_string();
            page.headings.push((level, text));
        }
    }
}

fn extract_links(document: &Html, base: &str, seed_host: &str, page: &mut Page) {
    for anchor in document.select(&sel("a[href]")) {
        if let Some(href) = anchor.value().attr("href")
            && let Some(url) = resolve_href(base, href)
        {
            let internal = same_host(&url, seed_host);
            page.links.push(Link { url, internal });
        }
    }
}

fn extract_images(document: &Html, page: &mut Page) {
    for img in document.select(&sel("img")) {
        page.images.push(Image {
            src: img.value().attr("src").map(|s| s.to_string()),
            alt: img.value().attr("alt").map(|s| s.to_string()),
        });
    }
}

fn extract_render_blocking(document: &Html, page: &mut Page) {
    for link in document.select(&sel("link[rel=\"stylesheet\"]")) {
        let media = link.value().attr("media").unwrap_or("all");
        if !media.contains("print") {
            page.render_blocking_css += 1;
        }
    }
    for script in document.select(&sel("script[src]")) {
        let v = script.value();
        if v.attr("async").is_none() && v.attr("defer").is_none() {
            page.render_blocking_js += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn response(body: &str) -> FetchedResponse {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html".to_string());
        FetchedResponse {
            status: 200,
            headers,
            body: body.to_string(),
            final_url: "https://example.com/".to_string(),
            elapsed: Duration::from_millis(5),
        }
    }

    fn parse(body: &str) -> Page {
        parse_page("https://example.com/", "example.com", response(body))
    }

    #[test]
    fn extracts_title_description_and_canonical() {
        let page = parse(
            r#"<html><head>
                <title> Home </title>
                <meta name="description" content="A fine site">
                <link rel="canonical" href="https://example.com/">
            </head><body></body></html>"#,
        );
        assert_eq!(page.title.as_deref(), Some("Home"));
        assert_eq!(page.meta_description.as_deref(), Some("A fine site"));
        assert_eq!(page.canonical.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn empty_title_is_missing() {
        let page = parse("<html><head><title>  </title></head><body></body></html>");
        assert!(page.title.is_none());
    }

    #[test]
    fn robots_meta_flags() {
        let page = parse(r#"<head><meta name="ROBOTS" content="noindex, nofollow"></head>"#);
        assert!(page.noindex);
        assert!(page.nofollow);
    }

    #[test]
    fn robots_none_implies_both() {
        let page = parse(r#"<head><meta name="robots" content="none"></head>"#);
        assert!(page.noindex);
        assert!(page.nofollow);
    }

    #[test]
    fn links_classified_by_host() {
        let page = parse(
            r##"<body>
                <a href="/about">About</a>
                <a href="https://other.org/x">Out</a>
                <a href="#section">Skip</a>
                <a href="javascript:void(0)">Skip</a>
            </body>"##,
        );
        assert_eq!(page.links.len(), 2);
        assert!(page.links[0].internal);
        assert_eq!(page.links[0].url, "https://example.com/about");
        assert!(!page.links[1].internal);
    }

    #[test]
    fn headings_keep_level_and_order() {
        let page = parse("<body><h1>One</h1><h2>Two</h2><h2>Three</h2></body>");
        assert_eq!(page.h1_count(), 1);
        assert_eq!(
            page.headings,
            vec![
                (1, "One".to_string()),
                (2, "Two".to_string()),
                (2, "Three".to_string())
            ]
        );
    }

    #[test]
    fn images_with_and_without_alt() {
        let page = parse(r#"<body><img src="/a.png" alt="A"><img src="/b.png"></body>"#);
        assert_eq!(page.images.len(), 2);
        assert_eq!(page.images[0].alt.as_deref(), Some("A"));
        assert!(page.images[1].alt.is_none());
    }

    #[test]
    fn render_blocking_resources_counted() {
        let page = parse(
            r#"<head>
                <link rel="stylesheet" href="/main.css">
                <link rel="stylesheet" href="/print.css" media="print">
                <script src="/app.js"></script>
                <script src="/later.js" defer></script>
            </head>"#,
        );
        assert_eq!(page.render_blocking_css, 1);
        assert_eq!(page.render_blocking_js, 1);
    }

    #[test]
    fn malformed_markup_still_yields_a_page() {
        let page = parse("<html><head><title>Broken</title><body><div><p><a href='/x'>x");
        assert_eq!(page.title.as_deref(), Some("Broken"));
        assert_eq!(page.links.len(), 1);
    }

    #[test]
    fn non_html_body_not_parsed() {
        let mut resp = response("{\"not\": \"html\"}");
        resp.headers
            .insert("content-type".to_string(), "application/json".to_string());
        let page = parse_page("https://example.com/api", "example.com", resp);
        assert!(page.title.is_none());
        assert!(page.links.is_empty());
        assert_eq!(page.html_bytes, 15);
    }
}
