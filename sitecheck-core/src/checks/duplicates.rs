//! Cross-page duplicate detection: pages sharing an identical non-empty
//! title or description are grouped, one Issue per duplicate group.

use super::CheckContext;
use crate::model::{Category, Issue, Severity};
use std::collections::BTreeMap;

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}…", cut)
    }
}

pub fn evaluate(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut by_title: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut by_desc: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for page in ctx.ok_pages() {
        if let Some(title) = &page.title {
            let key = title.trim().to_lowercase();
            if !key.is_empty() {
                by_title.entry(key).or_default().push(page.url.clone());
            }
        }
        if let Some(desc) = &page.meta_description {
            let key = desc.trim().to_lowercase();
            if !key.is_empty() {
                by_desc.entry(key).or_default().push(page.url.clone());
            }
        }
    }

    for (title, urls) in by_title {
        if urls.len() > 1 {
            issues.push(Issue::new(
                Severity::Warning,
                Category::Duplicates,
                format!("Duplicate title: \"{}\"", truncate(&title, 60)),
                format!("{} pages share this exact title.", urls.len()),
                "Write a unique title for each page so search results can distinguish them.",
                urls,
            ));
        }
    }
    for (desc, urls) in by_desc {
        if urls.len() > 1 {
            issues.push(Issue::new(
                Severity::Warning,
                Category::Duplicates,
                format!("Duplicate meta description: \"{}\"", truncate(&desc, 80)),
                format!("{} pages share this exact meta description.", urls.len()),
                "Write a distinct meta description per page.",
                urls,
            ));
        }
    }

    issues
}
