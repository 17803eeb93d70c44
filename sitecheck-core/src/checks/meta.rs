//! Title, meta description, heading, and image alt-text rules.

use super::CheckContext;
use crate::model::{Category, Issue, Severity};

const TITLE_MIN: usize = 50;
const TITLE_MAX: usize = 60;
const DESC_MIN: usize = 150;
const DESC_MAX: usize = 160;

pub fn evaluate(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut missing_title = Vec::new();
    let mut title_off_band = Vec::new();
    let mut missing_desc = Vec::new();
    let mut desc_off_band = Vec::new();
    let mut missing_h1 = Vec::new();
    let mut multiple_h1 = Vec::new();
    let mut missing_alt = Vec::new();

    for page in ctx.ok_pages() {
        match page.h1_count() {
            0 => missing_h1.push(page.url.clone()),
            1 => {}
            _ => multiple_h1.push(page.url.clone()),
        }
        if page
            .images
            .iter()
            .any(|img| img.alt.as_deref().is_none_or(|alt| alt.trim().is_empty()))
        {
            missing_alt.push(page.url.clone());
        }
        match &page.title {
            None => missing_title.push(page.url.clone()),
            Some(title) => {
                let len = title.chars().count();
                if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
                    title_off_band.push(page.url.clone());
                }
            }
        }
        match &page.meta_description {
            None => missing_desc.push(page.url.clone()),
            Some(desc) => {
                let len = desc.chars().count();
                if !(DESC_MIN..=DESC_MAX).contains(&len) {
                    desc_off_band.push(page.url.clone());
                }
            }
        }
    }

    if !missing_title.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            Category::MetaTags,
            "Missing title tag",
            format!("{} page(s) have no <title> or an empty one.", missing_title.len()),
            "Give every page a unique, descriptive title of roughly 50-60 characters.",
            missing_title,
        ));
    }
    if !title_off_band.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::MetaTags,
            "Title length outside recommended range",
            format!(
                "{} page(s) have a title shorter than {} or longer than {} characters.",
                title_off_band.len(),
                TITLE_MIN,
                TITLE_MAX
            ),
            "Aim for titles between 50 and 60 characters so they display fully in search results.",
            title_off_band,
        ));
    }
    if !missing_desc.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            Category::MetaTags,
            "Missing meta description",
            format!(
                "{} page(s) have no <meta name=\"description\"> or an empty one.",
                missing_desc.len()
            ),
            "Add a meta description of roughly 150-160 characters summarizing the page.",
            missing_desc,
        ));
    }
    if !desc_off_band.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::MetaTags,
            "Meta description length outside recommended range",
            format!(
                "{} page(s) have a description shorter than {} or longer than {} characters.",
                desc_off_band.len(),
                DESC_MIN,
                DESC_MAX
            ),
            "Aim for descriptions between 150 and 160 characters.",
            desc_off_band,
        ));
    }
    if !missing_h1.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            Category::MetaTags,
            "Missing H1 heading",
            format!("{} page(s) have no <h1>.", missing_h1.len()),
            "Give every page one H1 that states its topic.",
            missing_h1,
        ));
    }
    if !multiple_h1.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::MetaTags,
            "Multiple H1 headings",
            format!("{} page(s) have more than one <h1>.", multiple_h1.len()),
            "Use a single H1 per page and demote the rest to H2.",
            multiple_h1,
        ));
    }
    if !missing_alt.is_empty() {
        issues.push(Issue::new(
            Severity::Info,
            Category::MetaTags,
            "Images missing alt text",
            format!(
                "{} page(s) contain images without alt attributes.",
                missing_alt.len()
            ),
            "Describe each meaningful image in its alt attribute; use alt=\"\" for decoration.",
            missing_alt,
        ));
    }

    issues
}
