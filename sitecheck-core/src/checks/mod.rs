//! Rule evaluators. Each check is a pure function from the crawl context to
//! a sequence of Issues; checks are independent and register here without
//! the orchestration layer knowing about individual rules.

pub mod duplicates;
pub mod indexability;
pub mod links;
pub mod meta;
pub mod performance;
pub mod security;

use crate::model::Issue;
use sitecheck_crawler::Page;

/// Everything a check may look at. Pages are the full crawl set, including
/// failure records, so cross-page checks can resolve link targets.
pub struct CheckContext<'a> {
    pub site: &'a str,
    pub pages: &'a [Page],
    pub robots_found: bool,
    pub sitemap_found: bool,
}

impl CheckContext<'_> {
    /// Pages that fetched successfully and carry parsed fields.
    pub fn ok_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.is_ok())
    }
}

/// Registry of rule evaluators, one variant per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    MetaTags,
    Links,
    Indexability,
    Performance,
    Duplicates,
    Security,
}

impl Check {
    pub fn all() -> &'static [Check] {
        &[
            Check::MetaTags,
            Check::Links,
            Check::Indexability,
            Check::Performance,
            Check::Duplicates,
            Check::Security,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Check::MetaTags => "meta-tags",
            Check::Links => "links",
            Check::Indexability => "indexability",
            Check::Performance => "performance",
            Check::Duplicates => "duplicates",
            Check::Security => "security",
        }
    }

    pub fn evaluate(&self, ctx: &CheckContext) -> Vec<Issue> {
        match self {
            Check::MetaTags => meta::evaluate(ctx),
            Check::Links => links::evaluate(ctx),
            Check::Indexability => indexability::evaluate(ctx),
            Check::Performance => performance::evaluate(ctx),
            Check::Duplicates => duplicates::evaluate(ctx),
            Check::Security => security::evaluate(ctx),
        }
    }
}
