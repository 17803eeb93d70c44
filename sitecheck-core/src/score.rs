//! Issue aggregation and the health score.

use crate::model::{AuditResult, Issue, SeverityCounts};
use std::collections::HashMap;

const CRITICAL_WEIGHT: u32 = 15;
const WARNING_WEIGHT: u32 = 5;
const INFO_WEIGHT: u32 = 1;

/// Collapse issues with the same (category, title) into one, merging their
/// affected pages, then order them for stable report output: category first,
/// then severity, then title.
pub fn dedupe_and_sort(issues: Vec<Issue>) -> Vec<Issue> {
    let mut merged: Vec<Issue> = Vec::new();
    let mut index: HashMap<(crate::model::Category, String), usize> = HashMap::new();

    for issue in issues {
        let key = (issue.category, issue.title.clone());
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                for page in issue.affected_pages {
                    if !existing.affected_pages.contains(&page) {
                        existing.affected_pages.push(page);
                    }
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(issue);
            }
        }
    }

    merged.sort_by(|a, b| {
        a.category
            .rank()
            .cmp(&b.category.rank())
            .then(a.severity.rank().cmp(&b.severity.rank()))
            .then(a.title.cmp(&b.title))
    });
    merged
}

/// 100 minus weighted deductions, floored at 0. A clean site scores 100.
pub fn health_score(counts: &SeverityCounts) -> u8 {
    let deduction = CRITICAL_WEIGHT * counts.critical as u32
        + WARNING_WEIGHT * counts.warning as u32
        + INFO_WEIGHT * counts.info as u32;
    100u32.saturating_sub(deduction) as u8
}

pub fn letter_grade(score: u8) -> &'static str {
    match score {
        90..=100 => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "F",
    }
}

pub fn build_result(site: String, pages_scanned: usize, issues: Vec<Issue>) -> AuditResult {
    let issues = dedupe_and_sort(issues);
    let summary = SeverityCounts::tally(&issues);
    let score = health_score(&summary);
    AuditResult {
        site,
        pages_scanned,
        issues,
        health_score: score,
        grade: letter_grade(score).to_string(),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Severity};

    fn issue(severity: Severity, category: Category, title: &str, pages: &[&str]) -> Issue {
        Issue::new(
            severity,
            category,
            title,
            "",
            "",
            pages.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn same_key_merges_affected_pages_without_duplicates() {
        let issues = vec![
            issue(Severity::Warning, Category::MetaTags, "Missing title", &["/a", "/b"]),
            issue(Severity::Warning, Category::MetaTags, "Missing title", &["/b", "/c"]),
        ];
        let merged = dedupe_and_sort(issues);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].affected_pages, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn same_title_in_different_categories_stays_separate() {
        let issues = vec![
            issue(Severity::Info, Category::MetaTags, "Missing", &["/a"]),
            issue(Severity::Info, Category::Security, "Missing", &["/a"]),
        ];
        assert_eq!(dedupe_and_sort(issues).len(), 2);
    }

    #[test]
    fn sorted_by_category_then_severity() {
        let issues = vec![
            issue(Severity::Info, Category::Security, "z", &[]),
            issue(Severity::Critical, Category::Links, "a", &[]),
            issue(Severity::Info, Category::Links, "b", &[]),
        ];
        let sorted = dedupe_and_sort(issues);
        assert_eq!(sorted[0].category, Category::Links);
        assert_eq!(sorted[0].severity, Severity::Critical);
        assert_eq!(sorted[1].title, "b");
        assert_eq!(sorted[2].category, Category::Security);
    }

    #[test]
    fn clean_site_scores_100() {
        assert_eq!(health_score(&SeverityCounts::default()), 100);
    }

    #[test]
    fn weighted_deductions() {
        let counts = SeverityCounts {
            critical: 2,
            warning: 3,
            info: 4,
        };
        // 100 - (2*15 + 3*5 + 4*1) = 51
        assert_eq!(health_score(&counts), 51);
    }

    #[test]
    fn score_never_goes_below_zero() {
        let counts = SeverityCounts {
            critical: 20,
            warning: 0,
            info: 0,
        };
        assert_eq!(health_score(&counts), 0);
    }

    #[test]
    fn grade_bands() {
        assert_eq!(letter_grade(100), "A");
        assert_eq!(letter_grade(90), "A");
        assert_eq!(letter_grade(89), "B");
        assert_eq!(letter_grade(70), "C");
        assert_eq!(letter_grade(65), "D");
        assert_eq!(letter_grade(59), "F");
        assert_eq!(letter_grade(0), "F");
    }

    #[test]
    fn more_issues_never_raise_the_score() {
        let fewer = SeverityCounts { critical: 0, warning: 1, info: 1 };
        let more = SeverityCounts { critical: 0, warning: 2, info: 1 };
        assert!(health_score(&more) <= health_score(&fewer));
    }
}
