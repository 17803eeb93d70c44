use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Sort rank, most severe first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    MetaTags,
    Links,
    Indexability,
    Performance,
    Duplicates,
    Security,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MetaTags => "meta-tags",
            Category::Links => "links",
            Category::Indexability => "indexability",
            Category::Performance => "performance",
            Category::Duplicates => "duplicates",
            Category::Security => "security",
        }
    }

    /// Fixed output ordering for reports.
    pub fn rank(&self) -> u8 {
        match self {
            Category::MetaTags => 0,
            Category::Links => 1,
            Category::Indexability => 2,
            Category::Performance => 3,
            Category::Duplicates => 4,
            Category::Security => 5,
        }
    }
}

/// One deduplicated finding. Evaluators emit at most one Issue per
/// (category, title) pair; pages it applies to are accumulated in
/// `affected_pages`, never duplicated into more Issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub affected_pages: Vec<String>,
}

impl Issue {
    pub fn new(
        severity: Severity,
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
        affected_pages: Vec<String>,
    ) -> Self {
        Self {
            severity,
            category,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            affected_pages,
        }
    }

    /// Merge key: evaluators producing the same finding are collapsed.
    pub fn key(&self) -> (Category, &str) {
        (self.category, self.title.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn tally(issues: &[Issue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }
}

/// The single contract downstream collaborators (report renderers, the AI
/// explanation layer) depend on. Read-only once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub site: String,
    pub pages_scanned: usize,
    pub issues: Vec<Issue>,
    /// 0-100, higher is healthier.
    pub health_score: u8,
    pub grade: String,
    pub summary: SeverityCounts,
}
