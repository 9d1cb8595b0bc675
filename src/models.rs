use serde::{Deserialize, Serialize};

/// A configured page to audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTarget {
    pub name: String,
    pub url: String,
}

/// Findings for a single page in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seo_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub broken_links: Vec<BrokenLink>,
}

impl AuditResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn has_findings(&self) -> bool {
        !self.seo_issues.is_empty() || !self.broken_links.is_empty()
    }
}

/// A link that returned an error status or could not be reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub url: String,
    pub status: String,
}

/// One page's entry in the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    pub name: String,
    #[serde(flatten)]
    pub result: AuditResult,
}

/// Results of one audit pass, in configuration order.
///
/// Only pages with findings are ever inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub pages: Vec<PageReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page result, dropping it if it has no findings.
    /// Returns whether the result was kept.
    pub fn insert(&mut self, name: impl Into<String>, result: AuditResult) -> bool {
        if !result.has_findings() {
            return false;
        }
        self.pages.push(PageReport {
            name: name.into(),
            result,
        });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn get(&self, name: &str) -> Option<&AuditResult> {
        self.pages
            .iter()
            .find(|page| page.name == name)
            .map(|page| &page.result)
    }
}

/// A ticket to be submitted to the issue tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTicket {
    pub project_key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
    pub labels: Vec<String>,
    pub related_issue_key: Option<String>,
}

/// What one audit pass produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassOutcome {
    pub report: RunReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_key: Option<String>,
}
