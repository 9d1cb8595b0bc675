use crate::models::{IssueTicket, RunReport};
use crate::seo_analyzer::truncate;
use crate::tracker::{IssueTracker, TrackerError};
use colored::*;
use std::fmt::Write;

pub const ISSUE_TYPE: &str = "Bug";
pub const AUDIT_LABEL: &str = "automated-audit";

/// Number of URL characters kept per broken link in the ticket description
const LINK_DISPLAY_LEN: usize = 70;

/// Files the findings of a run as a single tracker ticket
pub struct IssueReporter<T> {
    tracker: T,
    project_key: String,
    related_issue_key: Option<String>,
}

impl<T: IssueTracker> IssueReporter<T> {
    pub fn new(
        tracker: T,
        project_key: impl Into<String>,
        related_issue_key: Option<String>,
    ) -> Self {
        Self {
            tracker,
            project_key: project_key.into(),
            related_issue_key,
        }
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Builds the ticket for a report dated `date` (formatted `YYYY-MM-DD`)
    pub fn build_ticket(&self, report: &RunReport, date: &str) -> IssueTicket {
        IssueTicket {
            project_key: self.project_key.clone(),
            summary: format!("Site Issues {}", date),
            description: build_description(report, date),
            issue_type: ISSUE_TYPE.to_string(),
            labels: vec![AUDIT_LABEL.to_string()],
            related_issue_key: self.related_issue_key.clone(),
        }
    }

    /// Submits the report and returns the new ticket key.
    ///
    /// Creation failures are logged and yield `None`. A failure to relate the
    /// new ticket to the tracking ticket only produces a warning.
    pub async fn report(&self, report: &RunReport) -> Option<String> {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let ticket = self.build_ticket(report, &today);

        let key = match self.tracker.create_issue(&ticket).await {
            Ok(key) => key,
            Err(e) => {
                match &e {
                    TrackerError::Api { status, body } => tracing::error!(
                        status = *status,
                        response = %body,
                        "Issue tracker rejected the bug report"
                    ),
                    other => tracing::error!(error = %other, "Failed to create bug report"),
                }
                println!("{} {}", "Failed to create bug:".bright_red().bold(), e);
                return None;
            }
        };

        println!("{} {}", "Created Bug:".bright_green().bold(), key);

        if let Some(related) = &ticket.related_issue_key {
            match self.tracker.link_issues(&key, related).await {
                Ok(()) => {
                    tracing::info!(
                        issue = %key,
                        related = %related,
                        "Linked bug to tracking issue"
                    );
                    println!("{} {} to {}", "Linked".bright_cyan().bold(), key, related);
                }
                Err(e) => {
                    tracing::warn!(
                        issue = %key,
                        related = %related,
                        error = %e,
                        "Failed to create issue link"
                    );
                    println!("{} {}", "Failed to create link:".yellow().bold(), e);
                }
            }
        }

        Some(key)
    }
}

/// Renders the ticket description in Jira wiki markup
pub fn build_description(report: &RunReport, date: &str) -> String {
    let mut description = format!("*Automated Site Audit Results - {}*\n\n", date);

    for page in &report.pages {
        let result = &page.result;
        let _ = writeln!(description, "*{}* ({}):", page.name, result.url);

        if !result.seo_issues.is_empty() {
            description.push_str("*SEO Issues:*\n");
            for issue in &result.seo_issues {
                let _ = writeln!(description, "- {}", issue);
            }
        }

        if !result.broken_links.is_empty() {
            description.push_str("*Broken Links:*\n");
            for link in &result.broken_links {
                let _ = writeln!(
                    description,
                    "- {}: {}",
                    link.status,
                    truncate(&link.url, LINK_DISPLAY_LEN)
                );
            }
        }

        description.push('\n');
    }

    description
}
