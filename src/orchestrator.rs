use crate::auditor::PageAuditor;
use crate::models::{PageTarget, PassOutcome, RunReport};
use crate::reporter::{IssueReporter, build_description};
use crate::tracker::IssueTracker;
use colored::*;

/// Drives one audit pass over the configured pages
pub struct Orchestrator<T> {
    pages: Vec<PageTarget>,
    auditor: PageAuditor,
    reporter: Option<IssueReporter<T>>,
}

impl<T: IssueTracker> Orchestrator<T> {
    /// Without a reporter the pass runs in dry-run mode and prints the ticket
    /// description instead of submitting it.
    pub fn new(
        pages: Vec<PageTarget>,
        auditor: PageAuditor,
        reporter: Option<IssueReporter<T>>,
    ) -> Self {
        Self {
            pages,
            auditor,
            reporter,
        }
    }

    pub fn reporter(&self) -> Option<&IssueReporter<T>> {
        self.reporter.as_ref()
    }

    /// Audits every page in order and files a ticket if anything was found.
    pub async fn run_pass(&self) -> PassOutcome {
        let mut report = RunReport::new();

        for page in &self.pages {
            tracing::info!(page = %page.name, url = %page.url, "Auditing page");
            if let Some(result) = self.auditor.audit_page(&page.name, &page.url).await {
                report.insert(page.name.clone(), result);
            }
        }

        if report.is_empty() {
            tracing::info!("No issues found to report");
            println!("{}", "No issues found to report.".bright_green());
            return PassOutcome {
                report,
                ticket_key: None,
            };
        }

        let ticket_key = match &self.reporter {
            Some(reporter) => reporter.report(&report).await,
            None => {
                let today = chrono::Local::now().format("%Y-%m-%d").to_string();
                println!(
                    "{}",
                    "Dry run: ticket not submitted".bright_yellow().bold()
                );
                println!("{}", build_description(&report, &today));
                None
            }
        };

        PassOutcome { report, ticket_key }
    }
}
