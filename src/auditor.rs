use crate::http_client::{PAGE_TIMEOUT_SECS, build_http_client};
use crate::link_checker::LinkChecker;
use crate::models::AuditResult;
use crate::seo_analyzer::SeoAnalyzer;
use anyhow::Result;
use colored::*;
use scraper::Html;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Fetches a page and runs the SEO and link checks against it
pub struct PageAuditor {
    client: reqwest::Client,
    link_checker: LinkChecker,
}

impl PageAuditor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_http_client(PAGE_TIMEOUT_SECS)?,
            link_checker: LinkChecker::new()?,
        })
    }

    /// Retrieves a page, failing on transport errors and non-success statuses.
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?;

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            let content_type = content_type.to_lowercase();
            if !content_type.contains("text/html") && !content_type.contains("application/xhtml")
            {
                tracing::warn!(
                    url = %url,
                    content_type = %content_type,
                    "Non-HTML content type detected, parsing may fail"
                );
            }
        }

        Ok(response.text().await?)
    }

    /// Audits one page. Returns `None` when the page could not be fetched.
    pub async fn audit_page(&self, name: &str, page_url: &str) -> Option<AuditResult> {
        let fetched = match Url::parse(page_url) {
            Ok(url) => self.fetch(&url).await.map(|body| (url, body)),
            Err(e) => Err(FetchError::from(e)),
        };

        let (url, body) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(page = %name, url = %page_url, error = %e, "Failed to fetch page");
                println!(
                    "{} {} ({}): {}",
                    "Failed to fetch".bright_red().bold(),
                    name,
                    page_url,
                    e
                );
                return None;
            }
        };

        // The parsed document is not Send, so it must not live across the probes
        let (seo_issues, targets) = {
            let document = Html::parse_document(&body);
            (
                SeoAnalyzer::analyze(&document),
                LinkChecker::collect_targets(&document, &url),
            )
        };
        tracing::debug!(page = %name, links = targets.len(), "Checking links");
        let broken_links = self.link_checker.check_targets(&targets).await;

        let mut result = AuditResult::new(page_url);
        if !seo_issues.is_empty() {
            result.seo_issues = seo_issues;
        }
        if !broken_links.is_empty() {
            result.broken_links = broken_links;
        }

        print_summary(name, &result);
        Some(result)
    }
}

fn print_summary(name: &str, result: &AuditResult) {
    println!(
        "{} {} ({}):",
        "Audit results for".bright_white().bold(),
        name,
        result.url
    );

    if !result.seo_issues.is_empty() {
        println!(
            "  {} {}",
            "SEO Issues:".yellow(),
            result.seo_issues.join(", ")
        );
    }

    if !result.broken_links.is_empty() {
        let urls: Vec<&str> = result
            .broken_links
            .iter()
            .map(|link| link.url.as_str())
            .collect();
        println!("  {} {}", "Broken Links:".bright_red(), urls.join(", "));
    }

    if !result.has_findings() {
        println!("  {}", "No issues found!".bright_green());
    }
}
