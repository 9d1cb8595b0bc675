use crate::http_client::{LINK_PROBE_TIMEOUT_SECS, build_http_client};
use crate::models::BrokenLink;
use anyhow::Result;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// Only the first this-many anchors of a page are checked
pub const MAX_LINKS_PER_PAGE: usize = 50;

const SKIPPED_SCHEMES: [&str; 3] = ["mailto:", "tel:", "javascript:"];

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("a selector should be valid"));

/// A link extracted from a page, ready to be probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Resolved absolute URL
    Resolved(Url),
    /// An href that could not be resolved against the page URL
    Invalid { href: String, reason: String },
}

pub struct LinkChecker {
    client: reqwest::Client,
}

impl LinkChecker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_http_client(LINK_PROBE_TIMEOUT_SECS)?,
        })
    }

    /// Extracts the links to probe from a page.
    ///
    /// Anchors beyond the first [`MAX_LINKS_PER_PAGE`] are ignored, anchors
    /// without an href included. Empty hrefs and `mailto:`, `tel:` and
    /// `javascript:` targets are skipped.
    pub fn collect_targets(document: &Html, base_url: &Url) -> Vec<LinkTarget> {
        document
            .select(&ANCHOR_SELECTOR)
            .take(MAX_LINKS_PER_PAGE)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter(|href| !href.is_empty() && !has_skipped_scheme(href))
            .map(|href| match base_url.join(href) {
                Ok(url) => LinkTarget::Resolved(url),
                Err(e) => LinkTarget::Invalid {
                    href: href.to_string(),
                    reason: e.to_string(),
                },
            })
            .collect()
    }

    /// Probes each target in order and returns the ones that failed.
    pub async fn check_targets(&self, targets: &[LinkTarget]) -> Vec<BrokenLink> {
        let mut broken = Vec::new();

        for target in targets {
            match target {
                LinkTarget::Resolved(url) => {
                    if let Some(status) = self.probe(url).await {
                        broken.push(BrokenLink {
                            url: url.to_string(),
                            status,
                        });
                    }
                }
                LinkTarget::Invalid { href, reason } => {
                    broken.push(BrokenLink {
                        url: href.clone(),
                        status: format!("Connection error: invalid URL: {}", reason),
                    });
                }
            }
        }

        broken
    }

    /// Convenience wrapper running extraction and probing for one page
    pub async fn check_page(&self, document: &Html, base_url: &Url) -> Vec<BrokenLink> {
        let targets = Self::collect_targets(document, base_url);
        self.check_targets(&targets).await
    }

    /// Returns a status description when the link is broken
    async fn probe(&self, url: &Url) -> Option<String> {
        match self.client.head(url.as_str()).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(url = %url, status = %status, "Probed link");
                if status.as_u16() >= 400 {
                    let reason = status.canonical_reason().unwrap_or_default();
                    Some(format!("{} {}", status.as_u16(), reason).trim_end().to_string())
                } else {
                    None
                }
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Link probe failed");
                Some(format!("Connection error: {}", e))
            }
        }
    }
}

fn has_skipped_scheme(href: &str) -> bool {
    let href = href.trim_start();
    SKIPPED_SCHEMES.iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
