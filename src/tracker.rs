//! Issue tracker capability and its Jira REST implementation.

use crate::http_client::{TRACKER_TIMEOUT_SECS, build_http_client};
use crate::models::IssueTicket;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use url::Url;

/// Link type used to relate a new ticket to the tracking ticket
pub const RELATES_LINK_TYPE: &str = "Relates";

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("request to issue tracker failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("issue tracker returned HTTP {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    #[error("could not decode issue tracker response: {0}")]
    Decode(String),

    #[error("issue link was rejected with HTTP {status}: {body}")]
    LinkRejected { status: u16, body: String },
}

/// External issue tracker operations used by the reporter
pub trait IssueTracker {
    /// Creates a ticket and returns the key the tracker assigned to it
    fn create_issue(
        &self,
        ticket: &IssueTicket,
    ) -> impl Future<Output = Result<String, TrackerError>> + Send;

    /// Relates `inward_key` to `outward_key`
    fn link_issues(
        &self,
        inward_key: &str,
        outward_key: &str,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send;
}

/// Credentials and project settings for a Jira instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSettings {
    pub base_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_token: String,
    pub project_key: String,
    #[serde(default)]
    pub related_issue_key: Option<String>,
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    fields: IssueFields<'a>,
}

#[derive(Serialize)]
struct IssueFields<'a> {
    project: KeyRef<'a>,
    summary: &'a str,
    description: &'a str,
    issuetype: NameRef<'a>,
    labels: &'a [String],
}

#[derive(Serialize)]
struct IssueLinkRequest<'a> {
    #[serde(rename = "type")]
    link_type: NameRef<'a>,
    #[serde(rename = "inwardIssue")]
    inward_issue: KeyRef<'a>,
    #[serde(rename = "outwardIssue")]
    outward_issue: KeyRef<'a>,
}

#[derive(Serialize)]
struct KeyRef<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct NameRef<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreatedIssue {
    key: String,
}

/// Jira REST API v2 client
pub struct JiraClient {
    client: reqwest::Client,
    api_base: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(settings: &TrackerSettings) -> Result<Self> {
        let base = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid tracker base URL: {}", settings.base_url))?;

        Ok(Self {
            client: build_http_client(TRACKER_TIMEOUT_SECS)?,
            api_base: format!("{}/rest/api/2", base.as_str().trim_end_matches('/')),
            email: settings.email.clone(),
            api_token: settings.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, TrackerError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .basic_auth(&self.email, Some(&self.api_token))
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}

impl IssueTracker for JiraClient {
    async fn create_issue(&self, ticket: &IssueTicket) -> Result<String, TrackerError> {
        let request = CreateIssueRequest {
            fields: IssueFields {
                project: KeyRef {
                    key: &ticket.project_key,
                },
                summary: &ticket.summary,
                description: &ticket.description,
                issuetype: NameRef {
                    name: &ticket.issue_type,
                },
                labels: &ticket.labels,
            },
        };

        let response = self.post("issue", &request).await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Jira usually answers with an errorMessages/errors JSON body
            let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
            return Err(TrackerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedIssue =
            serde_json::from_str(&text).map_err(|e| TrackerError::Decode(e.to_string()))?;
        Ok(created.key)
    }

    async fn link_issues(&self, inward_key: &str, outward_key: &str) -> Result<(), TrackerError> {
        let request = IssueLinkRequest {
            link_type: NameRef {
                name: RELATES_LINK_TYPE,
            },
            inward_issue: KeyRef { key: inward_key },
            outward_issue: KeyRef { key: outward_key },
        };

        let response = self.post("issueLink", &request).await?;
        let status = response.status();
        if status == reqwest::StatusCode::CREATED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TrackerError::LinkRejected {
            status: status.as_u16(),
            body,
        })
    }
}
