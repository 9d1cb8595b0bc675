use anyhow::Result;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;

/// Timeout for fetching an audited page
pub const PAGE_TIMEOUT_SECS: u64 = 10;

/// Timeout for a single link probe
pub const LINK_PROBE_TIMEOUT_SECS: u64 = 5;

/// Timeout for issue tracker API calls
pub const TRACKER_TIMEOUT_SECS: u64 = 10;

/// Common HTTP headers used for all requests
const USER_AGENT: &str = concat!("siteaudit/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "*/*";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Creates a reqwest client with the standard headers and the given timeout.
/// Redirects are followed up to 10 hops.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    let client = ClientBuilder::new()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    Ok(client)
}
