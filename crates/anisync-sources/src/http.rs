use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("anisync/", env!("CARGO_PKG_VERSION"));

/// Shared reqwest client; `timeout` of `None` keeps reqwest's default (no timeout)
pub fn create_http_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| Client::new())
}
