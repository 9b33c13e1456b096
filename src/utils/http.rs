// Shared HTTP client construction

use crate::types::{AppError, AppResult};
use reqwest::Client;
use std::time::Duration;

/// Wikipedia rejects requests without a descriptive User-Agent
pub const USER_AGENT: &str = concat!(
    "scholar-agent/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/your-username/scholar-agent)"
);

/// Build a client for all outbound calls. Without a timeout a stalled call blocks its pipeline step.
pub fn build_http_client(timeout: Option<Duration>) -> AppResult<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(None).is_ok());
        assert!(build_http_client(Some(Duration::from_secs(5))).is_ok());
    }
}
