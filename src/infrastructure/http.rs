use crate::domain::ports::HttpTransport;
use crate::error::{Result, TargetPayError};
use async_trait::async_trait;

/// Reqwest-backed transport that opens a fresh connection for every call.
///
/// The gateway expects start and check requests on fresh connections, so a
/// client is built per request with connection pooling disabled. Non-2xx
/// responses are returned as bodies, not errors: the gateway reports
/// failures in the body text and never relies on the HTTP status alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FreshConnectionTransport;

impl FreshConnectionTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HttpTransport for FreshConnectionTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(to_transport_error)?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(to_transport_error)?;
        response.text().await.map_err(to_transport_error)
    }
}

fn to_transport_error(err: reqwest::Error) -> TargetPayError {
    TargetPayError::Transport {
        code: err.status().map(|status| status.as_u16()),
        message: err.to_string(),
    }
}
