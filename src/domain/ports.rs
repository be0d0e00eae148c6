use crate::error::Result;
use async_trait::async_trait;

/// Outbound HTTP seam.
///
/// The library issues at most one GET per operation through this trait and
/// never retries. Timeout, cancellation and retry policy belong to the
/// implementation the host application injects.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs a GET and returns the full response body.
    ///
    /// Implementations should return the body for any HTTP status; the
    /// gateway reports errors in the body text. Connection, DNS and timeout
    /// failures map to [`TargetPayError::Transport`](crate::error::TargetPayError::Transport).
    async fn get(&self, url: &str) -> Result<String>;
}

pub type HttpTransportBox = Box<dyn HttpTransport>;
