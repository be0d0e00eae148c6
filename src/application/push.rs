//! Inbound status push handling.
//!
//! The gateway posts status updates to the report URL. A delivery is only
//! accepted when it is a POST from one of the gateway's own network ranges;
//! everything else gets a generic "not found" so the endpoint's existence
//! is never confirmed to third parties. Rejections are logged but never
//! surface as errors to the HTTP layer.

use std::collections::HashMap;

/// Source prefixes of the gateway's notification senders.
///
/// This is a literal string-prefix allow-list, not CIDR matching: the
/// trusted ranges are an unversioned fact about the gateway's
/// infrastructure and are matched exactly the way the gateway documents
/// them. The second range is the one added in September 2014.
pub const TRUSTED_SOURCE_PREFIXES: [&str; 2] = ["89.184.168", "78.152.58"];

/// One inbound HTTP delivery, carried as explicit values.
///
/// The HTTP layer hands over the method, the remote address and the already
/// decoded query and body parameter lists; nothing is read from ambient
/// request state.
#[derive(Debug, Clone, Default)]
pub struct InboundDelivery {
    pub method: String,
    pub remote_addr: Option<String>,
    pub query: Vec<(String, String)>,
    pub body: Vec<(String, String)>,
}

/// The response the HTTP layer must send for a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushResponse {
    /// 200, plain-text "OK".
    Acknowledged,
    /// 404 for untrusted sources and anything disqualified.
    NotFound,
    /// 405 with `Allow: POST`, for non-POST requests from trusted sources.
    MethodNotAllowed,
}

impl PushResponse {
    pub fn status_code(self) -> u16 {
        match self {
            PushResponse::Acknowledged => 200,
            PushResponse::NotFound => 404,
            PushResponse::MethodNotAllowed => 405,
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            PushResponse::Acknowledged => "OK",
            PushResponse::NotFound => "404 Not Found",
            PushResponse::MethodNotAllowed => "405 Method Not Allowed",
        }
    }

    /// The `Allow` header value, where one applies.
    pub fn allow_header(self) -> Option<&'static str> {
        match self {
            PushResponse::MethodNotAllowed => Some("POST"),
            _ => None,
        }
    }
}

/// The field map of an accepted push delivery.
///
/// Read-only once constructed; built only by [`handle_delivery`]. Keys are
/// lower-cased, body values override query values, empty values are not
/// stored at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    data: HashMap<String, String>,
}

impl PushMessage {
    /// Looks up a field by case-insensitive name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(&key.to_lowercase()).map(String::as_str)
    }

    /// The reported transaction status, verbatim.
    pub fn status(&self) -> Option<&str> {
        self.get("status")
    }

    /// The gateway transaction identifier (trxid).
    pub fn transaction_id(&self) -> Option<&str> {
        self.get("trxid")
    }

    /// Whether the reported status means the payment completed.
    ///
    /// The gateway reports success either as the literal status "Success"
    /// (any casing) or as a full check response starting with "000000 OK".
    /// Anything else, including a missing status, is not success.
    pub fn is_success(&self) -> bool {
        match self.status() {
            Some(status) => {
                status.eq_ignore_ascii_case("success") || status.starts_with("000000 OK")
            }
            None => false,
        }
    }
}

/// Validates one inbound delivery and decides the response.
///
/// Returns the message only for an acknowledged delivery. Disqualified
/// deliveries produce no data and are logged with their reason, since a
/// rejected push may indicate a spoofed or tampered request.
pub fn handle_delivery(delivery: &InboundDelivery) -> (PushResponse, Option<PushMessage>) {
    let trusted = delivery
        .remote_addr
        .as_deref()
        .is_some_and(is_trusted_source);

    if !delivery.method.eq_ignore_ascii_case("POST") {
        return if trusted {
            (PushResponse::MethodNotAllowed, None)
        } else {
            tracing::warn!(
                method = %delivery.method,
                remote_addr = delivery.remote_addr.as_deref().unwrap_or("<none>"),
                "push delivery from untrusted source rejected"
            );
            (PushResponse::NotFound, None)
        };
    }
    if !trusted {
        tracing::warn!(
            remote_addr = delivery.remote_addr.as_deref().unwrap_or("<none>"),
            "push delivery from untrusted source rejected"
        );
        return (PushResponse::NotFound, None);
    }

    let mut data = HashMap::new();
    for (key, value) in delivery.query.iter().chain(delivery.body.iter()) {
        if value.is_empty() {
            continue;
        }
        data.insert(key.to_lowercase(), value.clone());
    }
    (PushResponse::Acknowledged, Some(PushMessage { data }))
}

/// Literal prefix match against the trusted gateway ranges.
pub fn is_trusted_source(remote_addr: &str) -> bool {
    TRUSTED_SOURCE_PREFIXES
        .iter()
        .any(|prefix| remote_addr.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery(method: &str, addr: Option<&str>) -> InboundDelivery {
        InboundDelivery {
            method: method.to_string(),
            remote_addr: addr.map(str::to_string),
            query: Vec::new(),
            body: Vec::new(),
        }
    }

    #[test]
    fn test_trusted_source_prefixes() {
        assert!(is_trusted_source("89.184.168.5"));
        assert!(is_trusted_source("89.184.168.250"));
        assert!(is_trusted_source("78.152.58.1"));
        assert!(!is_trusted_source("1.2.3.4"));
        assert!(!is_trusted_source("89.184.167.5"));
        assert!(!is_trusted_source("78.152.5.81"));
    }

    #[test]
    fn test_trusted_post_is_acknowledged() {
        let mut d = delivery("POST", Some("89.184.168.5"));
        d.body = vec![
            ("status".to_string(), "success".to_string()),
            ("trxid".to_string(), "ABC".to_string()),
        ];
        let (response, message) = handle_delivery(&d);
        assert_eq!(response, PushResponse::Acknowledged);
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), "OK");
        let message = message.unwrap();
        assert!(message.is_success());
        assert_eq!(message.transaction_id(), Some("ABC"));
    }

    #[test]
    fn test_untrusted_get_is_not_found_without_extraction() {
        let mut d = delivery("GET", Some("1.2.3.4"));
        d.query = vec![("status".to_string(), "success".to_string())];
        let (response, message) = handle_delivery(&d);
        assert_eq!(response, PushResponse::NotFound);
        assert_eq!(response.status_code(), 404);
        assert!(message.is_none());
    }

    #[test]
    fn test_untrusted_post_is_not_found() {
        let (response, message) = handle_delivery(&delivery("POST", Some("8.8.8.8")));
        assert_eq!(response, PushResponse::NotFound);
        assert!(message.is_none());
    }

    #[test]
    fn test_trusted_non_post_is_method_not_allowed() {
        let (response, message) = handle_delivery(&delivery("GET", Some("78.152.58.9")));
        assert_eq!(response, PushResponse::MethodNotAllowed);
        assert_eq!(response.status_code(), 405);
        assert_eq!(response.allow_header(), Some("POST"));
        assert!(message.is_none());
    }

    #[test]
    fn test_missing_remote_addr_is_untrusted() {
        let (response, message) = handle_delivery(&delivery("POST", None));
        assert_eq!(response, PushResponse::NotFound);
        assert!(message.is_none());
    }

    #[test]
    fn test_body_overrides_query_and_empty_values_dropped() {
        let mut d = delivery("post", Some("89.184.168.5"));
        d.query = vec![
            ("TrxID".to_string(), "FROM-QUERY".to_string()),
            ("note".to_string(), "kept".to_string()),
            ("empty".to_string(), String::new()),
        ];
        d.body = vec![
            ("trxid".to_string(), "FROM-BODY".to_string()),
            ("blank".to_string(), String::new()),
        ];
        let (_, message) = handle_delivery(&d);
        let message = message.unwrap();
        assert_eq!(message.transaction_id(), Some("FROM-BODY"));
        assert_eq!(message.get("NOTE"), Some("kept"));
        assert!(message.get("empty").is_none());
        assert!(message.get("blank").is_none());
    }

    #[test]
    fn test_is_success_classification() {
        let message = |status: Option<&str>| {
            let mut d = delivery("POST", Some("89.184.168.5"));
            if let Some(s) = status {
                d.body = vec![("status".to_string(), s.to_string())];
            }
            handle_delivery(&d).1.unwrap()
        };

        assert!(message(Some("Success")).is_success());
        assert!(message(Some("success")).is_success());
        assert!(message(Some("000000 OK payment completed")).is_success());
        assert!(!message(Some("pending")).is_success());
        assert!(!message(Some("000001 Expired")).is_success());
        assert!(!message(None).is_success());
    }
}
