use targetpay::application::push::{InboundDelivery, PushResponse, handle_delivery};

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_trusted_post_with_success_body() {
    let delivery = InboundDelivery {
        method: "POST".to_string(),
        remote_addr: Some("89.184.168.5".to_string()),
        query: Vec::new(),
        body: params(&[("status", "success"), ("trxid", "ABC")]),
    };

    let (response, message) = handle_delivery(&delivery);
    assert_eq!(response, PushResponse::Acknowledged);
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), "OK");

    let message = message.expect("accepted delivery exposes a message");
    assert!(message.is_success());
    assert_eq!(message.transaction_id(), Some("ABC"));
    assert_eq!(message.status(), Some("success"));
}

#[test]
fn test_untrusted_get_is_hidden_behind_not_found() {
    let delivery = InboundDelivery {
        method: "GET".to_string(),
        remote_addr: Some("1.2.3.4".to_string()),
        query: params(&[("status", "success"), ("trxid", "ABC")]),
        body: Vec::new(),
    };

    let (response, message) = handle_delivery(&delivery);
    assert_eq!(response, PushResponse::NotFound);
    assert_eq!(response.status_code(), 404);
    assert!(response.allow_header().is_none());
    assert!(message.is_none(), "no data extraction for rejected deliveries");
}

#[test]
fn test_trusted_get_gets_method_not_allowed() {
    let delivery = InboundDelivery {
        method: "get".to_string(),
        remote_addr: Some("78.152.58.200".to_string()),
        query: Vec::new(),
        body: Vec::new(),
    };

    let (response, message) = handle_delivery(&delivery);
    assert_eq!(response, PushResponse::MethodNotAllowed);
    assert_eq!(response.status_code(), 405);
    assert_eq!(response.allow_header(), Some("POST"));
    assert!(message.is_none());
}

#[test]
fn test_merge_precedence_and_case_insensitive_lookup() {
    let delivery = InboundDelivery {
        method: "POST".to_string(),
        remote_addr: Some("89.184.168.77".to_string()),
        query: params(&[("Status", "pending"), ("extra", "from-query")]),
        body: params(&[("STATUS", "Success"), ("gone", "")]),
    };

    let (_, message) = handle_delivery(&delivery);
    let message = message.unwrap();

    // Body value wins on collision, lookup ignores case.
    assert_eq!(message.status(), Some("Success"));
    assert_eq!(message.get("Extra"), Some("from-query"));
    // Empty values are dropped, not stored as empty strings.
    assert!(message.get("gone").is_none());
    assert!(message.is_success());
}

#[test]
fn test_success_requires_the_documented_forms() {
    let classified = |status: &str| {
        let delivery = InboundDelivery {
            method: "POST".to_string(),
            remote_addr: Some("89.184.168.1".to_string()),
            query: Vec::new(),
            body: params(&[("status", status)]),
        };
        handle_delivery(&delivery).1.unwrap().is_success()
    };

    assert!(classified("000000 OK payment completed"));
    assert!(classified("Success"));
    assert!(!classified("pending"));
    assert!(!classified("000001 OK"));
    assert!(!classified("success pending")); // not an exact "success"
}
