#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use targetpay::domain::ports::HttpTransport;
use targetpay::error::{Result, TargetPayError};

/// Scripted transport double: hands out queued responses in order and
/// records every requested URL. Clones share the same script and log, so a
/// test can keep a handle after boxing one into a payment.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    responses: VecDeque<Result<String>>,
    requests: Vec<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, body: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(Ok(body.to_string()));
        self
    }

    pub fn fail_with(&self, message: &str) -> &Self {
        self.fail_with_code(None, message)
    }

    pub fn fail_with_code(&self, code: Option<u16>, message: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(Err(TargetPayError::Transport {
                code,
                message: message.to_string(),
            }));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(url.to_string());
        inner.responses.pop_front().unwrap_or_else(|| {
            Err(TargetPayError::Transport {
                code: None,
                message: "no scripted response".to_string(),
            })
        })
    }
}

pub const ISSUER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<issuers>
    <issuer id="0031">ABN Amro</issuer>
    <issuer id="0721">ING</issuer>
    <issuer id="0021">Rabobank</issuer>
</issuers>"#;
