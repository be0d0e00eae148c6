//! Caller-initiated status checks (pull requests).
//!
//! A check issues one GET against the method's check endpoint and reports
//! transport success only. The business-level response text is retained
//! verbatim: the gateway's check responses are documented as inconsistent
//! across payment methods (the same failure produces different codes and
//! messages per method), so classifying them is left to the caller with
//! method-specific rules.

use crate::domain::method::PaymentMethod;
use crate::domain::params;
use crate::domain::ports::HttpTransport;
use crate::error::{Result, TargetPayError};
use url::form_urlencoded;

/// A transaction status check against the gateway's check endpoint.
pub struct StatusCheck {
    method: PaymentMethod,
    rtlo: u32,
    transaction_id: Option<String>,
    once: bool,
    test: bool,
    response: Option<String>,
}

impl StatusCheck {
    /// Creates a check for sub-account `rtlo`. By default a transaction is
    /// checked only once (`once=1`) and test mode is off.
    pub fn new(method: PaymentMethod, rtlo: u32) -> Self {
        Self {
            method,
            rtlo,
            transaction_id: None,
            once: true,
            test: false,
            response: None,
        }
    }

    /// Creates a check resolving `name` through the method alias table.
    pub fn for_method_name(name: &str, rtlo: &str) -> Result<Self> {
        let method = PaymentMethod::from_alias(name)?;
        let rtlo = params::parse_layout_code(rtlo)?;
        Ok(Self::new(method, rtlo))
    }

    pub fn set_transaction_id(&mut self, trxid: impl Into<String>) {
        self.transaction_id = Some(trxid.into());
    }

    /// Check only once (`true`, the default) or allow repeated checks.
    pub fn set_once(&mut self, once: bool) {
        self.once = once;
    }

    /// Run against the gateway's test mode instead of production.
    pub fn set_test(&mut self, test: bool) {
        self.test = test;
    }

    /// The check URL: `<endpoint>?rtlo=<id>[&trxid=<id>]&once=<0|1>&test=<0|1>`.
    pub fn request_url(&self) -> String {
        let mut url = format!("{}?rtlo={}", self.method.profile().check_url, self.rtlo);
        if let Some(trxid) = &self.transaction_id {
            url.push_str("&trxid=");
            url.extend(form_urlencoded::byte_serialize(trxid.as_bytes()));
        }
        url.push_str(if self.once { "&once=1" } else { "&once=0" });
        url.push_str(if self.test { "&test=1" } else { "&test=0" });
        url
    }

    /// Issues the check and reports transport success.
    ///
    /// `true` means a response was received; what it says about the payment
    /// is in [`response()`](Self::response) for the caller to classify. On
    /// transport failure the retained text is the transport error message,
    /// prefixed with the transport error code when one exists, and the
    /// check may be issued again.
    pub async fn validate(&mut self, transport: &dyn HttpTransport) -> bool {
        let url = self.request_url();
        tracing::debug!(method = self.method.name(), %url, "checking transaction status");
        match transport.get(&url).await {
            Ok(body) => {
                self.response = Some(body.trim().to_string());
                true
            }
            Err(TargetPayError::Transport { code, message }) => {
                tracing::warn!(method = self.method.name(), %message, "check transport failure");
                self.response = Some(match code {
                    Some(code) => format!("{code} {message}"),
                    None => message,
                });
                false
            }
            Err(other) => {
                tracing::warn!(method = self.method.name(), %other, "check failure");
                self.response = Some(other.to_string());
                false
            }
        }
    }

    /// Raw response of the last check, also set on transport failure.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }
}
