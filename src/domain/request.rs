use crate::domain::method::{self, PaymentMethod};
use crate::domain::params;
use crate::error::{Result, TargetPayError};
use url::form_urlencoded;

/// The mutable field set of one payment transaction.
///
/// Fields are kept in setter order and serialized in that same order, so the
/// built request URL is reproducible from the sequence of setter calls.
/// Re-setting a field keeps its original position. "Unset" and
/// "set to the default" stay distinguishable: the currency and language
/// defaults are applied by [`currency()`](Self::currency) and
/// [`language()`](Self::language) at read time only, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    method: PaymentMethod,
    rtlo: u32,
    fields: Vec<(String, String)>,
    remote_addr: Option<String>,
}

impl TransactionRequest {
    /// Creates a request for `method` owned by sub-account `rtlo`.
    ///
    /// The layout code is immutable once set; there is no setter for it.
    pub fn new(method: PaymentMethod, rtlo: u32) -> Self {
        let mut request = Self {
            method,
            rtlo,
            fields: Vec::new(),
            remote_addr: None,
        };
        request.set_field("rtlo", rtlo.to_string());
        request
    }

    /// Supplies the remote address of the paying client, used to fill the
    /// `userip` field at start time when no client IP was set explicitly.
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.set_remote_addr(addr);
        self
    }

    /// See [`with_remote_addr`](Self::with_remote_addr).
    pub fn set_remote_addr(&mut self, addr: impl Into<String>) {
        self.remote_addr = Some(addr.into());
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn rtlo(&self) -> u32 {
        self.rtlo
    }

    /// Sets the amount in cents. Bounds are the current method's profile.
    pub fn set_amount(&mut self, amount: u32) -> Result<()> {
        let amount = params::validate_amount(amount, self.method.profile())?;
        self.set_field("amount", amount.to_string());
        Ok(())
    }

    pub fn amount(&self) -> Option<u32> {
        self.get("amount").and_then(|v| v.parse().ok())
    }

    /// Sets the ISO 4217 currency code.
    ///
    /// Codes of the wrong length are silently ignored so the field stays
    /// unset; the gateway then charges in euros.
    pub fn set_currency(&mut self, code: &str) {
        if let Some(code) = params::normalize_currency(code) {
            self.set_field("currency", code);
        }
    }

    /// Currency that will apply to the transaction, defaulting to "EUR".
    pub fn currency(&self) -> &str {
        self.get("currency").unwrap_or("EUR")
    }

    /// Sets the payment description, normalized per the gateway rules.
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        let description = params::normalize_description(description)?;
        self.set_field("description", description);
        Ok(())
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// Sets the ISO 639 language code for gateway-hosted pages.
    ///
    /// Codes of the wrong length are silently ignored.
    pub fn set_language(&mut self, code: &str) {
        if let Some(code) = params::normalize_language(code) {
            self.set_field("language", code);
        }
    }

    /// Language that will apply to the transaction, defaulting to "nl".
    pub fn language(&self) -> &str {
        self.get("language").unwrap_or("nl")
    }

    /// Sets the URL the client is redirected to after the payment.
    pub fn set_return_url(&mut self, url: &str) -> Result<()> {
        if !params::is_absolute_url(url) {
            return Err(TargetPayError::InvalidReturnUrl(url.to_string()));
        }
        self.set_field("returnurl", url.to_string());
        Ok(())
    }

    pub fn return_url(&self) -> Option<&str> {
        self.get("returnurl")
    }

    /// Sets the URL that receives server-to-server status pushes.
    ///
    /// A report URL equal to the current return URL is dropped without an
    /// error; the gateway would otherwise push to the page the client is
    /// already returning to.
    pub fn set_report_url(&mut self, url: &str) -> Result<()> {
        if !params::is_absolute_url(url) {
            return Err(TargetPayError::InvalidReportUrl(url.to_string()));
        }
        if self.return_url() == Some(url) {
            tracing::debug!(url, "report URL equals return URL, dropped");
            return Ok(());
        }
        self.set_field("reporturl", url.to_string());
        Ok(())
    }

    pub fn report_url(&self) -> Option<&str> {
        self.get("reporturl")
    }

    /// Sets the paying client's IP address.
    pub fn set_client_ip(&mut self, addr: &str) -> Result<()> {
        let addr = params::validate_client_ip(addr)?;
        self.set_field("userip", addr);
        Ok(())
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.get("userip")
    }

    /// Sets the SOFORT Banking country from an ISO 3166-1 code
    /// (alpha-2, alpha-3 or numeric). Only SOFORT Banking takes a country.
    pub fn set_country(&mut self, country: &str) -> Result<()> {
        if self.method != PaymentMethod::SofortBanking {
            return Err(TargetPayError::Unsupported {
                operation: "country selection",
                method: self.method.name(),
            });
        }
        match method::sofort_country_code(country) {
            Some(code) => {
                self.set_field("country", code.to_string());
                Ok(())
            }
            None => Err(TargetPayError::UnsupportedCountry(country.to_string())),
        }
    }

    pub fn country(&self) -> Option<&str> {
        self.get("country")
    }

    /// Sets the selected issuer id. Membership validation against the live
    /// issuer list happens in the payment lifecycle before this is called.
    pub(crate) fn set_issuer_field(&mut self, issuer_id: &str) {
        self.set_field("bank", issuer_id.to_string());
    }

    pub fn issuer(&self) -> Option<&str> {
        self.get("bank")
    }

    /// Sets a raw gateway parameter, for method-specific feature flags that
    /// have no dedicated setter. No validation is applied.
    pub fn set_parameter(&mut self, key: &str, value: &str) {
        self.set_field(key, value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Builds the start request URL: the method endpoint, `?`, then every
    /// set field as `key=value` with the value percent-encoded, joined with
    /// `&` in insertion order.
    pub fn request_url(&self) -> String {
        let mut url = String::from(self.method.profile().start_url);
        url.push('?');
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                url.push('&');
            }
            url.push_str(key);
            url.push('=');
            url.extend(form_urlencoded::byte_serialize(value.as_bytes()));
        }
        url
    }

    fn set_field(&mut self, key: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }
}
