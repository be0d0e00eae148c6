use crate::domain::method::{IDEAL_ISSUER_URL, Issuer, PaymentMethod};
use crate::domain::params;
use crate::domain::ports::HttpTransportBox;
use crate::domain::request::TransactionRequest;
use crate::error::{Result, TargetPayError};
use serde::{Deserialize, Serialize};

/// Gateway response code for a successfully started transaction.
const START_OK: &str = "000000";

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    /// Fields are being collected; no transaction exists at the gateway yet.
    Configuring,
    /// The gateway accepted the start request and assigned a transaction id.
    Started,
    /// The last start attempt failed; the diagnostic text is retained.
    /// `start()` may be called again, but retrying is the caller's decision.
    Failed,
}

/// Result of a successful start: assigned by the gateway, immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Opaque transaction identifier (trxid).
    pub transaction_id: String,
    /// URL to redirect the paying client to.
    pub redirect_url: String,
    /// Raw gateway response the result was parsed from.
    pub raw_response: String,
}

/// One payment transaction, from configuration through start.
///
/// Owns its [`TransactionRequest`] exclusively and drives the injected
/// transport. Instances are independent; driving several concurrently is
/// safe as long as each is owned by one task. The lazily loaded issuer list
/// is cached per instance and survives only as long as the instance;
/// callers that need it across requests must persist it themselves.
pub struct Payment {
    request: TransactionRequest,
    transport: HttpTransportBox,
    state: PaymentState,
    result: Option<TransactionResult>,
    response: Option<String>,
    issuers: Option<Vec<Issuer>>,
}

impl Payment {
    pub fn new(method: PaymentMethod, rtlo: u32, transport: HttpTransportBox) -> Self {
        Self {
            request: TransactionRequest::new(method, rtlo),
            transport,
            state: PaymentState::Configuring,
            result: None,
            response: None,
            issuers: None,
        }
    }

    /// Creates a payment from a textual layout code, as received from
    /// configuration. Rejects non-numeric codes with TP0001.
    pub fn from_layout_code(
        method: PaymentMethod,
        rtlo: &str,
        transport: HttpTransportBox,
    ) -> Result<Self> {
        let rtlo = params::parse_layout_code(rtlo)?;
        Ok(Self::new(method, rtlo, transport))
    }

    pub fn method(&self) -> PaymentMethod {
        self.request.method()
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    /// The transaction fields. Setters for amount, description, URLs and
    /// the other per-field rules live on the request itself.
    pub fn request(&self) -> &TransactionRequest {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut TransactionRequest {
        &mut self.request
    }

    /// Raw text of the last gateway or transport response, if any.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// The started transaction, once `start()` has succeeded.
    pub fn result(&self) -> Option<&TransactionResult> {
        self.result.as_ref()
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.transaction_id.as_str())
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.redirect_url.as_str())
    }

    /// The current iDEAL issuer list, loaded from the gateway on first use
    /// and cached for the lifetime of this instance.
    pub async fn issuers(&mut self) -> Result<&[Issuer]> {
        if self.method() != PaymentMethod::Ideal {
            return Err(TargetPayError::Unsupported {
                operation: "issuer list",
                method: self.method().name(),
            });
        }
        if self.issuers.is_none() {
            let xml = self.transport.get(IDEAL_ISSUER_URL).await?;
            self.issuers = Some(parse_issuer_list(&xml)?);
        }
        Ok(self.issuers.as_deref().unwrap_or_default())
    }

    /// Selects the issuing bank for an iDEAL payment.
    ///
    /// The id must be four digits and a member of the current issuer list,
    /// which is loaded lazily if needed. A caller that wants to fall back
    /// to [`crate::domain::method::known_issuers`] on load failure does so
    /// explicitly.
    pub async fn set_issuer(&mut self, issuer_id: &str) -> Result<()> {
        if !params::is_issuer_id_format(issuer_id) {
            return Err(TargetPayError::UnknownIssuer(issuer_id.to_string()));
        }
        let known = self.issuers().await?.iter().any(|i| i.id == issuer_id);
        if !known {
            return Err(TargetPayError::UnknownIssuer(issuer_id.to_string()));
        }
        self.request.set_issuer_field(issuer_id);
        Ok(())
    }

    /// Starts the transaction at the gateway.
    ///
    /// Returns `Ok(true)` when the transaction is started, including when
    /// it already was: a started payment never re-issues the request.
    /// Returns `Ok(false)` when the transport failed or the gateway
    /// declined; the full response text is retained in [`response()`](Self::response)
    /// and the state moves to [`PaymentState::Failed`]. Missing required
    /// fields fail fast with a validation error and leave the state
    /// untouched. Nothing is retried automatically.
    pub async fn start(&mut self) -> Result<bool> {
        if self.result.is_some() {
            return Ok(true);
        }
        self.check_required_fields()?;
        if self.request.client_ip().is_none() {
            if let Some(addr) = self.request.remote_addr().map(str::to_string) {
                self.request.set_client_ip(&addr)?;
            }
        }

        let url = self.request.request_url();
        tracing::debug!(method = self.method().name(), %url, "starting transaction");
        let body = match self.transport.get(&url).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(method = self.method().name(), %err, "start transport failure");
                self.state = PaymentState::Failed;
                self.response = Some(err.to_string());
                return Ok(false);
            }
        };

        let body = body.trim().to_string();
        match parse_start_response(&body) {
            Some((transaction_id, redirect_url)) => {
                // Identifier and redirect URL are stored together or not at all.
                self.result = Some(TransactionResult {
                    transaction_id,
                    redirect_url,
                    raw_response: body.clone(),
                });
                self.response = Some(body);
                self.state = PaymentState::Started;
                Ok(true)
            }
            None => {
                tracing::warn!(
                    method = self.method().name(),
                    response = %body,
                    "gateway declined or malformed start response"
                );
                self.state = PaymentState::Failed;
                self.response = Some(body);
                Ok(false)
            }
        }
    }

    fn check_required_fields(&self) -> Result<()> {
        if self.request.amount().is_none() {
            return Err(TargetPayError::MissingField("amount"));
        }
        if self.request.description().is_none() {
            return Err(TargetPayError::MissingField("description"));
        }
        if self.request.return_url().is_none() {
            return Err(TargetPayError::MissingField("returnurl"));
        }
        match self.method() {
            PaymentMethod::Ideal if self.request.issuer().is_none() => {
                Err(TargetPayError::MissingField("bank"))
            }
            PaymentMethod::SofortBanking if self.request.country().is_none() => {
                Err(TargetPayError::MissingField("country"))
            }
            _ => Ok(()),
        }
    }
}

/// Parses a start response of the shape `"000000 <trxid>|<redirect>"`.
///
/// Anything else (a different code, a missing payload, a payload without
/// the separator) is a failed start and the caller keeps the raw text.
fn parse_start_response(body: &str) -> Option<(String, String)> {
    let (code, payload) = body.split_once(' ')?;
    if code != START_OK || payload.is_empty() {
        return None;
    }
    let (transaction_id, redirect_url) = payload.split_once('|')?;
    if transaction_id.is_empty() || redirect_url.is_empty() {
        return None;
    }
    Some((transaction_id.to_string(), redirect_url.to_string()))
}

/// Parses the issuer-list XML: repeated `<issuer id="NNNN">Name</issuer>`.
fn parse_issuer_list(xml: &str) -> Result<Vec<Issuer>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let protocol = |detail: String| TargetPayError::Protocol(format!("issuer list: {detail}"));

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut issuers = Vec::new();
    let mut current_id: Option<String> = None;
    loop {
        match reader.read_event().map_err(|e| protocol(e.to_string()))? {
            Event::Start(start) if start.name().as_ref() == b"issuer" => {
                let id = start
                    .try_get_attribute("id")
                    .map_err(|e| protocol(e.to_string()))?
                    .ok_or_else(|| protocol("issuer element without id".to_string()))?;
                let id = id
                    .unescape_value()
                    .map_err(|e| protocol(e.to_string()))?
                    .into_owned();
                current_id = Some(id);
            }
            Event::Text(text) => {
                if let Some(id) = current_id.take() {
                    let name = text
                        .unescape()
                        .map_err(|e| protocol(e.to_string()))?
                        .into_owned();
                    issuers.push(Issuer { id, name });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if issuers.is_empty() {
        return Err(protocol("no issuer elements in response".to_string()));
    }
    Ok(issuers)
}
