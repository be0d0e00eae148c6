use thiserror::Error;

/// Errors raised by the TargetPay client.
///
/// Validation variants are raised synchronously by setters and never touch
/// the network. The `TP` prefixes in the messages are the error codes the
/// gateway documents for the same conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetPayError {
    #[error("TP0001 no layout code: {0:?} is not numeric")]
    MissingLayoutCode(String),
    #[error("invalid amount: {0:?} is not an amount in cents")]
    InvalidAmount(String),
    #[error("TP0002 amount too low: {amount} cents is below the {minimum} cent minimum")]
    AmountTooLow { amount: u32, minimum: u32 },
    #[error("TP0003 amount too high: {amount} cents is above the {maximum} cent maximum")]
    AmountTooHigh { amount: u32, maximum: u32 },
    #[error("description is empty after normalization")]
    EmptyDescription,
    #[error("invalid return URL: {0:?}")]
    InvalidReturnUrl(String),
    #[error("invalid report URL: {0:?}")]
    InvalidReportUrl(String),
    #[error("invalid client IP address: {0:?}")]
    InvalidClientIp(String),
    #[error("TP0008 country not supported: {0:?}")]
    UnsupportedCountry(String),
    #[error("unknown issuer: {0:?}")]
    UnknownIssuer(String),
    #[error("unknown payment method: {0:?}")]
    UnknownMethod(String),
    #[error("{operation} is not available for {method}")]
    Unsupported {
        operation: &'static str,
        method: &'static str,
    },
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    /// Connection, DNS or timeout failure during an outbound call.
    #[error("transport error: {message}")]
    Transport { code: Option<u16>, message: String },

    /// A well-formed transport response that does not match the gateway grammar.
    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, TargetPayError>;
