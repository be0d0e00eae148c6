//! Client for the TargetPay hosted payment gateway.
//!
//! Three flows are covered: starting a redirect-based payment transaction
//! ([`application::lifecycle::Payment`]), validating asynchronous status
//! push notifications ([`application::push`]) and pulling transaction
//! status ([`application::pull::StatusCheck`]). The HTTP transport is a
//! port ([`domain::ports::HttpTransport`]); hosts inject the bundled
//! reqwest adapter or their own.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
