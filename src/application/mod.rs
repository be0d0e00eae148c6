//! Application layer: the payment lifecycle, inbound push validation and
//! pull-based status checks.

pub mod lifecycle;
pub mod pull;
pub mod push;
