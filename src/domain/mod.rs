//! Domain layer: payment method profiles, field validation and the
//! outbound transport port.

pub mod method;
pub mod params;
pub mod ports;
pub mod request;
