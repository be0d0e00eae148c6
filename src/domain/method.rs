use crate::error::{Result, TargetPayError};
use serde::{Deserialize, Serialize};

/// The payment methods supported by the gateway.
///
/// Every method shares the same start/check protocol; only the endpoints,
/// the amount bounds and a few extra request fields differ. New methods are
/// added here as new profile entries, not as new protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// iDEAL: issuer-selection debit transfer (Dutch banks).
    Ideal,
    /// Bancontact/Mister Cash wallet payments.
    MisterCash,
    /// SOFORT Banking (DIRECTebanking) bank redirect.
    SofortBanking,
    /// Paysafecard prepaid vouchers.
    Paysafecard,
}

/// Static per-method configuration: endpoints and amount bounds in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodProfile {
    pub name: &'static str,
    pub start_url: &'static str,
    pub check_url: &'static str,
    pub minimum_amount: u32,
    pub maximum_amount: u32,
}

const IDEAL: MethodProfile = MethodProfile {
    name: "ideal",
    start_url: "https://www.targetpay.com/ideal/start",
    check_url: "https://www.targetpay.com/ideal/check",
    minimum_amount: 84,
    maximum_amount: 1_000_000,
};

const MISTER_CASH: MethodProfile = MethodProfile {
    name: "mrcash",
    start_url: "https://www.targetpay.com/mrcash/start",
    check_url: "https://www.targetpay.com/mrcash/check",
    minimum_amount: 49,
    maximum_amount: 500_000,
};

const SOFORT_BANKING: MethodProfile = MethodProfile {
    name: "directebanking",
    start_url: "https://www.targetpay.com/directebanking/start",
    check_url: "https://www.targetpay.com/directebanking/check",
    minimum_amount: 49,
    maximum_amount: 500_000,
};

const PAYSAFECARD: MethodProfile = MethodProfile {
    name: "paysafecard",
    start_url: "https://www.targetpay.com/paysafecard/start",
    check_url: "https://www.targetpay.com/paysafecard/check",
    minimum_amount: 10,
    maximum_amount: 15_000,
};

/// Endpoint for the current iDEAL issuer list in XML form.
pub const IDEAL_ISSUER_URL: &str = "https://www.targetpay.com/ideal/getissuers.php?format=xml";

impl PaymentMethod {
    pub const fn profile(self) -> &'static MethodProfile {
        match self {
            PaymentMethod::Ideal => &IDEAL,
            PaymentMethod::MisterCash => &MISTER_CASH,
            PaymentMethod::SofortBanking => &SOFORT_BANKING,
            PaymentMethod::Paysafecard => &PAYSAFECARD,
        }
    }

    pub const fn name(self) -> &'static str {
        self.profile().name
    }

    /// Resolves a method name or one of its historical aliases.
    ///
    /// Payment method and provider names change over time, so the check
    /// endpoint is reachable under a number of aliases. Matching is
    /// case-insensitive and treats `-` and spaces as `_`.
    pub fn from_alias(name: &str) -> Result<Self> {
        let normalized = name.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "ideal" => Ok(PaymentMethod::Ideal),
            "mrcash" | "mr_cash" | "mistercash" | "mister_cash" | "bancontact"
            | "bancontact_mister_cash" => Ok(PaymentMethod::MisterCash),
            "directebanking" | "direct_ebanking" | "sofort" | "sofortbanking"
            | "sofort_banking" | "sofortuberweisung" => Ok(PaymentMethod::SofortBanking),
            "paysafecard" | "wallie" | "wallie_card" => Ok(PaymentMethod::Paysafecard),
            _ => Err(TargetPayError::UnknownMethod(name.to_string())),
        }
    }
}

/// A selectable bank for issuer-based redirect payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub id: String,
    pub name: String,
}

impl Issuer {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Last-known-good list of iDEAL issuers.
///
/// May be used by callers when the live issuer request fails; the loader
/// never substitutes it on its own.
pub fn known_issuers() -> Vec<Issuer> {
    vec![
        Issuer::new("0031", "ABN Amro"),
        Issuer::new("0761", "ASN Bank"),
        Issuer::new("0091", "Friesland Bank"),
        Issuer::new("0721", "ING"),
        Issuer::new("0801", "Knab"),
        Issuer::new("0021", "Rabobank"),
        Issuer::new("0771", "RegioBank"),
        Issuer::new("0751", "SNS Bank"),
        Issuer::new("0511", "Triodos Bank"),
        Issuer::new("0161", "Van Lanschot Bankiers"),
    ]
}

/// Maps an ISO 3166-1 country code (alpha-2, alpha-3 or numeric) to the
/// gateway's SOFORT Banking country parameter.
///
/// The gateway only supports a subset of the SOFORT countries; anything
/// outside this table is rejected by the caller with `UnsupportedCountry`.
pub fn sofort_country_code(country: &str) -> Option<u32> {
    match country.trim().to_uppercase().as_str() {
        "32" | "BE" | "BEL" | "056" => Some(32),  // Belgium
        "41" | "CH" | "CHE" | "756" => Some(41),  // Switzerland
        "43" | "AT" | "AUT" | "040" => Some(43),  // Austria
        "49" | "DE" | "DEU" | "276" => Some(49),  // Germany
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_bounds_per_method() {
        assert_eq!(PaymentMethod::Ideal.profile().minimum_amount, 84);
        assert_eq!(PaymentMethod::Ideal.profile().maximum_amount, 1_000_000);
        assert_eq!(PaymentMethod::MisterCash.profile().minimum_amount, 49);
        assert_eq!(PaymentMethod::SofortBanking.profile().maximum_amount, 500_000);
        assert_eq!(PaymentMethod::Paysafecard.profile().minimum_amount, 10);
        assert_eq!(PaymentMethod::Paysafecard.profile().maximum_amount, 15_000);
    }

    #[test]
    fn test_alias_resolution() {
        for alias in [
            "mrcash",
            "MisterCash",
            "MR_CASH",
            "mr-cash",
            "bancontact_mister_cash",
        ] {
            assert_eq!(
                PaymentMethod::from_alias(alias).unwrap(),
                PaymentMethod::MisterCash,
                "alias {alias} should resolve"
            );
        }
        for alias in ["directebanking", "SOFORTBanking", "sofortuberweisung"] {
            assert_eq!(
                PaymentMethod::from_alias(alias).unwrap(),
                PaymentMethod::SofortBanking
            );
        }
        for alias in ["wallie", "WALLIE_CARD", "paysafecard"] {
            assert_eq!(
                PaymentMethod::from_alias(alias).unwrap(),
                PaymentMethod::Paysafecard
            );
        }
        assert!(matches!(
            PaymentMethod::from_alias("giropay"),
            Err(TargetPayError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_sofort_country_table() {
        assert_eq!(sofort_country_code("DE"), Some(49));
        assert_eq!(sofort_country_code("deu"), Some(49));
        assert_eq!(sofort_country_code("276"), Some(49));
        assert_eq!(sofort_country_code("BE"), Some(32));
        assert_eq!(sofort_country_code("056"), Some(32));
        assert_eq!(sofort_country_code("CH"), Some(41));
        assert_eq!(sofort_country_code("AT"), Some(43));
        assert_eq!(sofort_country_code("NL"), None);
    }

    #[test]
    fn test_known_issuers_fallback() {
        let issuers = known_issuers();
        assert_eq!(issuers.len(), 10);
        assert!(issuers.iter().any(|i| i.id == "0721" && i.name == "ING"));
    }
}
