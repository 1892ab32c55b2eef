//! Address records keyed by postal code.

use serde::{Deserialize, Serialize};

use super::postal_code::PostalCode;

/// A resolved address.
///
/// The postal code is the identity of an address record; every other field is
/// municipality-level metadata as reported by the postal lookup service. Fields
/// the service leaves out are empty strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub postal_code: PostalCode,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub complement: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    /// Two-letter state abbreviation (UF).
    #[serde(default)]
    pub state: String,
    /// IBGE municipality code.
    #[serde(default)]
    pub ibge_code: String,
    /// State tax authority (GIA) code; only some states report one.
    #[serde(default)]
    pub gia_code: String,
    /// Telephone area code (DDD).
    #[serde(default)]
    pub area_code: String,
    /// Federal treasury (SIAFI) municipality code.
    #[serde(default)]
    pub tax_system_code: String,
}

impl Address {
    /// Create an address that carries only its postal code.
    #[must_use]
    pub fn bare(postal_code: PostalCode) -> Self {
        Self {
            postal_code,
            street: String::new(),
            complement: String::new(),
            unit: String::new(),
            neighborhood: String::new(),
            city: String::new(),
            state: String::new(),
            ibge_code: String::new(),
            gia_code: String::new(),
            area_code: String::new(),
            tax_system_code: String::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let mut address = Address::bare(PostalCode::parse("37540000").unwrap());
        address.city = "Ouro Fino".to_string();
        address.ibge_code = "3146206".to_string();

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["postalCode"], "37540000");
        assert_eq!(json["city"], "Ouro Fino");
        assert_eq!(json["ibgeCode"], "3146206");
        assert_eq!(json["taxSystemCode"], "");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let address: Address = serde_json::from_str(r#"{"postalCode": "37540-000"}"#).unwrap();
        assert_eq!(address, Address::bare(PostalCode::parse("37540000").unwrap()));
    }

    #[test]
    fn test_invalid_postal_code_rejected() {
        assert!(serde_json::from_str::<Address>(r#"{"postalCode": ""}"#).is_err());
    }
}
