//! Customer records and their validated name.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::id::CustomerId;

/// Errors that can occur when parsing a [`CustomerName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerNameError {
    /// The input is empty or only whitespace.
    #[error("name cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A customer's display name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerName(String);

impl CustomerName {
    /// Maximum length of a name, in characters.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `CustomerName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, CustomerNameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CustomerNameError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(CustomerNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CustomerName {
    type Error = CustomerNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerName> for String {
    fn from(name: CustomerName) -> Self {
        name.0
    }
}

/// A stored customer.
///
/// The address is always a store-resident record: customers are only written
/// after their postal code has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: CustomerName,
    pub address: Address,
}

/// A customer about to be written.
///
/// `id` is `None` for an insert (the store assigns one) and `Some` to
/// overwrite an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub id: Option<CustomerId>,
    pub name: CustomerName,
    pub address: Address,
}

impl CustomerDraft {
    /// Attach the identifier the store assigned.
    #[must_use]
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            address: self.address,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::PostalCode;

    #[test]
    fn test_name_trims() {
        assert_eq!(CustomerName::parse("  Ana ").unwrap().as_str(), "Ana");
    }

    #[test]
    fn test_name_empty() {
        assert_eq!(CustomerName::parse(" \t"), Err(CustomerNameError::Empty));
    }

    #[test]
    fn test_name_too_long() {
        let long = "a".repeat(CustomerName::MAX_LENGTH + 1);
        assert!(matches!(
            CustomerName::parse(&long),
            Err(CustomerNameError::TooLong { .. })
        ));
        assert!(CustomerName::parse(&"a".repeat(CustomerName::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_customer_wire_shape() {
        let customer = Customer {
            id: CustomerId::new(1),
            name: CustomerName::parse("Ana").unwrap(),
            address: Address::bare(PostalCode::parse("37540000").unwrap()),
        };

        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["address"]["postalCode"], "37540000");
    }

    #[test]
    fn test_draft_into_customer() {
        let draft = CustomerDraft {
            id: None,
            name: CustomerName::parse("Ana").unwrap(),
            address: Address::bare(PostalCode::parse("37540000").unwrap()),
        };
        let customer = draft.into_customer(CustomerId::new(5));
        assert_eq!(customer.id, CustomerId::new(5));
        assert_eq!(customer.name.as_str(), "Ana");
    }
}
