//! Brazilian postal code (CEP) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input string is empty (or only whitespace).
    #[error("postal code cannot be empty")]
    Empty,
    /// The input does not have exactly eight digits.
    #[error("postal code must have {expected} digits (got {actual})")]
    InvalidLength {
        /// Required number of digits.
        expected: usize,
        /// Number of characters found after normalization.
        actual: usize,
    },
    /// The input contains something other than ASCII digits.
    #[error("postal code must contain only digits")]
    NonDigit,
}

/// A postal code in canonical form: exactly eight ASCII digits.
///
/// Parsing accepts the display form with a hyphen after the fifth digit and
/// ignores surrounding whitespace, so `"37540-000"` and `" 37540000 "` both
/// normalize to `"37540000"`.
///
/// ## Examples
///
/// ```
/// use customer_registry_core::PostalCode;
///
/// assert_eq!(PostalCode::parse("37540-000").unwrap().as_str(), "37540000");
/// assert!(PostalCode::parse("").is_err());
/// assert!(PostalCode::parse("1234").is_err());
/// assert!(PostalCode::parse("3754O000").is_err()); // letter O
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a CEP.
    pub const LENGTH: usize = 8;

    /// Position of the optional display hyphen.
    const HYPHEN_AT: usize = 5;

    /// Parse and normalize a `PostalCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty after trimming
    /// - Does not have exactly eight characters once the display hyphen is removed
    /// - Contains anything other than ASCII digits
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PostalCodeError::Empty);
        }

        let normalized = if trimmed.len() == Self::LENGTH + 1
            && trimmed.as_bytes().get(Self::HYPHEN_AT) == Some(&b'-')
        {
            trimmed.replacen('-', "", 1)
        } else {
            trimmed.to_owned()
        };

        let actual = normalized.chars().count();
        if actual != Self::LENGTH {
            return Err(PostalCodeError::InvalidLength {
                expected: Self::LENGTH,
                actual,
            });
        }

        if !normalized.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::NonDigit);
        }

        Ok(Self(normalized))
    }

    /// Returns the canonical eight-digit form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the display form with a hyphen (`"37540-000"`).
    #[must_use]
    pub fn formatted(&self) -> String {
        let (head, tail) = self.0.split_at(Self::HYPHEN_AT);
        format!("{head}-{tail}")
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PostalCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PostalCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PostalCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
