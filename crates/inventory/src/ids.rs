//! Strongly-typed identifiers for products and warehouse locations.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, ValueObject};

/// Identifier of a product (the unique key of the stock table).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub(crate) String);

/// Identifier of a shelf (e.g. `A1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShelfId(pub(crate) String);

/// Identifier of an aisle, the zone grouping several shelves (e.g. `A`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AisleId(pub(crate) String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Build the identifier, trimming surrounding whitespace.
            ///
            /// Blank input is rejected.
            pub fn new(value: impl AsRef<str>) -> Result<Self, DomainError> {
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, " cannot be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ValueObject for $t {}
    };
}

impl_string_newtype!(ProductId, "product id");
impl_string_newtype!(ShelfId, "shelf id");
impl_string_newtype!(AisleId, "aisle id");

impl ShelfId {
    /// The aisle this shelf belongs to.
    ///
    /// Leading run of alphabetic characters (`A1` -> `A`, `BB12` -> `BB`), or
    /// the first character when the shelf has no alphabetic prefix.
    pub fn aisle(&self) -> AisleId {
        let prefix: String = self.0.chars().take_while(|c| c.is_alphabetic()).collect();
        if prefix.is_empty() {
            // Non-empty by construction.
            AisleId(self.0.chars().take(1).collect())
        } else {
            AisleId(prefix)
        }
    }
}
