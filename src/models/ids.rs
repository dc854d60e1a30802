//! Record identifiers
//!
//! Ids are random UUIDs, serialized as the bare UUID string. For people they
//! are shown in a short form, a type prefix plus the first eight hex digits
//! (`txn-1a2b3c4d`), which the lookups in the service layer accept as well.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shortest hex prefix accepted when matching a short id
pub const MIN_SHORT_ID_LEN: usize = 4;

const SHORT_ID_LEN: usize = 8;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Prefix of the short display form
            pub const PREFIX: &'static str = $prefix;

            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn uuid(&self) -> Uuid {
                self.0
            }

            /// Parse a full UUID, with or without the type prefix
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                let s = s.trim();
                Uuid::parse_str(s.strip_prefix(Self::PREFIX).unwrap_or(s)).map(Self)
            }

            /// Whether `input` is a prefix of this id's hex digits
            ///
            /// The type prefix is optional. At least [`MIN_SHORT_ID_LEN`]
            /// digits are required.
            pub fn matches_short(&self, input: &str) -> bool {
                let input = input.trim();
                let digits = input.strip_prefix(Self::PREFIX).unwrap_or(input);
                digits.len() >= MIN_SHORT_ID_LEN
                    && self.0.hyphenated().to_string().starts_with(&digits.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let simple = self.0.simple().to_string();
                write!(f, "{}{}", Self::PREFIX, &simple[..SHORT_ID_LEN])
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

record_id!(
    /// Identifies a transaction
    TransactionId,
    "txn-"
);
record_id!(
    /// Identifies a category
    CategoryId,
    "cat-"
);
