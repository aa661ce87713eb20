//! Account addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of originated (smart contract) accounts.
pub const CONTRACT_PREFIX: &str = "KT1";

/// A base58check account address such as `tz1...` or `KT1...`.
///
/// Addresses arrive pre-validated from configuration and the cycle data
/// source, so no checksum verification happens here.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is an originated contract account.
    pub fn is_contract(&self) -> bool {
        self.0.starts_with(CONTRACT_PREFIX)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}
