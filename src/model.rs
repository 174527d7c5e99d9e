//! Domain types for the Find&Earn ledger
//!
//! Addresses, wei amounts, transaction hashes, and the two on-chain
//! record shapes (lost items and notifications). Records are decoded
//! field by field so a malformed reply names the exact field at fault.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FindEarnError;

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Chain account address
///
/// Stores the address string as received (checksum casing preserved),
/// but compares and hashes case-insensitively: the same account may
/// arrive as `0xAbC...` from the wallet and `0xabc...` from an event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// The address string exactly as received
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = FindEarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| FindEarnError::InvalidAddress(format!("missing 0x prefix: '{}'", s)))?;
        if digits.len() != 40 {
            return Err(FindEarnError::InvalidAddress(format!(
                "expected 40 hex digits, got {}: '{}'",
                digits.len(),
                s
            )));
        }
        hex::decode(digits).map_err(|e| FindEarnError::InvalidAddress(format!("'{}': {}", s, e)))?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = FindEarnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> String {
        addr.0
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction hash as returned by the node
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = FindEarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").ok_or_else(|| {
            FindEarnError::InvalidResponse(format!("transaction hash missing 0x prefix: '{}'", s))
        })?;
        if digits.len() != 64 || hex::decode(digits).is_err() {
            return Err(FindEarnError::InvalidResponse(format!(
                "malformed transaction hash: '{}'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for TxHash {
    type Error = FindEarnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> String {
        hash.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currency amount in wei
///
/// Crosses the wire as a decimal string (wei overflows the safe JSON
/// integer range). `Display` renders the human decimal ETH form with
/// trailing zeros trimmed: `1500000000000000000` wei shows as "1.5".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    pub fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    pub fn as_wei(&self) -> u128 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = FindEarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wei = s
            .parse::<u128>()
            .map_err(|e| FindEarnError::InvalidAmount(format!("'{}': {}", s, e)))?;
        Ok(Self(wei))
    }
}

impl TryFrom<String> for Amount {
    type Error = FindEarnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> String {
        amount.0.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WEI_PER_ETH;
        let frac = self.0 % WEI_PER_ETH;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            let padded = format!("{:018}", frac);
            write!(f, "{}.{}", whole, padded.trim_end_matches('0'))
        }
    }
}

/// One reported lost item as stored on chain
#[derive(Clone, Debug, PartialEq)]
pub struct LostItem {
    pub id: u64,
    pub reporter: Address,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: String,
    pub is_found: bool,
    pub reward: Amount,
    pub reward_claimed: bool,
    pub reported_at: DateTime<Utc>,
}

impl LostItem {
    /// Decode an item record from its JSON wire form
    ///
    /// Extracts every field explicitly so a missing or mistyped field
    /// produces an error naming it, rather than a generic decode failure.
    pub fn from_record(record: &Value) -> Result<Self, FindEarnError> {
        Ok(Self {
            id: u64_field(record, "id")?,
            reporter: address_field(record, "reporter")?,
            name: str_field(record, "name")?,
            description: str_field(record, "description")?,
            location: str_field(record, "location")?,
            contact: str_field(record, "contact")?,
            is_found: bool_field(record, "isFound")?,
            reward: amount_field(record, "reward")?,
            reward_claimed: bool_field(record, "rewardClaimed")?,
            reported_at: timestamp_field(record, "reportedAt")?,
        })
    }

    /// Report time in display form, e.g. "2026-03-14 09:26:53 UTC"
    pub fn reported_at_display(&self) -> String {
        format!("{} UTC", self.reported_at.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// One item-found notification delivered to a reporter
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub item_id: u64,
    pub finder: Address,
    pub message: String,
    pub finder_contact: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Decode a notification record from its JSON wire form
    pub fn from_record(record: &Value) -> Result<Self, FindEarnError> {
        Ok(Self {
            id: u64_field(record, "id")?,
            item_id: u64_field(record, "itemId")?,
            finder: address_field(record, "finder")?,
            message: str_field(record, "message")?,
            finder_contact: str_field(record, "finderContact")?,
            is_read: bool_field(record, "isRead")?,
            created_at: timestamp_field(record, "createdAt")?,
        })
    }

    /// Creation time in display form
    pub fn created_at_display(&self) -> String {
        format!("{} UTC", self.created_at.format("%Y-%m-%d %H:%M:%S"))
    }
}

// Field extraction helpers for record decoding
fn field<'a>(record: &'a Value, name: &str) -> Result<&'a Value, FindEarnError> {
    record
        .get(name)
        .ok_or_else(|| FindEarnError::InvalidRecord(format!("missing field '{}'", name)))
}

fn str_field(record: &Value, name: &str) -> Result<String, FindEarnError> {
    field(record, name)?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| FindEarnError::InvalidRecord(format!("field '{}' is not a string", name)))
}

fn u64_field(record: &Value, name: &str) -> Result<u64, FindEarnError> {
    field(record, name)?
        .as_u64()
        .ok_or_else(|| FindEarnError::InvalidRecord(format!("field '{}' is not an integer", name)))
}

fn bool_field(record: &Value, name: &str) -> Result<bool, FindEarnError> {
    field(record, name)?
        .as_bool()
        .ok_or_else(|| FindEarnError::InvalidRecord(format!("field '{}' is not a boolean", name)))
}

fn address_field(record: &Value, name: &str) -> Result<Address, FindEarnError> {
    let raw = str_field(record, name)?;
    raw.parse()
        .map_err(|e| FindEarnError::InvalidRecord(format!("field '{}': {}", name, e)))
}

fn amount_field(record: &Value, name: &str) -> Result<Amount, FindEarnError> {
    let raw = str_field(record, name)?;
    raw.parse()
        .map_err(|e| FindEarnError::InvalidRecord(format!("field '{}': {}", name, e)))
}

fn timestamp_field(record: &Value, name: &str) -> Result<DateTime<Utc>, FindEarnError> {
    let secs = field(record, name)?.as_i64().ok_or_else(|| {
        FindEarnError::InvalidRecord(format!("field '{}' is not a unix timestamp", name))
    })?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        FindEarnError::InvalidRecord(format!("field '{}' is out of range: {}", name, secs))
    })
}
