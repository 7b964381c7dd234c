//! Offset chains: the fixed navigation path of a pointer trail.
//!
//! Chains are written as comma-separated integer literals, for example
//! `0x34, 0x150, 0x8`. Decimal and hex (`0x`/`0X`) literals may be mixed and
//! may carry a sign. Each offset remembers how it was written so a chain read
//! from a configuration file is written back the same way. Leading zeros of hex
//! literals are not kept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How an offset literal was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Notation {
    #[default]
    Decimal,
    Hex {
        upper: bool,
    },
}

/// A signed byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    value: i64,
    notation: Notation,
}

impl Offset {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            notation: Notation::Decimal,
        }
    }

    pub fn hex(value: i64) -> Self {
        Self {
            value,
            notation: Notation::Hex { upper: false },
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn notation(&self) -> Notation {
        self.notation
    }
}

impl From<i64> for Offset {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl FromStr for Offset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let literal = s.trim();
        let invalid = || Error::InvalidOffset(format!("'{}' is not an integer literal", literal));

        let (negative, unsigned) = match literal.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, literal.strip_prefix('+').unwrap_or(literal)),
        };

        let (notation, magnitude) = match unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            Some(digits) => {
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid());
                }
                let upper = digits.chars().any(|c| c.is_ascii_uppercase());
                let magnitude = i64::from_str_radix(digits, 16).map_err(|_| invalid())?;
                (Notation::Hex { upper }, magnitude)
            }
            None => {
                if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                (Notation::Decimal, unsigned.parse::<i64>().map_err(|_| invalid())?)
            }
        };

        Ok(Self {
            value: if negative { -magnitude } else { magnitude },
            notation,
        })
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.notation {
            Notation::Decimal => write!(f, "{}", self.value),
            Notation::Hex { upper } => {
                let sign = if self.value < 0 { "-" } else { "" };
                let magnitude = self.value.unsigned_abs();
                if upper {
                    write!(f, "{}0x{:X}", sign, magnitude)
                } else {
                    write!(f, "{}0x{:x}", sign, magnitude)
                }
            }
        }
    }
}

/// Ordered, non-empty list of offsets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OffsetChain {
    offsets: Vec<Offset>,
}

impl OffsetChain {
    pub fn new(offsets: impl IntoIterator<Item = Offset>) -> Result<Self> {
        let offsets: Vec<Offset> = offsets.into_iter().collect();
        if offsets.is_empty() {
            return Err(Error::InvalidOffset(
                "Offset chain needs at least one offset".to_string(),
            ));
        }
        Ok(Self { offsets })
    }

    /// Build a chain of hex offsets from raw values
    pub fn from_values(values: &[i64]) -> Result<Self> {
        Self::new(values.iter().copied().map(Offset::hex))
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false; chains are never empty
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Offset> {
        self.offsets.iter()
    }

    pub fn values(&self) -> Vec<i64> {
        self.offsets.iter().map(Offset::value).collect()
    }

    /// Split into the offsets followed by a dereference and the final one
    pub fn split_last(&self) -> (&[Offset], Offset) {
        match self.offsets.split_last() {
            Some((last, links)) => (links, *last),
            None => unreachable!("offset chains are never empty"),
        }
    }
}

impl<const N: usize> From<[i64; N]> for OffsetChain {
    fn from(values: [i64; N]) -> Self {
        const { assert!(N > 0, "offset chains are never empty") };
        Self {
            offsets: values.into_iter().map(Offset::hex).collect(),
        }
    }
}

impl FromStr for OffsetChain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let offsets = s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Offset::from_str)
            .collect::<Result<Vec<_>>>()?;
        Self::new(offsets)
    }
}

impl fmt::Display for OffsetChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, offset) in self.offsets.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", offset)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for OffsetChain {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OffsetChain> for String {
    fn from(chain: OffsetChain) -> Self {
        chain.to_string()
    }
}
