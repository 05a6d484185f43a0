//! Catalog classification and session role enums.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an enum from an unrecognised string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    /// What was being parsed (e.g. "category").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Product category, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Flower,
    Edibles,
    Vapes,
    Concentrates,
    Topicals,
    #[serde(rename = "Pre-Rolls")]
    PreRolls,
}

impl ProductCategory {
    /// Every category, in the order the shop menu lists them.
    pub const ALL: [Self; 6] = [
        Self::Flower,
        Self::Edibles,
        Self::Vapes,
        Self::Concentrates,
        Self::Topicals,
        Self::PreRolls,
    ];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flower => "Flower",
            Self::Edibles => "Edibles",
            Self::Vapes => "Vapes",
            Self::Concentrates => "Concentrates",
            Self::Topicals => "Topicals",
            Self::PreRolls => "Pre-Rolls",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("category", s))
    }
}

/// Plant/strain classification used as a filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrainType {
    Indica,
    Sativa,
    Hybrid,
    #[serde(rename = "CBD")]
    Cbd,
}

impl StrainType {
    /// Every strain type, in menu order.
    pub const ALL: [Self; 4] = [Self::Indica, Self::Sativa, Self::Hybrid, Self::Cbd];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indica => "Indica",
            Self::Sativa => "Sativa",
            Self::Hybrid => "Hybrid",
            Self::Cbd => "CBD",
        }
    }
}

impl fmt::Display for StrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrainType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant::new("strain type", s))
    }
}

/// Capability level of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May manage the catalog.
    Admin,
    /// Regular shopper.
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            _ => Err(UnknownVariant::new("role", s)),
        }
    }
}
