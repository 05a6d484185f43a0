//! Catalog filtering.
//!
//! Pure derivation over a product slice: nothing here mutates, caches, or
//! re-sorts. The output keeps the input order.

use core::fmt;
use core::str::FromStr;

use cannabiabuds_core::{ProductCategory, StrainType};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

use crate::catalog::Product;

/// A filter dimension: either everything, or one concrete value.
///
/// Written and read as `"All"` or as the value's own wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    /// The "All" sentinel.
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this selection.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
{
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

impl<T: Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("All"),
            Self::Only(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// User-selected listing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub category: Selection<ProductCategory>,
    #[serde(default)]
    pub strain_type: Selection<StrainType>,
    /// Only products with a sale price.
    #[serde(default)]
    pub deals_only: bool,
}

impl FilterCriteria {
    /// Criteria that pass every product.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Criteria for the deals page.
    #[must_use]
    pub fn deals() -> Self {
        Self {
            deals_only: true,
            ..Self::default()
        }
    }

    /// Whether a single product passes all three predicates.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        (!self.deals_only || product.is_on_sale())
            && self.category.admits(&product.category)
            && self.strain_type.admits(&product.strain_type)
    }
}

/// Lazily yield the products that pass `criteria`, in input order.
pub fn apply<'a>(
    products: &'a [Product],
    criteria: &FilterCriteria,
) -> impl Iterator<Item = &'a Product> + use<'a> {
    let criteria = *criteria;
    products.iter().filter(move |p| criteria.matches(p))
}
