//! Product catalog.
//!
//! The [`CatalogStore`] is the source of truth for every sellable product.
//! It trusts its caller: role checks happen at the access-control boundary
//! (see [`crate::session::authorize`]), never in here.

mod seed;

use cannabiabuds_core::{Price, PriceError, ProductCategory, ProductId, ProductIdGenerator, StrainType};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use seed::seed_products;

/// Image used when a draft does not provide one.
pub const DEFAULT_IMAGE: &str = "https://picsum.photos/500/500";

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub strain_type: StrainType,
    /// Base (list) price.
    pub price: Price,
    /// Promotional price; present only while the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Price>,
    /// THC percentage (flower, vapes) or dose in mg (edibles, topicals).
    pub thc: f64,
    /// CBD percentage or dose in mg.
    pub cbd: f64,
    pub description: String,
    pub effects: Vec<String>,
    pub flavors: Vec<String>,
    pub image: String,
    /// Aggregate rating, 0-5.
    pub rating: f64,
    pub reviews: u32,
    pub in_stock: bool,
}

impl Product {
    /// Sale price if the product is on promotion, otherwise the base price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether the product currently has a promotional price.
    #[must_use]
    pub const fn is_on_sale(&self) -> bool {
        self.sale_price.is_some()
    }
}

/// Input for creating a product.
///
/// Raw on purpose: prices arrive as plain decimals and are checked by
/// [`CatalogStore::create`], which reports problems as [`ValidationError`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    pub category: Option<ProductCategory>,
    pub strain_type: Option<StrainType>,
    pub price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub thc: f64,
    #[serde(default)]
    pub cbd: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<String>,
    #[serde(default)]
    pub flavors: Vec<String>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

/// Partial update for an existing product.
///
/// Absent fields are left unchanged. For `sale_price`, an explicit `null`
/// ends the promotion while an absent field keeps it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<ProductCategory>,
    pub strain_type: Option<StrainType>,
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "present")]
    pub sale_price: Option<Option<Decimal>>,
    pub thc: Option<f64>,
    pub cbd: Option<f64>,
    pub description: Option<String>,
    pub effects: Option<Vec<String>>,
    pub flavors: Option<Vec<String>>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

/// Marks a field as present (even when it is `null`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Malformed create/update input. Not retryable without correcting input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("product name is required")]
    MissingName,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field}: {source}")]
    InvalidPrice {
        field: &'static str,
        source: PriceError,
    },

    #[error("sale price {sale} must not exceed base price {price}")]
    SaleAbovePrice { sale: Decimal, price: Decimal },

    #[error("{field} must be a non-negative number")]
    InvalidPotency { field: &'static str },

    #[error("image must be an absolute URL: {0}")]
    InvalidImage(String),
}

/// Errors returned by catalog mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("invalid product: {0}")]
    Validation(#[from] ValidationError),

    #[error("product not found: {0}")]
    NotFound(ProductId),
}

/// Ordered, identity-unique set of products.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    ids: ProductIdGenerator,
}

impl CatalogStore {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the fixed launch assortment.
    #[must_use]
    pub fn seeded() -> Self {
        let mut catalog = Self::new();
        for product in seed_products() {
            if !catalog.contains(&product.id) {
                catalog.products.push(product);
            }
        }
        catalog
    }

    /// Products in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Whether a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// First `limit` in-stock products, in catalog order.
    pub fn featured(&self, limit: usize) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.in_stock).take(limit)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Validate a draft and append it under a freshly minted id.
    ///
    /// The new product starts with no rating and no reviews.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the draft is malformed.
    pub fn create(&mut self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let price = parse_price("price", draft.price.ok_or(ValidationError::MissingField("price"))?)?;
        let sale_price = draft
            .sale_price
            .map(|sale| parse_price("sale_price", sale))
            .transpose()?;

        let mut product = Product {
            id: ProductId::new(""),
            name: draft.name,
            category: draft
                .category
                .ok_or(ValidationError::MissingField("category"))?,
            strain_type: draft
                .strain_type
                .ok_or(ValidationError::MissingField("strain_type"))?,
            price,
            sale_price,
            thc: draft.thc,
            cbd: draft.cbd,
            description: draft.description,
            effects: draft.effects,
            flavors: draft.flavors,
            image: draft.image.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
            rating: 0.0,
            reviews: 0,
            in_stock: draft.in_stock.unwrap_or(true),
        };
        normalise(&mut product);
        validate(&product)?;

        product.id = loop {
            let candidate = self.ids.next_id();
            if !self.contains(&candidate) {
                break candidate;
            }
        };

        tracing::debug!(product_id = %product.id, name = %product.name, "product created");
        self.products.push(product.clone());
        Ok(product)
    }

    /// Merge `patch` into an existing product.
    ///
    /// The merged product is validated before it replaces the stored one, so
    /// a rejected patch leaves the catalog untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` is unknown, or
    /// [`CatalogError::Validation`] if the merged product is malformed.
    pub fn update(&mut self, id: &ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        let slot = self
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        let mut merged = slot.clone();
        apply_patch(&mut merged, patch)?;
        normalise(&mut merged);
        validate(&merged)?;

        *slot = merged.clone();
        tracing::debug!(product_id = %id, "product updated");
        Ok(merged)
    }

    /// Remove a product and return it.
    ///
    /// Cart lines already holding a snapshot of it are not affected.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` is unknown.
    pub fn delete(&mut self, id: &ProductId) -> Result<Product, CatalogError> {
        let index = self
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        let removed = self.products.remove(index);
        tracing::debug!(product_id = %id, "product deleted");
        Ok(removed)
    }
}

fn parse_price(field: &'static str, amount: Decimal) -> Result<Price, ValidationError> {
    Price::new(amount).map_err(|source| ValidationError::InvalidPrice { field, source })
}

fn apply_patch(product: &mut Product, patch: ProductPatch) -> Result<(), ValidationError> {
    if let Some(name) = patch.name {
        product.name = name;
    }
    if let Some(category) = patch.category {
        product.category = category;
    }
    if let Some(strain_type) = patch.strain_type {
        product.strain_type = strain_type;
    }
    if let Some(price) = patch.price {
        product.price = parse_price("price", price)?;
    }
    if let Some(sale_price) = patch.sale_price {
        product.sale_price = sale_price
            .map(|sale| parse_price("sale_price", sale))
            .transpose()?;
    }
    if let Some(thc) = patch.thc {
        product.thc = thc;
    }
    if let Some(cbd) = patch.cbd {
        product.cbd = cbd;
    }
    if let Some(description) = patch.description {
        product.description = description;
    }
    if let Some(effects) = patch.effects {
        product.effects = effects;
    }
    if let Some(flavors) = patch.flavors {
        product.flavors = flavors;
    }
    if let Some(image) = patch.image {
        product.image = image;
    }
    if let Some(in_stock) = patch.in_stock {
        product.in_stock = in_stock;
    }
    Ok(())
}

/// Trim text and collapse tag lists into sets (first occurrence wins).
fn normalise(product: &mut Product) {
    product.name = product.name.trim().to_owned();
    product.image = product.image.trim().to_owned();
    for tags in [&mut product.effects, &mut product.flavors] {
        let mut seen = Vec::with_capacity(tags.len());
        for tag in tags.drain(..) {
            let tag = tag.trim().to_owned();
            if !tag.is_empty() && !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        *tags = seen;
    }
}

fn validate(product: &Product) -> Result<(), ValidationError> {
    if product.name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    if let Some(sale) = product.sale_price
        && sale > product.price
    {
        return Err(ValidationError::SaleAbovePrice {
            sale: sale.amount(),
            price: product.price.amount(),
        });
    }

    for (field, value) in [("thc", product.thc), ("cbd", product.cbd)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidPotency { field });
        }
    }

    if url::Url::parse(&product.image).is_err() {
        return Err(ValidationError::InvalidImage(product.image.clone()));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn draft(name: &str, price: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            category: Some(ProductCategory::Flower),
            strain_type: Some(StrainType::Hybrid),
            price: Some(Decimal::new(price, 2)),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_seeded_catalog_has_launch_assortment() {
        let catalog = CatalogStore::seeded();
        assert_eq!(catalog.len(), 6);
        let ids: Vec<&str> = catalog.list().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_create_assigns_defaults() {
        let mut catalog = CatalogStore::new();
        let product = catalog.create(draft("Jack Herer", 4000)).unwrap();

        assert!(!product.id.as_str().is_empty());
        assert!(product.rating.abs() < f64::EPSILON);
        assert_eq!(product.reviews, 0);
        assert!(product.in_stock);
        assert_eq!(product.image, DEFAULT_IMAGE);
        assert_eq!(catalog.get(&product.id), Some(&product));
    }

    #[test]
    fn test_rapid_creates_never_collide() {
        let mut catalog = CatalogStore::seeded();
        let mut ids: HashSet<ProductId> = catalog.list().iter().map(|p| p.id.clone()).collect();
        for i in 0..250 {
            let product = catalog.create(draft(&format!("Batch {i}"), 1000)).unwrap();
            assert!(ids.insert(product.id), "duplicate id minted");
        }
        assert_eq!(catalog.len(), 256);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut catalog = CatalogStore::new();
        let err = catalog.create(draft("   ", 1000)).unwrap_err();
        assert_eq!(err, CatalogError::Validation(ValidationError::MissingName));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_create_rejects_missing_or_negative_price() {
        let mut catalog = CatalogStore::new();

        let mut missing = draft("Gelato", 0);
        missing.price = None;
        assert_eq!(
            catalog.create(missing).unwrap_err(),
            CatalogError::Validation(ValidationError::MissingField("price"))
        );

        let err = catalog.create(draft("Gelato", -100)).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::InvalidPrice { field: "price", .. })
        ));
    }

    #[test]
    fn test_create_rejects_sale_above_base() {
        let mut catalog = CatalogStore::new();
        let mut on_sale = draft("Gelato", 3000);
        on_sale.sale_price = Some(Decimal::new(3500, 2));
        assert!(matches!(
            catalog.create(on_sale).unwrap_err(),
            CatalogError::Validation(ValidationError::SaleAbovePrice { .. })
        ));
    }

    #[test]
    fn test_create_rejects_bad_image_and_potency() {
        let mut catalog = CatalogStore::new();

        let mut bad_image = draft("Gelato", 3000);
        bad_image.image = Some("not a url".to_string());
        assert!(matches!(
            catalog.create(bad_image).unwrap_err(),
            CatalogError::Validation(ValidationError::InvalidImage(_))
        ));

        let mut bad_thc = draft("Gelato", 3000);
        bad_thc.thc = -1.0;
        assert_eq!(
            catalog.create(bad_thc).unwrap_err(),
            CatalogError::Validation(ValidationError::InvalidPotency { field: "thc" })
        );
    }

    #[test]
    fn test_create_dedupes_tags() {
        let mut catalog = CatalogStore::new();
        let mut tagged = draft("Gelato", 3000);
        tagged.effects = vec!["Happy".into(), " Happy ".into(), String::new(), "Relaxed".into()];
        let product = catalog.create(tagged).unwrap();
        assert_eq!(product.effects, ["Happy", "Relaxed"]);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut catalog = CatalogStore::seeded();
        let id = ProductId::new("2");
        let patch = ProductPatch {
            price: Some(Decimal::new(4200, 2)),
            in_stock: Some(false),
            ..ProductPatch::default()
        };

        let updated = catalog.update(&id, patch).unwrap();
        assert_eq!(updated.price, Price::from_cents(4200));
        assert!(!updated.in_stock);
        assert_eq!(updated.name, "OG Kush");
        assert_eq!(catalog.get(&id), Some(&updated));
    }

    #[test]
    fn test_update_can_clear_sale_price() {
        let mut catalog = CatalogStore::seeded();
        let id = ProductId::new("1");
        assert!(catalog.get(&id).unwrap().is_on_sale());

        let patch: ProductPatch = serde_json::from_str(r#"{"sale_price": null}"#).unwrap();
        let updated = catalog.update(&id, patch).unwrap();
        assert_eq!(updated.sale_price, None);

        // An absent field leaves the promotion alone
        let patch: ProductPatch = serde_json::from_str(r#"{"name": "Blue Dream"}"#).unwrap();
        assert_eq!(patch.sale_price, None);
    }

    #[test]
    fn test_rejected_update_leaves_product_untouched() {
        let mut catalog = CatalogStore::seeded();
        let id = ProductId::new("1");
        let before = catalog.get(&id).unwrap().clone();

        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            price: Some(Decimal::new(1000, 2)),
            ..ProductPatch::default()
        };
        let err = catalog.update(&id, patch).unwrap_err();

        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::SaleAbovePrice { .. })
        ));
        assert_eq!(catalog.get(&id), Some(&before));
    }

    #[test]
    fn test_update_after_delete_is_not_found() {
        let mut catalog = CatalogStore::seeded();
        let id = ProductId::new("3");

        let removed = catalog.delete(&id).unwrap();
        assert_eq!(removed.name, "Sour Diesel");
        assert_eq!(catalog.len(), 5);

        assert_eq!(
            catalog.update(&id, ProductPatch::default()).unwrap_err(),
            CatalogError::NotFound(id.clone())
        );
        assert_eq!(catalog.delete(&id).unwrap_err(), CatalogError::NotFound(id));
    }

    #[test]
    fn test_featured_skips_out_of_stock() {
        let mut catalog = CatalogStore::seeded();
        catalog
            .update(
                &ProductId::new("2"),
                ProductPatch {
                    in_stock: Some(false),
                    ..ProductPatch::default()
                },
            )
            .unwrap();

        let featured: Vec<&str> = catalog.featured(4).map(|p| p.id.as_str()).collect();
        assert_eq!(featured, ["1", "3", "4", "5"]);
    }

    #[test]
    fn test_effective_price_prefers_sale() {
        let catalog = CatalogStore::seeded();
        let blue_dream = catalog.get(&ProductId::new("1")).unwrap();
        assert_eq!(blue_dream.effective_price(), Price::from_cents(3500));
        let og_kush = catalog.get(&ProductId::new("2")).unwrap();
        assert_eq!(og_kush.effective_price(), Price::from_cents(5000));
    }
}
