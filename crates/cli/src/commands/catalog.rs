//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! cbud catalog list --category Edibles
//! cbud catalog list --type Sativa --deals
//! cbud catalog show 2
//! ```

use cannabiabuds_core::{ProductCategory, ProductId, StrainType, UnknownVariant};
use cannabiabuds_storefront::Storefront;
use cannabiabuds_storefront::catalog::Product;
use cannabiabuds_storefront::filter::{FilterCriteria, Selection};
use thiserror::Error;

/// Errors that can occur while browsing the catalog.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// A `--category` or `--type` value did not name a known variant.
    #[error(transparent)]
    InvalidFilter(#[from] UnknownVariant),

    /// No product carries the requested id.
    #[error("No product with id {0}")]
    UnknownProduct(String),
}

/// Build listing criteria from raw command-line values.
///
/// A missing dimension, or `All`, passes every product.
pub fn criteria(
    category: Option<&str>,
    strain_type: Option<&str>,
    deals: bool,
) -> Result<FilterCriteria, CatalogCommandError> {
    Ok(FilterCriteria {
        category: category.map_or(Ok(Selection::All), str::parse::<Selection<ProductCategory>>)?,
        strain_type: strain_type.map_or(Ok(Selection::All), str::parse::<Selection<StrainType>>)?,
        deals_only: deals,
    })
}

/// List the products that pass the given filters, in catalog order.
pub fn list(
    category: Option<&str>,
    strain_type: Option<&str>,
    deals: bool,
) -> Result<(), CatalogCommandError> {
    let criteria = criteria(category, strain_type, deals)?;
    let shop = Storefront::new();

    let mut shown = 0usize;
    for product in shop.filtered(&criteria) {
        tracing::info!("{}", summary_line(product));
        shown += 1;
    }

    tracing::info!(
        "{shown} of {} products (category: {}, type: {}, deals only: {})",
        shop.catalog().len(),
        criteria.category,
        criteria.strain_type,
        criteria.deals_only
    );
    Ok(())
}

/// Show every field of one product.
pub fn show(id: &str) -> Result<(), CatalogCommandError> {
    let shop = Storefront::new();
    let product = shop
        .catalog()
        .get(&ProductId::from(id))
        .ok_or_else(|| CatalogCommandError::UnknownProduct(id.to_owned()))?;

    tracing::info!("{}", summary_line(product));
    tracing::info!("  THC {}  CBD {}", product.thc, product.cbd);
    tracing::info!(
        "  Rated {:.1} from {} reviews{}",
        product.rating,
        product.reviews,
        if product.in_stock { "" } else { " (out of stock)" }
    );
    if !product.effects.is_empty() {
        tracing::info!("  Effects: {}", product.effects.join(", "));
    }
    if !product.flavors.is_empty() {
        tracing::info!("  Flavors: {}", product.flavors.join(", "));
    }
    tracing::info!("  {}", product.description);
    Ok(())
}

/// One-line listing entry: id, name, classification and price.
fn summary_line(product: &Product) -> String {
    let price = match product.sale_price {
        Some(sale) => format!("{} (was {})", sale.display(), product.price.display()),
        None => product.price.display(),
    };
    format!(
        "[{}] {} - {} / {} - {}",
        product.id, product.name, product.category, product.strain_type, price
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_filters_pass_everything() {
        let criteria = criteria(None, None, false).unwrap();
        assert_eq!(criteria, FilterCriteria::all());
    }

    #[test]
    fn test_all_is_accepted_case_insensitively() {
        let criteria = criteria(Some("all"), Some("ALL"), false).unwrap();
        assert_eq!(criteria.category, Selection::All);
        assert_eq!(criteria.strain_type, Selection::All);
    }

    #[test]
    fn test_concrete_filters_parse() {
        let criteria = criteria(Some("Flower"), Some("Indica"), true).unwrap();
        assert_eq!(criteria.category, Selection::Only(ProductCategory::Flower));
        assert_eq!(criteria.strain_type, Selection::Only(StrainType::Indica));
        assert!(criteria.deals_only);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = criteria(Some("Seeds"), None, false).unwrap_err();
        assert!(matches!(err, CatalogCommandError::InvalidFilter(_)));
    }

    #[test]
    fn test_show_unknown_product() {
        let err = show("no-such-id").unwrap_err();
        assert!(matches!(err, CatalogCommandError::UnknownProduct(id) if id == "no-such-id"));
    }

    #[test]
    fn test_summary_line_mentions_sale() {
        let shop = Storefront::new();
        let on_sale = shop
            .catalog()
            .list()
            .iter()
            .find(|p| p.is_on_sale())
            .unwrap();
        assert!(summary_line(on_sale).contains("(was "));
    }
}
