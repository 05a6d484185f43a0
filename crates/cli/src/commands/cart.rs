//! Cart quoting.
//!
//! # Usage
//!
//! ```bash
//! # Two of product 1 and one of product 4
//! cbud cart quote 1:2 4
//! ```
//!
//! Repeating an id adds to its quantity, the same as pressing "add to cart"
//! again.

use std::num::NonZeroU32;

use cannabiabuds_core::ProductId;
use cannabiabuds_storefront::Storefront;
use cannabiabuds_storefront::catalog::CatalogError;
use cannabiabuds_storefront::cart::CartSummary;

/// One `ID[:QUANTITY]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLine {
    pub id: ProductId,
    pub quantity: NonZeroU32,
}

/// Parse `ID` or `ID:QUANTITY`. A bare id means a quantity of one.
pub fn parse_line(raw: &str) -> Result<QuoteLine, String> {
    let (id, quantity) = match raw.rsplit_once(':') {
        Some((id, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<NonZeroU32>()
                .map_err(|_| format!("quantity must be a positive integer in {raw:?}"))?;
            (id, quantity)
        }
        None => (raw, NonZeroU32::MIN),
    };

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing product id in {raw:?}"));
    }

    Ok(QuoteLine {
        id: ProductId::from(id),
        quantity,
    })
}

/// Fill a fresh cart with `lines` and return its totals.
pub fn build(lines: &[QuoteLine]) -> Result<Storefront, CatalogError> {
    let mut shop = Storefront::new();
    for line in lines {
        shop.add_to_cart(&line.id)?;
        if line.quantity.get() > 1 {
            let current = shop.cart().line(&line.id).map_or(0, |l| l.quantity());
            let target = i64::from(current) + i64::from(line.quantity.get()) - 1;
            shop.set_cart_quantity(&line.id, target);
        }
    }
    Ok(shop)
}

/// Print each line and the cart totals.
pub fn quote(lines: &[QuoteLine]) -> Result<(), CatalogError> {
    let shop = build(lines)?;

    for line in shop.cart().lines() {
        tracing::info!(
            "{:>3} x {} @ {} = ${:.2}",
            line.quantity(),
            line.product.name,
            line.unit_price().display(),
            line.line_total()
        );
    }

    let CartSummary {
        subtotal,
        tax,
        grand_total,
        item_count,
    } = shop.cart().summary();
    tracing::info!("Items:    {item_count}");
    tracing::info!("Subtotal: ${:.2}", subtotal.round_dp(2));
    tracing::info!("Tax:      ${:.2}", tax.round_dp(2));
    tracing::info!("Total:    ${:.2}", grand_total.round_dp(2));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id_means_one() {
        let line = parse_line("4").unwrap();
        assert_eq!(line.id.as_str(), "4");
        assert_eq!(line.quantity.get(), 1);
    }

    #[test]
    fn test_id_with_quantity() {
        let line = parse_line("1:3").unwrap();
        assert_eq!(line.id.as_str(), "1");
        assert_eq!(line.quantity.get(), 3);
    }

    #[test]
    fn test_rejects_zero_and_garbage_quantities() {
        assert!(parse_line("1:0").is_err());
        assert!(parse_line("1:-2").is_err());
        assert!(parse_line("1:two").is_err());
        assert!(parse_line(":2").is_err());
    }

    #[test]
    fn test_quote_totals() {
        // Product 1 sells at 35.00 on sale, product 4 at 25.00.
        let lines = vec![parse_line("1:2").unwrap(), parse_line("4").unwrap()];
        let shop = build(&lines).unwrap();
        let summary = shop.cart().summary();

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal.to_string(), "95.00");
        assert_eq!(summary.grand_total.round_dp(2).to_string(), "109.25");
    }

    #[test]
    fn test_repeated_id_accumulates() {
        let lines = vec![parse_line("2:2").unwrap(), parse_line("2:3").unwrap()];
        let shop = build(&lines).unwrap();

        assert_eq!(shop.cart().len(), 1);
        assert_eq!(shop.cart().item_count(), 5);
    }

    #[test]
    fn test_unknown_id_fails() {
        let lines = vec![parse_line("missing").unwrap()];
        assert!(matches!(build(&lines), Err(CatalogError::NotFound(_))));
    }
}
