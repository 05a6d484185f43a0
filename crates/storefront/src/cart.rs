//! Shopping cart.
//!
//! Each line holds a copy of the product taken when it was first added. The
//! cart never looks back at the catalog: later price edits or deletions do
//! not touch lines that already exist.

use std::num::NonZeroU32;

use cannabiabuds_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Fixed estimated sales tax rate (15%).
///
/// Not configurable per region.
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// One product-plus-quantity entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product data as it was when the line was created.
    pub product: Product,
    quantity: NonZeroU32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Line identity.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Sale price if the snapshot had one, otherwise its base price.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.product.effective_price()
    }

    /// `unit_price * quantity`, exact.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price().amount() * Decimal::from(self.quantity.get())
    }
}

/// Display figures derived from the cart. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
    pub item_count: u64,
}

/// Line items keyed by product id, in the order they were first added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartStore {
    lines: Vec<CartLine>,
    /// Presentation flag for the cart drawer; not part of cart state proper.
    #[serde(default)]
    open: bool,
}

impl CartStore {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across lines (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Add one unit of `product`.
    ///
    /// An existing line keeps its original snapshot and gains one unit;
    /// otherwise a new line is created with quantity 1. Opens the cart.
    pub fn add_item(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|line| line.id() == &product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product.clone())),
        }
        self.open = true;
    }

    /// Remove the line for `id`. Unknown ids are ignored.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        self.lines.len() != before
    }

    /// Set a line's quantity.
    ///
    /// Anything below one removes the line. There is no upper bound and no
    /// stock check; values beyond `u32::MAX` saturate. Unknown ids are
    /// ignored. Returns whether the cart changed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        let Some(quantity) = u32::try_from(quantity.max(0))
            .map_or(NonZeroU32::new(u32::MAX), NonZeroU32::new)
        else {
            return self.remove_item(id);
        };

        match self.lines.iter_mut().find(|line| line.id() == id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Exact sum of effective unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal, estimated tax and grand total, recomputed on each call.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal = self.total();
        CartSummary {
            subtotal,
            tax: subtotal * TAX_RATE,
            grand_total: subtotal * (Decimal::ONE + TAX_RATE),
            item_count: self.item_count(),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the drawer open/closed and return the new state.
    pub const fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub const fn close(&mut self) {
        self.open = false;
    }
}
