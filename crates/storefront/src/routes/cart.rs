//! Cart route handlers.
//!
//! Every mutation answers with the full cart view so the client can redraw
//! the drawer and header badge from one response.

use axum::{
    Json,
    extract::{Path, State},
};
use cannabiabuds_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartLine, CartStore, CartSummary};
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// One cart line for display.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Decimal,
    /// `unit_price` formatted for display, e.g. `$35.00`.
    pub unit_price_display: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let unit_price = line.unit_price();
        Self {
            product_id: line.id().clone(),
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity(),
            unit_price,
            line_total: line.line_total(),
            unit_price_display: unit_price.display(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    #[serde(flatten)]
    pub summary: CartSummary,
    pub is_open: bool,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            summary: cart.summary(),
            is_open: cart.is_open(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    /// Anything below 1 removes the line.
    pub quantity: i64,
}

/// Show the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let shop = state.shop().await;
    Json(CartView::from(shop.cart()))
}

/// Add one unit of a catalog product.
#[instrument(skip(state), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let mut shop = state.shop_mut().await;
    shop.add_to_cart(&body.product_id)?;
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", body.product_id.as_str())]));
    Ok(Json(CartView::from(shop.cart())))
}

/// Set a line's quantity.
#[instrument(skip(state))]
pub async fn set_quantity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetQuantityRequest>,
) -> Json<CartView> {
    let mut shop = state.shop_mut().await;
    shop.set_cart_quantity(&ProductId::new(id), body.quantity);
    Json(CartView::from(shop.cart()))
}

/// Remove a line. Removing a missing line is not an error.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Json<CartView> {
    let mut shop = state.shop_mut().await;
    shop.remove_from_cart(&ProductId::new(id));
    Json(CartView::from(shop.cart()))
}

/// Open or close the cart drawer.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>) -> Json<CartView> {
    let mut shop = state.shop_mut().await;
    shop.toggle_cart();
    Json(CartView::from(shop.cart()))
}

/// Close the cart drawer (e.g. after navigating away).
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> Json<CartView> {
    let mut shop = state.shop_mut().await;
    shop.close_cart();
    Json(CartView::from(shop.cart()))
}
