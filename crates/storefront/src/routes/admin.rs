//! Catalog administration handlers.
//!
//! Every handler here takes [`RequireAdmin`], so non-admin requests are
//! turned away before the body is even parsed.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use cannabiabuds_core::ProductId;
use tracing::instrument;

use crate::catalog::{Product, ProductDraft, ProductPatch};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Create a product.
#[instrument(skip(state, admin, draft), fields(admin = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let mut shop = state.shop_mut().await;
    let product = shop.catalog_admin()?.create(draft)?;
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product.
#[instrument(skip(state, admin, patch), fields(admin = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let mut shop = state.shop_mut().await;
    let product = shop.catalog_admin()?.update(&id, patch)?;
    tracing::info!(product_id = %id, "product updated");
    Ok(Json(product))
}

/// Delete a product. Cart lines holding it are left alone.
#[instrument(skip(state, admin), fields(admin = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = ProductId::new(id);
    let mut shop = state.shop_mut().await;
    shop.catalog_admin()?.delete(&id)?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
