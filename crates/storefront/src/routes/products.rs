//! Product catalog route handlers (read-only).

use axum::{
    Json,
    extract::{Path, Query, State},
};
use cannabiabuds_core::{ProductCategory, ProductId, StrainType};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::Product;
use crate::error::{AppError, Result};
use crate::filter::{FilterCriteria, Selection};
use crate::state::AppState;

/// Listing query string, e.g. `?category=Flower&type=Indica&deals=true`.
///
/// Missing or `All` dimensions pass everything.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub strain_type: Option<String>,
    #[serde(default)]
    pub deals: bool,
}

impl TryFrom<ListQuery> for FilterCriteria {
    type Error = AppError;

    fn try_from(query: ListQuery) -> Result<Self> {
        let category = query
            .category
            .as_deref()
            .map_or(Ok(Selection::All), str::parse::<Selection<ProductCategory>>)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let strain_type = query
            .strain_type
            .as_deref()
            .map_or(Ok(Selection::All), str::parse::<Selection<StrainType>>)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(Self {
            category,
            strain_type,
            deals_only: query.deals,
        })
    }
}

/// List products, optionally filtered.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let criteria = FilterCriteria::try_from(query)?;
    let shop = state.shop().await;
    Ok(Json(shop.filtered(&criteria).cloned().collect()))
}

/// Home page shelf: the first few in-stock products.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<Vec<Product>> {
    let shop = state.shop().await;
    Json(shop.featured().cloned().collect())
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let shop = state.shop().await;
    shop.catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
