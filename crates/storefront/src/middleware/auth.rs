//! Admin gate for HTTP handlers.
//!
//! Catalog administration routes take a [`RequireAdmin`] argument. The
//! extractor asks the capability gate before the handler runs, so a
//! non-admin request never gets as far as the catalog.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::session::{Access, Capability, SessionUser, authorize};
use crate::state::AppState;

/// Extractor that requires an administrator session.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub SessionUser);

/// Error returned when the session lacks the admin role.
#[derive(Debug)]
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Admin access required" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let shop = state.shop().await;
        let session = shop.session();

        match authorize(session.current_role(), Capability::ManageCatalog) {
            Access::Allow => session
                .current_user()
                .cloned()
                .map(Self)
                .ok_or(AdminRejection),
            Access::Deny => {
                tracing::warn!(
                    method = %parts.method,
                    path = %parts.uri.path(),
                    "admin route refused"
                );
                Err(AdminRejection)
            }
        }
    }
}
