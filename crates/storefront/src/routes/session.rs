//! Session route handlers.
//!
//! Login is a capability switch: it always yields the demo administrator.

use axum::{Json, extract::State, http::StatusCode};
use cannabiabuds_core::Role;
use serde::Serialize;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::session::{Capability, SessionUser, granted};
use crate::state::AppState;

/// Who is logged in, if anyone.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: Option<SessionUser>,
    pub role: Option<Role>,
    pub is_admin: bool,
    /// What the current role may do, for deciding which controls to show.
    pub capabilities: Vec<Capability>,
}

impl SessionView {
    fn new(user: Option<SessionUser>) -> Self {
        let role = user.as_ref().map(|u| u.role);
        Self {
            user,
            role,
            is_admin: role == Some(Role::Admin),
            capabilities: granted(role).collect(),
        }
    }
}

/// Current session.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<SessionView> {
    let shop = state.shop().await;
    Json(SessionView::new(shop.session().current_user().cloned()))
}

/// Log in as the demo administrator.
#[instrument(skip(state))]
pub async fn login(State(state): State<AppState>) -> Json<SessionView> {
    let user = state.shop_mut().await.login();
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Json(SessionView::new(Some(user)))
}

/// Log out. Logging out twice is fine.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.shop_mut().await.logout();
    clear_sentry_user();
    StatusCode::NO_CONTENT
}
