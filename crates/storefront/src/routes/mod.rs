//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Products
//! GET    /api/products                - Listing (?category=&type=&deals=)
//! GET    /api/products/featured       - Home page shelf
//! GET    /api/products/{id}           - Product detail
//!
//! # Administration (admin session required)
//! POST   /api/admin/products          - Create product
//! PATCH  /api/admin/products/{id}     - Update product
//! DELETE /api/admin/products/{id}     - Delete product
//!
//! # Cart
//! GET    /api/cart                    - Lines, totals, drawer state
//! POST   /api/cart/items              - Add one unit { product_id }
//! PUT    /api/cart/items/{id}         - Set quantity { quantity }
//! DELETE /api/cart/items/{id}         - Remove line
//! POST   /api/cart/toggle             - Open/close drawer
//! POST   /api/cart/close              - Close drawer
//!
//! # Session
//! GET    /api/session                 - Current user
//! POST   /api/session/login           - Log in as admin
//! POST   /api/session/logout          - Log out
//!
//! # Chat
//! GET    /api/chat                    - Transcript
//! POST   /api/chat                    - Send { message }
//!
//! # Forms
//! POST   /api/forms/newsletter        - Newsletter signup
//! POST   /api/forms/contact           - Contact message
//! GET    /api/forms/{kind}/status     - Last submission status
//! ```

pub mod admin;
pub mod cart;
pub mod chat;
pub mod forms;
pub mod products;
pub mod session;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the catalog administration router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(admin::create))
        .route("/products/{id}", patch(admin::update).delete(admin::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", put(cart::set_quantity).delete(cart::remove))
        .route("/toggle", post(cart::toggle))
        .route("/close", post(cart::close))
}

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(session::show))
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
}

/// Create the form routes router.
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter", post(forms::newsletter))
        .route("/contact", post(forms::contact))
        .route("/{kind}/status", get(forms::status))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/admin", admin_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/session", session_routes())
        .route("/api/chat", get(chat::transcript).post(chat::send))
        .nest("/api/forms", form_routes())
}

/// The full application: health check, API routes and the request
/// middleware stack, bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
