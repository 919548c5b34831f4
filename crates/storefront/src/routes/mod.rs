//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products (public)
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart page
//! POST /cart/items             - Add to cart
//! POST /cart/items/{id}/update - Update quantity
//! POST /cart/items/{id}/remove - Remove item
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Checkout page
//! POST /checkout/pay           - Submit payment
//! GET  /checkout/success       - Post-payment landing
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Seller console (requires seller account)
//! GET  /seller/dashboard       - Seller overview
//! GET  /seller/products        - Seller's product listings
//! GET  /seller/products/new    - New product form
//! POST /seller/products        - Create product
//! POST /seller/products/{id}/delete - Delete product
//! GET  /seller/analytics       - Sales analytics (mock fallback)
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;
pub mod seller;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}/update", post(cart::update))
        .route("/items/{id}/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/pay", post(checkout::pay))
        .route("/success", get(checkout::success))
}

/// Create the seller console router.
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(seller::dashboard))
        .route(
            "/products",
            get(seller::products).post(seller::create_product),
        )
        .route("/products/new", get(seller::new_product))
        .route("/products/{id}/delete", post(seller::delete_product))
        .route("/analytics", get(seller::analytics))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/orders", get(orders::index))
        .nest("/auth", auth_routes())
        .nest("/seller", seller_routes())
}
