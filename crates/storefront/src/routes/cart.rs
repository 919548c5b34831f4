//! Cart route handlers.
//!
//! The cart is fetched fresh on every view. Mutations never update the page
//! optimistically: they issue the backend call, then redirect back to the
//! cart page, which re-fetches so the UI only ever shows server-confirmed
//! state.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use ekart_core::{CurrencyCode, Price, ProductId};

use crate::backend::{Cart, CartItem, Product};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::services::hydration::hydrate_products;
use crate::state::AppState;

// =============================================================================
// Price resolution
// =============================================================================

/// Resolve a line's unit price.
///
/// Precedence: item-embedded price, then hydrated product price, then 0.
/// This is the mechanism that reconciles bare `{id, quantity}` cart lines
/// with enriched lines into one view; the order must not change.
fn resolve_unit_price(item: &CartItem, product: Option<&Product>) -> f64 {
    item.unit_price
        .or_else(|| product.map(|p| p.price))
        .unwrap_or(0.0)
}

/// Resolve a line's display name with the same precedence as the price.
fn resolve_name(item: &CartItem, product: Option<&Product>) -> String {
    item.product_name
        .clone()
        .or_else(|| product.map(|p| p.title.clone()))
        .unwrap_or_else(|| format!("Product {}\u{2026}", item.product_id.short()))
}

/// Client-side subtotal over all lines.
///
/// Accumulation stays in floating-point currency units; rounding to two
/// decimals happens only at render time.
fn compute_subtotal(items: &[CartItem], products: &HashMap<ProductId, Product>) -> f64 {
    items
        .iter()
        .map(|item| {
            let product = products.get(&item.product_id);
            resolve_unit_price(item, product) * f64::from(item.quantity)
        })
        .sum()
}

// =============================================================================
// View types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub quantity_minus_one: u32,
    pub quantity_plus_one: u32,
    pub unit_price: String,
    pub line_total: String,
    pub added_at: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: usize,
}

impl CartView {
    /// Build the view from a cart and its hydrated product lookup.
    #[must_use]
    pub fn build(cart: &Cart, products: &HashMap<ProductId, Product>) -> Self {
        // The backend does not serve mixed-currency carts, so the first
        // hydrated line's currency also labels the subtotal.
        let mut cart_currency = None;
        let items = cart
            .items
            .iter()
            .map(|item| {
                let product = products.get(&item.product_id);
                let unit_price = resolve_unit_price(item, product);
                let currency = product.map_or(CurrencyCode::default(), |p| p.currency);
                if cart_currency.is_none() && product.is_some() {
                    cart_currency = Some(currency);
                }
                CartItemView {
                    product_id: item.product_id.to_string(),
                    name: resolve_name(item, product),
                    quantity: item.quantity,
                    quantity_minus_one: item.quantity.saturating_sub(1),
                    quantity_plus_one: item.quantity.saturating_add(1),
                    unit_price: Price::new(unit_price, currency).display(),
                    line_total: Price::new(unit_price * f64::from(item.quantity), currency)
                        .display(),
                    added_at: item.added_at.clone(),
                }
            })
            .collect();

        Self {
            items,
            subtotal: Price::new(
                compute_subtotal(&cart.items, products),
                cart_currency.unwrap_or_default(),
            )
            .display(),
            item_count: cart.items.len(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Query parameters for error display after a redirect.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Quantity update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub quantity: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Display the cart page.
///
/// Hydrates every distinct product id concurrently; a failed detail fetch
/// only degrades that line, never the whole page.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let cart = state.backend().get_cart(&user.token).await?;

    let products = hydrate_products(
        state.backend(),
        cart.items.iter().map(|item| item.product_id.clone()),
    )
    .await;

    Ok(CartShowTemplate {
        cart: CartView::build(&cart, &products),
        error: query.error,
    })
}

/// Add an item to the cart, then show the cart.
#[instrument(skip(state, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let quantity = form.quantity.unwrap_or(1).max(1);

    match state
        .backend()
        .add_cart_item(&user.token, &product_id, quantity)
        .await
    {
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::warn!(product_id = %product_id, error = %e, "Failed to add item to cart");
            Redirect::to(&format!(
                "/products/{product_id}?error={}",
                urlencode(&e.user_message())
            ))
            .into_response()
        }
    }
}

/// Update a line's quantity, then reload the cart.
///
/// A requested quantity below 1 is a no-op: no backend call is issued and
/// the redirect re-renders the unchanged cart.
#[instrument(skip(state, user))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<UpdateQuantityForm>,
) -> Response {
    if form.quantity < 1 {
        return Redirect::to("/cart").into_response();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let quantity = form.quantity as u32;

    let product_id = ProductId::new(id);
    match state
        .backend()
        .update_cart_item(&user.token, &product_id, quantity)
        .await
    {
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::warn!(product_id = %product_id, error = %e, "Failed to update quantity");
            Redirect::to(&format!("/cart?error={}", urlencode(&e.user_message()))).into_response()
        }
    }
}

/// Remove a line, then reload the cart.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);
    match state
        .backend()
        .remove_cart_item(&user.token, &product_id)
        .await
    {
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::warn!(product_id = %product_id, error = %e, "Failed to remove item");
            Redirect::to(&format!("/cart?error={}", urlencode(&e.user_message()))).into_response()
        }
    }
}

/// Minimal percent-encoding for redirect query values.
pub(crate) fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ekart_core::UserId;

    fn item(id: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            quantity,
            added_at: None,
            unit_price: None,
            product_name: None,
        }
    }

    fn product(id: &str, title: &str, price: f64) -> Product {
        Product {
            product_id: ProductId::new(id),
            title: title.to_string(),
            description: None,
            price,
            currency: CurrencyCode::Usd,
            category: None,
            brand: None,
            images: Vec::new(),
            rating: None,
            review_count: 0,
            seller_id: None,
        }
    }

    fn cart(items: Vec<CartItem>) -> Cart {
        Cart {
            user_id: UserId::new("u1"),
            items,
        }
    }

    #[test]
    fn test_price_precedence_embedded_wins() {
        let mut line = item("p1", 1);
        line.unit_price = Some(5.0);
        let hydrated = product("p1", "Widget", 9.99);
        assert!((resolve_unit_price(&line, Some(&hydrated)) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_precedence_falls_back_to_product_then_zero() {
        let line = item("p1", 1);
        let hydrated = product("p1", "Widget", 9.99);
        assert!((resolve_unit_price(&line, Some(&hydrated)) - 9.99).abs() < f64::EPSILON);
        assert!(resolve_unit_price(&line, None).abs() < f64::EPSILON);
    }

    #[test]
    fn test_name_precedence() {
        let mut line = item("0a1b2c3d-4e5f", 1);
        let hydrated = product("0a1b2c3d-4e5f", "Widget", 9.99);

        line.product_name = Some("Snapshot Name".to_string());
        assert_eq!(resolve_name(&line, Some(&hydrated)), "Snapshot Name");

        line.product_name = None;
        assert_eq!(resolve_name(&line, Some(&hydrated)), "Widget");
        assert_eq!(resolve_name(&line, None), "Product 0a1b2c3d\u{2026}");
    }

    #[test]
    fn test_subtotal_two_items_rounds_at_render() {
        let lines = vec![item("p1", 2)];
        let mut products = HashMap::new();
        products.insert(ProductId::new("p1"), product("p1", "Widget", 19.99));

        let view = CartView::build(&cart(lines), &products);
        assert_eq!(view.subtotal, "$39.98");
        assert_eq!(view.items[0].line_total, "$39.98");
        assert_eq!(view.items[0].unit_price, "$19.99");
    }

    #[test]
    fn test_subtotal_mixes_embedded_and_hydrated_prices() {
        let mut enriched = item("p1", 1);
        enriched.unit_price = Some(10.0);
        let bare = item("p2", 3);

        let mut products = HashMap::new();
        // p1 is also hydrated, but the embedded price must win.
        products.insert(ProductId::new("p1"), product("p1", "A", 99.0));
        products.insert(ProductId::new("p2"), product("p2", "B", 2.5));

        let subtotal = compute_subtotal(&[enriched, bare], &products);
        assert!((subtotal - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_hydration_renders_line_at_zero() {
        let lines = vec![item("p1", 2), item("p2", 1)];
        let mut products = HashMap::new();
        products.insert(ProductId::new("p2"), product("p2", "B", 4.0));

        let view = CartView::build(&cart(lines), &products);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].unit_price, "$0.00");
        assert_eq!(view.subtotal, "$4.00");
    }

    #[test]
    fn test_subtotal_uses_hydrated_currency() {
        let lines = vec![item("p1", 2)];
        let mut eur = product("p1", "Widget", 10.0);
        eur.currency = CurrencyCode::Eur;
        let mut products = HashMap::new();
        products.insert(ProductId::new("p1"), eur);

        let view = CartView::build(&cart(lines), &products);
        assert_eq!(view.subtotal, "\u{20ac}20.00");
        assert_eq!(view.items[0].unit_price, "\u{20ac}10.00");
    }

    #[test]
    fn test_urlencode() {
        assert_eq!(urlencode("Cart is empty"), "Cart+is+empty");
        assert_eq!(urlencode("a&b=c"), "a%26b%3Dc");
    }
}
