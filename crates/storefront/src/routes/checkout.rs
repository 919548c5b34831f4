//! Checkout route handlers.
//!
//! Checkout is a strict view of the cart: every line must hydrate before a
//! total is shown or charged, unlike the cart page which degrades per line.
//! The charge amount is always recomputed server-side from a fresh cart
//! fetch at submit time; nothing from the rendered page is trusted.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use ekart_core::{CurrencyCode, Price, ProductId};

use crate::backend::{BackendClient, BackendError, Cart, PaymentRequest, Product};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::cart::urlencode;
use crate::services::hydration::hydrate_products_strict;
use crate::state::AppState;

// =============================================================================
// Order summary
// =============================================================================

/// A fully priced checkout, built only when every line hydrated.
struct PricedCart {
    lines: Vec<PricedLine>,
    total: f64,
    currency: CurrencyCode,
}

struct PricedLine {
    name: String,
    quantity: u32,
    unit_price: f64,
}

impl PricedCart {
    /// Price every cart line from the hydrated lookup.
    ///
    /// Line-embedded prices take precedence over hydrated ones, matching
    /// the cart page, so both pages always show the same figures.
    fn build(cart: &Cart, products: &HashMap<ProductId, Product>) -> Self {
        let mut currency = None;
        let lines: Vec<PricedLine> = cart
            .items
            .iter()
            .map(|item| {
                let product = products.get(&item.product_id);
                if currency.is_none() {
                    currency = product.map(|p| p.currency);
                }
                PricedLine {
                    name: item
                        .product_name
                        .clone()
                        .or_else(|| product.map(|p| p.title.clone()))
                        .unwrap_or_else(|| item.product_id.to_string()),
                    quantity: item.quantity,
                    unit_price: item
                        .unit_price
                        .or_else(|| product.map(|p| p.price))
                        .unwrap_or(0.0),
                }
            })
            .collect();

        let total = lines
            .iter()
            .map(|line| line.unit_price * f64::from(line.quantity))
            .sum();

        Self {
            lines,
            total,
            currency: currency.unwrap_or_default(),
        }
    }

    fn total_price(&self) -> Price {
        Price::new(self.total, self.currency)
    }
}

/// Fetch the cart and price it strictly.
///
/// Returns `Ok(None)` for an empty cart so callers can redirect instead of
/// charging a zero total.
async fn load_priced_cart(
    backend: &BackendClient,
    user: &CurrentUser,
) -> std::result::Result<Option<PricedCart>, BackendError> {
    let cart = backend.get_cart(&user.token).await?;
    if cart.is_empty() {
        return Ok(None);
    }

    let products = hydrate_products_strict(
        backend,
        cart.items.iter().map(|item| item.product_id.clone()),
    )
    .await?;

    Ok(Some(PricedCart::build(&cart, &products)))
}

// =============================================================================
// View types
// =============================================================================

#[derive(Clone)]
pub struct CheckoutLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub lines: Vec<CheckoutLineView>,
    pub total: String,
    pub email: String,
    pub error: Option<String>,
}

impl CheckoutTemplate {
    fn from_priced(priced: &PricedCart, user: &CurrentUser, error: Option<String>) -> Self {
        let lines = priced
            .lines
            .iter()
            .map(|line| CheckoutLineView {
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: Price::new(line.unit_price, priced.currency).display(),
                line_total: Price::new(
                    line.unit_price * f64::from(line.quantity),
                    priced.currency,
                )
                .display(),
            })
            .collect();

        Self {
            lines,
            total: priced.total_price().display(),
            email: user.email.clone(),
            error,
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub payment_id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout review page.
///
/// An empty cart has nothing to check out: redirect back to the cart. A
/// failed hydration means the total cannot be trusted, so that also goes
/// back to the cart with an error rather than rendering a partial total.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    match load_priced_cart(state.backend(), &user).await {
        Ok(Some(priced)) => {
            Ok(CheckoutTemplate::from_priced(&priced, &user, None).into_response())
        }
        Ok(None) => Ok(Redirect::to("/cart").into_response()),
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Checkout could not price the cart");
            Ok(Redirect::to(&format!("/cart?error={}", urlencode(&e.user_message())))
                .into_response())
        }
    }
}

/// Submit the payment.
///
/// Re-fetches and re-prices the cart so the charged amount reflects the
/// backend's current state, then delegates confirmation to the payment
/// endpoint. On failure the review page is re-rendered with the error so
/// the shopper can retry without losing context.
#[instrument(skip(state, user))]
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let priced = match load_priced_cart(state.backend(), &user).await {
        Ok(Some(priced)) => priced,
        Ok(None) => return Ok(Redirect::to("/cart").into_response()),
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Payment aborted, cart could not be priced");
            return Ok(Redirect::to(&format!(
                "/cart?error={}",
                urlencode(&e.user_message())
            ))
            .into_response());
        }
    };

    let total = priced.total_price();
    let request = PaymentRequest {
        amount_minor: total.to_minor_units(),
        currency: total.currency_code.code().to_string(),
    };

    match state.backend().create_payment(&user.token, &request).await {
        Ok(receipt) => {
            tracing::info!(payment_id = %receipt.payment_id, amount = %total.display(), "Payment confirmed");
            Ok(Redirect::to(&format!(
                "/checkout/success?payment_intent={}",
                urlencode(receipt.payment_id.as_str())
            ))
            .into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Payment failed");
            Ok(
                CheckoutTemplate::from_priced(&priced, &user, Some(e.user_message()))
                    .into_response(),
            )
        }
    }
}

/// Query parameters carried through the success redirect.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub payment_intent: Option<String>,
}

/// Display the payment confirmation page.
///
/// Renders whether or not a payment id made it through the redirect; the
/// id line is simply omitted when absent.
#[instrument(skip(_user))]
pub async fn success(
    RequireAuth(_user): RequireAuth,
    Query(query): Query<SuccessQuery>,
) -> impl IntoResponse {
    CheckoutSuccessTemplate {
        payment_id: query.payment_intent.filter(|id| !id.is_empty()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::CartItem;
    use ekart_core::UserId;

    fn cart_with(items: Vec<CartItem>) -> Cart {
        Cart {
            user_id: UserId::new("u1"),
            items,
        }
    }

    fn line(id: &str, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            quantity,
            added_at: None,
            unit_price: None,
            product_name: None,
        }
    }

    fn product(id: &str, price: f64) -> Product {
        Product {
            product_id: ProductId::new(id),
            title: format!("Product {id}"),
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

    #[test]
    fn test_total_recomputed_from_lines() {
        let cart = cart_with(vec![line("p1", 2), line("p2", 1)]);
        let mut products = HashMap::new();
        products.insert(ProductId::new("p1"), product("p1", 19.99));
        products.insert(ProductId::new("p2"), product("p2", 5.0));

        let priced = PricedCart::build(&cart, &products);
        assert!((priced.total - 44.98).abs() < 1e-9);
        assert_eq!(priced.total_price().display(), "$44.98");
        assert_eq!(priced.total_price().to_minor_units(), 4498);
    }

    #[test]
    fn test_embedded_price_beats_hydrated_in_total() {
        let mut enriched = line("p1", 2);
        enriched.unit_price = Some(3.0);
        let cart = cart_with(vec![enriched]);
        let mut products = HashMap::new();
        products.insert(ProductId::new("p1"), product("p1", 100.0));

        let priced = PricedCart::build(&cart, &products);
        assert!((priced.total - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_currency_taken_from_first_hydrated_product() {
        let cart = cart_with(vec![line("p1", 1)]);
        let mut products = HashMap::new();
        let mut eur = product("p1", 10.0);
        eur.currency = CurrencyCode::Eur;
        products.insert(ProductId::new("p1"), eur);

        let priced = PricedCart::build(&cart, &products);
        assert_eq!(priced.total_price().display(), "\u{20ac}10.00");
    }
}
