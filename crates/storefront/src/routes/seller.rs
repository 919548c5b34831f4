//! Seller console route handlers.
//!
//! Every handler here requires a seller account; customers are bounced to
//! the catalog by the extractor. Analytics degrades to a fixed mock data
//! set when the backend endpoint is unavailable, with the page flagged so
//! the seller knows the numbers are placeholders.

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

use crate::backend::{NewProduct, SalePoint, SellerAnalytics};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireSeller;
use crate::routes::cart::urlencode;
use crate::routes::products::ProductView;
use crate::state::AppState;

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "seller/dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    pub product_count: usize,
}

/// Display the seller dashboard.
#[instrument(skip(state, user))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
) -> Result<impl IntoResponse> {
    let products = state.backend().get_products().await?;
    let product_count = products
        .iter()
        .filter(|p| p.seller_id.as_ref() == Some(&user.user_id))
        .count();

    Ok(DashboardTemplate {
        email: user.email,
        product_count,
    })
}

// =============================================================================
// Listings
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "seller/products.html")]
pub struct SellerProductsTemplate {
    pub products: Vec<ProductView>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Display the seller's own listings.
///
/// The catalog endpoint returns everything; the console shows only the
/// listings owned by the signed-in seller.
#[instrument(skip(state, user))]
pub async fn products(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let products = state.backend().get_products().await?;

    Ok(SellerProductsTemplate {
        products: products
            .iter()
            .filter(|p| p.seller_id.as_ref() == Some(&user.user_id))
            .map(ProductView::from)
            .collect(),
        error: query.error,
        notice: query.notice,
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "seller/new_product.html")]
pub struct NewProductTemplate {
    pub error: Option<String>,
}

/// Display the new listing form.
pub async fn new_product(RequireSeller(_user): RequireSeller) -> impl IntoResponse {
    NewProductTemplate { error: None }
}

#[derive(Debug, Deserialize)]
pub struct NewProductForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock_quantity: u32,
    pub brand: String,
    pub tags: Option<String>,
}

/// Validate the listing form before the round trip.
fn validate_listing(form: &NewProductForm) -> Option<String> {
    if form.title.trim().is_empty() {
        return Some("Please enter a product title".to_string());
    }
    if !form.price.is_finite() || form.price <= 0.0 {
        return Some("Price must be greater than zero".to_string());
    }
    None
}

/// Create a new listing.
#[instrument(skip(state, user, form))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Form(form): Form<NewProductForm>,
) -> Result<Response> {
    if let Some(message) = validate_listing(&form) {
        return Ok(NewProductTemplate {
            error: Some(message),
        }
        .into_response());
    }

    let product = NewProduct {
        title: form.title.trim().to_string(),
        description: form.description.trim().to_string(),
        category: form.category.trim().to_string(),
        price: form.price,
        stock_quantity: form.stock_quantity,
        brand: form.brand.trim().to_string(),
        tags: split_tags(form.tags.as_deref()),
        currency: CurrencyCode::default(),
    };

    match state.backend().create_product(&user.token, &product).await {
        Ok(created) => {
            tracing::info!(product_id = %created.product_id, "Listing created");
            Ok(Redirect::to("/seller/products?notice=Listing+created").into_response())
        }
        Err(e) => Ok(NewProductTemplate {
            error: Some(e.user_message()),
        }
        .into_response()),
    }
}

/// Delete a listing, then reload the console.
#[instrument(skip(state, user))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);
    match state
        .backend()
        .delete_product(&user.token, &product_id)
        .await
    {
        Ok(()) => Redirect::to("/seller/products?notice=Listing+deleted").into_response(),
        Err(e) => {
            tracing::warn!(product_id = %product_id, error = %e, "Failed to delete listing");
            Redirect::to(&format!(
                "/seller/products?error={}",
                urlencode(&e.user_message())
            ))
            .into_response()
        }
    }
}

/// Comma-separated tags field into a list, empties dropped.
fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Clone)]
pub struct SalePointView {
    pub date: String,
    pub amount: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "seller/analytics.html")]
pub struct AnalyticsTemplate {
    pub total_sales: String,
    pub total_orders: u32,
    pub total_products: u32,
    pub total_customers: u32,
    pub recent_sales: Vec<SalePointView>,
    pub is_mock: bool,
}

impl AnalyticsTemplate {
    fn build(analytics: &SellerAnalytics, is_mock: bool) -> Self {
        Self {
            total_sales: Price::new(analytics.total_sales, CurrencyCode::default()).display(),
            total_orders: analytics.total_orders,
            total_products: analytics.total_products,
            total_customers: analytics.total_customers,
            recent_sales: analytics
                .recent_sales
                .iter()
                .map(|point| SalePointView {
                    date: point.date.clone(),
                    amount: Price::new(point.amount, CurrencyCode::default()).display(),
                })
                .collect(),
            is_mock,
        }
    }
}

/// Display analytics, falling back to mock numbers.
///
/// Any backend failure, including 404 from a deployment without the
/// analytics endpoint, swaps in the fixed sample data rather than erroring
/// the page.
#[instrument(skip(state, user))]
pub async fn analytics(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
) -> impl IntoResponse {
    match state.backend().get_seller_analytics(&user.token).await {
        Ok(analytics) => AnalyticsTemplate::build(&analytics, false),
        Err(e) => {
            tracing::warn!(error = %e, "Analytics unavailable, serving sample data");
            AnalyticsTemplate::build(&mock_analytics(), true)
        }
    }
}

/// Fixed sample analytics shown when the backend has none.
fn mock_analytics() -> SellerAnalytics {
    SellerAnalytics {
        total_sales: 12450.00,
        total_orders: 45,
        total_products: 12,
        total_customers: 38,
        recent_sales: vec![
            SalePoint {
                date: "2026-08-25".to_string(),
                amount: 320.00,
            },
            SalePoint {
                date: "2026-08-26".to_string(),
                amount: 450.50,
            },
            SalePoint {
                date: "2026-08-27".to_string(),
                amount: 280.00,
            },
            SalePoint {
                date: "2026-08-28".to_string(),
                amount: 610.25,
            },
            SalePoint {
                date: "2026-08-29".to_string(),
                amount: 395.75,
            },
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(Some("a, b ,,c")), vec!["a", "b", "c"]);
        assert!(split_tags(None).is_empty());
        assert!(split_tags(Some("  ")).is_empty());
    }

    #[test]
    fn test_listing_validation() {
        let mut form = NewProductForm {
            title: "Widget".to_string(),
            description: String::new(),
            category: "general".to_string(),
            price: 9.99,
            stock_quantity: 3,
            brand: String::new(),
            tags: None,
        };
        assert!(validate_listing(&form).is_none());

        form.price = 0.0;
        assert_eq!(
            validate_listing(&form).unwrap(),
            "Price must be greater than zero"
        );

        form.price = 9.99;
        form.title = " ".to_string();
        assert!(validate_listing(&form).unwrap().contains("title"));
    }

    #[test]
    fn test_mock_analytics_formatting() {
        let view = AnalyticsTemplate::build(&mock_analytics(), true);
        assert!(view.is_mock);
        assert_eq!(view.total_sales, "$12450.00");
        assert_eq!(view.recent_sales.len(), 5);
        assert_eq!(view.recent_sales[0].amount, "$320.00");
    }
}
