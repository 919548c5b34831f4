//! Product catalog route handlers.
//!
//! Catalog reads are public: no token is attached, matching the backend's
//! anonymous product endpoints.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use ekart_core::ProductId;

use crate::backend::Product;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<String>,
    pub review_count: u32,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.product_id.to_string(),
            title: product.title.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.unit_price().display(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            image_url: product.images.first().map(|img| img.url.clone()),
            rating: product.rating.map(|r| format!("{r:.1}")),
            review_count: product.review_count,
        }
    }
}

/// Query parameters for error display after a redirect.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub error: Option<String>,
}

/// Display the product listing page.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = state.backend().get_products().await?;
    let products = products.iter().map(ProductView::from).collect();

    Ok(ProductsIndexTemplate { products })
}

/// Display the product detail page.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let product = state.backend().get_product(&ProductId::new(id)).await?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        error: query.error,
    })
}
