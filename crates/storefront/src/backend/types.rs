//! Wire types for the EKart backend REST API.
//!
//! Field names mirror the backend's snake_case JSON exactly. Every struct is
//! a transient, request-scoped read model; the backend owns the data.

use serde::{Deserialize, Serialize};

use ekart_core::{
    CurrencyCode, OrderId, OrderStatus, PaymentId, PaymentStatus, Price, ProductId, UserId,
    UserType,
};

// =============================================================================
// Catalog
// =============================================================================

/// A product as returned by `GET /api/products` and `GET /api/products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub seller_id: Option<UserId>,
}

impl Product {
    /// The product's unit price with its currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::new(self.price, self.currency)
    }
}

/// A product image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Payload for `POST /api/products` (seller console).
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock_quantity: u32,
    pub brand: String,
    pub tags: Vec<String>,
    pub currency: CurrencyCode,
}

// =============================================================================
// Cart
// =============================================================================

/// The current user's cart, fetched fresh per page view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One cart line.
///
/// `unit_price` and `product_name` are optional snapshots: the backend
/// contract today sends bare `{product_id, quantity, added_at}` lines, but
/// enriched lines must also be accepted and take display precedence over
/// hydrated product data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub product_name: Option<String>,
}

/// Payload for `POST /api/cart/items`.
#[derive(Debug, Clone, Serialize)]
pub struct AddCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Payload for `PUT /api/cart/items/{product_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCartItem {
    pub quantity: u32,
}

// =============================================================================
// Orders
// =============================================================================

/// A past order from `GET /api/orders`. Read-only history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub buyer_id: UserId,
    #[serde(default)]
    pub seller_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: Option<String>,
    pub price: f64,
    pub quantity: u32,
}

impl OrderItem {
    /// Per-line total (price x quantity).
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Payload for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub user_type: UserType,
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response from register/login.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user_id: UserId,
    pub email: String,
    #[serde(default)]
    pub user_type: UserType,
}

// =============================================================================
// Payments
// =============================================================================

/// Payload for `POST /api/payments` (delegated confirmation).
///
/// `amount_minor` is in the gateway's minor-unit convention; the conversion
/// lives in [`ekart_core::Price::to_minor_units`].
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub amount_minor: i64,
    pub currency: String,
}

/// Synchronous payment result from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentReceipt {
    #[serde(alias = "id")]
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

// =============================================================================
// Seller analytics
// =============================================================================

/// Seller analytics from `GET /api/sellers/analytics`.
///
/// The backend serializes this endpoint in camelCase, unlike the rest of the
/// API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerAnalytics {
    pub total_sales: f64,
    pub total_orders: u32,
    pub total_products: u32,
    pub total_customers: u32,
    #[serde(default)]
    pub recent_sales: Vec<SalePoint>,
}

/// One day of sales in the analytics recent-sales series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalePoint {
    pub date: String,
    pub amount: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_tolerates_bare_and_enriched_items() {
        let bare: Cart = serde_json::from_str(
            r#"{"user_id":"u1","items":[{"product_id":"p1","quantity":2,"added_at":"2025-10-10T12:00:00"}]}"#,
        )
        .unwrap();
        assert_eq!(bare.items[0].quantity, 2);
        assert!(bare.items[0].unit_price.is_none());
        assert!(bare.items[0].product_name.is_none());

        let enriched: Cart = serde_json::from_str(
            r#"{"user_id":"u1","items":[{"product_id":"p1","quantity":1,"unit_price":9.5,"product_name":"Widget"}]}"#,
        )
        .unwrap();
        assert_eq!(enriched.items[0].unit_price, Some(9.5));
        assert_eq!(enriched.items[0].product_name.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_cart_missing_items_is_empty() {
        let cart: Cart = serde_json::from_str(r#"{"user_id":"u1"}"#).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            product_id: ProductId::new("p1"),
            product_name: None,
            price: 19.99,
            quantity: 2,
        };
        assert!((item.line_total() - 39.98).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payment_receipt_accepts_id_alias() {
        let receipt: PaymentReceipt =
            serde_json::from_str(r#"{"id":"pi_123","status":"succeeded"}"#).unwrap();
        assert_eq!(receipt.payment_id, PaymentId::new("pi_123"));
        assert_eq!(receipt.status, PaymentStatus::Succeeded);
    }

    #[test]
    fn test_analytics_camel_case() {
        let analytics: SellerAnalytics = serde_json::from_str(
            r#"{"totalSales":12450.0,"totalOrders":45,"totalProducts":12,"totalCustomers":38,"recentSales":[{"date":"2025-10-10","amount":450.0}]}"#,
        )
        .unwrap();
        assert_eq!(analytics.total_orders, 45);
        assert_eq!(analytics.recent_sales.len(), 1);
    }

    #[test]
    fn test_register_request_omits_missing_phone() {
        let mut request = RegisterRequest {
            email: "jo@example.com".to_string(),
            password: "longenough".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
            user_type: UserType::Customer,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("phone").is_none());

        request.phone = Some("555-0100".to_string());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["phone"], "555-0100");
    }
}
