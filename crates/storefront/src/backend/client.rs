//! REST client for the EKart backend API.
//!
//! One method per backend endpoint, all funneled through [`BackendClient::request`]
//! which resolves the base URL, attaches the bearer token when present, and
//! translates non-2xx responses into [`BackendError::Api`] carrying the
//! server's message field.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use ekart_core::ProductId;

use super::BackendError;
use super::types::{
    AddCartItem, Cart, LoginRequest, NewProduct, Order, PaymentReceipt, PaymentRequest, Product,
    RegisterRequest, SellerAnalytics, TokenResponse, UpdateCartItem,
};

/// Client for the EKart backend REST API.
///
/// Cheaply cloneable; holds a shared `reqwest::Client` and the resolved base
/// URL. Responses are never cached - every page view re-fetches.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client for the given base URL (no trailing slash).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Execute one request against the backend.
    ///
    /// A single attempt per call: failures surface immediately and the caller
    /// decides whether the user may retry.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<T, BackendError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut builder = self.inner.http.request(method, &url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(BackendError::NotFound(path.to_string()));
            }
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Serialize a typed request body, tunneling serde errors into `Parse`.
    fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, BackendError> {
        Ok(serde_json::to_value(body)?)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration (e.g.
    /// duplicate email) or the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, BackendError> {
        let body = Self::encode(request)?;
        self.request(Method::POST, "/api/auth/register", None, Some(body))
            .await
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid credentials or request failure.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, BackendError> {
        let body = Self::encode(request)?;
        self.request(Method::POST, "/api/auth/login", None, Some(body))
            .await
    }

    // =========================================================================
    // Catalog (public, no token)
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, BackendError> {
        self.request(Method::GET, "/api/products", None, None).await
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, BackendError> {
        self.request(
            Method::GET,
            &format!("/api/products/{product_id}"),
            None,
            None,
        )
        .await
    }

    // =========================================================================
    // Cart (bearer token required)
    // =========================================================================

    /// Fetch the current user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &str) -> Result<Cart, BackendError> {
        self.request(Method::GET, "/api/cart", Some(token), None)
            .await
    }

    /// Add a line to the cart (or increase quantity of an existing line).
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation is rejected or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id, quantity))]
    pub async fn add_cart_item(
        &self,
        token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, BackendError> {
        let body = Self::encode(&AddCartItem {
            product_id: product_id.clone(),
            quantity,
        })?;
        self.request(Method::POST, "/api/cart/items", Some(token), Some(body))
            .await
    }

    /// Set the quantity of a cart line.
    ///
    /// Callers must reject `quantity < 1` before reaching this method; the
    /// backend treats it as a validation error.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation is rejected or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id, quantity))]
    pub async fn update_cart_item(
        &self,
        token: &str,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, BackendError> {
        let body = Self::encode(&UpdateCartItem { quantity })?;
        self.request(
            Method::PUT,
            &format!("/api/cart/items/{product_id}"),
            Some(token),
            Some(body),
        )
        .await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation is rejected or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_cart_item(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<Cart, BackendError> {
        self.request(
            Method::DELETE,
            &format!("/api/cart/items/{product_id}"),
            Some(token),
            None,
        )
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List the current user's past orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_orders(&self, token: &str) -> Result<Vec<Order>, BackendError> {
        self.request(Method::GET, "/api/orders", Some(token), None)
            .await
    }

    // =========================================================================
    // Payments (delegated confirmation)
    // =========================================================================

    /// Submit a payment for synchronous confirmation.
    ///
    /// The backend drives the gateway; the receipt is the gateway's answer.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the gateway/server message on decline or
    /// request failure.
    #[instrument(skip(self, token), fields(amount_minor = request.amount_minor))]
    pub async fn create_payment(
        &self,
        token: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, BackendError> {
        let body = Self::encode(request)?;
        self.request(Method::POST, "/api/payments", Some(token), Some(body))
            .await
    }

    // =========================================================================
    // Seller console
    // =========================================================================

    /// Create a product listing (seller accounts only).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the listing or the request
    /// fails.
    #[instrument(skip(self, token, product), fields(title = %product.title))]
    pub async fn create_product(
        &self,
        token: &str,
        product: &NewProduct,
    ) -> Result<Product, BackendError> {
        let body = Self::encode(product)?;
        self.request(Method::POST, "/api/products", Some(token), Some(body))
            .await
    }

    /// Delete a product listing (seller accounts only).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion or the request
    /// fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn delete_product(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<(), BackendError> {
        let _: serde_json::Value = self
            .request(
                Method::DELETE,
                &format!("/api/products/{product_id}"),
                Some(token),
                None,
            )
            .await?;
        Ok(())
    }

    /// Fetch seller analytics.
    ///
    /// Callers fall back to mock data when this fails; see the seller routes.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_seller_analytics(&self, token: &str) -> Result<SellerAnalytics, BackendError> {
        self.request(Method::GET, "/api/sellers/analytics", Some(token), None)
            .await
    }
}

/// Pull the server's message out of an error response body.
///
/// The backend is inconsistent about the field name (`error`, `detail`, or
/// `message`), and some proxies return plain text; fall back generically.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(serde_json::Value::as_str) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') || trimmed.starts_with('<') {
        "Request failed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_known_fields() {
        assert_eq!(
            extract_error_message(r#"{"error":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(
            extract_error_message(r#"{"detail":"Cart is empty"}"#),
            "Cart is empty"
        );
        assert_eq!(
            extract_error_message(r#"{"message":"Forbidden"}"#),
            "Forbidden"
        );
    }

    #[test]
    fn test_extract_error_message_prefers_error_over_detail() {
        assert_eq!(
            extract_error_message(r#"{"detail":"d","error":"e"}"#),
            "e"
        );
    }

    #[test]
    fn test_extract_error_message_plain_text() {
        assert_eq!(extract_error_message("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn test_extract_error_message_fallback() {
        assert_eq!(extract_error_message(""), "Request failed");
        assert_eq!(extract_error_message(r#"{"code":500}"#), "Request failed");
        assert_eq!(
            extract_error_message("<html>bad gateway</html>"),
            "Request failed"
        );
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = BackendClient::new("http://localhost:8000/");
        assert_eq!(client.inner.base_url, "http://localhost:8000");
    }
}
