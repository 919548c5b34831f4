//! EKart backend API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for pricing, inventory, auth, and
//!   orders - the storefront holds no persistent state and re-fetches on
//!   every page view
//! - Plain REST over `reqwest`; bearer token attached only when the caller
//!   has one (anonymous product reads carry none)
//! - One attempt per call: no retry, no circuit breaking
//!
//! # Example
//!
//! ```rust,ignore
//! use ekart_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.api_url);
//!
//! // Anonymous catalog read
//! let products = client.get_products().await?;
//!
//! // Authenticated cart mutation
//! let cart = client.add_cart_item(token, &product_id, 1).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the EKart backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failed (connection refused, DNS, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-2xx status.
    ///
    /// `message` carries the server's `error`/`detail`/`message` field when
    /// present, else a generic fallback.
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON (de)serialization failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// Whether the backend rejected the caller's token (auth-required class).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Human-readable message suitable for an inline error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::NotFound(what) => format!("{what} was not found"),
            Self::Http(_) | Self::Parse(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = BackendError::Api {
            status: 400,
            message: "Cart is empty".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (400): Cart is empty");
        assert_eq!(err.user_message(), "Cart is empty");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = BackendError::Api {
            status: 401,
            message: "Invalid token".to_string(),
        };
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_not_found_user_message() {
        let err = BackendError::NotFound("Product p1".to_string());
        assert_eq!(err.user_message(), "Product p1 was not found");
    }
}
