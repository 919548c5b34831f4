//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use ekart_core::{CurrencyCode, OrderStatus, Price};

use crate::backend::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub order_id: String,
    pub short_id: String,
    pub status: String,
    pub status_class: String,
    pub total: String,
    pub item_count: usize,
    pub created_at: Option<String>,
    pub payment_method: Option<String>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            short_id: order.order_id.short().to_uppercase(),
            status: order.status.to_string(),
            status_class: status_class(&order.status).to_string(),
            total: Price::new(order.total_amount, CurrencyCode::default()).display(),
            item_count: order.items.len(),
            created_at: order.created_at.clone(),
            payment_method: order.payment_method.clone(),
        }
    }
}

/// CSS class for the status badge. Unknown statuses get the neutral style.
fn status_class(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "badge-pending",
        OrderStatus::Confirmed | OrderStatus::Shipped => "badge-active",
        OrderStatus::Delivered => "badge-done",
        OrderStatus::Cancelled => "badge-cancelled",
        OrderStatus::Other(_) => "badge-neutral",
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderView>,
}

/// Display the signed-in user's order history.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = state.backend().get_orders(&user.token).await?;

    Ok(OrdersIndexTemplate {
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ekart_core::{OrderId, UserId};

    #[test]
    fn test_order_view_formats_totals_and_status() {
        let order = Order {
            order_id: OrderId::new("ord-12345678-abcd"),
            buyer_id: UserId::new("u1"),
            seller_id: None,
            items: Vec::new(),
            total_amount: 44.98,
            status: OrderStatus::Delivered,
            payment_method: Some("card".to_string()),
            payment_status: None,
            created_at: Some("2026-08-01T12:00:00Z".to_string()),
        };

        let view = OrderView::from(&order);
        assert_eq!(view.total, "$44.98");
        assert_eq!(view.status, "delivered");
        assert_eq!(view.status_class, "badge-done");
        assert_eq!(view.short_id, "ORD-1234");
    }

    #[test]
    fn test_unknown_status_gets_neutral_badge() {
        assert_eq!(
            status_class(&OrderStatus::Other("on_hold".to_string())),
            "badge-neutral"
        );
    }
}
