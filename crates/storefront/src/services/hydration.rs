//! Product hydration: enriching minimal product-id references with full
//! product data fetched from the backend.
//!
//! Cart and checkout pages receive line items that may carry nothing but a
//! `product_id` and a quantity. Hydration fans out one detail fetch per
//! distinct id, concurrently, and fans the results back into a lookup map.
//!
//! Two joining policies exist:
//! - [`hydrate_products`] collects settled results: a failed fetch is logged
//!   and the rest of the page still renders (cart display).
//! - [`hydrate_products_strict`] propagates the first failure: a total
//!   computed from partial prices would be wrong (checkout).

use std::collections::HashMap;

use tokio::task::JoinSet;
use tracing::warn;

use ekart_core::ProductId;

use crate::backend::{BackendClient, BackendError, Product};

/// Hydrate all distinct product ids, tolerating individual failures.
///
/// Failed fetches are logged and omitted from the map; callers render what
/// succeeded and fall back per item.
pub async fn hydrate_products(
    backend: &BackendClient,
    ids: impl IntoIterator<Item = ProductId>,
) -> HashMap<ProductId, Product> {
    let mut products = HashMap::new();

    let mut join_set = spawn_fetches(backend, ids);
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((id, Ok(product))) => {
                products.insert(id, product);
            }
            Ok((id, Err(e))) => {
                warn!(product_id = %id, error = %e, "Product hydration failed; rendering without it");
            }
            Err(e) => {
                warn!(error = %e, "Product hydration task panicked");
            }
        }
    }

    products
}

/// Hydrate all distinct product ids, failing the whole join on any error.
///
/// # Errors
///
/// Returns the first fetch error encountered. Remaining in-flight fetches
/// are aborted when the `JoinSet` drops.
pub async fn hydrate_products_strict(
    backend: &BackendClient,
    ids: impl IntoIterator<Item = ProductId>,
) -> Result<HashMap<ProductId, Product>, BackendError> {
    let mut products = HashMap::new();

    let mut join_set = spawn_fetches(backend, ids);
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((id, Ok(product))) => {
                products.insert(id, product);
            }
            Ok((_, Err(e))) => return Err(e),
            Err(e) => {
                return Err(BackendError::Api {
                    status: 500,
                    message: format!("hydration task failed: {e}"),
                });
            }
        }
    }

    Ok(products)
}

/// Spawn one detail fetch per distinct id.
fn spawn_fetches(
    backend: &BackendClient,
    ids: impl IntoIterator<Item = ProductId>,
) -> JoinSet<(ProductId, Result<Product, BackendError>)> {
    let mut join_set = JoinSet::new();
    let mut seen = std::collections::HashSet::new();

    for id in ids {
        if !seen.insert(id.clone()) {
            continue;
        }
        let backend = backend.clone();
        join_set.spawn(async move {
            let result = backend.get_product(&id).await;
            (id, result)
        });
    }

    join_set
}
