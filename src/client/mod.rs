//! Storefront-side state and a typed client for the REST API.

pub mod api;
pub mod cart;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ClientError};
pub use cart::{CartItem, CartStore, format_usd};
pub use session::{AuthState, SearchState};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use crate::models::Category;

/// Categories for menus and filters. A failed fetch is logged and yields none.
pub async fn fetch_categories(client: &ApiClient) -> Vec<Category> {
    match client.categories().await {
        Ok(categories) => categories,
        Err(err) => {
            tracing::error!(error = %err, "failed to load categories");
            Vec::new()
        }
    }
}

/// Pays for the cart and empties it once the server confirms the order.
pub async fn checkout(
    client: &ApiClient,
    cart: &mut CartStore,
    nonce: &str,
) -> Result<(), ClientError> {
    client.pay(nonce, cart.payment_lines()).await?;
    cart.clear();
    Ok(())
}

/// Runs a search and stores the keyword and results.
pub async fn run_search(
    client: &ApiClient,
    search: &mut SearchState,
    keyword: &str,
) -> Result<(), ClientError> {
    let results = client.search(keyword).await?;
    search.set_keyword(keyword);
    search.set_results(results);
    Ok(())
}
