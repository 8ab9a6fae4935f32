//! Admin dashboard figures.

use std::sync::Arc;

use jewel_commerce::catalog::LOW_STOCK_THRESHOLD;
use jewel_commerce::checkout::Order;
use jewel_commerce::{CommerceError, Money};
use serde::Serialize;

use crate::document::deserialize_all;
use crate::orders::{OrderService, ORDERS};
use crate::products::PRODUCTS;
use crate::users::USERS;
use crate::{DbError, DocumentStore};

/// Store-wide counts and revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_customers: usize,
    /// Sum of every order total, cancelled ones included.
    pub total_revenue: Money,
    /// Products with fewer than 10 units in stock.
    pub low_stock_count: usize,
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn DocumentStore>,
    orders: OrderService,
}

impl DashboardService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: OrderService::new(store.clone()),
            store,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, DbError> {
        let products = self.store.list(PRODUCTS).await?;
        let orders: Vec<Order> = deserialize_all(&self.store.list(ORDERS).await?)?;
        let users = self.store.list(USERS).await?;

        let total_revenue = Money::try_sum(orders.iter().map(|o| o.total))
            .ok_or(CommerceError::Overflow)?;
        let low_stock_count = products
            .iter()
            .filter(|p| {
                p.get("stock")
                    .and_then(|s| s.as_i64())
                    .map(|s| s < LOW_STOCK_THRESHOLD)
                    .unwrap_or(false)
            })
            .count();

        Ok(DashboardStats {
            total_products: products.len(),
            total_orders: orders.len(),
            total_customers: users.len(),
            total_revenue,
            low_stock_count,
        })
    }

    /// The most recent orders, newest first.
    pub async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>, DbError> {
        self.orders.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::{NewProduct, ProductService};
    use crate::users::{UserProfile, UserService};
    use crate::MemoryDocumentStore;
    use jewel_commerce::cart::{reduce, CartAction, CartState};
    use jewel_commerce::catalog::Product;
    use jewel_commerce::checkout::{Customer, NewOrder};
    use jewel_commerce::Currency;

    #[tokio::test]
    async fn test_stats() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let products = ProductService::new(store.clone());
        products
            .create(&NewProduct::new("Ring", Money::from_units(100)).with_stock(3))
            .await
            .unwrap();
        products
            .create(&NewProduct::new("Chain", Money::from_units(50)).with_stock(10))
            .await
            .unwrap();
        UserService::new(store.clone())
            .save(&UserProfile::new("u1", "u1@example.be"))
            .await
            .unwrap();

        let cart = reduce(
            &CartState::empty(Currency::EUR),
            CartAction::AddItem {
                product: Product::new("p", "Ring", Money::from_units(100)),
                quantity: 1,
            },
        );
        let order = NewOrder::from_cart(&cart, Customer::new("u1", "U One", "u1@example.be")).unwrap();
        let orders = OrderService::new(store.clone());
        orders.create(&order).await.unwrap();
        orders.create(&order).await.unwrap();

        let dashboard = DashboardService::new(store);
        let stats = dashboard.stats().await.unwrap();
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_customers, 1);
        assert_eq!(stats.total_revenue, Money::from_units(272));
        assert_eq!(stats.low_stock_count, 1);

        assert_eq!(dashboard.recent_orders(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dashboard = DashboardService::new(Arc::new(MemoryDocumentStore::new()));
        let stats = dashboard.stats().await.unwrap();
        assert_eq!(stats.total_revenue, Money::ZERO);
        assert_eq!(stats.low_stock_count, 0);
        assert!(dashboard.recent_orders(5).await.unwrap().is_empty());
    }
}
