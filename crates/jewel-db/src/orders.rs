//! Order service.

use std::sync::Arc;

use jewel_commerce::checkout::{NewOrder, Order, OrderStatus};
use jewel_commerce::OrderId;
use serde_json::Value;

use crate::document::{deserialize_all, to_fields, Document, Fields};
use crate::{DbError, DocumentStore};

/// Collection holding orders.
pub const ORDERS: &str = "orders";

/// Order persistence over a document store.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn DocumentStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store an order, returning its new id.
    pub async fn create(&self, order: &NewOrder) -> Result<OrderId, DbError> {
        if order.items.is_empty() {
            return Err(DbError::Validation("order has no items".to_string()));
        }
        let id = self.store.insert(ORDERS, to_fields(order)?).await?;
        Ok(OrderId::new(id))
    }

    /// Move an order to a new status.
    ///
    /// Rejects moves out of a terminal status and moves backwards.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<(), DbError> {
        let order = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ORDERS, id))?;
        order.status.check_transition(status)?;

        let mut patch = Fields::new();
        patch.insert("status".to_string(), Value::String(status.as_str().to_string()));
        self.store.update(ORDERS, id, patch).await
    }

    pub async fn list_all(&self) -> Result<Vec<Order>, DbError> {
        deserialize_all(&self.store.list(ORDERS).await?)
    }

    /// One customer's orders, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Order>, DbError> {
        let docs: Vec<Document> = self
            .store
            .list(ORDERS)
            .await?
            .into_iter()
            .filter(|d| d.get_str("userId") == Some(user_id))
            .collect();
        deserialize_all(&newest_first(docs))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Order>, DbError> {
        match self.store.get(ORDERS, id).await? {
            Some(doc) => Ok(Some(doc.deserialize()?)),
            None => Ok(None),
        }
    }

    /// The `limit` most recent orders across all customers.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Order>, DbError> {
        let mut docs = newest_first(self.store.list(ORDERS).await?);
        docs.truncate(limit);
        deserialize_all(&docs)
    }
}

/// Sort by `createdAt` descending; ties go to the later insert.
pub(crate) fn newest_first(mut docs: Vec<Document>) -> Vec<Document> {
    docs.reverse();
    docs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    docs
}
