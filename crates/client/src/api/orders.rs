//! Order submission, tracking, and the staff queue.
//!
//! All monetary fields on an order (`subtotal`, `tax`, `total`) are the
//! server's authoritative figures; the client-side totals exist only for
//! display before checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use scan_dine_core::{MenuItemId, OrderId, OrderStatus, TableId};

use crate::error::Result;
use crate::http::ApiClient;

/// One line of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// An order submission built from the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub table_id: TableId,
    pub items: Vec<NewOrderItem>,
}

/// One line of a placed order, with the price frozen at placement time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(default)]
    pub menu_item_id: Option<MenuItemId>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub note: String,
}

/// The table an order belongs to, as embedded in order listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTable {
    #[serde(default, rename = "_id")]
    pub id: Option<TableId>,
    pub number: u32,
}

/// A placed order as reported by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "tableId")]
    pub table: OrderTable,
    pub items: Vec<OrderLine>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct OrdersPayload {
    orders: Vec<Order>,
}

/// A best-selling item in the dashboard stats.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    #[serde(default, rename = "_id")]
    pub id: Option<MenuItemId>,
    #[serde(default)]
    pub name: Option<String>,
    pub total_quantity: u32,
}

/// Count of orders currently in one status.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCount {
    #[serde(rename = "_id")]
    pub status: OrderStatus,
    pub count: u32,
}

/// Aggregated dashboard figures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    #[serde(default)]
    pub top_items: Vec<TopItem>,
    #[serde(default)]
    pub order_stats: Vec<StatusCount>,
}

impl OrderStats {
    /// How many orders are currently in `status`. Absent statuses are zero.
    #[must_use]
    pub fn count_for(&self, status: OrderStatus) -> u32 {
        self.order_stats
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }
}

/// Typed access to the order endpoints.
#[derive(Clone)]
pub struct OrdersApi {
    client: ApiClient,
}

impl OrdersApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit a new order.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the order or the request
    /// fails. The cart is cleared by the caller only after success.
    #[instrument(skip(self, order), fields(table = %order.table_id, lines = order.items.len()))]
    pub async fn place(&self, order: &NewOrder) -> Result<Order> {
        self.client.post("/orders", order).await
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the request fails.
    pub async fn get(&self, id: &OrderId) -> Result<Order> {
        self.client.get(&format!("/orders/{}", id.as_str())).await
    }

    /// The authenticated diner's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no session is active.
    pub async fn mine(&self) -> Result<Vec<Order>> {
        self.client.get("/orders/me").await
    }

    /// The staff queue, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller lacks the role.
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        let query: Vec<(&str, String)> = status
            .map(|status| vec![("status", status.to_string())])
            .unwrap_or_default();
        let payload: OrdersPayload = self.client.get_query("/orders", &query).await?;
        Ok(payload.orders)
    }

    /// Move an order to a new status.
    ///
    /// The server owns the progression rules; an illegal transition comes
    /// back as an ordinary API error.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is rejected or the request fails.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        self.client
            .patch(
                &format!("/orders/{}/status", id.as_str()),
                &serde_json::json!({ "status": status }),
            )
            .await
    }

    /// Aggregated dashboard stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the caller lacks the role.
    pub async fn stats(&self) -> Result<OrderStats> {
        self.client.get("/orders/stats").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserializes_populated_table() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "o1",
                "tableId": {"_id": "t1", "number": 4},
                "items": [
                    {"menuItemId": "m1", "name": "Dal", "price": 120, "quantity": 2, "note": ""}
                ],
                "status": "placed",
                "subtotal": 240,
                "tax": 12,
                "total": 252,
                "createdAt": "2026-08-30T12:00:00Z"
            }"#,
        )
        .expect("deserialize");
        assert_eq!(order.id, OrderId::new("o1"));
        assert_eq!(order.table.number, 4);
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.total, Decimal::from(252));
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_new_order_omits_empty_notes() {
        let body = serde_json::to_value(NewOrder {
            table_id: TableId::new("t1"),
            items: vec![
                NewOrderItem {
                    menu_item_id: MenuItemId::new("m1"),
                    quantity: 1,
                    note: String::new(),
                },
                NewOrderItem {
                    menu_item_id: MenuItemId::new("m2"),
                    quantity: 2,
                    note: "less salt".to_owned(),
                },
            ],
        })
        .expect("serialize");
        assert!(body["items"][0].get("note").is_none());
        assert_eq!(body["items"][1]["note"], "less salt");
    }

    #[test]
    fn test_stats_count_for_missing_status_is_zero() {
        let stats: OrderStats = serde_json::from_str(
            r#"{
                "topItems": [{"_id": "m1", "name": "Dal", "totalQuantity": 12}],
                "orderStats": [{"_id": "placed", "count": 3}, {"_id": "ready", "count": 1}]
            }"#,
        )
        .expect("deserialize");
        assert_eq!(stats.count_for(OrderStatus::Placed), 3);
        assert_eq!(stats.count_for(OrderStatus::Served), 0);
        assert_eq!(stats.top_items[0].total_quantity, 12);
    }
}
