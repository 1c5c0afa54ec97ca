//! Table management and QR resolution.
//!
//! Diners resolve a scanned QR slug to a table through
//! [`TablesApi::by_slug`]; the remaining operations are admin-only.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use scan_dine_core::TableId;

use crate::error::Result;
use crate::http::ApiClient;

/// A physical table in the restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(rename = "_id")]
    pub id: TableId,
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_slug: Option<String>,
}

/// A rendered QR code for a table, base64-encoded PNG plus the target URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub qr_code: String,
    #[serde(default)]
    pub url: Option<String>,
    pub table: QrTable,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QrTable {
    pub number: u32,
}

/// Typed access to the table endpoints.
#[derive(Clone)]
pub struct TablesApi {
    client: ApiClient,
}

impl TablesApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List all tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Vec<Table>> {
        self.client.get("/tables").await
    }

    /// Resolve a scanned QR slug to its table.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug matches no table or the request fails.
    #[instrument(skip(self))]
    pub async fn by_slug(&self, slug: &str) -> Result<Table> {
        self.client.get(&format!("/tables/by-slug/{slug}")).await
    }

    /// Create a table with the given number.
    ///
    /// # Errors
    ///
    /// Returns an error if the number is taken or the request fails.
    #[instrument(skip(self))]
    pub async fn create(&self, number: u32) -> Result<Table> {
        self.client
            .post("/tables", &serde_json::json!({ "number": number }))
            .await
    }

    /// Delete a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &TableId) -> Result<()> {
        self.client.delete(&format!("/tables/{}", id.as_str())).await
    }

    /// Fetch the QR code for a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn qr_code(&self, id: &TableId) -> Result<QrPayload> {
        self.client
            .get(&format!("/tables/{}/qr", id.as_str()))
            .await
    }
}
