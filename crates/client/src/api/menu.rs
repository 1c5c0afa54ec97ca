//! Menu catalog access: categories and menu items.
//!
//! Read paths are cached in-memory for 5 minutes via `moka`; searches are
//! never cached. Every admin write invalidates the whole cache, so the next
//! read observes the change instead of a stale listing.

use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use scan_dine_core::{CategoryId, MenuItemId};

use crate::error::Result;
use crate::http::ApiClient;

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The category an item belongs to, as embedded in item listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    #[serde(default)]
    pub name: Option<String>,
}

/// An orderable dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: MenuItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_availability")]
    pub availability: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryRef>,
}

const fn default_availability() -> bool {
    true
}

/// Filter for item listings. Defaults to everything.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
    pub available_only: bool,
    pub limit: Option<u32>,
}

impl MenuFilter {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(category) = &self.category {
            query.push(("category", category.as_str().to_owned()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if self.available_only {
            query.push(("availability", "true".to_owned()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }

    /// Cache key for this filter, or `None` when the listing must not be
    /// cached (free-text searches).
    fn cache_key(&self) -> Option<String> {
        if self.search.is_some() {
            return None;
        }
        Some(format!(
            "items:{}:{}:{}",
            self.category.as_ref().map_or("", CategoryId::as_str),
            self.available_only,
            self.limit.map_or_else(String::new, |limit| limit.to_string()),
        ))
    }
}

/// New item fields for admin creation and updates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewCategory<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ItemsPayload {
    items: Vec<MenuItem>,
}

#[derive(Clone)]
enum CacheEntry {
    Categories(Vec<Category>),
    Items(Vec<MenuItem>),
}

/// Typed access to the menu endpoints.
///
/// Cheap to clone; clones share the HTTP client and the cache.
#[derive(Clone)]
pub struct MenuApi {
    client: ApiClient,
    cache: Cache<String, CacheEntry>,
}

impl MenuApi {
    /// Create a menu API wrapper over an API client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        Self { client, cache }
    }

    // =========================================================================
    // Read paths (cached)
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let cache_key = "categories".to_owned();
        if let Some(CacheEntry::Categories(cached)) = self.cache.get(&cache_key).await {
            debug!("cache hit for categories");
            return Ok(cached);
        }

        let categories: Vec<Category> = self.client.get("/menu/categories").await?;
        self.cache
            .insert(cache_key, CacheEntry::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// List menu items matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>> {
        let cache_key = filter.cache_key();
        if let Some(key) = &cache_key
            && let Some(CacheEntry::Items(cached)) = self.cache.get(key).await
        {
            debug!("cache hit for items");
            return Ok(cached);
        }

        let payload: ItemsPayload = self
            .client
            .get_query("/menu/items", &filter.to_query())
            .await?;
        if let Some(key) = cache_key {
            self.cache
                .insert(key, CacheEntry::Items(payload.items.clone()))
                .await;
        }
        Ok(payload.items)
    }

    /// Resolve one item by id from the (cached) listing.
    ///
    /// The backend exposes no single-item read; the full listing is the
    /// source of truth for add-to-cart lookups.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    #[instrument(skip(self))]
    pub async fn item(&self, id: &MenuItemId) -> Result<Option<MenuItem>> {
        let items = self.items(&MenuFilter::default()).await?;
        Ok(items.into_iter().find(|item| item.id == *id))
    }

    // =========================================================================
    // Admin write paths (cache-invalidating)
    // =========================================================================

    /// Create a menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the item or the request fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_item(&self, input: &MenuItemInput) -> Result<MenuItem> {
        let item = self.client.post("/menu/items", input).await?;
        self.invalidate().await;
        Ok(item)
    }

    /// Replace a menu item's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the request fails.
    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: &MenuItemId, input: &MenuItemInput) -> Result<MenuItem> {
        let item = self
            .client
            .put(&format!("/menu/items/{}", id.as_str()), input)
            .await?;
        self.invalidate().await;
        Ok(item)
    }

    /// Toggle whether an item can currently be ordered.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn set_item_availability(
        &self,
        id: &MenuItemId,
        available: bool,
    ) -> Result<MenuItem> {
        let item = self
            .client
            .put(
                &format!("/menu/items/{}", id.as_str()),
                &serde_json::json!({ "availability": available }),
            )
            .await?;
        self.invalidate().await;
        Ok(item)
    }

    /// Delete a menu item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: &MenuItemId) -> Result<()> {
        self.client
            .delete(&format!("/menu/items/{}", id.as_str()))
            .await?;
        self.invalidate().await;
        Ok(())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the category or the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category> {
        let category = self
            .client
            .post("/menu/categories", &NewCategory { name, description })
            .await?;
        self.invalidate().await;
        Ok(category)
    }

    /// Rename a category or change its description.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category> {
        let category = self
            .client
            .put(
                &format!("/menu/categories/{}", id.as_str()),
                &NewCategory { name, description },
            )
            .await?;
        self.invalidate().await;
        Ok(category)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<()> {
        self.client
            .delete(&format!("/menu/categories/{}", id.as_str()))
            .await?;
        self.invalidate().await;
        Ok(())
    }

    async fn invalidate(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}
