//! The cart aggregator: the client-held pending order.
//!
//! A cart is a small ordered collection of lines keyed by
//! `(menu item, note)` - the same dish with different free-text notes is two
//! distinct lines. Adding an existing key merges quantities and keeps the
//! price snapshotted at first add; prices are never re-fetched for lines
//! already in the cart.
//!
//! Every mutation persists the full cart and table binding before updating
//! the in-memory state, so there is no window where memory and durable
//! storage disagree after a mutation returns.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scan_dine_core::{MenuItemId, Money, TableId, Totals};

use crate::api::menu::MenuItem;
use crate::api::orders::{NewOrder, NewOrderItem};
use crate::storage::{Storage, StorageError, keys};

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No table has been bound; orders cannot be submitted without one.
    #[error("no table selected - scan the table QR code first")]
    TableNotBound,

    /// The cart holds no lines.
    #[error("cart is empty")]
    Empty,

    /// Persisting the cart failed; the in-memory cart was left unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One distinct orderable entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    /// Price snapshotted when the line was first added.
    pub price: Money,
    pub quantity: u32,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    fn matches(&self, id: &MenuItemId, note: &str) -> bool {
        self.menu_item_id == *id && self.note == note
    }

    /// `price x quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// The table resolved from a scanned QR slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBinding {
    pub id: TableId,
    pub number: u32,
}

/// The pending order, shared across views.
///
/// Cheap to clone; clones share lines, table binding, and backing storage.
#[derive(Debug, Clone)]
pub struct Cart {
    storage: Storage,
    inner: Arc<Mutex<CartInner>>,
}

#[derive(Debug)]
struct CartInner {
    lines: Vec<CartLine>,
    table: Option<TableBinding>,
}

impl Cart {
    /// Reconstruct the cart from durable storage.
    ///
    /// Absent or malformed stored state falls back to an empty cart; a
    /// reload never fails because of what the last session left behind.
    #[must_use]
    pub fn load(storage: Storage) -> Self {
        let lines: Vec<CartLine> = storage.get(keys::CART).unwrap_or_default();
        let table = match (
            storage.get::<TableId>(keys::TABLE_ID),
            storage.get::<u32>(keys::TABLE_NUMBER),
        ) {
            (Some(id), Some(number)) => Some(TableBinding { id, number }),
            _ => None,
        };

        Self {
            storage,
            inner: Arc::new(Mutex::new(CartInner { lines, table })),
        }
    }

    // =========================================================================
    // Table binding
    // =========================================================================

    /// Bind the cart to a table, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the binding cannot be persisted.
    pub fn set_table(&self, id: TableId, number: u32) -> Result<(), CartError> {
        let mut inner = self.lock();
        self.storage.set_many(vec![
            (
                keys::TABLE_ID.to_owned(),
                serde_json::Value::String(id.as_str().to_owned()),
            ),
            (keys::TABLE_NUMBER.to_owned(), serde_json::Value::from(number)),
        ])?;
        inner.table = Some(TableBinding { id, number });
        Ok(())
    }

    /// The current table binding, if a QR code has been resolved.
    #[must_use]
    pub fn table(&self) -> Option<TableBinding> {
        self.lock().table.clone()
    }

    // =========================================================================
    // Line mutations
    // =========================================================================

    /// Add `quantity` of `item` with a free-text note.
    ///
    /// If a line with the same `(item, note)` key exists its quantity is
    /// incremented and its original price snapshot kept; otherwise a new
    /// line is appended. Adding zero is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart cannot be persisted; the
    /// in-memory cart is unchanged in that case.
    pub fn add_item(&self, item: &MenuItem, quantity: u32, note: &str) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }

        let mut inner = self.lock();
        let mut lines = inner.lines.clone();
        if let Some(line) = lines.iter_mut().find(|line| line.matches(&item.id, note)) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            lines.push(CartLine {
                menu_item_id: item.id.clone(),
                name: item.name.clone(),
                price: Money::new(item.price),
                quantity,
                note: note.to_owned(),
                image_url: item.image_url.clone(),
            });
        }
        self.commit(&mut inner, lines)
    }

    /// Set the matching line's quantity to exactly `quantity`.
    ///
    /// Zero removes the line entirely; the cart never stores a zero
    /// quantity. A missing line is a no-op.
    pub fn update_quantity(
        &self,
        id: &MenuItemId,
        note: &str,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(id, note);
        }

        let mut inner = self.lock();
        let mut lines = inner.lines.clone();
        let Some(line) = lines.iter_mut().find(|line| line.matches(id, note)) else {
            return Ok(());
        };
        line.quantity = quantity;
        self.commit(&mut inner, lines)
    }

    /// Delete the line matching `(id, note)`. Absent lines are a no-op.
    pub fn remove_item(&self, id: &MenuItemId, note: &str) -> Result<(), CartError> {
        let mut inner = self.lock();
        let before = inner.lines.len();
        let lines: Vec<CartLine> = inner
            .lines
            .iter()
            .filter(|line| !line.matches(id, note))
            .cloned()
            .collect();
        if lines.len() == before {
            return Ok(());
        }
        self.commit(&mut inner, lines)
    }

    /// Empty the cart. Called after a successful checkout.
    ///
    /// The table binding survives - the diner is still at the table.
    pub fn clear(&self) -> Result<(), CartError> {
        let mut inner = self.lock();
        self.storage.remove(keys::CART)?;
        inner.lines.clear();
        Ok(())
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines.clone()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().lines.is_empty()
    }

    /// Sum of `price x quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Money {
        self.lock().lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities, for badge display.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lock().lines.iter().map(|line| line.quantity).sum()
    }

    /// Subtotal, tax, and grand total under the checkout policy.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::from_subtotal(self.total())
    }

    /// Build the order submission payload.
    ///
    /// # Errors
    ///
    /// Returns `CartError::TableNotBound` when no table has been resolved -
    /// a distinct, user-visible error, never a silent no-op - and
    /// `CartError::Empty` when there is nothing to order.
    pub fn checkout_payload(&self) -> Result<NewOrder, CartError> {
        let inner = self.lock();
        let table = inner.table.clone().ok_or(CartError::TableNotBound)?;
        if inner.lines.is_empty() {
            return Err(CartError::Empty);
        }

        Ok(NewOrder {
            table_id: table.id,
            items: inner
                .lines
                .iter()
                .map(|line| NewOrderItem {
                    menu_item_id: line.menu_item_id.clone(),
                    quantity: line.quantity,
                    note: line.note.clone(),
                })
                .collect(),
        })
    }

    /// Persist `lines` and only then swap them into memory, so a failed
    /// flush leaves the previous state fully intact.
    fn commit(
        &self,
        inner: &mut MutexGuard<'_, CartInner>,
        lines: Vec<CartLine>,
    ) -> Result<(), CartError> {
        self.storage.set(keys::CART, &lines)?;
        inner.lines = lines;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, CartInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
