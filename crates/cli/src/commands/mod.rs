//! Command implementations, one module per surface.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod menu;
pub mod order;
pub mod staff;

use scan_dine_client::api::menu::MenuApi;
use scan_dine_client::api::orders::OrdersApi;
use scan_dine_client::api::tables::TablesApi;
use scan_dine_client::{ApiClient, Cart, ClientConfig, SessionManager, Storage};
use scan_dine_core::Role;

/// Everything a command needs, built once per invocation.
///
/// The composition root: one storage handle, one HTTP client, one session,
/// one cart. Commands borrow this instead of constructing their own.
pub struct App {
    pub config: ClientConfig,
    pub session: SessionManager,
    pub cart: Cart,
    pub menu: MenuApi,
    pub orders: OrdersApi,
    pub tables: TablesApi,
}

impl App {
    /// Load configuration, open storage, and restore any stored session.
    pub async fn bootstrap() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        let storage = Storage::open(&config.storage_path);
        let client = ApiClient::new(&config, storage.clone())?;

        let session = SessionManager::new(client.clone());
        session.bootstrap().await;

        Ok(Self {
            session,
            cart: Cart::load(storage),
            menu: MenuApi::new(client.clone()),
            orders: OrdersApi::new(client.clone()),
            tables: TablesApi::new(client),
            config,
        })
    }

    /// Bail out unless the current identity holds one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> Result<(), Box<dyn std::error::Error>> {
        if self.session.has_role(roles) {
            return Ok(());
        }
        let wanted = roles
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(format!("access denied: requires {wanted} role, log in first").into())
    }
}
