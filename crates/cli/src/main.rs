//! Scan & Dine CLI - table-side ordering from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Scan a table QR slug and start ordering
//! scan-dine scan tbl-4-abc
//! scan-dine menu --available
//! scan-dine cart add <item-id> --qty 2 --note "less spicy"
//! scan-dine order place
//! scan-dine order status <order-id> --watch
//!
//! # Staff workflow
//! scan-dine login -e staff@example.com -p secret --role staff
//! scan-dine staff queue --watch
//! scan-dine staff advance <order-id>
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `scan` - Bind the cart to a table via its QR slug
//! - `menu` / `categories` - Browse the catalog
//! - `cart` - Manage the pending order
//! - `order` - Place and track orders
//! - `staff` - Live order queue and dashboard (staff/admin)
//! - `admin` - Menu, category, and table management (admin)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use scan_dine_core::{OrderStatus, Role};

mod commands;

use commands::App;

#[derive(Parser)]
#[command(name = "scan-dine")]
#[command(author, version, about = "Scan & Dine table-ordering client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Role the account is expected to hold (`customer`, `staff`, `admin`)
        #[arg(long)]
        role: Option<Role>,
    },
    /// Register a new account and log in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Discard the stored session
    Logout,
    /// Show the current identity
    Whoami,
    /// Resolve a table QR slug and bind the cart to that table
    Scan {
        /// The slug encoded in the table's QR code
        slug: String,
    },
    /// List menu items
    Menu {
        /// Only items in this category id
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Only items currently available
        #[arg(long)]
        available: bool,
    },
    /// List menu categories
    Categories,
    /// Manage the pending order
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place and track orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Staff queue and dashboard
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Menu and table administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add an item to the cart
    Add {
        /// Menu item id
        item_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Free-text note for the kitchen
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// Show the cart with totals
    List,
    /// Remove a line from the cart
    Remove {
        /// Menu item id
        item_id: String,

        /// Note of the line to remove (lines are keyed by item and note)
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// Set a line's quantity (0 removes it)
    SetQty {
        /// Menu item id
        item_id: String,

        /// New quantity
        qty: u32,

        /// Note of the line to change
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Submit the cart as an order
    Place,
    /// Show one order, optionally following status changes
    Status {
        /// Order id
        id: String,

        /// Poll until the order is served or canceled
        #[arg(short, long)]
        watch: bool,
    },
    /// List your own orders
    Mine,
}

#[derive(Subcommand)]
enum StaffAction {
    /// Show the live order queue
    Queue {
        /// Only orders in this status
        #[arg(short, long)]
        status: Option<OrderStatus>,

        /// Keep polling and announce newly placed orders
        #[arg(short, long)]
        watch: bool,
    },
    /// Move an order to the next status
    Advance {
        /// Order id
        id: String,
    },
    /// Show the dashboard stats
    Stats {
        /// Keep polling
        #[arg(short, long)]
        watch: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a menu item
    ItemCreate {
        /// Item name
        #[arg(short, long)]
        name: String,

        /// Price
        #[arg(short, long)]
        price: rust_decimal::Decimal,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Category id
        #[arg(short, long)]
        category: Option<String>,

        /// Tags, repeatable
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Replace a menu item's fields
    ItemUpdate {
        /// Menu item id
        id: String,

        /// Item name
        #[arg(short, long)]
        name: String,

        /// Price
        #[arg(short, long)]
        price: rust_decimal::Decimal,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Category id
        #[arg(short, long)]
        category: Option<String>,

        /// Tags, repeatable
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Toggle an item's availability
    ItemAvailability {
        /// Menu item id
        id: String,

        /// New availability
        #[arg(long, action = clap::ArgAction::Set)]
        available: bool,
    },
    /// Delete a menu item
    ItemDelete {
        /// Menu item id
        id: String,
    },
    /// Create a category
    CategoryCreate {
        /// Category name
        #[arg(short, long)]
        name: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Rename a category
    CategoryUpdate {
        /// Category id
        id: String,

        /// New name
        #[arg(short, long)]
        name: String,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a category
    CategoryDelete {
        /// Category id
        id: String,
    },
    /// List tables
    Tables,
    /// Create a table
    TableCreate {
        /// Table number
        number: u32,
    },
    /// Delete a table
    TableDelete {
        /// Table id
        id: String,
    },
    /// Show a table's QR code link
    TableQr {
        /// Table id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::bootstrap().await?;

    match cli.command {
        Commands::Login {
            email,
            password,
            role,
        } => commands::auth::login(&app, &email, &password, role).await?,
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&app, &name, &email, &password).await?,
        Commands::Logout => commands::auth::logout(&app),
        Commands::Whoami => commands::auth::whoami(&app),
        Commands::Scan { slug } => commands::cart::scan(&app, &slug).await?,
        Commands::Menu {
            category,
            search,
            available,
        } => commands::menu::list_items(&app, category, search, available).await?,
        Commands::Categories => commands::menu::list_categories(&app).await?,
        Commands::Cart { action } => match action {
            CartAction::Add { item_id, qty, note } => {
                commands::cart::add(&app, &item_id, qty, &note).await?;
            }
            CartAction::List => commands::cart::list(&app),
            CartAction::Remove { item_id, note } => commands::cart::remove(&app, &item_id, &note)?,
            CartAction::SetQty { item_id, qty, note } => {
                commands::cart::set_qty(&app, &item_id, &note, qty)?;
            }
            CartAction::Clear => commands::cart::clear(&app)?,
        },
        Commands::Order { action } => match action {
            OrderAction::Place => commands::order::place(&app).await?,
            OrderAction::Status { id, watch } => commands::order::status(&app, &id, watch).await?,
            OrderAction::Mine => commands::order::mine(&app).await?,
        },
        Commands::Staff { action } => match action {
            StaffAction::Queue { status, watch } => {
                commands::staff::queue(&app, status, watch).await?;
            }
            StaffAction::Advance { id } => commands::staff::advance(&app, &id).await?,
            StaffAction::Stats { watch } => commands::staff::stats(&app, watch).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::ItemCreate {
                name,
                price,
                description,
                category,
                tag,
            } => commands::admin::item_create(&app, name, price, description, category, tag).await?,
            AdminAction::ItemUpdate {
                id,
                name,
                price,
                description,
                category,
                tag,
            } => {
                commands::admin::item_update(&app, &id, name, price, description, category, tag)
                    .await?;
            }
            AdminAction::ItemAvailability { id, available } => {
                commands::admin::item_availability(&app, &id, available).await?;
            }
            AdminAction::ItemDelete { id } => commands::admin::item_delete(&app, &id).await?,
            AdminAction::CategoryCreate { name, description } => {
                commands::admin::category_create(&app, &name, description.as_deref()).await?;
            }
            AdminAction::CategoryUpdate {
                id,
                name,
                description,
            } => {
                commands::admin::category_update(&app, &id, &name, description.as_deref()).await?;
            }
            AdminAction::CategoryDelete { id } => {
                commands::admin::category_delete(&app, &id).await?;
            }
            AdminAction::Tables => commands::admin::tables(&app).await?,
            AdminAction::TableCreate { number } => {
                commands::admin::table_create(&app, number).await?;
            }
            AdminAction::TableDelete { id } => commands::admin::table_delete(&app, &id).await?,
            AdminAction::TableQr { id } => commands::admin::table_qr(&app, &id).await?,
        },
    }
    Ok(())
}
