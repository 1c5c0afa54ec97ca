//! Admin commands: menu, category, and table management.

use rust_decimal::Decimal;

use scan_dine_client::api::menu::MenuItemInput;
use scan_dine_core::{CategoryId, MenuItemId, Role, TableId};

use super::App;

const ADMIN_ROLES: &[Role] = &[Role::Admin];

pub async fn item_create(
    app: &App,
    name: String,
    price: Decimal,
    description: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;

    let item = app
        .menu
        .create_item(&MenuItemInput {
            name,
            description,
            price,
            image_url: None,
            tags,
            category_id: category.map(CategoryId::new),
        })
        .await?;
    println!("created item {} ({})", item.name, item.id.as_str());
    Ok(())
}

pub async fn item_update(
    app: &App,
    id: &str,
    name: String,
    price: Decimal,
    description: Option<String>,
    category: Option<String>,
    tags: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;

    let item = app
        .menu
        .update_item(
            &MenuItemId::new(id),
            &MenuItemInput {
                name,
                description,
                price,
                image_url: None,
                tags,
                category_id: category.map(CategoryId::new),
            },
        )
        .await?;
    println!("updated item {} ({})", item.name, item.id.as_str());
    Ok(())
}

pub async fn item_availability(
    app: &App,
    id: &str,
    available: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;

    let item = app
        .menu
        .set_item_availability(&MenuItemId::new(id), available)
        .await?;
    let state = if item.availability { "available" } else { "unavailable" };
    println!("{} is now {state}", item.name);
    Ok(())
}

pub async fn item_delete(app: &App, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    app.menu.delete_item(&MenuItemId::new(id)).await?;
    println!("item deleted");
    Ok(())
}

pub async fn category_create(
    app: &App,
    name: &str,
    description: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    let category = app.menu.create_category(name, description).await?;
    println!("created category {} ({})", category.name, category.id.as_str());
    Ok(())
}

pub async fn category_update(
    app: &App,
    id: &str,
    name: &str,
    description: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    let category = app
        .menu
        .update_category(&CategoryId::new(id), name, description)
        .await?;
    println!("updated category {}", category.name);
    Ok(())
}

pub async fn category_delete(app: &App, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    app.menu.delete_category(&CategoryId::new(id)).await?;
    println!("category deleted");
    Ok(())
}

pub async fn tables(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    for table in app.tables.list().await? {
        println!(
            "table {:>3}  {}  slug={}",
            table.number,
            table.id.as_str(),
            table.qr_slug.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn table_create(app: &App, number: u32) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    let table = app.tables.create(number).await?;
    println!("created table {} ({})", table.number, table.id.as_str());
    Ok(())
}

pub async fn table_delete(app: &App, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    app.tables.delete(&TableId::new(id)).await?;
    println!("table deleted");
    Ok(())
}

pub async fn table_qr(app: &App, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(ADMIN_ROLES)?;
    let qr = app.tables.qr_code(&TableId::new(id)).await?;
    println!("table {}", qr.table.number);
    if let Some(url) = qr.url {
        println!("link: {url}");
    }
    println!("{}", qr.qr_code);
    Ok(())
}
