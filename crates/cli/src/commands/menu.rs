//! Catalog browsing commands.

use scan_dine_client::api::menu::MenuFilter;
use scan_dine_core::CategoryId;

use super::App;

pub async fn list_items(
    app: &App,
    category: Option<String>,
    search: Option<String>,
    available_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = MenuFilter {
        category: category.map(CategoryId::new),
        search,
        available_only,
        limit: None,
    };
    let items = app.menu.items(&filter).await?;

    if items.is_empty() {
        println!("no items match");
        return Ok(());
    }

    for item in items {
        let marker = if item.availability { " " } else { "x" };
        let tags = if item.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", item.tags.join(", "))
        };
        println!(
            "{marker} {:<26} {:>8.2}  {}{tags}",
            item.name,
            item.price,
            item.id.as_str(),
        );
    }
    Ok(())
}

pub async fn list_categories(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let categories = app.menu.categories().await?;
    for category in categories {
        match category.description {
            Some(description) => {
                println!("{:<20} {}  ({})", category.name, category.id.as_str(), description);
            }
            None => println!("{:<20} {}", category.name, category.id.as_str()),
        }
    }
    Ok(())
}
