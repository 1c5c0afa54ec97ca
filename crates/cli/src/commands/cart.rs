//! Cart commands: table binding and line management.

use scan_dine_core::MenuItemId;

use super::App;

/// Resolve a scanned QR slug and bind the cart to its table.
pub async fn scan(app: &App, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let table = app.tables.by_slug(slug).await?;
    app.cart.set_table(table.id, table.number)?;
    println!("seated at table {}", table.number);
    Ok(())
}

/// Add an item to the cart, resolving it from the menu listing first.
pub async fn add(
    app: &App,
    item_id: &str,
    qty: u32,
    note: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(item) = app.menu.item(&MenuItemId::new(item_id)).await? else {
        return Err(format!("no menu item with id {item_id}").into());
    };
    if !item.availability {
        return Err(format!("{} is currently unavailable", item.name).into());
    }
    app.cart.add_item(&item, qty, note)?;
    println!("added {qty} x {} ({} items in cart)", item.name, app.cart.count());
    Ok(())
}

pub fn list(app: &App) {
    let lines = app.cart.lines();
    if lines.is_empty() {
        println!("cart is empty");
        return;
    }

    if let Some(table) = app.cart.table() {
        println!("table {}", table.number);
    }
    for line in &lines {
        let note = if line.note.is_empty() {
            String::new()
        } else {
            format!("  ({})", line.note)
        };
        println!(
            "{:>3} x {:<26} {:>8} = {:>8}{note}",
            line.quantity,
            line.name,
            line.price,
            line.line_total(),
        );
    }

    let totals = app.cart.totals();
    println!("{:>45} {:>8}", "subtotal", totals.subtotal);
    println!("{:>45} {:>8}", "tax (5%)", totals.tax);
    println!("{:>45} {:>8}", "total", totals.grand_total);
}

pub fn remove(app: &App, item_id: &str, note: &str) -> Result<(), Box<dyn std::error::Error>> {
    app.cart.remove_item(&MenuItemId::new(item_id), note)?;
    println!("removed ({} items in cart)", app.cart.count());
    Ok(())
}

pub fn set_qty(
    app: &App,
    item_id: &str,
    note: &str,
    qty: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    app.cart.update_quantity(&MenuItemId::new(item_id), note, qty)?;
    println!("updated ({} items in cart)", app.cart.count());
    Ok(())
}

pub fn clear(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    app.cart.clear()?;
    println!("cart cleared");
    Ok(())
}
