//! Order commands: placing, tracking, history.

use std::sync::{Arc, Mutex, PoisonError};

use scan_dine_client::PollHandle;
use scan_dine_client::api::orders::Order;
use scan_dine_core::{OrderId, OrderStatus};

use super::App;

/// Submit the cart as an order. The cart is only cleared once the server
/// has accepted the order.
pub async fn place(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    let payload = app.cart.checkout_payload()?;
    let order = app.orders.place(&payload).await?;
    app.cart.clear()?;

    println!("order {} placed at table {}", order.id.as_str(), order.table.number);
    println!(
        "subtotal {:.2}  tax {:.2}  total {:.2}",
        order.subtotal, order.tax, order.total
    );
    Ok(())
}

/// Show one order; with `watch`, poll until it reaches a terminal status
/// or Ctrl-C.
pub async fn status(app: &App, id: &str, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    let id = OrderId::new(id);
    let order = app.orders.get(&id).await?;
    print_order(&order);

    if !watch || order.status.next().is_none() {
        return Ok(());
    }

    let (done_tx, mut done_rx) = tokio::sync::mpsc::channel::<()>(1);
    let orders = app.orders.clone();
    let last = Arc::new(Mutex::new(order.status));

    let handle = PollHandle::spawn("order-status", app.config.order_poll, move || {
        let orders = orders.clone();
        let id = id.clone();
        let done_tx = done_tx.clone();
        let last = Arc::clone(&last);
        async move {
            let order = orders.get(&id).await?;
            let previous = {
                let mut guard = last.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::replace(&mut *guard, order.status)
            };
            if order.status != previous {
                println!("status: {}{}", order.status, progress_bar(order.status));
            }
            if order.status.next().is_none() {
                let _ = done_tx.send(()).await;
            }
            Ok(())
        }
    });

    tokio::select! {
        _ = done_rx.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    handle.stop();
    Ok(())
}

/// List the authenticated diner's own orders.
pub async fn mine(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    if !app.session.is_authenticated() {
        return Err("log in to see your order history".into());
    }
    let orders = app.orders.mine().await?;
    if orders.is_empty() {
        println!("no orders yet");
        return Ok(());
    }
    for order in orders {
        let when = order
            .created_at
            .map_or_else(String::new, |at| format!("  {}", at.format("%Y-%m-%d %H:%M")));
        println!(
            "{}  table {:>3}  {:<9}  {:>8.2}{when}",
            order.id.as_str(),
            order.table.number,
            order.status.to_string(),
            order.total,
        );
    }
    Ok(())
}

pub(super) fn print_order(order: &Order) {
    println!(
        "order {} at table {}: {}{}",
        order.id.as_str(),
        order.table.number,
        order.status,
        progress_bar(order.status)
    );
    for line in &order.items {
        let note = if line.note.is_empty() {
            String::new()
        } else {
            format!("  ({})", line.note)
        };
        println!("  {:>3} x {:<26} {:>8.2}{note}", line.quantity, line.name, line.price);
    }
    println!(
        "  subtotal {:.2}  tax {:.2}  total {:.2}",
        order.subtotal, order.tax, order.total
    );
}

/// Render `placed > preparing > ready > served` with the current step marked.
fn progress_bar(status: OrderStatus) -> String {
    let Some(position) = status.position() else {
        return String::new();
    };
    let steps = OrderStatus::PROGRESSION
        .iter()
        .enumerate()
        .map(|(index, step)| {
            if index == position {
                format!("[{step}]")
            } else {
                step.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ");
    format!("  {steps}")
}
