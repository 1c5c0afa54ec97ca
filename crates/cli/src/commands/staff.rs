//! Staff commands: the live queue, status advancement, dashboard stats.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use scan_dine_client::PollHandle;
use scan_dine_client::api::orders::{Order, OrderStats};
use scan_dine_core::{OrderId, OrderStatus, Role};

use super::App;

const STAFF_ROLES: &[Role] = &[Role::Staff, Role::Admin];

/// Show the order queue; with `watch`, keep polling and announce orders
/// that newly appear.
pub async fn queue(
    app: &App,
    status: Option<OrderStatus>,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(STAFF_ROLES)?;

    let orders = app.orders.list(status).await?;
    print_queue(&orders);

    if !watch {
        return Ok(());
    }

    let seen: Arc<Mutex<HashSet<OrderId>>> = Arc::new(Mutex::new(
        orders.iter().map(|order| order.id.clone()).collect(),
    ));
    let api = app.orders.clone();

    let handle = PollHandle::spawn("staff-queue", app.config.queue_poll, move || {
        let api = api.clone();
        let seen = Arc::clone(&seen);
        async move {
            let orders = api.list(status).await?;
            let mut seen = seen.lock().unwrap_or_else(PoisonError::into_inner);
            for order in &orders {
                if seen.insert(order.id.clone()) {
                    println!(
                        "new order {} at table {} ({} lines)",
                        order.id.as_str(),
                        order.table.number,
                        order.items.len()
                    );
                }
            }
            Ok(())
        }
    });

    println!("watching for new orders, Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    handle.stop();
    Ok(())
}

/// Move an order to the next status in the progression.
pub async fn advance(app: &App, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(STAFF_ROLES)?;

    let id = OrderId::new(id);
    let order = app.orders.get(&id).await?;
    let Some(next) = order.status.next() else {
        return Err(format!("order is already {}, nothing to advance", order.status).into());
    };

    let updated = app.orders.update_status(&id, next).await?;
    println!(
        "order {} moved to {} (table {})",
        updated.id.as_str(),
        updated.status,
        updated.table.number
    );
    Ok(())
}

/// Show the dashboard stats; with `watch`, refresh periodically.
pub async fn stats(app: &App, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
    app.require_role(STAFF_ROLES)?;

    let stats = app.orders.stats().await?;
    print_stats(&stats);

    if !watch {
        return Ok(());
    }

    let api = app.orders.clone();
    let handle = PollHandle::spawn("staff-stats", app.config.stats_poll, move || {
        let api = api.clone();
        async move {
            let stats = api.stats().await?;
            println!();
            print_stats(&stats);
            Ok(())
        }
    });

    tokio::signal::ctrl_c().await?;
    handle.stop();
    Ok(())
}

fn print_queue(orders: &[Order]) {
    if orders.is_empty() {
        println!("queue is empty");
        return;
    }
    for order in orders {
        println!(
            "{}  table {:>3}  {:<9}  {} lines  {:>8.2}",
            order.id.as_str(),
            order.table.number,
            order.status.to_string(),
            order.items.len(),
            order.total,
        );
    }
}

fn print_stats(stats: &OrderStats) {
    let in_queue: Vec<String> = OrderStatus::PROGRESSION
        .iter()
        .map(|status| format!("{status}: {}", stats.count_for(*status)))
        .collect();
    println!("orders  {}", in_queue.join("  "));

    if !stats.top_items.is_empty() {
        println!("top sellers:");
        for item in &stats.top_items {
            println!(
                "  {:<26} {:>4}",
                item.name.as_deref().unwrap_or("(removed item)"),
                item.total_quantity
            );
        }
    }
}
