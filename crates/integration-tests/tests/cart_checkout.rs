//! The cart flow end to end: scan, add, reload, place, clear.

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use scan_dine_client::api::menu::MenuItem;
use scan_dine_client::api::orders::OrdersApi;
use scan_dine_core::{MenuItemId, TableId};
use scan_dine_integration_tests::{TestEnv, ok_body};

fn menu_item(id: &str, name: &str, price: i64) -> MenuItem {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "name": name,
        "price": price,
        "availability": true
    }))
    .expect("valid menu item")
}

#[tokio::test]
async fn cart_survives_restart_with_table_binding() {
    let env = TestEnv::start().await;

    let cart = env.cart();
    cart.set_table(TableId::new("t1"), 4).expect("bind table");
    cart.add_item(&menu_item("m1", "Dal Makhani", 240), 2, "less salt")
        .expect("add");
    cart.add_item(&menu_item("m2", "Garlic Naan", 60), 3, "")
        .expect("add");

    // A second load from the same file is the restarted application.
    let reloaded = env.cart();
    assert_eq!(reloaded.lines(), cart.lines());
    assert_eq!(reloaded.table().expect("table kept").number, 4);
    assert_eq!(reloaded.count(), 5);
    assert_eq!(reloaded.totals().grand_total.to_string(), "693.00");
}

#[tokio::test]
async fn checkout_posts_cart_and_clear_keeps_table() {
    let env = TestEnv::start().await;

    let cart = env.cart();
    cart.set_table(TableId::new("t1"), 4).expect("bind table");
    cart.add_item(&menu_item("m1", "Dal Makhani", 240), 2, "")
        .expect("add");

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_json(serde_json::json!({
            "tableId": "t1",
            "items": [{ "menuItemId": "m1", "quantity": 2 }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ok_body(serde_json::json!({
            "_id": "o1",
            "tableId": { "_id": "t1", "number": 4 },
            "items": [
                { "menuItemId": "m1", "name": "Dal Makhani", "price": 240, "quantity": 2, "note": "" }
            ],
            "status": "placed",
            "subtotal": 480,
            "tax": 24,
            "total": 504
        }))))
        .expect(1)
        .mount(&env.server)
        .await;

    let payload = cart.checkout_payload().expect("payload builds");
    let order = OrdersApi::new(env.client())
        .place(&payload)
        .await
        .expect("order accepted");
    assert_eq!(order.table.number, 4);

    cart.clear().expect("clear");
    assert!(cart.is_empty());

    // After a restart the cart is still empty but the diner is still seated.
    let reloaded = env.cart();
    assert!(reloaded.is_empty());
    assert_eq!(reloaded.table().expect("table kept").id, TableId::new("t1"));
}

#[tokio::test]
async fn merge_on_add_is_visible_after_reload() {
    let env = TestEnv::start().await;

    let cart = env.cart();
    cart.add_item(&menu_item("m1", "Dal Makhani", 100), 2, "")
        .expect("add");
    cart.add_item(&menu_item("m1", "Dal Makhani", 100), 3, "")
        .expect("add");

    let reloaded = env.cart();
    let lines = reloaded.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].menu_item_id, MenuItemId::new("m1"));
    assert_eq!(lines[0].quantity, 5);
    assert_eq!(reloaded.totals().subtotal.to_string(), "500.00");
    assert_eq!(reloaded.totals().tax.to_string(), "25.00");
    assert_eq!(reloaded.totals().grand_total.to_string(), "525.00");
}
