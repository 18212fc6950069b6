use std::sync::Arc;

use emberpos_api::app::{build_app_with, services::AppServices};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let app = build_app_with(Arc::new(AppServices::in_memory(None)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_item(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    stock: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{base_url}/inventory/items"))
        .json(&json!({ "name": name, "stock": stock, "unit": "kg" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

/// One deal, one product (qty 2), one flavor whose single ingredient consumes
/// 3 units per product.
async fn create_feast_deal(
    client: &reqwest::Client,
    base_url: &str,
    item_id: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{base_url}/deals"))
        .json(&json!({
            "name": "Family Feast",
            "price_cents": 1999,
            "image_url": null,
            "products": [{
                "name": "Pizza",
                "quantity": 2,
                "flavors": [{
                    "name": "Pepperoni",
                    "ingredients": [{ "item_id": item_id, "quantity_per_item": "3" }],
                }],
            }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

fn feast_cart_line(deal: &serde_json::Value, quantity: u32) -> serde_json::Value {
    let product_id = deal["products"][0]["id"].as_str().unwrap();
    let flavor_id = deal["products"][0]["flavors"][0]["id"].as_str().unwrap();
    json!({
        "deal_id": deal["id"],
        "quantity": quantity,
        "flavors": { product_id: flavor_id },
    })
}

#[tokio::test]
async fn health_endpoint_responds() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn deal_crud_and_delete_cascade() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "10").await;
    let deal = create_feast_deal(&client, &srv.base_url, item["id"].as_str().unwrap()).await;
    let deal_id = deal["id"].as_str().unwrap();

    // Read it back with the full subtree.
    let res = client
        .get(format!("{}/deals/{}", srv.base_url, deal_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["name"], "Family Feast");
    assert_eq!(fetched["products"][0]["flavors"][0]["name"], "Pepperoni");

    // Update replaces the product list wholesale.
    let res = client
        .put(format!("{}/deals/{}", srv.base_url, deal_id))
        .json(&json!({
            "name": "Mega Feast",
            "price_cents": 2499,
            "image_url": null,
            "products": [{ "name": "Burger", "quantity": 1, "flavors": [] }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Mega Feast");
    assert_eq!(updated["products"][0]["name"], "Burger");

    // Delete, then the whole subtree is gone.
    let res = client
        .delete(format!("{}/deals/{}", srv.base_url, deal_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/deals/{}", srv.base_url, deal_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_deal_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/deals", srv.base_url))
        .json(&json!({
            "name": "No products",
            "price_cents": 500,
            "image_url": null,
            "products": [],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn placing_an_order_deducts_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "10").await;
    let item_id = item["id"].as_str().unwrap().to_string();
    let deal = create_feast_deal(&client, &srv.base_url, &item_id).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "lines": [feast_cart_line(&deal, 1)] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let receipt: serde_json::Value = res.json().await.unwrap();

    assert_eq!(receipt["order"]["status"], "pending");
    assert_eq!(receipt["order"]["order_number"], 1);
    assert_eq!(receipt["order"]["total_cents"], 1999);
    assert_eq!(
        receipt["order"]["instructions"],
        "1x Family Feast [Pizza: Pepperoni]"
    );
    assert_eq!(receipt["warnings"].as_array().unwrap().len(), 0);

    // quantity_per_item 3 x bundle quantity 2 x line quantity 1 = 6 deducted.
    let res = client
        .get(format!("{}/inventory/items/{}", srv.base_url, item_id))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["stock"], "4");
}

#[tokio::test]
async fn negative_stock_warns_and_raises_notifications() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "4").await;
    let item_id = item["id"].as_str().unwrap().to_string();
    let deal = create_feast_deal(&client, &srv.base_url, &item_id).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "lines": [feast_cart_line(&deal, 1)] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let receipt: serde_json::Value = res.json().await.unwrap();

    let warnings = receipt["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["item_name"], "Mozzarella");
    assert_eq!(warnings[0]["resulting_stock"], "-2");

    // The write happened regardless.
    let res = client
        .get(format!("{}/inventory/items/{}", srv.base_url, item_id))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["stock"], "-2");
    assert_eq!(fetched["below_zero"], true);

    // Order placement raised back-office notifications, newest first.
    let res = client
        .get(format!("{}/notifications", srv.base_url))
        .send()
        .await
        .unwrap();
    let notifications: serde_json::Value = res.json().await.unwrap();
    let titles: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"New order #1"));
    assert!(titles.contains(&"Low stock: Mozzarella"));
}

#[tokio::test]
async fn order_status_workflow_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "10").await;
    let deal = create_feast_deal(&client, &srv.base_url, item["id"].as_str().unwrap()).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "lines": [feast_cart_line(&deal, 1)] }))
        .send()
        .await
        .unwrap();
    let receipt: serde_json::Value = res.json().await.unwrap();
    let order_id = receipt["order"]["id"].as_str().unwrap().to_string();

    // Skipping a step is rejected.
    let res = client
        .post(format!("{}/orders/{}/status", srv.base_url, order_id))
        .json(&json!({ "status": "ready" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    for status in ["preparing", "ready", "completed"] {
        let res = client
            .post(format!("{}/orders/{}/status", srv.base_url, order_id))
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["status"], status);
    }

    // Completed is terminal: cancel is rejected.
    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_id))
        .json(&json!({ "reason": "too late" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn cancel_requires_a_reason() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "10").await;
    let deal = create_feast_deal(&client, &srv.base_url, item["id"].as_str().unwrap()).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({ "lines": [feast_cart_line(&deal, 1)] }))
        .send()
        .await
        .unwrap();
    let receipt: serde_json::Value = res.json().await.unwrap();
    let order_id = receipt["order"]["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_id))
        .json(&json!({ "reason": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_id))
        .json(&json!({ "reason": "customer changed their mind" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["cancel_reason"], "customer changed their mind");
}

#[tokio::test]
async fn party_directory_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/parties", srv.base_url))
        .json(&json!({
            "kind": "supplier",
            "name": "Golden Grain Mills",
            "contact": { "email": "orders@goldengrain.example" },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let party: serde_json::Value = res.json().await.unwrap();
    let party_id = party["id"].as_str().unwrap().to_string();
    assert_eq!(party["status"], "active");

    let res = client
        .post(format!("{}/parties", srv.base_url))
        .json(&json!({ "kind": "delivery_staff", "name": "Sam Rider" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Kind filter.
    let res = client
        .get(format!("{}/parties?kind=supplier", srv.base_url))
        .send()
        .await
        .unwrap();
    let suppliers: serde_json::Value = res.json().await.unwrap();
    assert_eq!(suppliers.as_array().unwrap().len(), 1);
    assert_eq!(suppliers[0]["name"], "Golden Grain Mills");

    // Suspend flags, does not delete; a second suspend conflicts.
    let res = client
        .post(format!("{}/parties/{}/suspend", srv.base_url, party_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/parties/{}/suspend", srv.base_url, party_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .get(format!("{}/parties/{}", srv.base_url, party_id))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["status"], "suspended");
}

#[tokio::test]
async fn csv_export_has_header_plus_one_line_per_record() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "100").await;
    let deal = create_feast_deal(&client, &srv.base_url, item["id"].as_str().unwrap()).await;

    for _ in 0..3 {
        let res = client
            .post(format!("{}/orders", srv.base_url))
            .json(&json!({ "lines": [feast_cart_line(&deal, 1)] }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/reports/orders.csv", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let body = res.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert!(line.starts_with('"'));
        assert!(line.ends_with('"'));
    }
}

#[tokio::test]
async fn filtered_csv_export_counts_only_matching_records() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "100").await;
    let deal = create_feast_deal(&client, &srv.base_url, item["id"].as_str().unwrap()).await;

    let mut order_ids = Vec::new();
    for _ in 0..3 {
        let res = client
            .post(format!("{}/orders", srv.base_url))
            .json(&json!({ "lines": [feast_cart_line(&deal, 1)] }))
            .send()
            .await
            .unwrap();
        let receipt: serde_json::Value = res.json().await.unwrap();
        order_ids.push(receipt["order"]["id"].as_str().unwrap().to_string());
    }

    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_ids[0]))
        .json(&json!({ "reason": "out of stock" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Two pending orders match: header + 2 rows.
    let res = client
        .get(format!("{}/reports/orders.csv?status=pending", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert_eq!(body.lines().count(), 3);
    assert!(!body.contains("\"cancelled\""));

    let res = client
        .get(format!("{}/reports/orders.csv?status=cancelled", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap().lines().count(), 2);

    let res = client
        .get(format!("{}/reports/orders.csv?status=shipped", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Outside the date window nothing matches: header only.
    let res = client
        .get(format!("{}/reports/orders.csv?to=2000-01-01", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap().lines().count(), 1);
}

#[tokio::test]
async fn inventory_csv_export_filters_by_name_and_stock_level() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_item(&client, &srv.base_url, "Mozzarella", "10").await;
    create_item(&client, &srv.base_url, "Flour", "-2.5").await;

    let res = client
        .get(format!("{}/reports/inventory.csv?below_zero=true", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("\"Flour\""));

    let res = client
        .get(format!("{}/reports/inventory.csv?name=mozza", srv.base_url))
        .send()
        .await
        .unwrap();
    let body = res.text().await.unwrap();
    assert_eq!(body.lines().count(), 2);
    assert!(body.contains("\"Mozzarella\""));
}

#[tokio::test]
async fn daily_sales_sums_non_cancelled_orders() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let item = create_item(&client, &srv.base_url, "Mozzarella", "100").await;
    let deal = create_feast_deal(&client, &srv.base_url, item["id"].as_str().unwrap()).await;

    for _ in 0..2 {
        client
            .post(format!("{}/orders", srv.base_url))
            .json(&json!({ "lines": [feast_cart_line(&deal, 1)] }))
            .send()
            .await
            .unwrap();
    }

    let res = client
        .get(format!("{}/reports/sales/daily", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let summary: serde_json::Value = res.json().await.unwrap();
    let days = summary.as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["order_count"], 2);
    assert_eq!(days[0]["revenue_cents"], 3998);
}

#[tokio::test]
async fn email_trigger_is_unavailable_when_unconfigured() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/notifications", srv.base_url))
        .json(&json!({ "kind": "system", "title": "Maintenance", "body": "Tonight" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let notification: serde_json::Value = res.json().await.unwrap();
    let id = notification["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/notifications/{}/email", srv.base_url, id))
        .json(&json!({ "to": "manager@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Mark-read still works.
    let res = client
        .post(format!("{}/notifications/{}/read", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["read"], true);
}
