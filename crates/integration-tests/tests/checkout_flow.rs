//! Integration tests for checkout, the payment webhook and order lookup.
//!
//! Run with: cargo test -p guzel-integration-tests --test checkout_flow

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use guzel_core::signature;
use guzel_integration_tests::{
    FakeAllpay, ProviderMode, TEST_API_KEY, TEST_LOGIN, TestStorefront, shipping_address,
};
use serde_json::{Map, Value, json};

fn dress_line(quantity: u32) -> Value {
    json!({
        "productId": "1",
        "slug": "sienna-wrap-dress",
        "name": "Sienna Wrap Dress",
        "price": 18_500,
        "image": "/images/products/sienna-wrap-dress-1.jpg",
        "color": { "name": "Cream", "hex": "#FFF8F0" },
        "size": "M",
        "quantity": quantity
    })
}

fn belt_line() -> Value {
    json!({
        "productId": "5",
        "slug": "minimalist-leather-belt",
        "name": "Minimalist Leather Belt",
        "price": 8_900,
        "image": "",
        "color": { "name": "Cognac", "hex": "#9A5B2F" },
        "size": "One Size",
        "quantity": 1
    })
}

fn checkout_body(items: Value, email: &str, promo: Option<&str>) -> Value {
    json!({
        "items": items,
        "shipping": shipping_address(email),
        "shippingMethodId": "standard",
        "promoCode": promo,
    })
}

fn signed(mut payload: Map<String, Value>, key: &str) -> Value {
    let sign = signature::sign(&payload, key);
    payload.insert("sign".to_string(), Value::String(sign));
    Value::Object(payload)
}

fn notification(order_id: &str, status: Value) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("order_id".to_string(), json!(order_id));
    payload.insert("status".to_string(), status);
    payload
}

fn line_names(request: &Map<String, Value>) -> Vec<String> {
    request["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_checkout_pay_and_lookup() {
    let provider = FakeAllpay::start(ProviderMode::Accept).await;
    let server = TestStorefront::with_provider(&provider).await;

    // Something in the session cart, to check it is cleared
    server
        .post_json(
            "/api/cart/add",
            &json!({ "productId": "1", "color": "Cream", "size": "M", "quantity": 2 }),
        )
        .await;

    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([dress_line(2)]), "ada@example.com", None),
        )
        .await;
    assert_eq!(status, 200, "{body}");
    let order_id = body["sessionId"].as_str().unwrap().to_string();
    assert_eq!(
        body["url"],
        format!("https://pay.example.test/checkout/{order_id}")
    );

    // What the provider saw
    let received = provider.received();
    assert_eq!(received.len(), 1);
    let request = &received[0];
    assert!(signature::verify(request, TEST_API_KEY));
    assert_eq!(request["login"], TEST_LOGIN);
    assert_eq!(request["order_id"], order_id.as_str());
    assert_eq!(request["currency"], "USD");
    assert_eq!(request["client_name"], "Ada Lovelace");
    assert_eq!(request["client_email"], "ada@example.com");
    assert_eq!(
        request["webhook_url"],
        format!("{}/api/webhook", server.base_url)
    );
    assert_eq!(
        request["success_url"],
        format!("{}/checkout/success?session_id={order_id}", server.base_url)
    );
    // Free standard shipping above $150, so no shipping line
    assert_eq!(line_names(request), vec!["Sienna Wrap Dress (Cream / M)", "Tax"]);
    assert_eq!(request["items"][0]["price"].as_f64(), Some(185.0));
    assert_eq!(request["items"][0]["qty"], 2);
    assert_eq!(request["items"][1]["price"].as_f64(), Some(32.84));

    // Cart cleared
    let (_, cart) = server.get_json("/api/cart").await;
    assert_eq!(cart["itemCount"], 0);

    // Pending order
    let (status, order) = server.get_json(&format!("/api/orders/{order_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["summary"]["subtotal"], 37_000);
    assert_eq!(order["summary"]["tax"], 3_284);
    assert_eq!(order["summary"]["total"], 40_284);

    // Provider confirms payment
    let (status, body) = server
        .post_json(
            "/api/webhook",
            &signed(notification(&order_id, json!(1)), TEST_API_KEY),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "received": true }));

    let (_, order) = server.get_json(&format!("/api/orders/{order_id}")).await;
    assert_eq!(order["status"], "paid");

    // A replay is acknowledged and changes nothing
    let (status, _) = server
        .post_json(
            "/api/webhook",
            &signed(notification(&order_id, json!("1")), TEST_API_KEY),
        )
        .await;
    assert_eq!(status, 200);

    let (_, list) = server.get_json("/api/orders?email=ADA@example.com").await;
    assert_eq!(list["orders"].as_array().unwrap().len(), 1);
    assert_eq!(list["orders"][0]["status"], "paid");
}

#[tokio::test]
async fn test_checkout_with_promo_and_shipping_lines() {
    let provider = FakeAllpay::start(ProviderMode::Accept).await;
    let server = TestStorefront::with_provider(&provider).await;

    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(
                json!([dress_line(1), belt_line()]),
                "grace@example.com",
                Some("spring10"),
            ),
        )
        .await;
    assert_eq!(status, 200, "{body}");

    let request = &provider.received()[0];
    assert_eq!(
        line_names(request),
        vec![
            "Sienna Wrap Dress (Cream / M)",
            "Minimalist Leather Belt (Cognac / One Size)",
            "Tax",
            "Discount (SPRING10)",
        ]
    );
    assert_eq!(request["items"][3]["price"].as_f64(), Some(-10.0));

    let order_id = body["sessionId"].as_str().unwrap();
    let (_, order) = server.get_json(&format!("/api/orders/{order_id}")).await;
    assert_eq!(order["promoCode"], "SPRING10");
    assert_eq!(order["summary"]["discount"], 1_000);
    // 27,400 subtotal clears the $150 threshold
    assert_eq!(order["summary"]["shipping"], 0);
}

#[tokio::test]
async fn test_checkout_shipping_line_and_ignored_promo() {
    let provider = FakeAllpay::start(ProviderMode::Accept).await;
    let server = TestStorefront::with_provider(&provider).await;

    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([belt_line()]), "grace@example.com", Some("BOGUS")),
        )
        .await;
    assert_eq!(status, 200, "{body}");

    let request = &provider.received()[0];
    assert_eq!(
        line_names(request),
        vec![
            "Minimalist Leather Belt (Cognac / One Size)",
            "Standard Shipping",
            "Tax"
        ]
    );
    assert_eq!(request["items"][1]["price"].as_f64(), Some(7.99));

    let order_id = body["sessionId"].as_str().unwrap();
    let (_, order) = server.get_json(&format!("/api/orders/{order_id}")).await;
    assert!(order.get("promoCode").is_none());
    assert_eq!(order["summary"]["discount"], 0);
}

#[tokio::test]
async fn test_checkout_validation() {
    let provider = FakeAllpay::start(ProviderMode::Accept).await;
    let server = TestStorefront::with_provider(&provider).await;

    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([]), "ada@example.com", None),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid request data");
    assert!(body["details"].get("items").is_some());

    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([dress_line(1)]), "not-an-email", None),
        )
        .await;
    assert_eq!(status, 400);
    assert!(body["details"].get("shipping").is_some());

    let mut bad_method = checkout_body(json!([dress_line(1)]), "ada@example.com", None);
    bad_method["shippingMethodId"] = json!("teleport");
    let (status, body) = server.post_json("/api/checkout", &bad_method).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid shipping method");

    assert!(provider.received().is_empty());
}

#[tokio::test]
async fn test_checkout_missing_and_mistyped_fields() {
    let provider = FakeAllpay::start(ProviderMode::Accept).await;
    let server = TestStorefront::with_provider(&provider).await;

    let mut no_first_name = checkout_body(json!([dress_line(1)]), "ada@example.com", None);
    no_first_name["shipping"]
        .as_object_mut()
        .unwrap()
        .remove("firstName");
    let (status, body) = server.post_json("/api/checkout", &no_first_name).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid request data");
    assert!(body["details"].get("shipping.firstName").is_some());

    let mut line = dress_line(1);
    line["quantity"] = json!(-1);
    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([line]), "ada@example.com", None),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid request data");
    assert!(body["details"].get("items[0].quantity").is_some());

    let (status, body) = server.post_json("/api/checkout", &json!([1, 2])).await;
    assert_eq!(status, 400);
    assert!(body["details"].get("body").is_some());

    assert!(provider.received().is_empty());
}

#[tokio::test]
async fn test_checkout_without_payment_config() {
    let server = TestStorefront::start().await;
    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([dress_line(1)]), "ada@example.com", None),
        )
        .await;
    assert_eq!(status, 503);
    assert_eq!(body["error"], "Payment service not configured");
    assert_eq!(server.state.orders().len().await, 0);
}

#[tokio::test]
async fn test_provider_refusal() {
    let provider = FakeAllpay::start(ProviderMode::Refuse("Merchant suspended".to_string())).await;
    let server = TestStorefront::with_provider(&provider).await;

    let (status, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([dress_line(1)]), "ada@example.com", None),
        )
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Merchant suspended");
    assert!(server.state.orders().is_empty().await);
}

#[tokio::test]
async fn test_webhook_rejections() {
    let provider = FakeAllpay::start(ProviderMode::Accept).await;
    let server = TestStorefront::with_provider(&provider).await;

    let response = server
        .client
        .post(server.url("/api/webhook"))
        .header("content-type", "application/json")
        .body("[1, 2")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid payload");

    let (status, body) = server
        .post_json(
            "/api/webhook",
            &signed(notification("abc-123", json!(1)), "wrong-key"),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid signature");

    let (status, body) = server
        .post_json("/api/webhook", &Value::Object(notification("abc-123", json!(1))))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid signature");

    let mut no_order = Map::new();
    no_order.insert("status".to_string(), json!(1));
    let (status, body) = server
        .post_json("/api/webhook", &signed(no_order, TEST_API_KEY))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing order_id");

    // Unknown orders are acknowledged
    let (status, body) = server
        .post_json(
            "/api/webhook",
            &signed(notification("abc-123", json!(1)), TEST_API_KEY),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["received"], true);
}

#[tokio::test]
async fn test_webhook_without_payment_config() {
    let server = TestStorefront::start().await;
    let (status, _) = server
        .post_json(
            "/api/webhook",
            &signed(notification("abc-123", json!(1)), TEST_API_KEY),
        )
        .await;
    assert_eq!(status, 503);
}

#[tokio::test]
async fn test_unpaid_status_leaves_order_pending() {
    let provider = FakeAllpay::start(ProviderMode::Accept).await;
    let server = TestStorefront::with_provider(&provider).await;

    let (_, body) = server
        .post_json(
            "/api/checkout",
            &checkout_body(json!([belt_line()]), "ada@example.com", None),
        )
        .await;
    let order_id = body["sessionId"].as_str().unwrap().to_string();

    let (status, _) = server
        .post_json(
            "/api/webhook",
            &signed(notification(&order_id, json!(0)), TEST_API_KEY),
        )
        .await;
    assert_eq!(status, 200);

    let (_, order) = server.get_json(&format!("/api/orders/{order_id}")).await;
    assert_eq!(order["status"], "pending");
}

#[tokio::test]
async fn test_order_lookup_errors() {
    let server = TestStorefront::start().await;

    let (status, body) = server.get_json("/api/orders/not-a-uuid").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Order not found");

    let (status, _) = server
        .get_json("/api/orders/7d1d3f3e-8d55-4c52-9b8a-1f0e6c1a2b3c")
        .await;
    assert_eq!(status, 404);

    let (status, _) = server.get_json("/api/orders").await;
    assert_eq!(status, 400);

    let (status, body) = server.get_json("/api/orders?email=nobody@example.com").await;
    assert_eq!(status, 200);
    assert_eq!(body["orders"], json!([]));
}

#[tokio::test]
async fn test_promo_endpoint() {
    let server = TestStorefront::start().await;

    let (status, body) = server
        .post_json("/api/promo/validate", &json!({ "code": "welcome15", "subtotal": 10_000 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "valid": true,
            "discount": 1_500,
            "type": "percentage",
            "message": "Promo applied! You save $15.00"
        })
    );

    let (status, body) = server
        .post_json("/api/promo/validate", &json!({ "code": "FREESHIP", "subtotal": 100 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["valid"], true);
    assert_eq!(body["freeShipping"], true);

    let (status, body) = server
        .post_json("/api/promo/validate", &json!({ "code": "SPRING10", "subtotal": 5_000 }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], "Minimum order of $75.00 required");

    let (status, body) = server
        .post_json("/api/promo/validate", &json!({ "code": "", "subtotal": 5_000 }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "valid": false, "discount": 0, "message": "Invalid request" }));

    let (status, _) = server
        .post_json("/api/promo/validate", &json!({ "code": "SPRING10" }))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_checkout_routes_are_rate_limited() {
    let server = TestStorefront::start_with(None, true).await;
    let body = json!({ "code": "WELCOME15", "subtotal": 10_000 });

    for _ in 0..5 {
        let (status, _) = server.post_json("/api/promo/validate", &body).await;
        assert_eq!(status, 200);
    }

    let (status, body) = server.post_json("/api/promo/validate", &body).await;
    assert_eq!(status, 429);
    assert_eq!(body["error"], "Rate limited");

    // Reads are not limited
    let (status, _) = server.get_json("/api/products").await;
    assert_eq!(status, 200);
}
