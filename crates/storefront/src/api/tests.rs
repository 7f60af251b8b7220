//! Client tests against a local HTTP responder.

use chrono::{TimeZone, Utc};
use cloudmart_core::{CartItem, Email, Price};

use super::*;
use crate::testing::{serve, serve_once};

#[tokio::test]
async fn test_products_are_cached() {
    let (client, server) = serve_once(
        200,
        r#"[{"id":1,"name":"Widget","description":"Small","price":9.99,"image":"w.png"}]"#,
    )
    .await;

    let first = client.products().await.unwrap();
    let recorded = server.await.unwrap();
    assert_eq!(recorded.request_line, "GET /api/products HTTP/1.1");
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].price, Price::from_cents(999).unwrap());

    // The responder is gone; this only succeeds from cache.
    let second = client.products().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let found = client.product(&ProductId::Number(1)).await.unwrap();
    assert_eq!(found.unwrap().name, "Widget");
    assert!(client.product(&ProductId::Number(2)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_order_posts_camel_case_body() {
    let (client, server) = serve_once(201, r#"{"id":"ord-1"}"#).await;

    let item = CartItem {
        id: ProductId::Number(1),
        name: "Widget".to_string(),
        image: String::new(),
        description: None,
        price: Price::from_cents(999).unwrap(),
        quantity: 2,
    };
    let order = NewOrder::from_cart(
        Email::parse("shopper@example.com").unwrap(),
        &[item],
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    )
    .unwrap();

    client.create_order(&order).await.unwrap();

    let recorded = server.await.unwrap();
    assert_eq!(recorded.request_line, "POST /api/orders HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&recorded.body).unwrap();
    assert_eq!(body["userEmail"], "shopper@example.com");
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_non_success_status() {
    let (client, server) = serve_once(500, r#"{"error":"boom"}"#).await;

    let err = client.orders().await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, ApiError::Api { status: 500, ref message } if message.contains("boom")));
}

#[tokio::test]
async fn test_unparseable_body() {
    let (client, server) = serve_once(200, "<html>maintenance</html>").await;

    let err = client.orders().await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn test_orders_for_user_encodes_email() {
    let (client, server) = serve_once(200, "[]").await;

    let orders = client.orders_for_user("a+b@example.com").await.unwrap();
    let recorded = server.await.unwrap();

    assert!(orders.is_empty());
    assert_eq!(
        recorded.request_line,
        "GET /api/orders/user?email=a%2Bb%40example.com HTTP/1.1"
    );
}

#[tokio::test]
async fn test_update_order_status() {
    let (client, server) = serve_once(200, "{}").await;

    client
        .update_order_status(&OrderId::from("ord-7"), OrderStatus::Shipped)
        .await
        .unwrap();
    let recorded = server.await.unwrap();

    assert_eq!(recorded.request_line, "PUT /api/orders/ord-7 HTTP/1.1");
    assert_eq!(recorded.body, r#"{"status":"Shipped"}"#);
}

#[tokio::test]
async fn test_tickets_by_status_and_non_array_body() {
    let (client, server) = serve_once(200, r#"{"message":"no tickets"}"#).await;

    let tickets = client.tickets(Some(TicketStatus::InProgress)).await.unwrap();
    let recorded = server.await.unwrap();

    assert!(tickets.is_empty());
    assert_eq!(
        recorded.request_line,
        "GET /api/tickets/status?status=in_progress HTTP/1.1"
    );
}

#[tokio::test]
async fn test_support_thread_flow_bodies() {
    let (client, server) = serve_once(200, r#"{"threadId":"thread_1"}"#).await;
    let thread_id = client.start_support_thread().await.unwrap();
    assert_eq!(server.await.unwrap().request_line, "POST /api/ai/start HTTP/1.1");
    assert_eq!(thread_id, ThreadId::from("thread_1"));

    let (client, server) = serve_once(200, r#"{"response":"How can I help?"}"#).await;
    let reply = client.send_support_message(&thread_id, "hello").await.unwrap();
    let recorded = server.await.unwrap();
    assert_eq!(reply, "How can I help?");
    assert_eq!(recorded.body, r#"{"threadId":"thread_1","message":"hello"}"#);
}

#[tokio::test]
async fn test_assistant_object_reply() {
    let (client, server) =
        serve_once(200, r#"{"response":{"options":{"output":"Lamps are on sale."}}}"#).await;

    let reply = client
        .send_assistant_message(&ConversationId::from("c-1"), "deals?")
        .await
        .unwrap();
    let recorded = server.await.unwrap();

    assert_eq!(reply, "Lamps are on sale.");
    assert_eq!(recorded.request_line, "POST /api/ai/bedrock/message HTTP/1.1");
    assert_eq!(recorded.body, r#"{"conversationId":"c-1","message":"deals?"}"#);
}

// =============================================================================
// Admin endpoints
// =============================================================================

fn lamp_fields() -> NewProduct {
    NewProduct {
        name: "Lamp".to_string(),
        description: Some("Warm light".to_string()),
        price: Price::from_cents(2450).unwrap(),
        image: "lamp.png".to_string(),
    }
}

#[tokio::test]
async fn test_create_product_posts_fields() {
    let (client, server) = serve_once(
        201,
        r#"{"id":"p-9","name":"Lamp","description":"Warm light","price":24.5,"image":"lamp.png"}"#,
    )
    .await;

    let created = client.create_product(&lamp_fields()).await.unwrap();
    let recorded = server.await.unwrap();

    assert_eq!(created.id, ProductId::from("p-9"));
    assert_eq!(recorded.request_line, "POST /api/products HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&recorded.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"name": "Lamp", "description": "Warm light", "price": 24.5, "image": "lamp.png"})
    );
}

#[tokio::test]
async fn test_product_writes_invalidate_listing() {
    let (client, server) = serve(vec![
        (200, r#"[{"id":1,"name":"Widget","price":9.99}]"#),
        (200, r#"{"id":1,"name":"Lamp","price":24.5}"#),
        (200, r#"[{"id":1,"name":"Lamp","price":24.5}]"#),
        (200, "{}"),
        (200, "[]"),
    ])
    .await;

    let before = client.products().await.unwrap();
    assert_eq!(before[0].name, "Widget");

    let updated = client
        .update_product(&ProductId::Number(1), &lamp_fields())
        .await
        .unwrap();
    assert_eq!(updated.name, "Lamp");

    let after_update = client.products().await.unwrap();
    assert_eq!(after_update[0].name, "Lamp");

    client.delete_product(&ProductId::Number(1)).await.unwrap();
    assert!(client.products().await.unwrap().is_empty());

    let lines: Vec<String> = server
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.request_line)
        .collect();
    assert_eq!(
        lines,
        vec![
            "GET /api/products HTTP/1.1",
            "PUT /api/products/1 HTTP/1.1",
            "GET /api/products HTTP/1.1",
            "DELETE /api/products/1 HTTP/1.1",
            "GET /api/products HTTP/1.1",
        ]
    );
}

#[tokio::test]
async fn test_failed_product_write_keeps_listing_cached() {
    let (client, server) = serve(vec![
        (200, r#"[{"id":1,"name":"Widget","price":9.99}]"#),
        (404, r#"{"error":"not found"}"#),
    ])
    .await;

    let before = client.products().await.unwrap();
    let err = client.delete_product(&ProductId::Number(7)).await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 404, .. }));
    server.await.unwrap();

    // No responder left; only the cache can answer.
    let after = client.products().await.unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[tokio::test]
async fn test_list_and_delete_orders() {
    let (client, server) = serve(vec![
        (
            200,
            r#"[{"id":"ord-1","userEmail":"a@b.co","status":"Processing","items":[],"total":5.0,"createdAt":"2024-05-01T12:00:00Z"}]"#,
        ),
        (200, "{}"),
    ])
    .await;

    let orders = client.orders().await.unwrap();
    assert_eq!(orders[0].status, OrderStatus::Processing);
    client.delete_order(&orders[0].id).await.unwrap();

    let recorded = server.await.unwrap();
    assert_eq!(recorded[0].request_line, "GET /api/orders HTTP/1.1");
    assert_eq!(recorded[1].request_line, "DELETE /api/orders/ord-1 HTTP/1.1");
}

#[tokio::test]
async fn test_list_and_delete_tickets() {
    let (client, server) = serve(vec![
        (
            200,
            r#"[{"id":12,"status":"open","conversation":"[{\"text\":\"hi\",\"sender\":\"user\"}]"}]"#,
        ),
        (200, "{}"),
    ])
    .await;

    let tickets = client.tickets(None).await.unwrap();
    assert_eq!(tickets[0].status, TicketStatus::Open);
    assert_eq!(tickets[0].messages().len(), 1);
    client.delete_ticket(&tickets[0].id).await.unwrap();

    let recorded = server.await.unwrap();
    assert_eq!(recorded[0].request_line, "GET /api/tickets HTTP/1.1");
    assert_eq!(recorded[1].request_line, "DELETE /api/tickets/12 HTTP/1.1");
}
