//! API client behaviour against a mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use senji_admin::ApiError;
use senji_admin::forms::{ImageUpload, ProductPayload, ProductSubmission};
use senji_core::{
    CategoryId, CategoryRef, Inventory, NewCategory, OrderId, OrderStatus, Price, ProductId, Size,
    Variant,
};
use senji_integration_tests::{TEST_TOKEN, TestContext, order_record, path as api_path, tee_record};

// ============================================================================
// Authentication header
// ============================================================================

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path(api_path("/products")))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": [tee_record()]})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let products = ctx.api.list_products().await.unwrap();

    assert_eq!(products.len(), 1);
    let tee = &products[0];
    assert_eq!(tee.id, ProductId::new("p1"));
    assert_eq!(tee.price, Price::from_cents(1000));
    assert_eq!(tee.category, CategoryRef::Id(CategoryId::new("c1")));
    assert_eq!(
        tee.variants().unwrap().as_slice(),
        &[Variant::new(Size::S, 5)]
    );
}

#[tokio::test]
async fn test_requests_without_session_are_unauthenticated() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path(api_path("/categories")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&ctx.server)
        .await;

    let categories = ctx.api.list_categories().await.unwrap();

    assert!(categories.is_empty());
    let requests = ctx.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

// ============================================================================
// Error taxonomy
// ============================================================================

#[tokio::test]
async fn test_unauthorized_maps_to_unauthorized() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path(api_path("/orders")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .mount(&ctx.server)
        .await;

    let err = ctx.api.list_orders(1, 10).await.unwrap_err();

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_validation_errors_are_rendered_per_field() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("POST"))
        .and(path(api_path("/categories")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": {
                "name": ["The name field is required.", "The name must be a string."]
            }
        })))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .api
        .create_category(&NewCategory::new(""))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation { .. }));
    assert_eq!(
        err.field_errors().unwrap(),
        "name: The name field is required., The name must be a string."
    );
}

#[tokio::test]
async fn test_missing_order_is_not_found() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path(api_path("/orders/nope")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Order not found"})))
        .mount(&ctx.server)
        .await;

    let err = ctx.api.get_order(&OrderId::new("nope")).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_server_error_keeps_backend_message() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/products/p1")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Database unavailable"})))
        .mount(&ctx.server)
        .await;

    let err = ctx.api.delete_product(&ProductId::new("p1")).await.unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let ctx = TestContext::with_timeout(Duration::from_millis(200)).await;
    Mock::given(method("GET"))
        .and(path(api_path("/dashboard/stats")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&ctx.server)
        .await;

    let err = ctx.api.dashboard_stats().await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout));
    assert!(err.is_network());
}

// ============================================================================
// Request shapes
// ============================================================================

#[tokio::test]
async fn test_list_orders_sends_page_and_limit() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path(api_path("/orders")))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [order_record("665f1c2ab9e4d3a1c0ffee42", "Shipped")],
            "pagination": {"current_page": 2, "last_page": 3, "total": 12}
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let page = ctx.api.list_orders(2, 5).await.unwrap();

    assert_eq!(page.orders.len(), 1);
    let order = &page.orders[0];
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.customer_label(), "Ada");
    assert_eq!(order.total, Decimal::TEN);
    assert_eq!(order.items[0].size, Some(Size::S));
    let pagination = page.pagination.unwrap();
    assert_eq!(pagination.last_page, 3);
    assert!(pagination.has_next());
}

#[tokio::test]
async fn test_update_category_posts_to_record() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("POST"))
        .and(path(api_path("/categories/c2")))
        .and(body_partial_json(json!({"name": "Mugs", "uses_sizes": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "category": {"_id": "c2", "name": "Mugs", "uses_sizes": false}
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let updated = ctx
        .api
        .update_category(&CategoryId::new("c2"), &NewCategory::new("Mugs").with_sizes(false))
        .await
        .unwrap();

    assert_eq!(updated.name, "Mugs");
    assert!(!updated.uses_sizes);
}

#[tokio::test]
async fn test_status_update_sends_status_body() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("PUT"))
        .and(path(api_path("/orders/o1/status")))
        .and(body_partial_json(json!({"status": "Delivered"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Status updated"})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let order = ctx
        .api
        .update_order_status(&OrderId::new("o1"), OrderStatus::Delivered)
        .await
        .unwrap();

    // No record in the reply; the caller keeps its optimistic copy.
    assert!(order.is_none());
}

#[tokio::test]
async fn test_status_update_accepts_plain_text_reply() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("PUT"))
        .and(path(api_path("/orders/o1/status")))
        .respond_with(ResponseTemplate::new(200).set_body_string("Status updated"))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let order = ctx
        .api
        .update_order_status(&OrderId::new("o1"), OrderStatus::Shipped)
        .await
        .unwrap();

    assert!(order.is_none());
}

#[tokio::test]
async fn test_status_update_failure_still_maps_to_error() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("PUT"))
        .and(path(api_path("/orders/o1/status")))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .api
        .update_order_status(&OrderId::new("o1"), OrderStatus::Shipped)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Api { status: 503, .. }));
}

#[tokio::test]
async fn test_product_with_image_is_sent_as_multipart() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("POST"))
        .and(path(api_path("/products")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"product": tee_record()})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let payload = ProductPayload {
        name: "Tee".to_string(),
        price: Price::from_cents(1000),
        category: CategoryId::new("c1"),
        category_name: Some("Shirts".to_string()),
        description: String::new(),
        variants: Some(vec![Variant::new(Size::S, 5)]),
        stock: None,
    };
    let image = ImageUpload::new("tee.png", "image/png", vec![0x89, b'P', b'N', b'G']).unwrap();
    let submission = ProductSubmission::build(payload, Some(image)).unwrap();

    let created = ctx.api.create_product(&submission).await.unwrap();
    assert_eq!(created.name, "Tee");
    assert!(matches!(created.inventory, Inventory::Sized(_)));

    let requests = ctx.server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="variants""#));
    assert!(body.contains(r#"[{"size":"S","stock":5}]"#));
    assert!(body.contains(r#"name="category_name""#));
    assert!(body.contains(r#"name="image"; filename="tee.png""#));
}

#[tokio::test]
async fn test_customers_come_from_admin_users() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path(api_path("/admin/users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"_id": "u1", "name": "Ada", "email": "ada@example.com", "orders": [{}, {}]}]
        })))
        .mount(&ctx.server)
        .await;

    let customers = ctx.api.list_customers().await.unwrap();

    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].order_count, 2);
}
