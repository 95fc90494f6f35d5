mod common;

use common::{
    create_test_customer, create_test_employee, create_test_order, create_test_order_item,
    create_test_product, setup_db,
};
use counterpoint_api::{
    completion::{CannedCompletionClient, FailingCompletionClient},
    errors::ServiceError,
    services::insights::InsightService,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn sales_trends_renders_orders_into_the_prompt() {
    let db = setup_db().await;
    create_test_order(&db, None, None, dec!(42.00)).await;
    create_test_order(&db, None, None, dec!(17.50)).await;

    let client = Arc::new(CannedCompletionClient::new("Coffee sales are trending up."));
    let service = InsightService::new(db, client.clone());

    let insight = service.analyze_sales_trends().await.unwrap();
    assert_eq!(insight, "Coffee sales are trending up.");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    let (prompt, max_tokens) = &calls[0];
    assert_eq!(*max_tokens, 200);
    let order_lines = prompt
        .lines()
        .filter(|line| line.starts_with("Order "))
        .count();
    assert_eq!(order_lines, 2);
    assert!(prompt.contains("status open"));
}

#[tokio::test]
async fn recommendations_split_into_lines() {
    let db = setup_db().await;
    let customer = create_test_customer(&db, "Dana Bishop").await;
    let product = create_test_product(&db, "MUG-001", 30).await;
    let order = create_test_order(&db, Some(customer.id), None, dec!(12.00)).await;
    create_test_order_item(&db, order.id, product.id, 2, dec!(6.00)).await;

    let client = Arc::new(CannedCompletionClient::new(
        "1. Espresso beans\n\n2. Travel mug\n3. Cold brew kit",
    ));
    let service = InsightService::new(db, client.clone());

    let recommendations = service.recommend_products(customer.id).await.unwrap();
    assert_eq!(
        recommendations,
        vec![
            "1. Espresso beans".to_string(),
            "2. Travel mug".to_string(),
            "3. Cold brew kit".to_string(),
        ]
    );

    // The customer's order history (by product name) feeds the prompt
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("Product MUG-001"));
    assert_eq!(calls[0].1, 100);
}

#[tokio::test]
async fn recommendations_for_missing_customer_is_not_found() {
    let db = setup_db().await;
    let service = InsightService::new(db, Arc::new(CannedCompletionClient::new("n/a")));

    let err = service.recommend_products(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn optimize_inventory_parses_integer_level() {
    let db = setup_db().await;
    let product = create_test_product(&db, "MUG-002", 5).await;
    let order = create_test_order(&db, None, None, dec!(18.00)).await;
    create_test_order_item(&db, order.id, product.id, 3, dec!(6.00)).await;

    let client = Arc::new(CannedCompletionClient::new("  75 "));
    let service = InsightService::new(db, client.clone());

    let level = service.optimize_inventory(product.id).await.unwrap();
    assert_eq!(level, 75);

    let calls = client.calls();
    assert_eq!(calls[0].1, 50);
    assert!(calls[0].0.contains("3 sold"));
}

#[tokio::test]
async fn non_numeric_optimization_reply_is_a_dependency_error() {
    let db = setup_db().await;
    let product = create_test_product(&db, "MUG-003", 5).await;

    let client = Arc::new(CannedCompletionClient::new("somewhere around fifty"));
    let service = InsightService::new(db, client);

    let err = service.optimize_inventory(product.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::ExternalServiceError(_)));
}

#[tokio::test]
async fn employee_performance_summarizes_order_totals() {
    let db = setup_db().await;
    let employee = create_test_employee(&db, "Riley Chen").await;
    create_test_order(&db, None, Some(employee.id), dec!(100.00)).await;
    create_test_order(&db, None, Some(employee.id), dec!(55.00)).await;

    let client = Arc::new(CannedCompletionClient::new("A dependable closer."));
    let service = InsightService::new(db, client.clone());

    let review = service
        .review_employee_performance(employee.id)
        .await
        .unwrap();
    assert_eq!(review, "A dependable closer.");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("Riley Chen"));
    assert!(calls[0].0.contains("Orders handled: 2"));
    assert!(calls[0].0.contains("Total sales: $"));
}

#[tokio::test]
async fn completion_failure_surfaces_as_dependency_error() {
    let db = setup_db().await;
    create_test_order(&db, None, None, dec!(9.00)).await;

    let service = InsightService::new(db, Arc::new(FailingCompletionClient));

    let err = service.analyze_sales_trends().await.unwrap_err();
    assert!(matches!(err, ServiceError::ExternalServiceError(_)));
}
