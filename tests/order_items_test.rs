mod common;

use common::{create_test_product, event_channel, setup_db};
use counterpoint_api::{
    entities::order::Entity as OrderEntity,
    errors::ServiceError,
    events::Event,
    services::orders::{CreateOrderRequest, OrderItemRequest, OrderService},
};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use uuid::Uuid;

#[tokio::test]
async fn append_persists_item_and_bumps_total() {
    let db = setup_db().await;
    let (sender, mut events) = event_channel();
    let service = OrderService::new(db.clone(), Some(sender));

    let product = create_test_product(&db, "LATTE-001", 50).await;
    let order = service
        .create_order(CreateOrderRequest {
            customer_id: None,
            employee_id: None,
            table_id: None,
            status: "open".to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(events.recv().await, Some(Event::OrderCreated(_))));

    let item = service
        .add_order_item(
            order.id,
            OrderItemRequest {
                product_id: product.id,
                quantity: 2,
                price: 4.50,
            },
        )
        .await
        .unwrap();

    assert_eq!(item.order_id, order.id);
    assert_eq!(item.quantity, 2);
    assert_eq!(item.price, dec!(4.5));

    let items = service.get_order_items(order.id).await.unwrap();
    assert_eq!(items.len(), 1);

    let stored = OrderEntity::find_by_id(order.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_amount, dec!(9.0));

    match events.recv().await {
        Some(Event::OrderItemAdded {
            order_id, quantity, ..
        }) => {
            assert_eq!(order_id, order.id);
            assert_eq!(quantity, 2);
        }
        other => panic!("expected OrderItemAdded event, got {:?}", other),
    }
}

#[tokio::test]
async fn non_positive_quantity_is_rejected_without_mutation() {
    let db = setup_db().await;
    let service = OrderService::new(db.clone(), None);

    let product = create_test_product(&db, "LATTE-002", 50).await;
    let order = service
        .create_order(CreateOrderRequest {
            customer_id: None,
            employee_id: None,
            table_id: None,
            status: "open".to_string(),
        })
        .await
        .unwrap();

    for quantity in [0, -3] {
        let err = service
            .add_order_item(
                order.id,
                OrderItemRequest {
                    product_id: product.id,
                    quantity,
                    price: 4.50,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    // The order's item collection is unchanged
    let items = service.get_order_items(order.id).await.unwrap();
    assert!(items.is_empty());

    let stored = OrderEntity::find_by_id(order.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_amount, dec!(0));
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let db = setup_db().await;
    let service = OrderService::new(db.clone(), None);

    let product = create_test_product(&db, "LATTE-003", 50).await;
    let order = service
        .create_order(CreateOrderRequest {
            customer_id: None,
            employee_id: None,
            table_id: None,
            status: "open".to_string(),
        })
        .await
        .unwrap();

    let err = service
        .add_order_item(
            order.id,
            OrderItemRequest {
                product_id: product.id,
                quantity: 1,
                price: -0.01,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn append_to_missing_order_is_not_found() {
    let db = setup_db().await;
    let service = OrderService::new(db.clone(), None);

    let product = create_test_product(&db, "LATTE-004", 50).await;

    let err = service
        .add_order_item(
            Uuid::new_v4(),
            OrderItemRequest {
                product_id: product.id,
                quantity: 1,
                price: 4.50,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn append_with_unknown_product_is_not_found() {
    let db = setup_db().await;
    let service = OrderService::new(db.clone(), None);

    let order = service
        .create_order(CreateOrderRequest {
            customer_id: None,
            employee_id: None,
            table_id: None,
            status: "open".to_string(),
        })
        .await
        .unwrap();

    let err = service
        .add_order_item(
            order.id,
            OrderItemRequest {
                product_id: Uuid::new_v4(),
                quantity: 1,
                price: 4.50,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let items = service.get_order_items(order.id).await.unwrap();
    assert!(items.is_empty());
}
