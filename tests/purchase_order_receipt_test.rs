mod common;

use chrono::NaiveDate;
use common::{create_test_product, create_test_supplier, event_channel, setup_db};
use counterpoint_api::{
    entities::{
        product::Entity as ProductEntity,
        purchase_order::{Entity as PurchaseOrderEntity, PurchaseOrderStatus},
    },
    errors::ServiceError,
    events::Event,
    services::procurement::{
        CreatePurchaseOrderRequest, ProcurementService, PurchaseOrderItemRequest,
    },
    stock_mirror::RecordingStockMirror,
};
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

fn delivery_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

#[tokio::test]
async fn receipt_marks_received_and_applies_every_line() {
    let db = setup_db().await;
    let (sender, mut events) = event_channel();
    let mirror = Arc::new(RecordingStockMirror::new());
    let service = ProcurementService::new(db.clone(), Some(sender), mirror.clone());

    let supplier = create_test_supplier(&db).await;
    let product_a = create_test_product(&db, "BEAN-001", 10).await;
    let product_b = create_test_product(&db, "BEAN-002", 2).await;

    let po = service
        .create_purchase_order(CreatePurchaseOrderRequest {
            supplier_id: supplier.id,
            expected_delivery_date: delivery_date(),
            items: vec![
                PurchaseOrderItemRequest {
                    product_id: product_a.id,
                    quantity: 3,
                    unit_price: dec!(4.50),
                },
                PurchaseOrderItemRequest {
                    product_id: product_b.id,
                    quantity: 7,
                    unit_price: dec!(2.25),
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(po.order.status, PurchaseOrderStatus::Pending);

    // Drain the creation event so the receipt event is next
    assert!(matches!(
        events.recv().await,
        Some(Event::PurchaseOrderCreated(_))
    ));

    let summary = service.receive_purchase_order(po.order.id).await.unwrap();
    assert_eq!(summary.status, PurchaseOrderStatus::Received);
    assert_eq!(summary.items_received, 2);

    let header = PurchaseOrderEntity::find_by_id(po.order.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(header.status, PurchaseOrderStatus::Received);

    let stock_a = ProductEntity::find_by_id(product_a.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .stock_quantity;
    let stock_b = ProductEntity::find_by_id(product_b.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .stock_quantity;
    assert_eq!((stock_a, stock_b), (13, 9));

    // One mirror notification per line item with the new level; line order
    // is not guaranteed, so compare as a map
    let published: HashMap<Uuid, i32> = mirror.published().into_iter().collect();
    assert_eq!(published.len(), 2);
    assert_eq!(published[&product_a.id], 13);
    assert_eq!(published[&product_b.id], 9);

    match events.recv().await {
        Some(Event::PurchaseOrderReceived {
            purchase_order_id,
            items_received,
        }) => {
            assert_eq!(purchase_order_id, po.order.id);
            assert_eq!(items_received, 2);
        }
        other => panic!("expected PurchaseOrderReceived event, got {:?}", other),
    }
}

#[tokio::test]
async fn receiving_twice_is_rejected() {
    let db = setup_db().await;
    let mirror = Arc::new(RecordingStockMirror::new());
    let service = ProcurementService::new(db.clone(), None, mirror.clone());

    let supplier = create_test_supplier(&db).await;
    let product = create_test_product(&db, "BEAN-003", 0).await;

    let po = service
        .create_purchase_order(CreatePurchaseOrderRequest {
            supplier_id: supplier.id,
            expected_delivery_date: delivery_date(),
            items: vec![PurchaseOrderItemRequest {
                product_id: product.id,
                quantity: 5,
                unit_price: dec!(1.00),
            }],
        })
        .await
        .unwrap();

    service.receive_purchase_order(po.order.id).await.unwrap();
    let err = service
        .receive_purchase_order(po.order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus(_)));

    // Stock applied exactly once
    let stock = ProductEntity::find_by_id(product.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .stock_quantity;
    assert_eq!(stock, 5);
    assert_eq!(mirror.published().len(), 1);
}

#[tokio::test]
async fn receiving_cancelled_order_is_rejected() {
    let db = setup_db().await;
    let service =
        ProcurementService::new(db.clone(), None, Arc::new(RecordingStockMirror::new()));

    let supplier = create_test_supplier(&db).await;
    let product = create_test_product(&db, "BEAN-004", 1).await;

    let po = service
        .create_purchase_order(CreatePurchaseOrderRequest {
            supplier_id: supplier.id,
            expected_delivery_date: delivery_date(),
            items: vec![PurchaseOrderItemRequest {
                product_id: product.id,
                quantity: 2,
                unit_price: dec!(3.00),
            }],
        })
        .await
        .unwrap();

    service.cancel_purchase_order(po.order.id).await.unwrap();

    let err = service
        .receive_purchase_order(po.order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidStatus(_)));

    let stock = ProductEntity::find_by_id(product.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .stock_quantity;
    assert_eq!(stock, 1);
}

#[tokio::test]
async fn receiving_missing_order_is_not_found() {
    let db = setup_db().await;
    let service = ProcurementService::new(db, None, Arc::new(RecordingStockMirror::new()));

    let err = service
        .receive_purchase_order(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn create_rejects_empty_and_non_positive_items() {
    let db = setup_db().await;
    let service =
        ProcurementService::new(db.clone(), None, Arc::new(RecordingStockMirror::new()));

    let supplier = create_test_supplier(&db).await;
    let product = create_test_product(&db, "BEAN-005", 0).await;

    let err = service
        .create_purchase_order(CreatePurchaseOrderRequest {
            supplier_id: supplier.id,
            expected_delivery_date: delivery_date(),
            items: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = service
        .create_purchase_order(CreatePurchaseOrderRequest {
            supplier_id: supplier.id,
            expected_delivery_date: delivery_date(),
            items: vec![PurchaseOrderItemRequest {
                product_id: product.id,
                quantity: 0,
                unit_price: dec!(1.00),
            }],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}
