mod common;

use common::{create_test_product, event_channel, setup_db};
use counterpoint_api::{
    entities::product::Entity as ProductEntity,
    errors::ServiceError,
    events::Event,
    services::products::ProductService,
    stock_mirror::{FailingStockMirror, RecordingStockMirror},
};
use sea_orm::EntityTrait;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn adjustment_applies_delta_and_mirrors_once() {
    let db = setup_db().await;
    let (sender, mut events) = event_channel();
    let mirror = Arc::new(RecordingStockMirror::new());
    let service = ProductService::new(db.clone(), Some(sender), mirror.clone());

    let product = create_test_product(&db, "ESP-001", 20).await;

    let adjustment = service.adjust_stock(product.id, 5).await.unwrap();
    assert_eq!(adjustment.previous_quantity, 20);
    assert_eq!(adjustment.new_quantity, 25);

    let stored = ProductEntity::find_by_id(product.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.stock_quantity, 25);

    // Exactly one mirror notification, carrying the persisted value
    assert_eq!(mirror.published(), vec![(product.id, 25)]);

    match events.recv().await {
        Some(Event::StockAdjusted {
            product_id,
            old_quantity,
            new_quantity,
            delta,
        }) => {
            assert_eq!(product_id, product.id);
            assert_eq!(old_quantity, 20);
            assert_eq!(new_quantity, 25);
            assert_eq!(delta, 5);
        }
        other => panic!("expected StockAdjusted event, got {:?}", other),
    }
}

#[tokio::test]
async fn negative_delta_reduces_stock() {
    let db = setup_db().await;
    let mirror = Arc::new(RecordingStockMirror::new());
    let service = ProductService::new(db.clone(), None, mirror.clone());

    let product = create_test_product(&db, "ESP-002", 10).await;

    let adjustment = service.adjust_stock(product.id, -4).await.unwrap();
    assert_eq!(adjustment.new_quantity, 6);
    assert_eq!(mirror.published(), vec![(product.id, 6)]);
}

#[tokio::test]
async fn adjustment_below_zero_is_rejected_and_leaves_stock_untouched() {
    let db = setup_db().await;
    let mirror = Arc::new(RecordingStockMirror::new());
    let service = ProductService::new(db.clone(), None, mirror.clone());

    let product = create_test_product(&db, "ESP-003", 5).await;

    let err = service.adjust_stock(product.id, -10).await.unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientStock(_)));

    let stored = ProductEntity::find_by_id(product.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.stock_quantity, 5);

    // No mirror traffic for a rejected adjustment
    assert!(mirror.published().is_empty());
}

#[tokio::test]
async fn mirror_failure_does_not_roll_back_stock() {
    let db = setup_db().await;
    let service = ProductService::new(db.clone(), None, Arc::new(FailingStockMirror));

    let product = create_test_product(&db, "ESP-004", 8).await;

    let adjustment = service.adjust_stock(product.id, 3).await.unwrap();
    assert_eq!(adjustment.new_quantity, 11);

    let stored = ProductEntity::find_by_id(product.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.stock_quantity, 11);
}

#[tokio::test]
async fn adjusting_missing_product_is_not_found() {
    let db = setup_db().await;
    let service = ProductService::new(db, None, Arc::new(RecordingStockMirror::new()));

    let err = service.adjust_stock(Uuid::new_v4(), 1).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
