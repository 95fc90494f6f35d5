/*!
 * # Stock Mirror
 *
 * Write-through notifier that copies a product's current stock level to an
 * external realtime store, keyed by product id. Pushes are best-effort: one
 * bounded-timeout request per change, no retry, and callers never roll back
 * relational state when a push fails.
 */

use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::MirrorConfig;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Mirror request failed: {0}")]
    Request(String),
    #[error("Mirror store returned status {0}")]
    Status(u16),
}

/// Mirror sink abstraction so the realtime store can be swapped for a
/// recording double in tests.
#[async_trait]
pub trait StockMirror: Send + Sync {
    /// Overwrites the mirrored stock level for one product.
    async fn publish_stock(
        &self,
        product_id: Uuid,
        stock_quantity: i32,
    ) -> Result<(), MirrorError>;
}

/// Firebase-style realtime database client: a keyed JSON overwrite of the
/// `stock_quantity` field at `/inventory/{product_id}`.
#[derive(Clone)]
pub struct FirebaseStockMirror {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl FirebaseStockMirror {
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap(),
            base_url: config.database_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        }
    }

    fn record_url(&self, product_id: Uuid) -> String {
        let mut url = format!("{}/inventory/{}.json", self.base_url, product_id);
        if let Some(token) = &self.auth_token {
            url.push_str("?auth=");
            url.push_str(token);
        }
        url
    }
}

#[async_trait]
impl StockMirror for FirebaseStockMirror {
    #[instrument(skip(self))]
    async fn publish_stock(
        &self,
        product_id: Uuid,
        stock_quantity: i32,
    ) -> Result<(), MirrorError> {
        let response = self
            .client
            .patch(self.record_url(product_id))
            .json(&json!({ "stock_quantity": stock_quantity }))
            .send()
            .await
            .map_err(|e| MirrorError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MirrorError::Status(response.status().as_u16()));
        }

        debug!(%product_id, stock_quantity, "Mirrored stock level");
        Ok(())
    }
}

/// No-op mirror used when mirroring is disabled in configuration.
#[derive(Debug, Default)]
pub struct NoopStockMirror;

#[async_trait]
impl StockMirror for NoopStockMirror {
    async fn publish_stock(
        &self,
        _product_id: Uuid,
        _stock_quantity: i32,
    ) -> Result<(), MirrorError> {
        Ok(())
    }
}

/// Recording mirror for tests: captures every notification in publish order.
#[derive(Debug, Default)]
pub struct RecordingStockMirror {
    published: Mutex<Vec<(Uuid, i32)>>,
}

impl RecordingStockMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(Uuid, i32)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockMirror for RecordingStockMirror {
    async fn publish_stock(
        &self,
        product_id: Uuid,
        stock_quantity: i32,
    ) -> Result<(), MirrorError> {
        self.published
            .lock()
            .unwrap()
            .push((product_id, stock_quantity));
        Ok(())
    }
}

/// Mirror that always fails; used to verify that mirror failures never
/// surface on the relational write path.
#[derive(Debug, Default)]
pub struct FailingStockMirror;

#[async_trait]
impl StockMirror for FailingStockMirror {
    async fn publish_stock(
        &self,
        _product_id: Uuid,
        _stock_quantity: i32,
    ) -> Result<(), MirrorError> {
        Err(MirrorError::Request("mirror store unreachable".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn publish_patches_keyed_record() {
        let server = MockServer::start().await;
        let product_id = Uuid::new_v4();

        Mock::given(method("PATCH"))
            .and(path(format!("/inventory/{}.json", product_id)))
            .and(body_json(json!({ "stock_quantity": 42 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mirror = FirebaseStockMirror::new(&MirrorConfig {
            enabled: true,
            database_url: server.uri(),
            auth_token: None,
            timeout_secs: 5,
        });

        mirror.publish_stock(product_id, 42).await.unwrap();
    }

    #[tokio::test]
    async fn publish_surfaces_error_status() {
        let server = MockServer::start().await;
        let product_id = Uuid::new_v4();

        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mirror = FirebaseStockMirror::new(&MirrorConfig {
            enabled: true,
            database_url: server.uri(),
            auth_token: None,
            timeout_secs: 5,
        });

        let err = mirror.publish_stock(product_id, 1).await.unwrap_err();
        assert!(matches!(err, MirrorError::Status(503)));
    }

    #[test]
    fn record_url_appends_auth_token() {
        let mirror = FirebaseStockMirror::new(&MirrorConfig {
            enabled: true,
            database_url: "https://example.firebaseio.com/".into(),
            auth_token: Some("secret".into()),
            timeout_secs: 5,
        });
        let id = Uuid::new_v4();
        assert_eq!(
            mirror.record_url(id),
            format!("https://example.firebaseio.com/inventory/{}.json?auth=secret", id)
        );
    }

    #[tokio::test]
    async fn recording_mirror_preserves_order() {
        let mirror = RecordingStockMirror::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        mirror.publish_stock(a, 3).await.unwrap();
        mirror.publish_stock(b, 7).await.unwrap();

        assert_eq!(mirror.published(), vec![(a, 3), (b, 7)]);
    }
}
