use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted after successful mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Product events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),
    StockAdjusted {
        product_id: Uuid,
        old_quantity: i32,
        new_quantity: i32,
        delta: i32,
    },

    // Procurement events
    PurchaseOrderCreated(Uuid),
    PurchaseOrderUpdated(Uuid),
    PurchaseOrderReceived {
        purchase_order_id: Uuid,
        items_received: usize,
    },
    PurchaseOrderCancelled(Uuid),

    // Order events
    OrderCreated(Uuid),
    OrderUpdated(Uuid),
    OrderItemAdded {
        order_id: Uuid,
        order_item_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    },

    // Payment events
    PaymentRecorded {
        payment_id: Uuid,
        order_id: Uuid,
        amount: Decimal,
    },

    // Accounting events
    AccountingEntryRecorded(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing if the channel is closed.
    /// Event delivery is never load-bearing for the request path.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!(?event, error = %e, "Dropped domain event");
        }
    }
}

/// Drains the event channel, logging each event. Runs for the lifetime of
/// the process; exits when all senders are dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::StockAdjusted {
                product_id,
                old_quantity,
                new_quantity,
                ..
            } => {
                info!(
                    %product_id,
                    old_quantity,
                    new_quantity,
                    "event: stock adjusted"
                );
            }
            Event::PurchaseOrderReceived {
                purchase_order_id,
                items_received,
            } => {
                info!(%purchase_order_id, items_received, "event: purchase order received");
            }
            other => info!(event = ?other, "event"),
        }
    }
    info!("Event channel closed; processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender
            .send(Event::ProductCreated(Uuid::new_v4()))
            .await
            .unwrap();

        assert!(matches!(rx.recv().await, Some(Event::ProductCreated(_))));
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or error out
        sender.send_or_log(Event::OrderCreated(Uuid::new_v4())).await;
    }
}
