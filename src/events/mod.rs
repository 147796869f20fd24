use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events emitted by the storefront services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A checkout completed and an order was persisted.
    OrderPlaced(Uuid),
    /// A checkout completed but one or more cart entries referenced
    /// products that no longer exist and were dropped.
    OrderPartiallyFulfilled {
        order_id: Uuid,
        dropped_entries: usize,
    },
    ReviewSubmitted {
        product_id: Uuid,
        review_id: Uuid,
    },
    UserRegistered(Uuid),
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

    /// Sends an event, logging instead of failing when the channel is
    /// closed. Event delivery is best-effort; request handling never
    /// depends on it.
    pub async fn send_or_log(&self, event: Event) {
        let description = format!("{:?}", event);
        if let Err(e) = self.send(event).await {
            warn!("Dropping event {}: {}", description, e);
        }
    }
}

/// Consumes events from the channel until all senders are dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::OrderPlaced(order_id) => {
                info!(%order_id, "order placed");
            }
            Event::OrderPartiallyFulfilled {
                order_id,
                dropped_entries,
            } => {
                error!(
                    %order_id,
                    dropped_entries, "order placed with dropped cart entries"
                );
            }
            Event::ReviewSubmitted {
                product_id,
                review_id,
            } => {
                info!(%product_id, %review_id, "review submitted");
            }
            Event::UserRegistered(user_id) => {
                info!(%user_id, "user registered");
            }
        }
    }

    info!("Event channel closed; stopping event processing loop");
}
