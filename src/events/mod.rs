use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the checkout flow. Consumed by a logging drain task;
/// downstream integrations (notifications, analytics) subscribe here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CheckoutSessionCreated {
        session_id: Uuid,
        user_id: Uuid,
    },
    CartCleared {
        user_id: Uuid,
    },
    PaymentInitialized {
        session_id: Uuid,
    },
    PaymentConfirmed {
        session_id: Uuid,
        order_id: Uuid,
    },
    PaymentFailed {
        reference: String,
        event: String,
    },
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    WebhookRejected {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, surfacing channel failures to the caller.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }

    /// Fire-and-forget send. Event delivery is never load-bearing for the
    /// checkout flow, so a full or closed channel only logs.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event dropped: {e}");
        }
    }
}

/// Drains the event channel, logging each event. Spawned once at startup.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "event");
    }
    info!("Event channel closed; processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic
        sender
            .send_or_log(Event::OrderCreated(Uuid::new_v4()))
            .await;
    }

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        let session_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        sender
            .send(Event::CheckoutSessionCreated {
                session_id,
                user_id,
            })
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            Event::CheckoutSessionCreated {
                session_id: sid, ..
            } => assert_eq!(sid, session_id),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
