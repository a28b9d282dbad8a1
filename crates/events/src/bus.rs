//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`TaskEvent`]s. It is
//! shared via `Arc<EventBus>` across the application; the lifecycle engine
//! publishes after its transaction commits and the notification dispatcher
//! consumes on its own task.

use chrono::{DateTime, Utc};
use rota_core::types::DbId;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// TaskEvent
// ---------------------------------------------------------------------------

/// A lifecycle transition that other parts of the system react to.
///
/// Events carry everything the notification path needs so consumers do not
/// have to re-read the assignment that produced them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TaskEvent {
    TaskStarted {
        assignment_id: DbId,
        site_id: DbId,
        site_name: String,
        duty_type: String,
        staff_name: String,
        started_at: DateTime<Utc>,
        is_late: bool,
    },
    TaskCompleted {
        assignment_id: DbId,
        site_id: DbId,
        site_name: String,
        duty_type: String,
        staff_name: String,
        completed_at: DateTime<Utc>,
        completed_late: bool,
    },
}

impl TaskEvent {
    /// Dot-separated event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            TaskEvent::TaskStarted { .. } => "task.started",
            TaskEvent::TaskCompleted { .. } => "task.completed",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`TaskEvent`].
pub struct EventBus {
    sender: broadcast::Sender<TaskEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; publishing can
    /// never fail, which is what lets the lifecycle engine emit after commit
    /// without a rollback path.
    pub fn publish(&self, event: TaskEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn started_event() -> TaskEvent {
        TaskEvent::TaskStarted {
            assignment_id: 7,
            site_id: 3,
            site_name: "Palm Court".to_string(),
            duty_type: "garbage".to_string(),
            staff_name: "Ali Demir".to_string(),
            started_at: Utc::now(),
            is_late: false,
        }
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(started_event());

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.name(), "task.started");
        match received {
            TaskEvent::TaskStarted {
                assignment_id,
                site_name,
                ..
            } => {
                assert_eq!(assignment_id, 7);
                assert_eq!(site_name, "Palm Court");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(started_event());

        assert_eq!(rx1.recv().await.unwrap().name(), "task.started");
        assert_eq!(rx2.recv().await.unwrap().name(), "task.started");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(started_event());
    }
}
