//! rota event bus and notification infrastructure.
//!
//! Building blocks for the asynchronous notification path:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, carrying [`TaskEvent`]s.
//! - [`NotificationDispatcher`] — subscribes to the bus and fans each
//!   lifecycle event out into durable queue jobs, one per recipient.
//! - [`NotificationSender`] — the external message-sending capability,
//!   with [`HttpSender`] as the gateway-backed implementation.
//! - [`NotificationWorker`] — a worker pool that drains the queue with
//!   per-job timeout and bounded exponential-backoff retry.

pub mod bus;
pub mod dispatcher;
pub mod sender;
pub mod worker;

pub use bus::{EventBus, TaskEvent};
pub use dispatcher::{AnnouncementRecipient, NotificationDispatcher};
pub use sender::{HttpSender, NotificationSender, SendError};
pub use worker::{NotificationWorker, WorkerConfig};
