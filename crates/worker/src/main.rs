//! Standalone notification worker.
//!
//! Drains the `notification_jobs` queue against the shared database, for
//! deployments that scale message delivery independently of the API server.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rota_events::{HttpSender, NotificationWorker, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rota_worker=debug,rota_events=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = rota_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    rota_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection established");

    let sender = HttpSender::from_env()
        .expect("MESSAGE_GATEWAY_URL must be set for the notification worker");
    let config = WorkerConfig::from_env();

    let cancel = tokio_util::sync::CancellationToken::new();
    let worker = NotificationWorker::new(pool, Arc::new(sender), config);
    let handle = tokio::spawn(worker.run(cancel.clone()));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl-C handler");
    tracing::info!("Received SIGINT, shutting down");

    cancel.cancel();
    let _ = handle.await;
    tracing::info!("Worker stopped");
}
