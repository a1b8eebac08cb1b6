//! # robohubd — robohub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Drain the in-process task queue into the delivery log
//! - Bind to a TCP port and serve
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use robohub_adapter_http_axum::state::AppState;
use robohub_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteAutomationConfigRepository, SqliteRobotRepository,
};
use robohub_app::automation_engine::AutomationEngine;
use robohub_app::services::config_service::AutomationConfigService;
use robohub_app::services::robot_service::RobotService;
use robohub_app::task_queue::InProcessTaskQueue;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Task queue; subscribe before the queue moves into the engine.
    let task_queue = InProcessTaskQueue::new(config.tasks.queue_capacity);
    let mut task_rx = task_queue.subscribe();

    // Services and engine, each over its own repository instance.
    let robot_service = RobotService::new(SqliteRobotRepository::new(pool.clone()));
    let config_service =
        AutomationConfigService::new(SqliteAutomationConfigRepository::new(pool.clone()));
    let engine = AutomationEngine::new(
        SqliteAutomationConfigRepository::new(pool.clone()),
        SqliteRobotRepository::new(pool),
        task_queue,
    );

    // Delivery log: drain queued tasks. Task execution against the robot
    // backend hooks in here.
    tokio::spawn(async move {
        while let Ok(task) = task_rx.recv().await {
            tracing::info!(
                task_id = %task.id,
                repo_id = %task.repo_id,
                robot_id = %task.robot_id,
                rule = %task.rule_name,
                "task dispatched"
            );
        }
    });

    // HTTP
    let state = AppState::new(robot_service, config_service, engine);
    let app = robohub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!("robohubd listening on http://{bind_addr}");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
