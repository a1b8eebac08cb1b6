//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod automations;
#[allow(clippy::missing_errors_doc)]
pub mod robots;
#[allow(clippy::missing_errors_doc)]
pub mod webhooks;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, post, put};

use robohub_app::ports::{AutomationConfigRepository, RobotRepository, TaskSink};
use robohub_domain::error::ValidationError;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<CR, RR, TS>() -> Router<AppState<CR, RR, TS>>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    Router::new()
        // Webhook ingest
        .route("/repos/{repo_id}/events", post(webhooks::ingest::<CR, RR, TS>))
        // Robots
        .route(
            "/repos/{repo_id}/robots",
            get(robots::list::<CR, RR, TS>).post(robots::create::<CR, RR, TS>),
        )
        .route(
            "/repos/{repo_id}/robots/{robot_id}",
            get(robots::get_one::<CR, RR, TS>),
        )
        .route(
            "/repos/{repo_id}/robots/{robot_id}/default",
            put(robots::set_default::<CR, RR, TS>),
        )
        .route(
            "/repos/{repo_id}/default-robot/{permission}",
            get(robots::default_for::<CR, RR, TS>),
        )
        // Automation config
        .route(
            "/repos/{repo_id}/automation",
            get(automations::get_config::<CR, RR, TS>).put(automations::put_config::<CR, RR, TS>),
        )
        .route(
            "/repos/{repo_id}/automation/{event}/rules",
            put(automations::upsert_rule::<CR, RR, TS>),
        )
        .route(
            "/repos/{repo_id}/automation/{event}/rules/{rule_id}",
            axum::routing::delete(automations::delete_rule::<CR, RR, TS>),
        )
}

/// Parse a path segment into a typed value, rejecting with `400` on failure.
fn parse_path<T: FromStr>(field: &'static str, value: &str) -> Result<T, ApiError> {
    T::from_str(value).map_err(|_| {
        ApiError::from(robohub_domain::error::RoboHubError::Validation(
            ValidationError::InvalidField {
                field,
                value: value.to_string(),
            },
        ))
    })
}
