//! Webhook ingest handler.
//!
//! Provider-specific payload parsing (GitLab/GitHub) happens upstream of
//! this process; callers POST the already-extracted fact view. A payload
//! that cannot be deserialized is rejected before dispatch runs.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use robohub_app::dispatcher::DispatchedAction;
use robohub_app::ports::{AutomationConfigRepository, RobotRepository, TaskSink};
use robohub_domain::facts::{EventFacts, EventKey};
use robohub_domain::id::RepoId;

use crate::error::ApiError;
use crate::state::AppState;

use super::parse_path;

/// Request body for an ingested event.
#[derive(Deserialize)]
pub struct WebhookRequest {
    /// Which rule bucket the event targets.
    pub event: EventKey,
    /// Flat fact view extracted from the provider payload.
    #[serde(default)]
    pub facts: EventFacts,
}

/// `POST /api/repos/:repo_id/events` — run the dispatch pipeline for one
/// event. Responds with the dispatch instructions in rule order.
pub async fn ingest<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path(repo_id): Path<String>,
    Json(req): Json<WebhookRequest>,
) -> Result<Json<Vec<DispatchedAction>>, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let dispatched = state
        .engine
        .process_event(repo_id, req.event, &req.facts)
        .await?;
    Ok(Json(dispatched))
}
