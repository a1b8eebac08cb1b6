//! JSON REST handlers for per-repo automation config.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use robohub_app::ports::{AutomationConfigRepository, RobotRepository, TaskSink};
use robohub_domain::automation::{AutomationRule, RepoAutomationConfig};
use robohub_domain::facts::EventKey;
use robohub_domain::id::RepoId;

use crate::error::ApiError;
use crate::state::AppState;

use super::parse_path;

/// Possible responses from the delete-rule endpoint.
pub enum DeleteRuleResponse {
    NoContent,
}

impl IntoResponse for DeleteRuleResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/repos/:repo_id/automation` — the normalized config.
pub async fn get_config<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path(repo_id): Path<String>,
) -> Result<Json<RepoAutomationConfig>, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let config = state.config_service.get_config(repo_id).await?;
    Ok(Json(config))
}

/// `PUT /api/repos/:repo_id/automation` — replace the config.
///
/// The body may be any vintage the normalizer accepts; the response is the
/// canonical version-2 shape that was persisted.
pub async fn put_config<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path(repo_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<RepoAutomationConfig>, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let config = state.config_service.put_config(repo_id, body).await?;
    Ok(Json(config))
}

/// `PUT /api/repos/:repo_id/automation/:event/rules` — insert or replace a
/// rule in the event's bucket.
pub async fn upsert_rule<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path((repo_id, event)): Path<(String, String)>,
    Json(rule): Json<AutomationRule>,
) -> Result<Json<RepoAutomationConfig>, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let key: EventKey = parse_path("event", &event)?;
    let config = state.config_service.upsert_rule(repo_id, key, rule).await?;
    Ok(Json(config))
}

/// `DELETE /api/repos/:repo_id/automation/:event/rules/:rule_id` — remove a
/// rule; removing an unknown id succeeds.
pub async fn delete_rule<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path((repo_id, event, rule_id)): Path<(String, String, String)>,
) -> Result<DeleteRuleResponse, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let key: EventKey = parse_path("event", &event)?;
    state
        .config_service
        .remove_rule(repo_id, key, &rule_id)
        .await?;
    Ok(DeleteRuleResponse::NoContent)
}
