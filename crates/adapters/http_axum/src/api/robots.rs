//! JSON REST handlers for the robot registry.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use robohub_app::ports::{AutomationConfigRepository, RobotRepository, TaskSink};
use robohub_domain::id::{RepoId, RobotId};
use robohub_domain::robot::{Permission, Robot};

use crate::error::ApiError;
use crate::state::AppState;

use super::parse_path;

/// Request body for creating a robot.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRobotRequest {
    pub name: String,
    pub permission: Permission,
    #[serde(default)]
    pub is_default: bool,
    pub prompt_default: Option<String>,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Robot>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the set-default endpoint.
pub enum SetDefaultResponse {
    NoContent,
}

impl IntoResponse for SetDefaultResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/repos/:repo_id/robots` — list a repository's robots.
pub async fn list<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path(repo_id): Path<String>,
) -> Result<Json<Vec<Robot>>, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let robots = state.robot_service.list_robots(repo_id).await?;
    Ok(Json(robots))
}

/// `POST /api/repos/:repo_id/robots` — create a robot.
pub async fn create<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path(repo_id): Path<String>,
    Json(req): Json<CreateRobotRequest>,
) -> Result<CreateResponse, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let mut builder = Robot::builder()
        .repo_id(repo_id)
        .name(req.name)
        .permission(req.permission)
        .is_default(req.is_default);
    if let Some(prompt) = req.prompt_default {
        builder = builder.prompt_default(prompt);
    }
    let robot = builder.build()?;
    let created = state.robot_service.create_robot(robot).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/repos/:repo_id/robots/:robot_id` — get one robot.
pub async fn get_one<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path((_repo_id, robot_id)): Path<(String, String)>,
) -> Result<Json<Robot>, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let robot_id: RobotId = parse_path("robot_id", &robot_id)?;
    let robot = state.robot_service.get_robot(robot_id).await?;
    Ok(Json(robot))
}

/// `PUT /api/repos/:repo_id/robots/:robot_id/default` — promote a robot to
/// default for its permission group.
pub async fn set_default<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path((repo_id, robot_id)): Path<(String, String)>,
) -> Result<SetDefaultResponse, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let robot_id: RobotId = parse_path("robot_id", &robot_id)?;
    state.robot_service.set_default_robot(repo_id, robot_id).await?;
    Ok(SetDefaultResponse::NoContent)
}

/// `GET /api/repos/:repo_id/default-robot/:permission` — the default robot
/// of a permission group, or `null`.
pub async fn default_for<CR, RR, TS>(
    State(state): State<AppState<CR, RR, TS>>,
    Path((repo_id, permission)): Path<(String, String)>,
) -> Result<Json<Option<Robot>>, ApiError>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    let repo_id: RepoId = parse_path("repo_id", &repo_id)?;
    let permission: Permission = parse_path("permission", &permission)?;
    let robot = state.robot_service.default_for(repo_id, permission).await?;
    Ok(Json(robot))
}
