//! Shared application state for axum handlers.

use std::sync::Arc;

use robohub_app::automation_engine::AutomationEngine;
use robohub_app::ports::{AutomationConfigRepository, RobotRepository, TaskSink};
use robohub_app::services::config_service::AutomationConfigService;
use robohub_app::services::robot_service::RobotService;

/// Application state shared across all axum handlers.
///
/// Generic over the config repository, robot repository, and task sink to
/// avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone` — only the `Arc`
/// wrappers are cloned.
pub struct AppState<CR, RR, TS> {
    /// Robot registry service.
    pub robot_service: Arc<RobotService<RR>>,
    /// Automation config editor service.
    pub config_service: Arc<AutomationConfigService<CR>>,
    /// Webhook event dispatch pipeline.
    pub engine: Arc<AutomationEngine<CR, RR, TS>>,
}

impl<CR, RR, TS> Clone for AppState<CR, RR, TS> {
    fn clone(&self) -> Self {
        Self {
            robot_service: Arc::clone(&self.robot_service),
            config_service: Arc::clone(&self.config_service),
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<CR, RR, TS> AppState<CR, RR, TS>
where
    CR: AutomationConfigRepository + Send + Sync + 'static,
    RR: RobotRepository + Send + Sync + 'static,
    TS: TaskSink + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        robot_service: RobotService<RR>,
        config_service: AutomationConfigService<CR>,
        engine: AutomationEngine<CR, RR, TS>,
    ) -> Self {
        Self {
            robot_service: Arc::new(robot_service),
            config_service: Arc::new(config_service),
            engine: Arc::new(engine),
        }
    }
}
