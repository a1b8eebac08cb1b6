//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod config_service;
pub mod robot_service;

pub use config_service::AutomationConfigService;
pub use robot_service::RobotService;
