//! # robohub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RobotRepository` — robot persistence, including the transactional
//!     default-robot promotion
//!   - `AutomationConfigRepository` — opaque per-repo config JSON
//!   - `TaskSink` — hands dispatched tasks to the execution queue
//! - Provide the **dispatch pipeline**:
//!   - `dispatcher` — the pure decision function turning a normalized
//!     config plus event facts into dispatch instructions
//!   - `AutomationEngine` — drives load → normalize → dispatch → submit
//! - Provide **editor use-cases** (`services`) and the auto-save state
//!   machine (`autosave`)
//! - Provide **in-process infrastructure** (task queue) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `robohub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod autosave;
pub mod automation_engine;
pub mod dispatcher;
pub mod ports;
pub mod services;
pub mod task_queue;
