//! # robohub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept **pre-extracted webhook events** (`POST /api/repos/:id/events`)
//!   and run the dispatch pipeline
//! - Serve a **REST-ish JSON API** for the robot registry and the per-repo
//!   automation config (`/api/repos/:id/robots`, `/api/repos/:id/automation`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `robohub-app` (for port traits and services) and
//! `robohub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

pub use router::build;
pub use state::AppState;
