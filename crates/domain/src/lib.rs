//! # robohub-domain
//!
//! Pure domain model for the robohub automation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **`EventFacts`** (the normalized view of an inbound webhook event)
//! - Define **Automation rules** (clause → criteria → action structures and
//!   the matching logic that decides whether an event satisfies a rule)
//! - Define **Automation config** (the versioned per-repository rule storage
//!   shape and its v1 → v2 migration)
//! - Define **Robots** (AI agents with a permission level and a default flag)
//! - Define **Task requests** (the instruction handed to the task queue)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod facts;
pub mod robot;
pub mod task;
