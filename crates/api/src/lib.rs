//! Petlog diary API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! the diary orchestrator, background jobs) so integration tests and the
//! binary entrypoint can both access them.

pub mod background;
pub mod config;
pub mod diary;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
