//! Crossword Coach API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! explainer) so integration tests and the binary entrypoints can both
//! access them.

pub mod config;
pub mod cors;
pub mod error;
pub mod explainer;
pub mod handlers;
pub mod import;
pub mod router;
pub mod routes;
pub mod state;
