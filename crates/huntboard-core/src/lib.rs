//! huntboard-core: domain model and pure logic for the huntboard tracker.
//!
//! # Conventions
//!
//! - **Errors**: typed errors (`thiserror`) at module boundaries,
//!   `anyhow::Result` with context at composition points.
//! - **Time**: functions never read the wall clock; `now`/`today` are
//!   always parameters.

pub mod config;
pub mod csv;
pub mod gamify;
pub mod model;
pub mod views;
