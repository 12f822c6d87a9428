//! amt-core — questionnaire resolution and the interactive session engine.
//!
//! This crate loads questionnaire definitions and previously saved answers,
//! decides which question to ask with which default, and persists the
//! merged answer set.

pub mod answers;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod schema;
pub mod traits;
