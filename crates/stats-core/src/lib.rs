//! Core domain types and helpers for stream-stats.
//!
//! Holds the validated playback-event model, the error taxonomy shared by all
//! crates, timestamp/period utilities, presenter formatting helpers and the
//! CLI settings layer.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
