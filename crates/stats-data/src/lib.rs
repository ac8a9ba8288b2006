//! Data layer for stream-stats.
//!
//! Loads streaming-history JSON exports into validated [`PlaybackEvent`]
//! lists, computes reports over them, and merges directories of export files
//! into one chronologically sorted file.
//!
//! [`PlaybackEvent`]: stats_core::models::PlaybackEvent

pub mod engine;
pub mod loader;
pub mod merge;

pub use stats_core as core;
