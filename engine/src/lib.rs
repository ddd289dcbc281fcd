//! Haven Engine Library
//!
//! This library provides the core functionality of the Haven backend: bounded
//! in-memory timelines for mood entries and chat messages, and the gateway to the
//! completion service. It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Bounded mood and chat timelines
pub mod memory;

/// Completion service adapter
pub mod llm;

/// Built-in music catalog
pub mod music;

/// Service construction and handle wiring
pub mod context;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;
