//! Configuration module for table progress tracking
//!
//! This module provides the `TrackingConfig` struct and its builder for
//! configuring the resource limits applied to every tag occurrence.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::TrackingConfigBuilder;
pub use types::TrackingConfig;
