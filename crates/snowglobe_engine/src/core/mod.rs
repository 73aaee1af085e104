//! # Core Engine Module
//!
//! Shared abstractions that other subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration system for all engine subsystems

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    PhysicsConfig,
    Config,
    ConfigError,
};
