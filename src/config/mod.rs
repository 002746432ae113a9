//! Configuration module for arus
//!
//! - Base directory resolution
//! - Settings persistence

pub mod paths;
pub mod settings;

pub use paths::ArusPaths;
pub use settings::Settings;
