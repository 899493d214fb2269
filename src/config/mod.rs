//! Configuration module for Folio
//!
//! This module handles user settings, including serialization to/from JSON
//! and persistent storage in platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
