//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - 2D math types and angle helpers
//! - The simulation clock and frame timer
//! - Logging setup

pub mod math;
pub mod time;
pub mod logging;
