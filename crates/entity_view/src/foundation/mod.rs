//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Colors
//! - Observable values and lists
//! - Logging utilities

pub mod color;
pub mod logging;
pub mod math;
pub mod observable;
