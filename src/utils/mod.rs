//! # Utilities Module
//!
//! Math helpers for damage rolls and grid helpers for movement and placement.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use pathfinding::*;
