//! Point masses orbiting a central attractor inside a circular viewport,
//! with trails clipped to the visible ring between the viewport edge and the
//! attractor body.

pub mod config;
pub mod core;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod types;
pub mod ui;
