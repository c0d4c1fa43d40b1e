use std::f64::consts::PI;

pub const DIAMETER: f64 = 600.0;
pub const RADIUS: f64 = DIAMETER / 2.0;
pub const VIEWPORT_RADIUS: f64 = RADIUS - 1.0;

pub const PHYSICS_STEP: f64 = 1.0 / 200.0;
pub const GRAVITATIONAL_CONSTANT: f64 = 50.0;

pub const PATH_MAX_AGE: f64 = 2.0;
pub const MAX_AGE: f64 = 8.0;
pub const ESCAPE_FACTOR: f64 = 3.0;

pub const SPAWN_INTERVAL: f64 = 0.1;
pub const LAUNCH_SPEED: f64 = 800.0;
pub const LAUNCH_ANGLE_MIN: f64 = 0.25 * PI;
pub const LAUNCH_ANGLE_MAX: f64 = 0.45 * PI;

pub const STEP_DELTA: f64 = 1.0;

pub const ATTRACTOR_DEFAULT_SIZE: f64 = 32.0;
pub const ATTRACTOR_MIN_SIZE: f64 = 4.0;
pub const ATTRACTOR_MAX_SIZE: f64 = 96.0;
pub const ATTRACTOR_SIZE_STEP: f64 = 4.0;
pub const ATTRACTOR_WEIGHT_SCALE: f64 = 1e2;

pub const RENDER_HZ: f64 = 30.0;

pub const LOG_FILE: &str = "attractor.log";
pub const LOG_LEVEL: &str = "info";
