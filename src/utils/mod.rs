//! Utility helpers including vector math, logging and profiling.

pub mod logging;
pub mod math;
pub mod profiling;

pub use math::*;
