//! Animation timeline: interpolated rating curves and frame sampling
//!
//! This module turns a finished rating history into per-player paths with an
//! activity envelope, and slices those paths at arbitrary continuous times for
//! an external renderer.

pub mod envelope;
pub mod path;
pub mod sampler;
pub mod schedule;
pub mod spline;

// Re-export commonly used types
pub use envelope::{ease_in, ease_out, envelope};
pub use path::{PathResolution, PlayerPath, PlayerPathBuilder};
pub use sampler::{Frame, FrameSampler, HeadMarker, PlayerFrame};
pub use schedule::AnimationSchedule;
pub use spline::InterpolatingSpline;
