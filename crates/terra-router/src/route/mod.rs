//! Route pattern module
//!
//! Compiles `:param` path templates into anchored matchers and reverse
//! builders, and carries the ordered parameter type shared by both.
pub mod params;
pub mod pattern;

pub use params::RouteParams;
pub use pattern::{classify_segment, PathPattern, PatternSegment};
