//! wmg-core: shared foundation for the weather-model-graphs workspace.
//!
//! Contains:
//! - ids (stable compact IDs for graph nodes)
//! - numeric (Real + integer and float helpers)
//! - geom (points, vectors and axis-aligned rectangles in the plane)
//! - error (the error taxonomy shared by every construction step)

pub mod error;
pub mod geom;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{WmgError, WmgResult};
pub use geom::{Point, Rect, Vector};
pub use ids::*;
pub use numeric::*;
