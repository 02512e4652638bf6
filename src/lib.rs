//! Software framebuffer graphics
//!
//! A [`Surface`] is an owned buffer of packed ARGB pixels. On top of it:
//!
//! - per-pixel compositing (source-over or linear) and blitting with an
//!   optional chroma key
//! - a primitive rasterizer: lines, circles, ellipses, rotated ellipses,
//!   quadratic, rational and cubic Béziers, rectangles and triangles, most
//!   of them with anti-aliased variants
//! - nearest-neighbor resize, rotation, flood fill and per-pixel filters
//! - octree color quantization
//!
//! [`Graphics`] wraps the fallible operations and routes failures to a
//! registered [`ErrorHook`]. With the `window` feature, [`display`] shows a
//! surface in an SDL2 window.

pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
mod quantize;
mod raster;
pub mod surface;
pub mod transform;
pub mod util;

#[cfg(feature = "window")]
pub mod display;

pub use color::Color;
pub use config::{CompositeMode, FailurePolicy, RenderConfig};
pub use context::Graphics;
pub use error::{ConfigError, Error, ErrorHook, ErrorKind, ErrorReport, Result};
pub use geometry::Rect;
pub use raster::COORD_LIMIT;
pub use surface::Surface;
pub use transform::{filters, PixelFilter};
pub use util::{Clock, FpsCounter, Rng};
