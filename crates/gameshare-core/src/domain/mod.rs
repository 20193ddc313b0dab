//! Domain entities for the GameShare input bridge.
//!
//! Pure data types with no infrastructure dependencies:
//!
//! - [`event::InputEvent`] – the canonical, already-validated unit of input
//!   that flows from a transport adapter to the injector.
//! - [`geometry::ScreenGeometry`] – the target display's pixel dimensions and
//!   the normalized-to-pixel conversion used for absolute cursor placement.

pub mod event;
pub mod geometry;

pub use geometry::to_pixels;
