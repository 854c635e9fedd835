//! Safe bounding box types and functions.

mod common;

pub use rect::*;
pub mod rect;

pub use tlbr::*;
pub mod tlbr;

pub use cycxhw::*;
pub mod cycxhw;

pub use hw::*;
pub mod hw;

pub use transform::*;
mod transform;

pub mod prelude {
    pub use crate::rect::{Rect, RectExt};
}
