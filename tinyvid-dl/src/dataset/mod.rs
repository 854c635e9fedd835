//! Dataset assembly toolkit.

mod dataset_;
mod record;
mod split;
mod tiny_vid;

pub use dataset_::*;
pub use record::*;
pub use split::*;
pub use tiny_vid::*;
