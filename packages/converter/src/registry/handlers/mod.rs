//! Element handlers for M3D XML.

mod block;
mod inline;
mod section;

pub use block::*;
pub use inline::*;
pub use section::*;
