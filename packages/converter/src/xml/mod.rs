//! XML helpers: DOM navigation, fragment building and an owned, mutable tree.

mod builder;
mod tree;
mod utils;

pub use builder::{escape_attr, escape_text, XmlBuilder};
pub use tree::{Element, XmlNode};
pub use utils::*;
