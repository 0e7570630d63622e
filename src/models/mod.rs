pub mod document;
pub mod items;

pub use document::*;
pub use items::*;
