//! Systems - logic that operates on components

mod injector;
mod metabolism;

pub use injector::*;
pub use metabolism::*;
