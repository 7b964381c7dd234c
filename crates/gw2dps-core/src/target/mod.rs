mod candidate;
mod locator;

pub use candidate::*;
pub use locator::*;
