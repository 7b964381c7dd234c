mod average;
mod state;

pub use average::*;
pub use state::*;
