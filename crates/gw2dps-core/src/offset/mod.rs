mod chain;
mod trail;

pub use chain::*;
pub use trail::*;
