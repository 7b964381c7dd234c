mod rate;
mod sampler;

pub use rate::*;
pub use sampler::*;
