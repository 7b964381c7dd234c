pub mod layout;
mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use process::*;
pub use reader::{MemoryReader, ReadMemory, Scalar, ScalarType};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
