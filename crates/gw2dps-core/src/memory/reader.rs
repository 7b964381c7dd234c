//! Scalar reads from a foreign process.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::error::{Error, Result};
use crate::memory::ProcessHandle;

/// Primitive types the meter reads out of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoStaticStr, Display)]
pub enum ScalarType {
    /// 4-byte signed integer
    #[default]
    #[strum(serialize = "i32")]
    I32,
    /// 4-byte IEEE-754 float
    #[strum(serialize = "f32")]
    F32,
}

impl ScalarType {
    pub fn size(&self) -> usize {
        4
    }
}

/// A value read with a given `ScalarType`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    I32(i32),
    F32(f32),
}

impl Scalar {
    pub fn as_f32(&self) -> f32 {
        match *self {
            Scalar::I32(v) => v as f32,
            Scalar::F32(v) => v,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match *self {
            Scalar::I32(v) => v as i64,
            Scalar::F32(v) => v as i64,
        }
    }
}

/// Source of raw process memory.
///
/// Implementors only provide `read_bytes`; the typed reads decode little-endian
/// values on top of it. Every error is treated by callers as a transient
/// "value currently unavailable".
pub trait ReadMemory {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    fn read_i32(&self, address: u64) -> Result<i32> {
        let bytes = read_array::<_, 4>(self, address)?;
        Ok(i32::from_le_bytes(bytes))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = read_array::<_, 4>(self, address)?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        let bytes = read_array::<_, 4>(self, address)?;
        Ok(f32::from_le_bytes(bytes))
    }

    fn read_scalar(&self, address: u64, ty: ScalarType) -> Result<Scalar> {
        match ty {
            ScalarType::I32 => self.read_i32(address).map(Scalar::I32),
            ScalarType::F32 => self.read_f32(address).map(Scalar::F32),
        }
    }
}

fn read_array<R: ReadMemory + ?Sized, const N: usize>(
    reader: &R,
    address: u64,
) -> Result<[u8; N]> {
    let bytes = reader.read_bytes(address, N)?;
    bytes
        .try_into()
        .map_err(|_| Error::read_failed(address, format!("short read (wanted {} bytes)", N)))
}

/// Reads memory of an attached process
pub struct MemoryReader<'a> {
    process: &'a ProcessHandle,
}

impl<'a> MemoryReader<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }

    /// Image base of the main module
    pub fn base_address(&self) -> u64 {
        self.process.base_address
    }
}

impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.process.read_bytes(address, size)
    }
}
