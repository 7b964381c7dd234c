//! In-memory stand-in for a foreign process, for unit tests.

use std::cell::Cell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// Sparse little-endian memory image that counts reads
#[derive(Debug, Default)]
pub struct MockMemoryReader {
    bytes: HashMap<u64, u8>,
    reads: Cell<usize>,
}

impl MockMemoryReader {
    pub fn write_bytes(&mut self, address: u64, data: &[u8]) {
        for (i, b) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, *b);
        }
    }

    pub fn write_i32(&mut self, address: u64, value: i32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    pub fn write_f32(&mut self, address: u64, value: f32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Remove a 4-byte cell, making reads at `address` fail
    pub fn unmap(&mut self, address: u64) {
        for i in 0..4 {
            self.bytes.remove(&(address + i));
        }
    }

    /// Number of `read_bytes` calls served so far (failed ones included)
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn reset_reads(&self) {
        self.reads.set(0);
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        (0..size as u64)
            .map(|i| {
                self.bytes
                    .get(&(address + i))
                    .copied()
                    .ok_or_else(|| Error::read_failed(address, "unmapped"))
            })
            .collect()
    }
}

/// Builder for `MockMemoryReader`
#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    reader: MockMemoryReader,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn i32_at(mut self, address: u64, value: i32) -> Self {
        self.reader.write_i32(address, value);
        self
    }

    pub fn f32_at(mut self, address: u64, value: f32) -> Self {
        self.reader.write_f32(address, value);
        self
    }

    /// Store a 32-bit pointer (the client is a 32-bit process)
    pub fn ptr_at(self, address: u64, target: u64) -> Self {
        self.i32_at(address, target as i32)
    }

    pub fn build(self) -> MockMemoryReader {
        self.reader
    }
}
