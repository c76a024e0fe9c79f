//! Unsigned LEB128 varints and a bounded read cursor over wire bytes.
//!
//! Decoding reconstructs structural shape only; a successful parse says
//! nothing about proof validity.

use array2d::Array2D;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;

use crate::elgamal::ElGamalPair;

/// Appends `value` to `buf` as an unsigned LEB128 varint.
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// A forward-only reader over a byte slice.
///
/// Every read checks the remaining length first, so truncated input surfaces
/// as a decode error instead of a panic.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Wraps a byte slice for reading.
    pub fn new(data: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { data, offset: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True once every byte has been consumed.
    pub fn finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], &'static str> {
        if self.remaining() < len {
            return Err("Error::TruncatedInput");
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Reads an unsigned LEB128 varint.
    pub fn read_varint(&mut self) -> Result<u64, &'static str> {
        let mut value: u64 = 0;
        let mut shift = 0;
        loop {
            if shift > 63 {
                return Err("Error::VarIntOverflow");
            }
            let byte = self.read_bytes(1)?[0];
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Reads a canonical 32-byte scalar.
    pub fn read_scalar(&mut self) -> Result<Scalar, &'static str> {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(self.read_bytes(32)?);
        Scalar::from_canonical_bytes(bytes).ok_or("Error::NonCanonicalScalar")
    }

    /// Reads and decompresses a 32-byte group element.
    pub fn read_point(&mut self) -> Result<RistrettoPoint, &'static str> {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(self.read_bytes(32)?);
        CompressedRistretto(bytes)
            .decompress()
            .ok_or("Error::InvalidPointEncoding")
    }

    /// Reads an ElGamal pair (two group elements).
    pub fn read_pair(&mut self) -> Result<ElGamalPair, &'static str> {
        let p1 = self.read_point()?;
        let p2 = self.read_point()?;
        Ok(ElGamalPair::new(p1, p2))
    }

    /// Reads `len` ElGamal pairs.
    pub fn read_pair_array(&mut self, len: usize) -> Result<Vec<ElGamalPair>, &'static str> {
        if self.remaining() < len.saturating_mul(64) {
            return Err("Error::TruncatedInput");
        }
        let mut pairs = Vec::with_capacity(len);
        for _ in 0..len {
            pairs.push(self.read_pair()?);
        }
        Ok(pairs)
    }

    /// Reads an `m × n` scalar matrix, row-major.
    pub fn read_scalar_matrix(
        &mut self,
        m: usize,
        n: usize,
    ) -> Result<Array2D<Scalar>, &'static str> {
        let count = m.saturating_mul(n);
        if self.remaining() < count.saturating_mul(32) {
            return Err("Error::TruncatedInput");
        }
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.read_scalar()?);
        }
        Ok(Array2D::from_row_major(&elements, m, n))
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
