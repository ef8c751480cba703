//! Byte-level primitives: compact-size varints, push-data prefixes and a
//! bounds-checked cursor for decoding wire bytes.

use crate::constants::*;
use crate::error::{Result, WalletError};

/// Encode a number as a compact-size varint
pub fn encode_varint(value: u64) -> Vec<u8> {
    if value < 0xfd {
        vec![value as u8]
    } else if value <= 0xffff {
        let mut result = vec![0xfd];
        result.extend_from_slice(&(value as u16).to_le_bytes());
        result
    } else if value <= 0xffffffff {
        let mut result = vec![0xfe];
        result.extend_from_slice(&(value as u32).to_le_bytes());
        result
    } else {
        let mut result = vec![0xff];
        result.extend_from_slice(&value.to_le_bytes());
        result
    }
}

/// Append a varint length followed by the bytes themselves
pub fn write_var_bytes(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&encode_varint(data.len() as u64));
    out.extend_from_slice(data);
}

/// Script push prefix for `len` bytes of data.
///
/// Lengths below `OP_PUSHDATA1` are their own opcode; longer pushes use the
/// smallest `OP_PUSHDATA{1,2,4}` form that fits.
pub fn push_data_prefix(len: usize) -> Vec<u8> {
    if len < OP_PUSHDATA1 as usize {
        vec![len as u8]
    } else if len <= 0xff {
        vec![OP_PUSHDATA1, len as u8]
    } else if len <= 0xffff {
        let mut result = vec![OP_PUSHDATA2];
        result.extend_from_slice(&(len as u16).to_le_bytes());
        result
    } else {
        let mut result = vec![OP_PUSHDATA4];
        result.extend_from_slice(&(len as u32).to_le_bytes());
        result
    }
}

/// Append a script data push (prefix + data)
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    script.extend_from_slice(&push_data_prefix(data.len()));
    script.extend_from_slice(data);
}

/// Cursor over a byte slice. Every read fails with
/// [`WalletError::MalformedTransaction`] instead of reading past the end.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(WalletError::MalformedTransaction(format!(
                "need {} bytes at offset {}, only {} remaining",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        match self.read_u8()? {
            0xff => self.read_u64_le(),
            0xfe => Ok(self.read_u32_le()? as u64),
            0xfd => Ok(self.read_u16_le()? as u64),
            b => Ok(b as u64),
        }
    }

    /// Read a varint length and then that many bytes. A declared length
    /// larger than what remains is rejected before any allocation.
    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_varint()?;
        if len > self.remaining() as u64 {
            return Err(WalletError::MalformedTransaction(format!(
                "declared length {} exceeds {} remaining bytes",
                len,
                self.remaining()
            )));
        }
        Ok(self.read_bytes(len as usize)?.to_vec())
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}
