//! Buffer transforms over the substitution tables

use super::CipherTable;

/// Encodes and decodes byte buffers through the derived tables.
///
/// Stateless beyond the tables themselves: every call is a pure function
/// of its input, one table lookup per byte, no allocation on the in-place
/// paths.
#[derive(Debug, Clone)]
pub struct Cipher {
    tables: CipherTable,
}

impl Cipher {
    /// Build a cipher from a passphrase.
    pub fn new(passphrase: &[u8]) -> Self {
        Self {
            tables: CipherTable::derive(passphrase),
        }
    }

    /// Transform plaintext to wire bytes in place.
    pub fn encode_in_place(&self, buf: &mut [u8]) {
        let table = self.tables.encode_table();
        for b in buf.iter_mut() {
            *b = table[*b as usize];
        }
    }

    /// Transform wire bytes back to plaintext in place.
    pub fn decode_in_place(&self, buf: &mut [u8]) {
        let table = self.tables.decode_table();
        for b in buf.iter_mut() {
            *b = table[*b as usize];
        }
    }

    /// Encode into a new buffer. Used for one-shot payloads such as the
    /// destination descriptor.
    pub fn encode(&self, buf: &[u8]) -> Vec<u8> {
        let mut out = buf.to_vec();
        self.encode_in_place(&mut out);
        out
    }

    /// Decode into a new buffer.
    pub fn decode(&self, buf: &[u8]) -> Vec<u8> {
        let mut out = buf.to_vec();
        self.decode_in_place(&mut out);
        out
    }
}
