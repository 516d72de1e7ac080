//! Key schedule: passphrase to substitution tables
//!
//! The derivation is shared wire-format with every interoperating relay:
//! an MD5 digest of the passphrase seeds 1023 stable re-sorts of the byte
//! alphabet. The pass count and the `+i` modulus shift are load-bearing;
//! changing either produces tables no peer can invert.

use md5::{Digest, Md5};

/// A forward/inverse pair of byte permutations derived from a passphrase.
///
/// Derived once at startup and never mutated, so it is safe to share
/// across connection tasks without synchronization.
#[derive(Debug, Clone)]
pub struct CipherTable {
    encode: [u8; 256],
    decode: [u8; 256],
}

impl CipherTable {
    /// Derive the substitution tables from a passphrase.
    ///
    /// Deterministic and side-effect free: the same passphrase always
    /// yields byte-identical tables.
    pub fn derive(passphrase: &[u8]) -> Self {
        let digest = Md5::digest(passphrase);
        let a = u64::from_le_bytes(digest[0..8].try_into().unwrap());
        // The high half of the digest is part of the shared scheme even
        // though it feeds nothing; peers compute it too.
        let _b = u64::from_le_bytes(digest[8..16].try_into().unwrap());

        let mut table: Vec<u8> = (0u8..=255).collect();
        for i in 1..1024u64 {
            // Stable sort keyed on the current byte value, matching the
            // original ordering exactly.
            table.sort_by_key(|&x| a % (x as u64 + i));
        }

        let mut encode = [0u8; 256];
        encode.copy_from_slice(&table);

        let mut decode = [0u8; 256];
        for (i, &b) in encode.iter().enumerate() {
            decode[b as usize] = i as u8;
        }

        Self { encode, decode }
    }

    /// Forward table: plaintext byte to wire byte.
    pub fn encode_table(&self) -> &[u8; 256] {
        &self.encode
    }

    /// Inverse table: wire byte to plaintext byte.
    pub fn decode_table(&self) -> &[u8; 256] {
        &self.decode
    }
}
