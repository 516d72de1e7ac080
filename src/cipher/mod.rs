//! Substitution cipher for traffic obfuscation
//!
//! This module provides:
//! - Key schedule deriving a 256-byte permutation (and its inverse) from a
//!   passphrase
//! - Per-buffer encode/decode via table lookup
//!
//! The scheme is a keyed monoalphabetic byte substitution. Both sides of
//! the split proxy derive the same tables from the shared passphrase; the
//! derivation must stay bit-for-bit identical across implementations or
//! the peers cannot talk to each other.

mod stream;
mod table;

pub use stream::Cipher;
pub use table::CipherTable;
