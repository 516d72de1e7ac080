//! # Veilsocks
//!
//! A local forwarding proxy for a split proxy deployment. Applications
//! speak SOCKS5 (CONNECT only) to this process; the resulting byte stream
//! is relayed to a single fixed remote relay, with every payload byte run
//! through a keyed substitution cipher. The companion relay at the remote
//! end applies the inverse table.
//!
//! ## Architecture
//!
//! ```text
//! application --SOCKS5--> Socks5Server --> handshake --> relay --> remote relay
//!                                             |            |
//!                                             v            v
//!                                          Address      Cipher
//!                                        (descriptor)  (shared tables)
//! ```
//!
//! The cipher is a deterministic byte-for-byte substitution. It obscures
//! traffic from casual inspection and nothing more; it provides no
//! confidentiality or integrity guarantees.

pub mod cipher;
pub mod config;
pub mod proxy;

pub use config::Config;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Proxy error: {0}")]
    Proxy(#[from] proxy::ProxyError),

    #[error("Configuration error: {0}")]
    Config(String),
}
