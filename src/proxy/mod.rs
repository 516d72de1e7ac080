//! Proxy implementations
//!
//! Provides:
//! - Minimal SOCKS5 CONNECT handshake and listener
//! - Bidirectional cipher relay to the remote endpoint

pub mod relay;
mod socks5;

pub use relay::connect_remote;
pub use socks5::{handshake, Socks5Server};

use thiserror::Error;

/// Proxy errors
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported command: {0}")]
    UnsupportedCommand(u8),

    #[error("Address type not supported: {0}")]
    UnsupportedAddressType(u8),
}

/// Destination requested by the connecting application.
///
/// Address bytes are kept exactly as the client sent them; `to_wire`
/// re-emits them in the format the remote relay expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// IPv4 address and port
    Ipv4([u8; 4], u16),
    /// Domain name (raw label bytes) and port
    Domain(Vec<u8>, u16),
    /// IPv6 address and port
    Ipv6([u8; 16], u16),
}

impl Address {
    /// Get the port
    pub fn port(&self) -> u16 {
        match self {
            Address::Ipv4(_, port) => *port,
            Address::Domain(_, port) => *port,
            Address::Ipv6(_, port) => *port,
        }
    }

    /// Serialize as the relay wire descriptor:
    /// address-type byte, length byte for domains, address bytes, then the
    /// port in network byte order.
    pub fn to_wire(&self) -> Vec<u8> {
        match self {
            Address::Ipv4(ip, port) => {
                let mut buf = Vec::with_capacity(7);
                buf.push(socks5::ATYP_IPV4);
                buf.extend_from_slice(ip);
                buf.extend_from_slice(&port.to_be_bytes());
                buf
            }
            Address::Domain(name, port) => {
                let mut buf = Vec::with_capacity(4 + name.len());
                buf.push(socks5::ATYP_DOMAIN);
                buf.push(name.len() as u8);
                buf.extend_from_slice(name);
                buf.extend_from_slice(&port.to_be_bytes());
                buf
            }
            Address::Ipv6(ip, port) => {
                let mut buf = Vec::with_capacity(19);
                buf.push(socks5::ATYP_IPV6);
                buf.extend_from_slice(ip);
                buf.extend_from_slice(&port.to_be_bytes());
                buf
            }
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::Ipv4(ip, port) => {
                write!(f, "{}.{}.{}.{}:{}", ip[0], ip[1], ip[2], ip[3], port)
            }
            Address::Domain(name, port) => {
                write!(f, "{}:{}", String::from_utf8_lossy(name), port)
            }
            Address::Ipv6(ip, port) => {
                write!(f, "[{}]:{}", std::net::Ipv6Addr::from(*ip), port)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_wire_descriptor() {
        let addr = Address::Ipv4([93, 184, 216, 34], 80);
        assert_eq!(addr.to_wire(), [0x01, 0x5D, 0xB8, 0xD8, 0x22, 0x00, 0x50]);
        assert_eq!(addr.to_string(), "93.184.216.34:80");
    }

    #[test]
    fn test_domain_wire_descriptor() {
        let addr = Address::Domain(b"example.com".to_vec(), 443);
        let mut expected = vec![0x03, 0x0B];
        expected.extend_from_slice(b"example.com");
        expected.extend_from_slice(&[0x01, 0xBB]);
        assert_eq!(addr.to_wire(), expected);
        assert_eq!(addr.to_string(), "example.com:443");
    }

    #[test]
    fn test_ipv6_wire_descriptor() {
        let ip = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        let addr = Address::Ipv6(ip, 8080);
        let wire = addr.to_wire();
        assert_eq!(wire.len(), 19);
        assert_eq!(wire[0], 0x04);
        assert_eq!(&wire[1..17], &ip);
        assert_eq!(&wire[17..], &[0x1F, 0x90]);
        assert_eq!(addr.to_string(), "[::1]:8080");
    }
}
