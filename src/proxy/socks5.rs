//! SOCKS5 CONNECT handshake and listener
//!
//! Deliberately permissive subset of RFC 1928, matching the companion
//! relay's expectations:
//! - The negotiation request is discarded unread and always answered with
//!   "no authentication required", whatever methods the client offered.
//! - Only the CONNECT command is accepted; anything else drops the
//!   connection without a reply.
//! - The success reply is synthetic (placeholder bind address and port)
//!   and is sent before the remote connection is attempted, so a failed
//!   remote connect surfaces to the application as a plain close after
//!   "succeeded".

use super::{relay, Address, ProxyError};
use crate::cipher::Cipher;
use crate::config::Config;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// SOCKS5 version
const SOCKS_VERSION: u8 = 0x05;

/// CONNECT command
const CMD_CONNECT: u8 = 0x01;

/// Address type bytes (shared with the relay wire descriptor)
pub(super) const ATYP_IPV4: u8 = 0x01;
pub(super) const ATYP_DOMAIN: u8 = 0x03;
pub(super) const ATYP_IPV6: u8 = 0x04;

/// Fixed method-selection reply: version 5, no authentication
const NEGOTIATION_REPLY: [u8; 2] = [SOCKS_VERSION, 0x00];

/// Placeholder port announced in the synthetic success reply
const REPLY_BIND_PORT: u16 = 2222;

/// Perform the SOCKS5 CONNECT handshake on a freshly accepted stream.
///
/// Returns the destination the application asked for. On return the fixed
/// success reply has already been written; on error nothing past the
/// negotiation reply has been sent and the caller should drop the stream.
pub async fn handshake<S>(stream: &mut S) -> Result<Address, ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; 258];

    // Negotiation request: version byte, method count, methods. Contents
    // are ignored; every client gets "no auth".
    stream.read_exact(&mut buf[..2]).await?;
    let nmethods = buf[1] as usize;
    stream.read_exact(&mut buf[..nmethods]).await?;
    stream.write_all(&NEGOTIATION_REPLY).await?;

    // Request header: VER CMD RSV ATYP
    stream.read_exact(&mut buf[..4]).await?;
    let cmd = buf[1];
    if cmd != CMD_CONNECT {
        return Err(ProxyError::UnsupportedCommand(cmd));
    }

    let atyp = buf[3];
    let address = match atyp {
        ATYP_IPV4 => {
            let mut ip = [0u8; 4];
            stream.read_exact(&mut ip).await?;
            let port = read_port(stream).await?;
            Address::Ipv4(ip, port)
        }
        ATYP_DOMAIN => {
            stream.read_exact(&mut buf[..1]).await?;
            let len = buf[0] as usize;
            stream.read_exact(&mut buf[..len]).await?;
            let name = buf[..len].to_vec();
            let port = read_port(stream).await?;
            Address::Domain(name, port)
        }
        ATYP_IPV6 => {
            let mut ip = [0u8; 16];
            stream.read_exact(&mut ip).await?;
            let port = read_port(stream).await?;
            Address::Ipv6(ip, port)
        }
        other => return Err(ProxyError::UnsupportedAddressType(other)),
    };

    // Synthetic success reply with a placeholder bind address, sent before
    // the remote connect happens.
    let mut reply = [0u8; 10];
    reply[..4].copy_from_slice(&[SOCKS_VERSION, 0x00, 0x00, ATYP_IPV4]);
    reply[8..].copy_from_slice(&REPLY_BIND_PORT.to_be_bytes());
    stream.write_all(&reply).await?;

    Ok(address)
}

async fn read_port<S: AsyncRead + Unpin>(stream: &mut S) -> Result<u16, ProxyError> {
    let mut port_buf = [0u8; 2];
    stream.read_exact(&mut port_buf).await?;
    Ok(u16::from_be_bytes(port_buf))
}

/// Local SOCKS5 listener.
///
/// Each accepted connection gets its own task running the handshake and
/// the cipher relay; connections share nothing but the immutable cipher
/// tables and configuration.
pub struct Socks5Server {
    listener: TcpListener,
}

impl Socks5Server {
    /// Bind the local listen port. Failure here is fatal at startup.
    pub async fn bind(port: u16) -> Result<Self, ProxyError> {
        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        info!("SOCKS5 server listening on port {}", port);
        Ok(Self { listener })
    }

    /// Local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and dispatch connections until the process shuts down.
    pub async fn run(&self, cipher: Arc<Cipher>, config: Arc<Config>) -> Result<(), ProxyError> {
        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    continue;
                }
            };
            debug!("New connection from {}", peer_addr);

            let cipher = Arc::clone(&cipher);
            let config = Arc::clone(&config);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, cipher, config).await {
                    debug!("Connection from {} closed: {}", peer_addr, e);
                }
            });
        }
    }
}

/// Drive one connection through its whole lifecycle: handshake, remote
/// connect, relay. Both sockets are released when this returns, on any
/// path.
async fn handle_connection(
    mut stream: TcpStream,
    cipher: Arc<Cipher>,
    config: Arc<Config>,
) -> Result<(), ProxyError> {
    let dest = handshake(&mut stream).await?;
    info!("Connecting to {}", dest);

    let remote = relay::connect_remote(&config.server, config.server_port, config.ipv6).await?;
    relay::run(stream, remote, &dest, &cipher).await
}
