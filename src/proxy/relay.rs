//! Bidirectional cipher relay
//!
//! Ties one accepted application socket to one remote relay socket. Bytes
//! from the application are encoded before they go out; bytes from the
//! remote are decoded before they come back. EOF on either side ends the
//! whole connection; there is no independent half-close. No connect or
//! idle timeouts are applied anywhere on this path — an unresponsive
//! remote holds the connection open.

use super::{Address, ProxyError};
use crate::cipher::Cipher;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tracing::debug;

/// Relay read buffer size, one per direction.
const BUFFER_SIZE: usize = 4096;

/// Open the socket to the remote relay.
///
/// `ipv6` selects the outbound address family. Nagle's algorithm is
/// disabled so the small descriptor write is not coalesced with payload.
pub async fn connect_remote(host: &str, port: u16, ipv6: bool) -> Result<TcpStream, ProxyError> {
    let addr = lookup_host((host, port))
        .await?
        .find(|a| a.is_ipv6() == ipv6)
        .ok_or_else(|| {
            std::io::Error::new(
                ErrorKind::AddrNotAvailable,
                format!("no {} address for {}", if ipv6 { "IPv6" } else { "IPv4" }, host),
            )
        })?;

    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

/// Relay one connection until either side closes or errors.
///
/// The encoded destination descriptor is the first payload sent to the
/// remote; after that the loop waits on readability of both sockets at
/// once and pumps whichever has data. A write that cannot complete
/// (including a zero-length write) terminates the relay with an error.
/// All four stream halves are owned here, so both sockets are released on
/// every exit path.
pub async fn run<A, R>(app: A, remote: R, dest: &Address, cipher: &Cipher) -> Result<(), ProxyError>
where
    A: AsyncRead + AsyncWrite + Unpin,
    R: AsyncRead + AsyncWrite + Unpin,
{
    let (mut app_rd, mut app_wr) = tokio::io::split(app);
    let (mut remote_rd, mut remote_wr) = tokio::io::split(remote);

    remote_wr.write_all(&cipher.encode(&dest.to_wire())).await?;

    let mut app_buf = [0u8; BUFFER_SIZE];
    let mut remote_buf = [0u8; BUFFER_SIZE];

    loop {
        tokio::select! {
            n = app_rd.read(&mut app_buf) => {
                let n = n?;
                if n == 0 {
                    debug!("Application closed, ending relay for {}", dest);
                    break;
                }
                cipher.encode_in_place(&mut app_buf[..n]);
                remote_wr.write_all(&app_buf[..n]).await?;
            }
            n = remote_rd.read(&mut remote_buf) => {
                let n = n?;
                if n == 0 {
                    debug!("Remote closed, ending relay for {}", dest);
                    break;
                }
                cipher.decode_in_place(&mut remote_buf[..n]);
                app_wr.write_all(&remote_buf[..n]).await?;
            }
        }
    }

    Ok(())
}
