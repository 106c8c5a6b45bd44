use std::io;
use std::io::ErrorKind::WouldBlock;
use std::net::{IpAddr, SocketAddr};

use futures_util::future::BoxFuture;
use log::{debug, error, trace, warn};
use socket2::SockRef;
use tokio::net::UdpSocket;

use crate::address_family::{AddressFamily, Inet, Inet6};
use crate::Error;

/// Datagram I/O used by a discovery run
pub trait Transport: Send + Sync + 'static {
    /// Multicast groups questions are sent to
    fn groups(&self) -> Vec<SocketAddr>;

    fn send_to<'a>(
        &'a self,
        packet: &'a [u8],
        group: SocketAddr,
    ) -> BoxFuture<'a, io::Result<usize>>;

    /// Receives the next datagram into `buf`, returning its length
    fn recv<'a>(&'a self, buf: &'a mut [u8]) -> BoxFuture<'a, io::Result<usize>>;
}

/// Sockets joined to the IPv4 and IPv6 mDNS groups
///
/// Either family may be missing. Dropping it leaves the groups.
pub struct MulticastSocket {
    v4: Option<UdpSocket>,
    v6: Option<UdpSocket>,
    interface: Option<IpAddr>,
}

impl MulticastSocket {
    /// Binds and joins both families, either one failing is logged
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime with I/O enabled.
    pub fn open(interface: Option<IpAddr>) -> Result<MulticastSocket, Error> {
        MulticastSocket::from_parts(Inet::bind(interface), Inet6::bind(interface), interface)
    }

    pub(crate) fn from_parts(
        v4: io::Result<std::net::UdpSocket>,
        v6: io::Result<std::net::UdpSocket>,
        interface: Option<IpAddr>,
    ) -> Result<MulticastSocket, Error> {
        let v4 = joined::<Inet>(v4);
        let v6 = joined::<Inet6>(v6);
        if v4.is_none() && v6.is_none() {
            return Err(Error::NoUsableInterface);
        }

        Ok(MulticastSocket { v4, v6, interface })
    }

    fn socket_for(&self, group: SocketAddr) -> Option<&UdpSocket> {
        match group {
            SocketAddr::V4(_) => self.v4.as_ref(),
            SocketAddr::V6(_) => self.v6.as_ref(),
        }
    }

    async fn readable(&self) -> io::Result<&UdpSocket> {
        match (&self.v4, &self.v6) {
            (Some(v4), Some(v6)) => tokio::select! {
                res = v4.readable() => res.map(|_| v4),
                res = v6.readable() => res.map(|_| v6),
            },
            (Some(socket), None) | (None, Some(socket)) => {
                socket.readable().await?;
                Ok(socket)
            }
            (None, None) => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "no multicast group joined",
            )),
        }
    }
}

fn joined<AF: AddressFamily>(
    socket: io::Result<std::net::UdpSocket>,
) -> Option<UdpSocket> {
    match socket.and_then(UdpSocket::from_std) {
        Ok(socket) => {
            debug!("joined {}", AF::group());
            Some(socket)
        }
        Err(err) => {
            error!("couldn't join {}: {}", AF::group(), err);
            None
        }
    }
}

impl Transport for MulticastSocket {
    fn groups(&self) -> Vec<SocketAddr> {
        let mut groups = Vec::with_capacity(2);
        if self.v4.is_some() {
            groups.push(Inet::group());
        }
        if self.v6.is_some() {
            groups.push(Inet6::group());
        }
        groups
    }

    fn send_to<'a>(
        &'a self,
        packet: &'a [u8],
        group: SocketAddr,
    ) -> BoxFuture<'a, io::Result<usize>> {
        Box::pin(async move {
            let socket = self.socket_for(group).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("{} was not joined", group),
                )
            })?;
            socket.send_to(packet, group).await
        })
    }

    fn recv<'a>(&'a self, buf: &'a mut [u8]) -> BoxFuture<'a, io::Result<usize>> {
        Box::pin(async move {
            loop {
                let socket = self.readable().await?;
                match socket.try_recv_from(buf) {
                    Ok((len, peer)) => {
                        trace!("received {} bytes from {}", len, peer);
                        return Ok(len);
                    }
                    Err(ref err) if err.kind() == WouldBlock => continue,
                    Err(err) => return Err(err),
                }
            }
        })
    }
}

impl Drop for MulticastSocket {
    fn drop(&mut self) {
        if let Some(ref socket) = self.v4 {
            match Inet::leave_multicast(&SockRef::from(socket), self.interface) {
                Ok(()) => debug!("left {}", Inet::group()),
                Err(err) => warn!("couldn't leave {}: {}", Inet::group(), err),
            }
        }
        if let Some(ref socket) = self.v6 {
            match Inet6::leave_multicast(&SockRef::from(socket), self.interface) {
                Ok(()) => debug!("left {}", Inet6::group()),
                Err(err) => warn!("couldn't leave {}: {}", Inet6::group(), err),
            }
        }
    }
}
