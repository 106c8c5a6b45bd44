use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use if_addrs::get_if_addrs;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use super::{MDNS_IPV4_GROUP, MDNS_IPV6_GROUP, MDNS_PORT, MULTICAST_TTL};

pub enum Inet {}

pub enum Inet6 {}

pub trait AddressFamily {
    type Addr: Into<IpAddr>;

    const ANY_ADDR: Self::Addr;
    const MDNS_GROUP: Self::Addr;

    const DOMAIN: Domain;

    /// Joins the mDNS group on the interface owning `interface`, or on the
    /// default one
    fn join_multicast(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()>;

    fn leave_multicast(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()>;

    /// Hop limit, loopback and egress interface of outgoing queries
    fn configure_egress(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()>;

    fn group() -> SocketAddr {
        SocketAddr::new(Self::MDNS_GROUP.into(), MDNS_PORT)
    }

    fn udp_socket() -> io::Result<Socket> {
        Socket::new(Self::DOMAIN, Type::DGRAM, Some(Protocol::UDP))
    }

    fn bind(interface: Option<IpAddr>) -> io::Result<UdpSocket> {
        let addr: SockAddr = SocketAddr::new(Self::ANY_ADDR.into(), MDNS_PORT).into();
        let socket = Self::udp_socket()?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;

        #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
        socket.set_reuse_port(true)?;

        if Self::DOMAIN == Domain::IPV6 {
            socket.set_only_v6(true)?;
        }

        socket.bind(&addr)?;
        Self::join_multicast(&socket, interface)?;
        Self::configure_egress(&socket, interface)?;
        Ok(socket.into())
    }
}

impl AddressFamily for Inet {
    type Addr = Ipv4Addr;

    const ANY_ADDR: Self::Addr = Ipv4Addr::UNSPECIFIED;
    const MDNS_GROUP: Self::Addr = MDNS_IPV4_GROUP;

    const DOMAIN: Domain = Domain::IPV4;

    fn join_multicast(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()> {
        socket.join_multicast_v4(&Self::MDNS_GROUP, &ipv4_interface(interface)?)
    }

    fn leave_multicast(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()> {
        socket.leave_multicast_v4(&Self::MDNS_GROUP, &ipv4_interface(interface)?)
    }

    fn configure_egress(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()> {
        socket.set_multicast_ttl_v4(MULTICAST_TTL)?;
        socket.set_multicast_loop_v4(true)?;
        if interface.is_some() {
            socket.set_multicast_if_v4(&ipv4_interface(interface)?)?;
        }
        Ok(())
    }
}

impl AddressFamily for Inet6 {
    type Addr = Ipv6Addr;

    const ANY_ADDR: Self::Addr = Ipv6Addr::UNSPECIFIED;
    const MDNS_GROUP: Self::Addr = MDNS_IPV6_GROUP;

    const DOMAIN: Domain = Domain::IPV6;

    fn join_multicast(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()> {
        socket.join_multicast_v6(&Self::MDNS_GROUP, ipv6_interface(interface)?)
    }

    fn leave_multicast(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()> {
        socket.leave_multicast_v6(&Self::MDNS_GROUP, ipv6_interface(interface)?)
    }

    fn configure_egress(socket: &Socket, interface: Option<IpAddr>) -> io::Result<()> {
        socket.set_multicast_hops_v6(MULTICAST_TTL)?;
        socket.set_multicast_loop_v6(true)?;
        if interface.is_some() {
            socket.set_multicast_if_v6(ipv6_interface(interface)?)?;
        }
        Ok(())
    }
}

/// IPv4 address of the interface owning `interface`
///
/// An IPv6 address is mapped through its interface name.
fn ipv4_interface(interface: Option<IpAddr>) -> io::Result<Ipv4Addr> {
    match interface {
        None => Ok(Ipv4Addr::UNSPECIFIED),
        Some(IpAddr::V4(ip)) => Ok(ip),
        Some(ip @ IpAddr::V6(_)) => {
            let name = interface_name(ip)?;
            get_if_addrs()?
                .into_iter()
                .filter(|iface| iface.name == name)
                .find_map(|iface| match iface.ip() {
                    IpAddr::V4(ip) => Some(ip),
                    IpAddr::V6(_) => None,
                })
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::AddrNotAvailable,
                        format!("interface {} has no IPv4 address", name),
                    )
                })
        }
    }
}

/// Index of the interface owning `interface`, 0 lets the OS pick
fn ipv6_interface(interface: Option<IpAddr>) -> io::Result<u32> {
    match interface {
        None => Ok(0),
        Some(ip) => if_nametoindex(&interface_name(ip)?),
    }
}

fn interface_name(ip: IpAddr) -> io::Result<String> {
    get_if_addrs()?
        .into_iter()
        .find(|iface| iface.ip() == ip)
        .map(|iface| iface.name)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no interface has address {}", ip),
            )
        })
}

#[cfg(not(windows))]
fn if_nametoindex(name: &str) -> io::Result<u32> {
    nix::net::if_::if_nametoindex(name).map_err(io::Error::from)
}

#[cfg(windows)]
fn if_nametoindex(name: &str) -> io::Result<u32> {
    use std::ffi::CString;

    let name = CString::new(name).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    match unsafe { winapi::shared::netioapi::if_nametoindex(name.as_ptr()) } {
        0 => Err(io::Error::last_os_error()),
        index => Ok(index),
    }
}
