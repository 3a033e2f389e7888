// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    pal::{
        constants::{
            AF_INET,
            SOCKADDR_IN_LEN,
            SOCKADDR_IN_SIZE,
        },
        data_structures::{
            SockAddr,
            SockAddrIn,
            Socklen,
        },
        linux,
    },
    runtime::fail::Fail,
};
use ::libc::{
    EAFNOSUPPORT,
    EINVAL,
};
use ::std::{
    fmt,
    hash::{
        Hash,
        Hasher,
    },
    net::{
        Ipv4Addr,
        SocketAddrV4,
    },
    str::FromStr,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// IPv4 endpoint (address and port), stored in the layout expected by socket syscalls.
///
/// The inner structure is fully populated at construction and never changes afterwards, so it may be handed to
/// `bind()`, `connect()` and friends at any time through [InetAddress::as_sockaddr_ptr].
#[derive(Clone, Copy)]
pub struct InetAddress(SockAddrIn);

//======================================================================================================================
// Associate Functions
//======================================================================================================================

impl InetAddress {
    /// Creates an endpoint from a dotted-decimal IPv4 address and a port number in host byte order. This is the
    /// constructor used for sockets that the process itself opens, either to listen or to connect.
    ///
    /// Port zero is accepted and means "any port" to `bind()`.
    pub fn from_ip_str(ip: &str, port: u16) -> Result<Self, Fail> {
        let addr: Ipv4Addr = match Ipv4Addr::from_str(ip) {
            Ok(addr) => addr,
            Err(e) => {
                let cause: String = format!("invalid IPv4 address (ip={:?}, error={})", ip, e);
                error!("from_ip_str(): {}", cause);
                return Err(Fail::new(EINVAL, &cause));
            },
        };

        trace!("from_ip_str(): ip={:?}, port={:?}", addr, port);
        Ok(Self::from(SocketAddrV4::new(addr, port)))
    }

    /// Creates an endpoint that is a verbatim copy of `sin`. This is the constructor used for addresses that come
    /// back from the operating system, such as the peer address filled in by `accept()`.
    pub fn from_raw(sin: SockAddrIn) -> Self {
        Self(sin)
    }

    /// Decodes an endpoint from the raw bytes of an IPv4 socket address structure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Fail> {
        let raw: &[u8; SOCKADDR_IN_SIZE] = match bytes.try_into() {
            Ok(raw) => raw,
            Err(_) => {
                let cause: String = format!(
                    "invalid socket address length (expected={:?}, got={:?})",
                    SOCKADDR_IN_SIZE,
                    bytes.len()
                );
                error!("from_bytes(): {}", cause);
                return Err(Fail::new(EINVAL, &cause));
            },
        };

        let sin: SockAddrIn = linux::bytes_to_sockaddr_in(raw);
        if sin.sin_family != AF_INET {
            let cause: String = format!("unsupported address family (sin_family={:?})", sin.sin_family);
            error!("from_bytes(): {}", cause);
            return Err(Fail::new(EAFNOSUPPORT, &cause));
        }

        Ok(Self(sin))
    }

    /// Returns the dotted-decimal representation of the IPv4 address, e.g. `192.168.150.128`.
    pub fn ip_string(&self) -> String {
        self.ipv4().to_string()
    }

    /// Returns the IPv4 address.
    pub fn ipv4(&self) -> Ipv4Addr {
        *linux::sockaddr_in_to_socketaddrv4(&self.0).ip()
    }

    /// Returns the port number in host byte order.
    pub fn port(&self) -> u16 {
        u16::from_be(self.0.sin_port)
    }

    /// Borrows the underlying socket address structure.
    pub fn as_raw(&self) -> &SockAddrIn {
        &self.0
    }

    /// Returns a copy of the underlying socket address structure.
    pub fn into_raw(self) -> SockAddrIn {
        self.0
    }

    /// Returns a generic socket address pointer and its length, suitable for `bind()` and `connect()`. The pointer
    /// borrows from `self` and must not be written through or used after `self` goes away.
    pub fn as_sockaddr_ptr(&self) -> (*const SockAddr, Socklen) {
        let sockaddr_ptr: *const SockAddr = (&self.0 as *const SockAddrIn).cast::<SockAddr>();
        (sockaddr_ptr, SOCKADDR_IN_LEN)
    }

    /// Returns the raw bytes of the underlying socket address structure.
    pub fn to_bytes(&self) -> [u8; SOCKADDR_IN_SIZE] {
        linux::sockaddr_in_to_bytes(&self.0)
    }

    /// Converts the target endpoint into a [socket2::SockAddr].
    pub fn to_sockaddr(&self) -> socket2::SockAddr {
        socket2::SockAddr::from(SocketAddrV4::from(*self))
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl From<SocketAddrV4> for InetAddress {
    fn from(addr: SocketAddrV4) -> Self {
        Self(linux::socketaddrv4_to_sockaddr_in(&addr))
    }
}

impl From<InetAddress> for SocketAddrV4 {
    fn from(addr: InetAddress) -> Self {
        linux::sockaddr_in_to_socketaddrv4(&addr.0)
    }
}

/// Captures an address returned by [socket2], e.g. the peer of an accepted connection.
impl TryFrom<&socket2::SockAddr> for InetAddress {
    type Error = Fail;

    fn try_from(addr: &socket2::SockAddr) -> Result<Self, Fail> {
        match addr.as_socket_ipv4() {
            Some(addr) => Ok(Self::from(addr)),
            None => {
                let cause: String = format!("not an IPv4 socket address (family={:?})", addr.family());
                error!("try_from(): {}", cause);
                Err(Fail::new(EAFNOSUPPORT, &cause))
            },
        }
    }
}

/// Parses an `a.b.c.d:port` string.
impl FromStr for InetAddress {
    type Err = Fail;

    fn from_str(s: &str) -> Result<Self, Fail> {
        match SocketAddrV4::from_str(s) {
            Ok(addr) => Ok(Self::from(addr)),
            Err(e) => {
                error!("from_str(): invalid IPv4 endpoint (addr={:?})", s);
                Err(Fail::from(e))
            },
        }
    }
}

impl PartialEq for InetAddress {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for InetAddress {}

impl Hash for InetAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl fmt::Display for InetAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.ipv4(), self.port())
    }
}

impl fmt::Debug for InetAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InetAddress({}:{})", self.ipv4(), self.port())
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
