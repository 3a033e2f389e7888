// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::pal::{
    constants::{
        AF_INET,
        SOCKADDR_IN_SIZE,
    },
    data_structures::{
        InAddr,
        SockAddrIn,
    },
};
use ::std::net::{
    Ipv4Addr,
    SocketAddrV4,
};

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Converts a [std::net::SocketAddrV4] to a [libc::sockaddr_in].
pub fn socketaddrv4_to_sockaddr_in(addr: &SocketAddrV4) -> SockAddrIn {
    SockAddrIn {
        sin_family: AF_INET,
        sin_port: u16::to_be(addr.port()),
        // The octets are already in network byte order, so keep their in-memory order.
        sin_addr: InAddr {
            s_addr: u32::from_ne_bytes(addr.ip().octets()),
        },
        sin_zero: [0; 8],
    }
}

/// Converts a [libc::sockaddr_in] to a [std::net::SocketAddrV4].
pub fn sockaddr_in_to_socketaddrv4(sin: &SockAddrIn) -> SocketAddrV4 {
    SocketAddrV4::new(
        Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr)),
        u16::from_be(sin.sin_port),
    )
}

/// Serializes a [libc::sockaddr_in] field by field, following the kernel layout:
/// `sin_family` (host order), `sin_port`, `sin_addr`, `sin_zero`.
pub fn sockaddr_in_to_bytes(sin: &SockAddrIn) -> [u8; SOCKADDR_IN_SIZE] {
    let mut bytes: [u8; SOCKADDR_IN_SIZE] = [0; SOCKADDR_IN_SIZE];
    bytes[0..2].copy_from_slice(&sin.sin_family.to_ne_bytes());
    bytes[2..4].copy_from_slice(&sin.sin_port.to_ne_bytes());
    bytes[4..8].copy_from_slice(&sin.sin_addr.s_addr.to_ne_bytes());
    bytes[8..16].copy_from_slice(&sin.sin_zero);
    bytes
}

/// Deserializes a [libc::sockaddr_in] from the layout produced by [sockaddr_in_to_bytes]. No field is validated.
pub fn bytes_to_sockaddr_in(bytes: &[u8; SOCKADDR_IN_SIZE]) -> SockAddrIn {
    let mut sin_zero: [u8; 8] = [0; 8];
    sin_zero.copy_from_slice(&bytes[8..16]);
    SockAddrIn {
        sin_family: u16::from_ne_bytes([bytes[0], bytes[1]]),
        sin_port: u16::from_ne_bytes([bytes[2], bytes[3]]),
        sin_addr: InAddr {
            s_addr: u32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        },
        sin_zero,
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
