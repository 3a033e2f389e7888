// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use ::anyhow::Result;
use ::inetaddr::{
    pal::{
        constants::AF_INET_VALUE,
        data_structures::{
            SockAddr,
            SockAddrIn,
            Socklen,
        },
    },
    runtime::logging,
    InetAddress,
};
use ::socket2::{
    Domain,
    Socket,
    Type,
};
use ::std::{
    mem,
    os::unix::io::{
        AsRawFd,
        RawFd,
    },
};

//======================================================================================================================
// Constants
//======================================================================================================================

const LOOPBACK: &str = "127.0.0.1";

//======================================================================================================================
// Helper Functions
//======================================================================================================================

/// Opens a TCP socket that listens on `local`.
fn safe_listen(local: &InetAddress) -> Result<Socket> {
    let socket: Socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.bind(&local.to_sockaddr())?;
    socket.listen(16)?;
    Ok(socket)
}

/// Queries the local address of `fd` straight from the kernel.
fn safe_getsockname(fd: RawFd) -> Result<SockAddrIn> {
    let mut sin: SockAddrIn = unsafe { mem::zeroed() };
    let mut len: Socklen = mem::size_of::<SockAddrIn>() as Socklen;
    let ret: libc::c_int = unsafe { libc::getsockname(fd, &mut sin as *mut SockAddrIn as *mut SockAddr, &mut len) };
    if ret != 0 {
        anyhow::bail!("getsockname() failed (errno={:?})", ::std::io::Error::last_os_error());
    }
    if len as usize != mem::size_of::<SockAddrIn>() {
        anyhow::bail!("unexpected socket address length (len={:?})", len);
    }
    Ok(sin)
}

//======================================================================================================================
// Passive Socket
//======================================================================================================================

/// Binds a listening socket to a wildcard port and captures the port the kernel picked.
#[test]
fn inetaddr_bind_wildcard_port() -> Result<()> {
    logging::initialize();

    let local: InetAddress = InetAddress::from_ip_str(LOOPBACK, 0)?;
    let listener: Socket = safe_listen(&local)?;

    let bound: InetAddress = InetAddress::from_raw(safe_getsockname(listener.as_raw_fd())?);
    if bound.ip_string() != LOOPBACK {
        anyhow::bail!("listener bound to the wrong address (bound={:?})", bound);
    }
    if bound.port() == 0 {
        anyhow::bail!("kernel should have assigned an ephemeral port");
    }

    Ok(())
}

/// Passes the raw address pointer directly to bind().
#[test]
fn inetaddr_raw_bind() -> Result<()> {
    logging::initialize();

    let local: InetAddress = InetAddress::from_ip_str(LOOPBACK, 0)?;
    let fd: RawFd = unsafe { libc::socket(AF_INET_VALUE, libc::SOCK_STREAM, 0) };
    if fd < 0 {
        anyhow::bail!("socket() failed (errno={:?})", ::std::io::Error::last_os_error());
    }

    let (saddr, len): (*const SockAddr, Socklen) = local.as_sockaddr_ptr();
    let ret: libc::c_int = unsafe { libc::bind(fd, saddr, len) };
    let result: Result<InetAddress> = if ret == 0 {
        safe_getsockname(fd).map(InetAddress::from_raw)
    } else {
        Err(anyhow::anyhow!("bind() failed (errno={:?})", ::std::io::Error::last_os_error()))
    };
    unsafe { libc::close(fd) };

    let bound: InetAddress = result?;
    if bound.ipv4() != local.ipv4() {
        anyhow::bail!("bound address mismatch (expected={:?}, got={:?})", local, bound);
    }

    Ok(())
}

//======================================================================================================================
// Establish Connection
//======================================================================================================================

/// Connects to a listener and captures both ends of the connection.
#[test]
fn inetaddr_accept_peer_address() -> Result<()> {
    logging::initialize();

    let listener: Socket = safe_listen(&InetAddress::from_ip_str(LOOPBACK, 0)?)?;
    let server: InetAddress = InetAddress::from_raw(safe_getsockname(listener.as_raw_fd())?);

    let client: Socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
    client.connect(&server.to_sockaddr())?;
    let client_local: InetAddress = InetAddress::from_raw(safe_getsockname(client.as_raw_fd())?);

    let (_conn, peer) = listener.accept()?;
    let peer: InetAddress = InetAddress::try_from(&peer)?;

    if peer != client_local {
        anyhow::bail!("peer address mismatch (expected={:?}, got={:?})", client_local, peer);
    }
    if peer.ip_string() != LOOPBACK {
        anyhow::bail!("peer should be on loopback (peer={:?})", peer);
    }

    Ok(())
}
