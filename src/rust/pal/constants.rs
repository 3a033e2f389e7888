// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use crate::pal::data_structures::{
    AddressFamily,
    SockAddrIn,
    Socklen,
};
use ::std::mem;

pub const AF_INET: AddressFamily = libc::AF_INET as AddressFamily;

pub const AF_INET_VALUE: i32 = AF_INET as i32;

/// Size of an IPv4 socket address structure, in bytes.
pub const SOCKADDR_IN_SIZE: usize = mem::size_of::<SockAddrIn>();

/// Size of an IPv4 socket address structure, as expected by socket syscalls.
pub const SOCKADDR_IN_LEN: Socklen = SOCKADDR_IN_SIZE as Socklen;
