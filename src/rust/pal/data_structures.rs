// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Linux data structures
//==============================================================================

pub type SockAddr = libc::sockaddr;

pub type SockAddrIn = libc::sockaddr_in;

pub type InAddr = libc::in_addr;

pub type Socklen = libc::socklen_t;

pub type AddressFamily = libc::sa_family_t;
