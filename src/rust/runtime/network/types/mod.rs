// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

mod inetaddr;

//==============================================================================
// Exports
//==============================================================================

pub use self::inetaddr::InetAddress;
