// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// PAL: Platform Abstraction Layer
//======================================================================================================================

// This is the platform abstraction layer designed to hide the platform specific layout of socket address structures.
// Everything above this layer talks in terms of the aliases exported here.

pub mod constants;
pub mod data_structures;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod linux;
    } else {
        compile_error!("raw IPv4 socket addresses are only implemented for linux");
    }
}
