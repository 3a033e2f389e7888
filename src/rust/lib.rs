// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(clippy::all)]

#[macro_use]
extern crate log;

pub mod config;
pub mod pal;
pub mod runtime;

pub use self::runtime::{
    fail::Fail,
    network::InetAddress,
};
