// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(clippy::all)]

//==============================================================================
// Imports
//==============================================================================

use ::anyhow::Result;
use ::clap::{
    Arg,
    ArgMatches,
    Command,
};
use ::inetaddr::{
    config::Config,
    runtime::logging,
    InetAddress,
};
use ::socket2::{
    Domain,
    SockAddr,
    Socket,
    Type,
};
use ::std::str::FromStr;

//==============================================================================
// Program Arguments
//==============================================================================

/// Program Arguments
#[derive(Debug)]
pub struct ProgramArguments {
    /// Local socket IPv4 address.
    local: InetAddress,
}

/// Associate functions for Program Arguments
impl ProgramArguments {
    /// Default local socket IPv4 address.
    const DEFAULT_LOCAL: &'static str = "127.0.0.1:12345";

    /// Parses the program arguments from the command line interface.
    pub fn new(app_name: &'static str, app_author: &'static str, app_about: &'static str) -> Result<Self> {
        let matches: ArgMatches = Command::new(app_name)
            .author(app_author)
            .about(app_about)
            .arg(
                Arg::new("local")
                    .long("local")
                    .value_parser(clap::value_parser!(String))
                    .required(false)
                    .value_name("ADDRESS:PORT")
                    .help("Sets local address"),
            )
            .arg(
                Arg::new("config")
                    .long("config")
                    .value_parser(clap::value_parser!(String))
                    .required(false)
                    .conflicts_with("local")
                    .value_name("PATH")
                    .help("Reads local address from a configuration file"),
            )
            .get_matches();

        // Default arguments.
        let mut args: ProgramArguments = ProgramArguments {
            local: InetAddress::from_str(Self::DEFAULT_LOCAL)?,
        };

        // Local address.
        if let Some(addr) = matches.get_one::<String>("local") {
            args.local = InetAddress::from_str(addr)?;
        }

        // Configuration file.
        if let Some(path) = matches.get_one::<String>("config") {
            args.local = Config::new(path.to_string())?.local_endpoint()?;
        }

        Ok(args)
    }

    /// Returns the local endpoint address parameter stored in the target program arguments.
    pub fn get_local(&self) -> InetAddress {
        self.local
    }
}

//==============================================================================
// Application
//==============================================================================

/// Application
struct Application {
    /// Listening socket.
    socket: Socket,
    /// Local endpoint.
    local: InetAddress,
}

/// Associated Functions for the Application
impl Application {
    /// Backlog of the listening socket.
    const BACKLOG: i32 = 16;

    /// Instantiates the application.
    pub fn new(args: &ProgramArguments) -> Result<Self> {
        let local: InetAddress = args.get_local();

        let socket: Socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        socket.bind(&local.to_sockaddr())?;
        socket.listen(Self::BACKLOG)?;

        println!("Local Address: {}", local);

        Ok(Self { socket, local })
    }

    /// Accepts a single connection and reports who connected.
    pub fn run(&self) -> Result<()> {
        let (_conn, peer): (Socket, SockAddr) = self.socket.accept()?;
        let peer: InetAddress = InetAddress::try_from(&peer)?;
        log::info!("accepted connection (local={}, peer={})", self.local, peer);
        println!("Peer Address: {} (ip={}, port={})", peer, peer.ip_string(), peer.port());
        Ok(())
    }
}

//==============================================================================

fn main() -> Result<()> {
    logging::initialize();

    let args: ProgramArguments = ProgramArguments::new(
        "tcp-accept",
        "Microsoft Corporation",
        "Accepts one TCP connection and prints the peer address.",
    )?;

    Application::new(&args)?.run()
}
