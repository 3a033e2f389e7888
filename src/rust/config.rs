// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::runtime::{
    fail::Fail,
    network::InetAddress,
};
use ::std::{
    fs,
    net::{
        Ipv4Addr,
        SocketAddrV4,
    },
    ops::Index,
    str::FromStr,
};
use ::yaml_rust::{
    Yaml,
    YamlLoader,
};

//======================================================================================================================
// Constants
//======================================================================================================================

// Local endpoint options.
mod endpoint_config {
    pub const SECTION_NAME: &str = "inetaddr";
    // Local IPv4 addr.
    pub const LOCAL_IPV4_ADDR: &str = "local_ipv4_addr";
    // Local port number.
    pub const LOCAL_PORT: &str = "local_port";
}

//======================================================================================================================
// Structures
//======================================================================================================================

/// Endpoint configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Yaml);

//======================================================================================================================
// Associated Functions
//======================================================================================================================

impl Config {
    /// Reads a configuration file into a [Config] object.
    pub fn new(config_path: String) -> Result<Self, Fail> {
        let config_s: String = match fs::read_to_string(&config_path) {
            Ok(config_s) => config_s,
            Err(e) => {
                let cause: String = format!("failed to read configuration file (path={:?}, error={})", config_path, e);
                error!("new(): {}", cause);
                return Err(Fail::new(e.raw_os_error().unwrap_or(libc::EIO), &cause));
            },
        };
        Self::from_yaml_str(&config_s)
    }

    /// Parses a configuration from a YAML string. Exactly one document is expected.
    pub fn from_yaml_str(config_s: &str) -> Result<Self, Fail> {
        let config: Vec<Yaml> = match YamlLoader::load_from_str(config_s) {
            Ok(config) => config,
            Err(e) => {
                let cause: String = format!("malformed configuration: {}", e);
                error!("from_yaml_str(): {}", cause);
                return Err(Fail::new(libc::EINVAL, &cause));
            },
        };
        let config_obj: &Yaml = match &config[..] {
            [c] => c,
            _ => return Err(Fail::new(libc::EINVAL, "Wrong number of config objects")),
        };

        Ok(Self(config_obj.clone()))
    }

    fn get_endpoint_config(&self) -> Result<&Yaml, Fail> {
        Self::get_subsection(&self.0, endpoint_config::SECTION_NAME)
    }

    /// Reads the local IPv4 address parameter from the environment variable first and then the underlying
    /// configuration file.
    pub fn local_ipv4_addr(&self) -> Result<Ipv4Addr, Fail> {
        if let Some(addr) = Self::get_typed_env_option(endpoint_config::LOCAL_IPV4_ADDR)? {
            return Ok(addr);
        }
        Self::get_typed_str_option(
            self.get_endpoint_config()?,
            endpoint_config::LOCAL_IPV4_ADDR,
            |val: &str| val.parse().ok(),
        )
    }

    /// Reads the local port parameter from the environment variable first and then the underlying configuration file.
    pub fn local_port(&self) -> Result<u16, Fail> {
        if let Some(port) = Self::get_typed_env_option(endpoint_config::LOCAL_PORT)? {
            Ok(port)
        } else {
            Self::get_int_option(self.get_endpoint_config()?, endpoint_config::LOCAL_PORT)
        }
    }

    /// Builds the local endpoint out of the local IPv4 address and port parameters.
    pub fn local_endpoint(&self) -> Result<InetAddress, Fail> {
        let addr: InetAddress = InetAddress::from(SocketAddrV4::new(self.local_ipv4_addr()?, self.local_port()?));
        debug!("local_endpoint(): {}", addr);
        Ok(addr)
    }

    //======================================================================================================================
    // Static Functions
    //======================================================================================================================

    /// Index `yaml` to find the subsection at `index`, validating that it is a hash.
    fn get_subsection<'a>(yaml: &'a Yaml, index: &str) -> Result<&'a Yaml, Fail> {
        let section: &'a Yaml = Self::get_option(yaml, index)?;
        match section {
            Yaml::Hash(_) => Ok(section),
            _ => {
                let message: String = format!("parameter \"{}\" has unexpected type", index);
                Err(Fail::new(libc::EINVAL, message.as_str()))
            },
        }
    }

    /// Index `yaml` to find the value at `index`, validating that the index exists.
    fn get_option<'a>(yaml: &'a Yaml, index: &str) -> Result<&'a Yaml, Fail> {
        match yaml.index(index) {
            Yaml::BadValue => {
                let message: String = format!("missing configuration option \"{}\"", index);
                Err(Fail::new(libc::EINVAL, message.as_str()))
            },
            value => Ok(value),
        }
    }

    /// Index `yaml` to find the value at `index`, validating that it exists and that the receiver returns Some(_).
    fn get_typed_option<'a, T, Fn>(yaml: &'a Yaml, index: &str, receiver: Fn) -> Result<T, Fail>
    where
        Fn: FnOnce(&'a Yaml) -> Option<T>,
    {
        let option: &'a Yaml = Self::get_option(yaml, index)?;
        match receiver(option) {
            Some(value) => Ok(value),
            None => {
                let message: String = format!("parameter {} has unexpected type", index);
                Err(Fail::new(libc::EINVAL, message.as_str()))
            },
        }
    }

    /// Index `yaml` to find value at `index`, validating it as a string.
    fn get_typed_str_option<T, Fn>(yaml: &Yaml, index: &str, parser: Fn) -> Result<T, Fail>
    where
        Fn: FnOnce(&str) -> Option<T>,
    {
        let option: &Yaml = Self::get_option(yaml, index)?;
        if let Some(value) = option.as_str() {
            if let Some(value) = parser(value) {
                return Ok(value);
            }
        }
        let message: String = format!("parameter {} has unexpected type", index);
        Err(Fail::new(libc::EINVAL, message.as_str()))
    }

    /// Get value where the environment value overrides the config file if it exists.
    fn get_typed_env_option<T: FromStr>(index: &str) -> Result<Option<T>, Fail> {
        if let Ok(var) = ::std::env::var(index.to_uppercase()) {
            if let Ok(value) = var.as_str().parse() {
                return Ok(Some(value));
            } else {
                let message: String = format!("parameter {} has unexpected type", index);
                return Err(Fail::new(libc::EINVAL, message.as_str()));
            }
        }
        Ok(None)
    }

    /// Similar to `get_typed_option` using `Yaml::as_i64` as the receiver, but additionally verifies that the
    /// destination type may hold the i64 value.
    fn get_int_option<T: TryFrom<i64>>(yaml: &Yaml, index: &str) -> Result<T, Fail> {
        let val: i64 = Self::get_typed_option(yaml, index, &Yaml::as_i64)?;
        match T::try_from(val) {
            Ok(val) => Ok(val),
            _ => {
                let message: String = format!("parameter \"{}\" is out of range", index);
                Err(Fail::new(libc::ERANGE, message.as_str()))
            },
        }
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================

#[cfg(test)]
mod test {
    use super::Config;
    use crate::runtime::network::InetAddress;
    use ::anyhow::Result;
    use ::std::{
        env,
        net::Ipv4Addr,
        sync::Mutex,
    };

    /// Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CONFIG: &str = "
inetaddr:
  local_ipv4_addr: 192.168.150.128
  local_port: 8080
";

    /// Reads the local endpoint from a configuration file.
    #[test]
    fn test_local_endpoint_from_file() -> Result<()> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("LOCAL_IPV4_ADDR");
        env::remove_var("LOCAL_PORT");

        let config: Config = Config::from_yaml_str(CONFIG)?;
        let addr: InetAddress = config.local_endpoint()?;
        if addr.ip_string() != "192.168.150.128" || addr.port() != 8080 {
            anyhow::bail!("unexpected local endpoint (addr={:?})", addr);
        }

        Ok(())
    }

    /// Environment variables take precedence over the configuration file.
    #[test]
    fn test_env_overrides_file() -> Result<()> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("LOCAL_IPV4_ADDR", "10.0.0.1");
        env::set_var("LOCAL_PORT", "443");

        let config: Config = Config::from_yaml_str(CONFIG)?;
        let ipv4: Result<Ipv4Addr, _> = config.local_ipv4_addr();
        let port: Result<u16, _> = config.local_port();

        env::remove_var("LOCAL_IPV4_ADDR");
        env::remove_var("LOCAL_PORT");

        if ipv4? != Ipv4Addr::new(10, 0, 0, 1) {
            anyhow::bail!("environment should override the local address");
        }
        if port? != 443 {
            anyhow::bail!("environment should override the local port");
        }

        Ok(())
    }

    /// Missing and malformed options are reported.
    #[test]
    fn test_bad_options() -> Result<()> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::remove_var("LOCAL_IPV4_ADDR");
        env::remove_var("LOCAL_PORT");

        let missing: Config = Config::from_yaml_str("inetaddr:\n  local_port: 80\n")?;
        match missing.local_ipv4_addr() {
            Err(e) if e.errno == libc::EINVAL => (),
            other => anyhow::bail!("missing address should fail with EINVAL (result={:?})", other),
        }

        let bad_addr: Config = Config::from_yaml_str("inetaddr:\n  local_ipv4_addr: 999.1.1.1\n")?;
        match bad_addr.local_ipv4_addr() {
            Err(e) if e.errno == libc::EINVAL => (),
            other => anyhow::bail!("malformed address should fail with EINVAL (result={:?})", other),
        }

        let out_of_range: Config = Config::from_yaml_str("inetaddr:\n  local_port: 70000\n")?;
        match out_of_range.local_port() {
            Err(e) if e.errno == libc::ERANGE => (),
            other => anyhow::bail!("port 70000 should fail with ERANGE (result={:?})", other),
        }

        match Config::from_yaml_str("a: 1\n---\nb: 2\n") {
            Err(e) if e.errno == libc::EINVAL => (),
            other => anyhow::bail!("multiple documents should be rejected (result={:?})", other),
        }

        Ok(())
    }

    /// Reading a file that does not exist fails with the OS error.
    #[test]
    fn test_missing_file() -> Result<()> {
        match Config::new("/nonexistent/inetaddr.yaml".to_string()) {
            Err(e) if e.errno == libc::ENOENT => Ok(()),
            other => anyhow::bail!("missing file should fail with ENOENT (result={:?})", other),
        }
    }
}
