//! Destination matching for the filtered hierarchy.

use std::{fmt, net::IpAddr, str::FromStr};

use crate::request::ValidationError;

/// An address range, written `address/prefix`. A bare address is a single host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    pub address: IpAddr,
    pub prefix: u8,
}

impl Subnet {
    pub fn new(address: IpAddr, prefix: u8) -> Result<Self, ValidationError> {
        if prefix > max_prefix(address) {
            return Err(ValidationError::InvalidDestination(format!("{address}/{prefix}")));
        }

        Ok(Self { address, prefix })
    }

    /// A single host.
    pub fn host(address: IpAddr) -> Self {
        Self { address, prefix: max_prefix(address) }
    }

    pub fn is_ipv4(&self) -> bool {
        self.address.is_ipv4()
    }

    /// The `tc` protocol matching this address family.
    pub fn protocol(&self) -> &'static str {
        if self.is_ipv4() {
            "ip"
        } else {
            "ipv6"
        }
    }

    /// The `u32` selector matching this address family's destination field.
    pub fn selector(&self) -> &'static str {
        if self.is_ipv4() {
            "ip"
        } else {
            "ip6"
        }
    }
}

const fn max_prefix(address: IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl FromStr for Subnet {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidDestination(s.to_owned());
        let s = s.trim();

        let (address, prefix) = match s.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (s, None),
        };

        let address: IpAddr = address.parse().map_err(|_| invalid())?;
        match prefix {
            Some(prefix) => {
                let prefix = prefix.parse().map_err(|_| invalid())?;
                Self::new(address, prefix).map_err(|_| invalid())
            }
            None => Ok(Self::host(address)),
        }
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}
