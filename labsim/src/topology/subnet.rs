// Labsim: Routing and Spanning-Tree Verification for Network Labs
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Helper functions for IPv4 subnet arithmetic

use crate::topology::types::ValidationError;

use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;

/// Parse a prefix length (e.g., `"24"`, or `"/24"`). Only values between 0 and 32 are accepted.
pub fn parse_prefix_len(s: &str) -> Result<u8, ValidationError> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('/').unwrap_or(trimmed);
    match digits.parse::<u8>() {
        Ok(len) if len <= 32 => Ok(len),
        _ => Err(ValidationError::InvalidPrefixLength(s.to_string())),
    }
}

/// Parse an IPv4 address
pub fn parse_address(s: &str) -> Result<Ipv4Addr, ValidationError> {
    s.trim().parse().map_err(|_| ValidationError::InvalidAddress(s.to_string()))
}

/// Subnet containing the address, with all host bits cleared.
pub fn network_of(addr: Ipv4Addr, prefix_len: u8) -> Result<Ipv4Net, ValidationError> {
    Ipv4Net::new(addr, prefix_len)
        .map(|net| net.trunc())
        .map_err(|_| ValidationError::InvalidPrefixLength(prefix_len.to_string()))
}

/// Network address (network ID) of the subnet containing the address
pub fn network_id(addr: Ipv4Addr, prefix_len: u8) -> Result<Ipv4Addr, ValidationError> {
    Ok(network_of(addr, prefix_len)?.network())
}

/// Returns true if a subnet with this prefix length holds at most two addresses (`/31` and
/// `/32`). Such subnets have no dedicated broadcast address.
pub fn is_point_to_point(prefix_len: u8) -> bool {
    prefix_len >= 31
}

/// Network address, netmask and prefix length of an interface address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubnetInfo {
    /// Network address of the subnet
    pub network: Ipv4Addr,
    /// Netmask of the subnet (e.g., `255.255.255.0`)
    pub netmask: Ipv4Addr,
    /// Prefix length of the subnet
    pub prefix_len: u8,
}

impl SubnetInfo {
    /// Compute the subnet information of an address with the given prefix length.
    ///
    /// ```rust
    /// # use labsim::topology::SubnetInfo;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let info = SubnetInfo::calculate("192.168.1.77", "26")?;
    /// assert_eq!(info.network.to_string(), "192.168.1.64");
    /// assert_eq!(info.netmask.to_string(), "255.255.255.192");
    /// # Ok(())
    /// # }
    /// ```
    pub fn calculate(addr: &str, prefix_len: &str) -> Result<Self, ValidationError> {
        let prefix_len = parse_prefix_len(prefix_len)?;
        let net = network_of(parse_address(addr)?, prefix_len)?;
        Ok(Self::from(net))
    }
}

impl From<Ipv4Net> for SubnetInfo {
    fn from(net: Ipv4Net) -> Self {
        let net = net.trunc();
        Self { network: net.network(), netmask: net.netmask(), prefix_len: net.prefix_len() }
    }
}

impl fmt::Display for SubnetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}
