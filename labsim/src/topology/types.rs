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

//! Module containing the type definitions of the topology model

use ipnet::Ipv4Net;
use itertools::Itertools;
use std::convert::TryFrom;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Name of a network device, as it is known in the lab inventory
pub type Hostname = String;

/// # Routing protocol
/// Protocol that is enabled on a link, or that installed a route into a routing table. The
/// variant `Connected` is only used for routes; it cannot be configured on a link.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub enum Protocol {
    /// Subnet directly attached to an interface of the device
    Connected,
    /// Static routing. Static links do not exchange any routes.
    Static,
    /// OSPF
    Ospf,
    /// RIP
    Rip,
    /// No routing protocol is enabled on the link
    None,
}

impl Protocol {
    /// All protocols that may be configured on a link.
    pub const LINK_PROTOCOLS: [Protocol; 4] =
        [Protocol::None, Protocol::Static, Protocol::Rip, Protocol::Ospf];

    /// Administrative distance of routes installed by this protocol. A lower value is preferred,
    /// regardless of the metric.
    pub fn administrative_distance(&self) -> u8 {
        match self {
            Self::Connected => 0,
            Self::Static => 1,
            Self::Ospf => 110,
            Self::Rip => 120,
            Self::None => 255,
        }
    }

    /// Returns true if multiple routes with equal cost to the same subnet may be installed in
    /// parallel.
    pub fn is_ecmp_capable(&self) -> bool {
        matches!(self, Self::Ospf | Self::Rip)
    }

    /// Returns true if the protocol exchanges routes with its neighbors.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Ospf | Self::Rip)
    }

    /// Returns true if the protocol can be configured on a link.
    pub fn is_link_protocol(&self) -> bool {
        !matches!(self, Self::Connected)
    }

    /// Single-letter code used by IOS in `show ip route`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connected => "C",
            Self::Static => "S",
            Self::Ospf => "O",
            Self::Rip => "R",
            Self::None => "-",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::Static => write!(f, "Static"),
            Self::Ospf => write!(f, "OSPF"),
            Self::Rip => write!(f, "RIP"),
            Self::None => write!(f, "None"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connected" => Ok(Self::Connected),
            "static" => Ok(Self::Static),
            "ospf" => Ok(Self::Ospf),
            "rip" => Ok(Self::Rip),
            "none" => Ok(Self::None),
            _ => Err(ValidationError::InvalidProtocol(s.to_string())),
        }
    }
}

impl TryFrom<String> for Protocol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Protocol> for String {
    fn from(p: Protocol) -> String {
        p.to_string()
    }
}

/// A single defect of a link
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// The address is not a valid IPv4 address
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),
    /// The prefix length is not a number between 0 and 32
    #[error("Invalid subnet: {0}")]
    InvalidPrefixLength(String),
    /// The protocol cannot be configured on a link
    #[error("Invalid routing protocol: {0}. Allowed protocols are None, Static, RIP, OSPF")]
    InvalidProtocol(String),
    /// Both endpoints of the link use the same address
    #[error("Both endpoints use the same IP address {0}")]
    IdenticalAddresses(Ipv4Addr),
    /// The address is the network address of its own subnet
    #[error("{addr} is the network address of {net}")]
    NetworkAddress {
        /// Address of the endpoint
        addr: Ipv4Addr,
        /// Subnet of the endpoint
        net: Ipv4Net,
    },
    /// The address is the broadcast address of its own subnet
    #[error("{addr} is the broadcast address of {net}")]
    BroadcastAddress {
        /// Address of the endpoint
        addr: Ipv4Addr,
        /// Subnet of the endpoint
        net: Ipv4Net,
    },
    /// The two endpoints are not part of the same subnet
    #[error("IPs {a} and {b} are not in the same subnet /{prefix_len}")]
    DifferentSubnets {
        /// Address of the first endpoint
        a: Ipv4Addr,
        /// Address of the second endpoint
        b: Ipv4Addr,
        /// Prefix length configured on the link
        prefix_len: u8,
    },
}

/// All defects found on a single link of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkErrors {
    /// Position of the link in the input
    pub index: usize,
    /// First hostname of the link, if present
    pub host_a: Option<Hostname>,
    /// Second hostname of the link, if present
    pub host_b: Option<Hostname>,
    /// All problems found, in the order in which they were checked
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for LinkErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation errors for link {} -> {}: {}",
            self.host_a.as_deref().unwrap_or("?"),
            self.host_b.as_deref().unwrap_or("?"),
            self.errors.iter().join(", ")
        )
    }
}
