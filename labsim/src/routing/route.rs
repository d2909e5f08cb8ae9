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

//! Module defining a single entry of a routing table.

use crate::topology::Protocol;

use ipnet::Ipv4Net;
use std::convert::TryFrom;
use std::fmt;
use std::net::{AddrParseError, Ipv4Addr};
use std::str::FromStr;

/// Next hop of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub enum NextHop {
    /// The subnet is attached to the outgoing interface
    Directly,
    /// Packets are forwarded to the neighbor with this address
    Via(Ipv4Addr),
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directly => write!(f, "directly"),
            Self::Via(ip) => write!(f, "{}", ip),
        }
    }
}

impl FromStr for NextHop {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("directly") {
            Ok(Self::Directly)
        } else {
            s.parse().map(Self::Via)
        }
    }
}

impl TryFrom<String> for NextHop {
    type Error = AddrParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NextHop> for String {
    fn from(nh: NextHop) -> String {
        nh.to_string()
    }
}

/// # Route
/// Entry of a routing table. Routes can only be created as connected routes (see
/// [`RouteEntry::connected`]), or as routes learned from a neighbor (see
/// [`RouteEntry::learned`]). The administrative distance is always derived from the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteEntry {
    subnet: Ipv4Net,
    #[cfg_attr(feature = "serde", serde(rename = "outgoing_interface"))]
    interface: String,
    protocol: Protocol,
    administrative_distance: u8,
    metric: u32,
    #[cfg_attr(feature = "serde", serde(rename = "nexthop"))]
    next_hop: NextHop,
    #[cfg_attr(feature = "serde", serde(rename = "link"))]
    link_id: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    connected_tag: Option<Protocol>,
}

impl RouteEntry {
    /// Create a connected route. `tag` is the protocol of the link, which is the only protocol
    /// into which this subnet is redistributed.
    pub fn connected(
        subnet: Ipv4Net,
        interface: impl Into<String>,
        link_id: impl Into<String>,
        tag: Protocol,
    ) -> Self {
        Self {
            subnet: subnet.trunc(),
            interface: interface.into(),
            protocol: Protocol::Connected,
            administrative_distance: Protocol::Connected.administrative_distance(),
            metric: 0,
            next_hop: NextHop::Directly,
            link_id: link_id.into(),
            connected_tag: Some(tag),
        }
    }

    /// Create a route learned from the neighbor `next_hop`.
    pub fn learned(
        subnet: Ipv4Net,
        protocol: Protocol,
        metric: u32,
        interface: impl Into<String>,
        next_hop: Ipv4Addr,
        link_id: impl Into<String>,
    ) -> Self {
        Self {
            subnet: subnet.trunc(),
            interface: interface.into(),
            protocol,
            administrative_distance: protocol.administrative_distance(),
            metric,
            next_hop: NextHop::Via(next_hop),
            link_id: link_id.into(),
            connected_tag: None,
        }
    }

    /// Destination subnet
    pub fn subnet(&self) -> Ipv4Net {
        self.subnet
    }

    /// Outgoing interface
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Protocol that installed the route
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Administrative distance, derived from the protocol
    pub fn administrative_distance(&self) -> u8 {
        self.administrative_distance
    }

    /// Metric (hop count from the link where the subnet is attached)
    pub fn metric(&self) -> u32 {
        self.metric
    }

    /// Next hop of the route
    pub fn next_hop(&self) -> NextHop {
        self.next_hop
    }

    /// Identifier of the link on which the subnet is attached
    pub fn link_id(&self) -> &str {
        &self.link_id
    }

    /// For connected routes, the protocol domain into which the subnet is redistributed.
    pub fn connected_tag(&self) -> Option<Protocol> {
        self.connected_tag
    }

    /// Returns true if the route may be advertised over a link running `protocol`: either it was
    /// learned by that protocol, or it is a connected subnet of a link running that protocol.
    pub fn is_advertised_by(&self, protocol: Protocol) -> bool {
        self.protocol == protocol
            || (self.protocol == Protocol::Connected && self.connected_tag == Some(protocol))
    }

    /// Metric with which the route is advertised to a neighbor. A connected subnet is advertised
    /// with the cost of its attached link (1), and a learned route with its own metric.
    pub fn advertised_metric(&self) -> u32 {
        match self.protocol {
            Protocol::Connected => 1,
            _ => self.metric,
        }
    }

    /// Key by which routes are ordered in a canonical snapshot
    pub(crate) fn sort_key(&self) -> (Ipv4Net, Protocol, u32, NextHop, &str, &str) {
        (self.subnet, self.protocol, self.metric, self.next_hop, &self.interface, &self.link_id)
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}/{}] via {}, {} (link {})",
            self.protocol,
            self.subnet,
            self.administrative_distance,
            self.metric,
            self.next_hop,
            self.interface,
            self.link_id
        )
    }
}
