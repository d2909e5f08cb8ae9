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

//! Module containing all type definitions of the spanning-tree calculation

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bridge priority used by IOS if nothing else is configured
pub const DEFAULT_BRIDGE_PRIORITY: u32 = 32768;

/// # MAC address of a bridge
/// Parsed from the Cisco notation (`0c11.2233.b000`), or from the colon (`0c:11:22:33:b0:00`) or
/// dash (`0c-11-22-33-b0-00`) notation. MAC addresses are ordered numerically, which is the same
/// as ordering their lowercase hex strings lexicographically.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub struct MacAddress(pub [u8; 6]);

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | ':' | '-'))
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| MacParseError(s.to_string()))?;
        if digits.len() != 12 {
            return Err(MacParseError(s.to_string()));
        }
        let mut mac = [0u8; 6];
        for (byte, pair) in mac.iter_mut().zip(digits.chunks(2)) {
            *byte = (pair[0] << 4) | pair[1];
        }
        Ok(Self(mac))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0;
        write!(f, "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}", m[0], m[1], m[2], m[3], m[4], m[5])
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({})", self)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = MacParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

/// The string is not a valid MAC address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid MAC address: {0}")]
pub struct MacParseError(pub String);

/// # Bridge ID
/// Identifier of a bridge in the spanning tree. Bridge IDs are compared first by priority, and
/// then by MAC address. The bridge with the lowest ID becomes the root.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BridgeId {
    /// Bridge priority
    pub priority: u32,
    /// MAC address of the bridge
    pub mac: MacAddress,
}

impl fmt::Display for BridgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.priority, self.mac)
    }
}

/// Role of a port in the spanning tree
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PortRole {
    /// Port towards the root bridge
    Root,
    /// Port with the best path to the root on its segment
    Designated,
    /// Blocked port
    #[cfg_attr(feature = "serde", serde(rename = "Alternate (BLK)"))]
    Alternate,
}

impl PortRole {
    /// Returns true if the port forwards traffic
    pub fn is_forwarding(&self) -> bool {
        !matches!(self, Self::Alternate)
    }

    /// Abbreviation used by IOS in `show spanning-tree`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Designated => "Desg",
            Self::Alternate => "Altn",
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "Root"),
            Self::Designated => write!(f, "Designated"),
            Self::Alternate => write!(f, "Alternate"),
        }
    }
}

/// Replace the bridge priority of one switch before computing the spanning tree. This answers
/// the question "which switch becomes root, and which ports change their role, if the priority
/// of this switch is changed?"
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PriorityOverride {
    /// Switch whose priority is replaced
    pub hostname: String,
    /// New bridge priority
    pub priority: u32,
}

impl PriorityOverride {
    /// Create a new priority override
    pub fn new(hostname: impl Into<String>, priority: u32) -> Self {
        Self { hostname: hostname.into(), priority }
    }
}

/// Spanning-tree calculation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StpError {
    /// No switch carries spanning-tree information for the VLAN
    #[error("No device found for VLAN {0}")]
    VlanNotFound(u16),
    /// The bridge MAC of a switch is invalid
    #[error("Invalid bridge MAC address of {hostname}: {mac}")]
    InvalidMac {
        /// Switch with the invalid address
        hostname: String,
        /// The address as it was given
        mac: String,
    },
    /// A port has cost 0. Port costs start at 1.
    #[error("Invalid cost 0 of port {interface} on {hostname}")]
    InvalidPortCost {
        /// Switch with the invalid port
        hostname: String,
        /// Interface of the port
        interface: String,
    },
    /// The switch has no path to the root bridge. The switches of a VLAN must form a single
    /// connected topology.
    #[error("Switch {hostname} has no path to the root bridge {root}")]
    Unreachable {
        /// Switch without a path to the root
        hostname: String,
        /// Hostname of the root bridge
        root: String,
    },
}
