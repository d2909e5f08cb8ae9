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

//! # Switch
//! Input model of a spanning-tree scenario, as collected from the switches of the lab (the output
//! of `show spanning-tree` and `show lldp neighbors`).

use crate::stp::types::DEFAULT_BRIDGE_PRIORITY;

/// # Switch
/// A switch with its LLDP neighbors and the spanning-tree state of all its VLANs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Switch {
    /// Hostname of the switch
    pub hostname: String,
    /// Neighbors reported by LLDP
    #[cfg_attr(feature = "serde", serde(default))]
    pub lldp_neighbors: Vec<LldpNeighbor>,
    /// VLANs configured on the switch
    #[cfg_attr(feature = "serde", serde(default))]
    pub vlans: Vec<Vlan>,
}

impl Switch {
    /// Create a switch without any VLAN or neighbor
    pub fn new(hostname: impl Into<String>) -> Self {
        Self { hostname: hostname.into(), lldp_neighbors: Vec::new(), vlans: Vec::new() }
    }

    /// Add a VLAN with spanning-tree information
    pub fn with_vlan(mut self, vlan_id: u16, stp: BridgeDetail) -> Self {
        self.vlans.push(Vlan { vlan_id, stp: Some(stp) });
        self
    }

    /// Add a neighbor reported by LLDP
    pub fn with_lldp_neighbor(
        mut self,
        local_interface: impl Into<String>,
        remote_device: impl Into<String>,
        remote_interface: impl Into<String>,
    ) -> Self {
        self.lldp_neighbors.push(LldpNeighbor {
            local_interface: local_interface.into(),
            remote_device: remote_device.into(),
            remote_interface: remote_interface.into(),
        });
        self
    }

    /// Returns the spanning-tree information of the given VLAN, if the switch has any.
    pub fn stp_detail(&self, vlan_id: u16) -> Option<&BridgeDetail> {
        self.vlans.iter().filter(|v| v.vlan_id == vlan_id).find_map(|v| v.stp.as_ref())
    }
}

/// Neighbor entry of `show lldp neighbors`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LldpNeighbor {
    /// Local interface on which the neighbor is seen
    #[cfg_attr(feature = "serde", serde(rename = "local_intf"))]
    pub local_interface: String,
    /// Hostname of the neighbor
    pub remote_device: String,
    /// Interface of the neighbor
    #[cfg_attr(feature = "serde", serde(rename = "remote_intf"))]
    pub remote_interface: String,
}

/// VLAN of a switch
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Vlan {
    /// VLAN ID
    pub vlan_id: u16,
    /// Spanning-tree instance of the VLAN, if it runs on this switch
    #[cfg_attr(feature = "serde", serde(rename = "stp_detail", default))]
    pub stp: Option<BridgeDetail>,
}

/// # Bridge Detail
/// Spanning-tree instance of a single VLAN on a single switch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BridgeDetail {
    /// Bridge priority. IOS reports it as `32769 (priority 32768 sys-id-ext 1)`; the front end
    /// stores only the value in brackets.
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "bridge_priority_in_brackets",
            alias = "bridge_priority",
            default = "default_priority",
            deserialize_with = "priority_digits"
        )
    )]
    pub bridge_priority: u32,
    /// MAC address of the bridge, as reported by the switch
    pub bridge_mac: String,
    /// Ports taking part in the spanning tree
    #[cfg_attr(feature = "serde", serde(rename = "stp_interfaces", default))]
    pub ports: Vec<Port>,
}

impl BridgeDetail {
    /// Create a bridge without ports
    pub fn new(bridge_priority: u32, bridge_mac: impl Into<String>) -> Self {
        Self { bridge_priority, bridge_mac: bridge_mac.into(), ports: Vec::new() }
    }

    /// Create a bridge with the default priority
    pub fn with_default_priority(bridge_mac: impl Into<String>) -> Self {
        Self::new(DEFAULT_BRIDGE_PRIORITY, bridge_mac)
    }

    /// Add a port. Its segment is found using LLDP, or from the interface name.
    pub fn with_port(mut self, interface: impl Into<String>, cost: u32) -> Self {
        self.ports.push(Port { interface: interface.into(), cost, link_id: None });
        self
    }

    /// Add a port with an explicit link identifier.
    pub fn with_linked_port(
        mut self,
        interface: impl Into<String>,
        cost: u32,
        link_id: impl Into<String>,
    ) -> Self {
        self.ports.push(Port { interface: interface.into(), cost, link_id: Some(link_id.into()) });
        self
    }
}

/// Port of a bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Port {
    /// Interface name
    pub interface: String,
    /// Port cost
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "priority_digits"))]
    pub cost: u32,
    /// Explicit identifier of the link the port is attached to. Empty identifiers are ignored.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub link_id: Option<String>,
}

impl Port {
    /// Returns the explicit link identifier, if it is set and not empty.
    pub fn explicit_link_id(&self) -> Option<&str> {
        self.link_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(feature = "serde")]
fn default_priority() -> u32 {
    DEFAULT_BRIDGE_PRIORITY
}

/// Accepts a number, or a string from which all non-digit characters are removed (`"(4096)"`).
#[cfg(feature = "serde")]
fn priority_digits<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse().map_err(|_| D::Error::custom(format!("not a number: {:?}", s)))
        }
    }
}
