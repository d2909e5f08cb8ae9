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

//! # Spanning-Tree Role Calculator
//!
//! Computes the role of every port of a single VLAN, as 802.1D would after convergence:
//!
//! 1. The bridge with the smallest [`BridgeId`] becomes the root.
//! 2. The root path cost of every bridge is computed by a breadth-first relaxation from the root
//!    over the [`BridgeGraph`](crate::stp::segment::BridgeGraph). A bridge is updated (and
//!    visited again) whenever a path with a strictly smaller `(cost, upstream bridge id, upstream
//!    port, local port)` is found. The port over which the best path arrives is the root port.
//! 3. On every segment, the member with the smallest `(root path cost, bridge id, port)` is
//!    designated. All other members are root ports (if they are the root port of their bridge),
//!    or alternate (blocking).
//!
//! Ports are identified by their position in the port list of their own switch, like the port
//! number in an 802.1D port ID. The result does not depend on the order of the switches.

use crate::stp::segment::{BridgeIndex, LldpMapping, Segmentation};
use crate::stp::switch::{BridgeDetail, Switch};
use crate::stp::types::{BridgeId, MacAddress, PortRole, PriorityOverride, StpError};

use itertools::Itertools;
use log::*;
use petgraph::visit::EdgeRef;
use std::collections::VecDeque;

/// Compute the spanning tree of a VLAN, and return the role of every port of every switch that
/// runs the VLAN, in input order.
///
/// If `priority_override` is set, the bridge priority of that switch is replaced before the root
/// is elected.
///
/// ```rust
/// use labsim::compute_stp_roles;
/// use labsim::stp::{BridgeDetail, PortRole, Switch};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let switches = vec![
///     Switch::new("SW1").with_vlan(
///         1,
///         BridgeDetail::new(4096, "0c11.0000.0001").with_linked_port("Gi0/1", 4, "SW1-SW2"),
///     ),
///     Switch::new("SW2").with_vlan(
///         1,
///         BridgeDetail::new(32768, "0c11.0000.0002").with_linked_port("Gi0/1", 4, "SW1-SW2"),
///     ),
/// ];
///
/// let result = compute_stp_roles(&switches, 1, None)?;
/// assert!(result[0].is_root);
/// assert_eq!(result[1].root_port.as_deref(), Some("Gi0/1"));
/// assert_eq!(result[1].ports[0].role, PortRole::Root);
/// # Ok(())
/// # }
/// ```
pub fn compute_stp_roles(
    switches: &[Switch],
    vlan_id: u16,
    priority_override: Option<PriorityOverride>,
) -> Result<Vec<SwitchStpResult>, StpError> {
    let lldp = LldpMapping::build(switches);

    let bridges = switches
        .iter()
        .filter_map(|s| s.stp_detail(vlan_id).map(|d| (s, d)))
        .map(|(s, d)| Bridge::new(s, d, priority_override.as_ref()))
        .collect::<Result<Vec<Bridge>, StpError>>()?;

    let root = bridges.iter().position_min_by_key(|b| b.id).ok_or(StpError::VlanNotFound(vlan_id))?;
    debug!("VLAN {}: {} is the root bridge ({})", vlan_id, bridges[root].hostname, bridges[root].id);

    let segmentation =
        Segmentation::build(bridges.iter().map(|b| (b.hostname, b.detail.ports.as_slice())), &lldp);

    let paths = root_paths(&bridges, &segmentation, root)?;

    // role of every port, initialized for ports without neighbor
    let mut roles: Vec<Vec<PortRole>> =
        bridges.iter().map(|b| vec![PortRole::Designated; b.detail.ports.len()]).collect();

    for segment in segmentation.segments() {
        let designated = match segment
            .members
            .iter()
            .position_min_by_key(|m| (paths[m.bridge].cost, bridges[m.bridge].id, m.port))
        {
            Some(d) => d,
            None => continue,
        };
        for (i, m) in segment.members.iter().enumerate() {
            roles[m.bridge][m.port] = if i == designated {
                PortRole::Designated
            } else if paths[m.bridge].port == Some(m.port) {
                PortRole::Root
            } else {
                PortRole::Alternate
            };
        }
    }

    let root_mac = bridges[root].id.mac;
    Ok(bridges
        .iter()
        .zip(paths.iter())
        .zip(roles.into_iter())
        .enumerate()
        .map(|(b, ((bridge, path), roles))| {
            let ports = bridge
                .detail
                .ports
                .iter()
                .zip(roles.into_iter())
                .enumerate()
                .map(|(p, (port, role))| PortResult {
                    interface: port.interface.clone(),
                    cost: port.cost,
                    link_id: segmentation
                        .segment_of(b, p)
                        .map(|s| s.link_id.clone())
                        .unwrap_or_default(),
                    role,
                    is_root_port: path.port == Some(p),
                })
                .collect();
            SwitchStpResult {
                hostname: bridge.hostname.to_string(),
                vlan_id,
                bridge_priority: bridge.id.priority,
                bridge_mac: bridge.id.mac,
                root_mac,
                is_root: b == root,
                root_path_cost: path.cost,
                root_port: path.port.map(|p| bridge.detail.ports[p].interface.clone()),
                ports,
            }
        })
        .collect())
}

/// Switch running the VLAN
#[derive(Debug)]
struct Bridge<'a> {
    hostname: &'a str,
    id: BridgeId,
    detail: &'a BridgeDetail,
}

impl<'a> Bridge<'a> {
    fn new(
        switch: &'a Switch,
        detail: &'a BridgeDetail,
        priority_override: Option<&PriorityOverride>,
    ) -> Result<Self, StpError> {
        let mac: MacAddress = detail.bridge_mac.parse().map_err(|_| StpError::InvalidMac {
            hostname: switch.hostname.clone(),
            mac: detail.bridge_mac.clone(),
        })?;
        let priority = match priority_override {
            Some(o) if o.hostname == switch.hostname => {
                debug!("Override priority of {}: {} -> {}", o.hostname, detail.bridge_priority, o.priority);
                o.priority
            }
            _ => detail.bridge_priority,
        };
        if let Some(port) = detail.ports.iter().find(|p| p.cost == 0) {
            return Err(StpError::InvalidPortCost {
                hostname: switch.hostname.clone(),
                interface: port.interface.clone(),
            });
        }
        Ok(Self { hostname: &switch.hostname, id: BridgeId { priority, mac }, detail })
    }
}

/// Best known path of a bridge towards the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RootPath {
    cost: u32,
    upstream: Option<BridgeId>,
    upstream_port: Option<usize>,
    port: Option<usize>,
}

impl RootPath {
    /// Paths are compared by this key, smaller is better.
    fn key(&self) -> (u32, Option<BridgeId>, Option<usize>, Option<usize>) {
        (self.cost, self.upstream, self.upstream_port, self.port)
    }
}

/// Breadth-first relaxation from the root. Fails if any bridge cannot reach the root.
fn root_paths(
    bridges: &[Bridge],
    segmentation: &Segmentation,
    root: usize,
) -> Result<Vec<RootPath>, StpError> {
    let graph = segmentation.bridge_graph(bridges.len());
    let mut paths: Vec<Option<RootPath>> = vec![None; bridges.len()];
    paths[root] = Some(RootPath { cost: 0, upstream: None, upstream_port: None, port: None });

    let mut queue: VecDeque<BridgeIndex> = VecDeque::new();
    queue.push_back(BridgeIndex::new(root));

    while let Some(u) = queue.pop_front() {
        let cost_u = match paths[u.index()] {
            Some(p) => p.cost,
            None => continue,
        };
        let id_u = bridges[u.index()].id;
        for edge in graph.edges(u) {
            let v = edge.target().index();
            if v == root {
                continue;
            }
            let candidate = RootPath {
                cost: cost_u.saturating_add(edge.weight().cost),
                upstream: Some(id_u),
                upstream_port: Some(edge.weight().local_port),
                port: Some(edge.weight().remote_port),
            };
            let better = match paths[v] {
                None => true,
                Some(old) => candidate.key() < old.key(),
            };
            if better {
                trace!(
                    "{} reaches the root over {} with cost {}",
                    bridges[v].hostname,
                    bridges[u.index()].hostname,
                    candidate.cost
                );
                paths[v] = Some(candidate);
                queue.push_back(edge.target());
            }
        }
    }

    paths
        .into_iter()
        .zip(bridges.iter())
        .map(|(p, b)| {
            p.ok_or_else(|| StpError::Unreachable {
                hostname: b.hostname.to_string(),
                root: bridges[root].hostname.to_string(),
            })
        })
        .collect()
}

/// # Spanning-tree state of a switch
/// Result of [`compute_stp_roles`] for a single switch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SwitchStpResult {
    /// Hostname of the switch
    pub hostname: String,
    /// VLAN of the spanning-tree instance
    pub vlan_id: u16,
    /// Bridge priority (after applying the override)
    pub bridge_priority: u32,
    /// MAC address of the switch
    pub bridge_mac: MacAddress,
    /// MAC address of the root bridge
    pub root_mac: MacAddress,
    /// True if the switch is the root bridge
    #[cfg_attr(feature = "serde", serde(rename = "isRoot"))]
    pub is_root: bool,
    /// Cost of the path to the root bridge
    #[cfg_attr(feature = "serde", serde(rename = "rootPathCost"))]
    pub root_path_cost: u32,
    /// Interface towards the root bridge. `None` for the root bridge.
    #[cfg_attr(feature = "serde", serde(rename = "rootPort"))]
    pub root_port: Option<String>,
    /// All ports of the switch in the VLAN
    #[cfg_attr(feature = "serde", serde(rename = "stp_interfaces"))]
    pub ports: Vec<PortResult>,
}

impl SwitchStpResult {
    /// Bridge ID of the switch
    pub fn bridge_id(&self) -> BridgeId {
        BridgeId { priority: self.bridge_priority, mac: self.bridge_mac }
    }

    /// Returns the port with the given interface name
    pub fn port(&self, interface: &str) -> Option<&PortResult> {
        self.ports.iter().find(|p| p.interface == interface)
    }

    /// Iterate over all ports with the given role
    pub fn ports_with_role(&self, role: PortRole) -> impl Iterator<Item = &PortResult> {
        self.ports.iter().filter(move |p| p.role == role)
    }
}

/// Spanning-tree state of a port
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PortResult {
    /// Interface name
    pub interface: String,
    /// Port cost
    pub cost: u32,
    /// Identifier of the segment the port is attached to
    pub link_id: String,
    /// Role of the port
    #[cfg_attr(feature = "serde", serde(rename = "interface_role"))]
    pub role: PortRole,
    /// True if this is the root port of the switch
    pub is_root_port: bool,
}
