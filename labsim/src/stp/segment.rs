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

//! # Topology Segmentation
//!
//! Groups the ports of all bridges into segments (shared media). The segment of a port is
//! identified by a link identifier, which is resolved in the following order:
//!
//! 1. the explicit `link_id` of the port, if it is set and not empty,
//! 2. the identifier derived from LLDP (see [`LldpMapping`]),
//! 3. the interface name without its leading letters (see [`fallback_link_id`]).
//!
//! The last rule is a heuristic. Two unrelated ports with the same interface numbering (e.g.
//! `Gi1/0/5` on two switches which are not connected) end up in the same segment.

use crate::stp::switch::{Port, Switch};

use itertools::Itertools;
use log::*;
use petgraph::prelude::*;
use std::collections::HashMap;

/// Index of a bridge in the graph, equal to its position in the list of bridges of the VLAN.
pub type BridgeIndex = NodeIndex<u32>;
/// Directed graph between bridges. There is an edge in both directions for every pair of ports
/// sharing a segment.
pub type BridgeGraph = Graph<(), BridgeEdge, Directed, u32>;

/// Edge `u -> v` of the [`BridgeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeEdge {
    /// Index of the segment in [`Segmentation::segments`]
    pub segment: usize,
    /// Cost of the port of `u`. Reaching `v` over this edge adds this cost to the root path cost
    /// of `u`.
    pub cost: u32,
    /// Port index of `u`
    pub local_port: usize,
    /// Port index of `v`
    pub remote_port: usize,
}

/// # LLDP Mapping
/// Maps every `(hostname, interface)` seen in an LLDP neighbor table to the identifier of its
/// link, `"<h1>_<i1>_<h2>_<i2>"`, where the two endpoints are sorted. Both endpoints of a link get
/// the same identifier, even if only one of the two switches reports the neighbor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LldpMapping {
    links: HashMap<(String, String), String>,
}

impl LldpMapping {
    /// Build the mapping from the neighbor tables of all switches (of every VLAN). Neighbor
    /// entries with an empty field are ignored.
    pub fn build(switches: &[Switch]) -> Self {
        let mut links = HashMap::new();
        for switch in switches {
            let hostname = switch.hostname.trim();
            for neighbor in switch.lldp_neighbors.iter() {
                let local = neighbor.local_interface.trim();
                let remote_device = neighbor.remote_device.trim();
                let remote = neighbor.remote_interface.trim();
                if [hostname, local, remote_device, remote].iter().any(|s| s.is_empty()) {
                    continue;
                }
                let ep1 = (hostname.to_string(), local.to_string());
                let ep2 = (remote_device.to_string(), remote.to_string());
                let (first, second) = if ep1 <= ep2 { (&ep1, &ep2) } else { (&ep2, &ep1) };
                let link_id = format!("{}_{}_{}_{}", first.0, first.1, second.0, second.1);
                links.insert(ep1, link_id.clone());
                links.insert(ep2, link_id);
            }
        }
        Self { links }
    }

    /// Returns the link identifier of an interface, if LLDP knows about it.
    pub fn get(&self, hostname: &str, interface: &str) -> Option<&str> {
        self.links.get(&(hostname.to_string(), interface.to_string())).map(|s| s.as_str())
    }

    /// Number of interfaces in the mapping
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no interface is known
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Link identifier derived from the interface name only, by removing all leading ASCII letters:
/// `GigabitEthernet1/0/5` becomes `1/0/5`.
pub fn fallback_link_id(interface: &str) -> String {
    interface.trim_start_matches(|c: char| c.is_ascii_alphabetic()).to_string()
}

/// Resolve the link identifier of a port.
pub fn resolve_link_id(hostname: &str, port: &Port, lldp: &LldpMapping) -> String {
    if let Some(id) = port.explicit_link_id() {
        id.to_string()
    } else if let Some(id) = lldp.get(hostname, &port.interface) {
        id.to_string()
    } else {
        fallback_link_id(&port.interface)
    }
}

/// Port of a bridge attached to a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member {
    /// Index of the bridge
    pub bridge: usize,
    /// Index of the port on the bridge
    pub port: usize,
    /// Cost of the port
    pub cost: u32,
}

/// Shared medium. A segment with at least two members models a link between all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Resolved link identifier
    pub link_id: String,
    /// Ports attached to the segment, in the order in which they were seen
    pub members: Vec<Member>,
}

impl Segment {
    /// Returns true if the segment has only one member, i.e., no neighbor is visible on it.
    pub fn is_stub(&self) -> bool {
        self.members.len() < 2
    }
}

/// # Segmentation
/// All segments of a VLAN, in the order in which their link identifiers were first seen, and the
/// segment of every port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    segments: Vec<Segment>,
    port_segments: Vec<Vec<usize>>,
}

impl Segmentation {
    /// Group the ports of the bridges into segments. Each bridge is given by its hostname and
    /// its ports; bridges and ports are referred to by their position in the input.
    pub fn build<'a, I>(bridges: I, lldp: &LldpMapping) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Port])>,
    {
        let mut segments: Vec<Segment> = Vec::new();
        let mut lut: HashMap<String, usize> = HashMap::new();
        let mut port_segments: Vec<Vec<usize>> = Vec::new();

        for (bridge, (hostname, ports)) in bridges.into_iter().enumerate() {
            let mut bridge_segments = Vec::with_capacity(ports.len());
            for (port_idx, port) in ports.iter().enumerate() {
                let link_id = resolve_link_id(hostname, port, lldp);
                trace!("{} {} is on segment {}", hostname, port.interface, link_id);
                let segment = *lut.entry(link_id.clone()).or_insert_with(|| {
                    segments.push(Segment { link_id, members: Vec::new() });
                    segments.len() - 1
                });
                segments[segment].members.push(Member { bridge, port: port_idx, cost: port.cost });
                bridge_segments.push(segment);
            }
            port_segments.push(bridge_segments);
        }

        Self { segments, port_segments }
    }

    /// All segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the segment of a port
    pub fn segment_of(&self, bridge: usize, port: usize) -> Option<&Segment> {
        self.port_segments.get(bridge).and_then(|s| s.get(port)).map(|s| &self.segments[*s])
    }

    /// Build the directed bridge graph. Node `i` is the bridge at position `i`. For every pair of
    /// members `(u, v)` of a segment, there is an edge `u -> v` carrying the cost of `u`'s port,
    /// and an edge `v -> u` carrying the cost of `v`'s port. Two ports of the same bridge on one
    /// segment do not create an edge.
    pub fn bridge_graph(&self, num_bridges: usize) -> BridgeGraph {
        let mut g = BridgeGraph::with_capacity(num_bridges, 0);
        for _ in 0..num_bridges {
            g.add_node(());
        }
        for (segment, s) in self.segments.iter().enumerate() {
            for (u, v) in s.members.iter().tuple_combinations() {
                if u.bridge == v.bridge {
                    continue;
                }
                g.add_edge(
                    BridgeIndex::new(u.bridge),
                    BridgeIndex::new(v.bridge),
                    BridgeEdge { segment, cost: u.cost, local_port: u.port, remote_port: v.port },
                );
                g.add_edge(
                    BridgeIndex::new(v.bridge),
                    BridgeIndex::new(u.bridge),
                    BridgeEdge { segment, cost: v.cost, local_port: v.port, remote_port: u.port },
                );
            }
        }
        g
    }
}
