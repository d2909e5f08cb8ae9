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

//! # Adjacency Model
//!
//! Derives from a set of validated links which router is attached to which subnet, and how every
//! router reaches each of its neighbors. The model is built once per simulation and is read-only
//! afterwards.

use crate::routing::{RouteEntry, RoutingTable};
use crate::topology::link::Link;
use crate::topology::types::Hostname;

use ipnet::Ipv4Net;
use log::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::Ipv4Addr;

/// How a router reaches one of its neighbors
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdjacencyEntry {
    /// Local interface facing the neighbor
    pub local_interface: String,
    /// Address of the neighbor on the shared link
    pub peer_ip: Ipv4Addr,
}

/// # Adjacency Model
/// Neighbor records, directly connected subnets, and connected routes of every router in the
/// topology.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    /// router -> neighbor -> adjacency
    neighbors: HashMap<Hostname, HashMap<Hostname, AdjacencyEntry>>,
    /// router -> subnets of all attached links
    connected: HashMap<Hostname, HashSet<Ipv4Net>>,
    /// router -> connected routes, in the order of the links
    connected_routes: BTreeMap<Hostname, Vec<RouteEntry>>,
}

impl Adjacency {
    /// Build the adjacency model of a set of links.
    ///
    /// The endpoints of a link may be entered in swapped order. To find out which router owns
    /// which address, a map from every address to its hostname is built first, over all links.
    /// If this map says that the first address does not belong to the first host, then the
    /// addresses and interfaces of the link are swapped.
    pub fn from_links(links: &[Link]) -> Self {
        let mut owner: HashMap<Ipv4Addr, &str> = HashMap::new();
        for link in links {
            owner.insert(link.ip_a, &link.host_a);
            owner.insert(link.ip_b, &link.host_b);
        }

        let mut adj = Self::default();

        for link in links {
            let (host_a, host_b) = (link.host_a.as_str(), link.host_b.as_str());
            let (mut ip_a, mut ip_b) = (link.ip_a, link.ip_b);
            let (mut if_a, mut if_b) = (link.interface_a.as_str(), link.interface_b.as_str());

            if owner.get(&ip_a).copied() != Some(host_a) {
                trace!("Swap the endpoints of link {}", link.link_id());
                std::mem::swap(&mut ip_a, &mut ip_b);
                std::mem::swap(&mut if_a, &mut if_b);
            }

            let subnet = link.subnet();
            let link_id = link.link_id();

            for (host, interface) in [(host_a, if_a), (host_b, if_b)] {
                adj.add_connected_route(
                    host,
                    RouteEntry::connected(subnet, interface, &link_id, link.protocol),
                );
                adj.connected.entry(host.to_string()).or_default().insert(subnet);
            }

            adj.neighbors.entry(host_a.to_string()).or_default().insert(
                host_b.to_string(),
                AdjacencyEntry { local_interface: if_a.to_string(), peer_ip: ip_b },
            );
            adj.neighbors.entry(host_b.to_string()).or_default().insert(
                host_a.to_string(),
                AdjacencyEntry { local_interface: if_b.to_string(), peer_ip: ip_a },
            );
        }

        adj
    }

    /// Returns how `host` reaches its neighbor `neighbor`, or `None` if they are not adjacent.
    pub fn neighbor(&self, host: &str, neighbor: &str) -> Option<&AdjacencyEntry> {
        self.neighbors.get(host).and_then(|n| n.get(neighbor))
    }

    /// Returns all neighbors of `host`.
    pub fn neighbors(&self, host: &str) -> impl Iterator<Item = (&str, &AdjacencyEntry)> {
        self.neighbors.get(host).into_iter().flat_map(|n| n.iter().map(|(h, e)| (h.as_str(), e)))
    }

    /// Returns true if `host` is attached to `subnet`.
    pub fn is_directly_connected(&self, host: &str, subnet: &Ipv4Net) -> bool {
        self.connected.get(host).map(|s| s.contains(subnet)).unwrap_or(false)
    }

    /// Returns the set of subnets attached to `host`.
    pub fn connected_subnets(&self, host: &str) -> Option<&HashSet<Ipv4Net>> {
        self.connected.get(host)
    }

    /// Iterate over all routers of the topology, in alphabetical order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.connected_routes.keys().map(|h| h.as_str())
    }

    /// Create the initial routing tables, containing only the connected routes.
    pub fn seed_tables(&self) -> BTreeMap<Hostname, RoutingTable> {
        self.connected_routes
            .iter()
            .map(|(host, routes)| {
                let mut table = RoutingTable::new();
                routes.iter().cloned().for_each(|r| {
                    table.add_route(r);
                });
                (host.clone(), table)
            })
            .collect()
    }

    fn add_connected_route(&mut self, host: &str, route: RouteEntry) {
        let routes = self.connected_routes.entry(host.to_string()).or_default();
        if !routes.contains(&route) {
            routes.push(route);
        }
    }
}
