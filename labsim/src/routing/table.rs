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

//! Module defining the routing table of a single router.

use crate::routing::route::RouteEntry;
use crate::topology::Protocol;

use ipnet::Ipv4Net;
use itertools::Itertools;
use log::*;
use std::cmp::Ordering;

/// # Routing Table
/// Set of routes of a single router. The order in which routes are stored has no meaning; two
/// tables are equal if they contain the same routes.
///
/// Routes are inserted with [`RoutingTable::add_route`], which keeps the following invariant for
/// every subnet: only routes sharing the best administrative distance are kept, and among those,
/// only the routes with the best metric. Multiple routes with equal administrative distance and
/// equal metric are only kept in parallel if the protocol supports ECMP (OSPF and RIP).
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: Vec<RouteEntry>,
}

impl RoutingTable {
    /// Create an empty routing table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route, respecting the precedence rules:
    ///
    /// - A route identical to an existing one is ignored.
    /// - Connected routes are always added, and they are never replaced.
    /// - If the route has a lower administrative distance than all existing routes to the same
    ///   subnet, it replaces them.
    /// - If the administrative distance is equal to the best one, and the metric is lower than
    ///   the best metric, the route replaces all existing routes to this subnet. If the metric is
    ///   equal, and the protocol supports ECMP, the route is added in parallel.
    /// - Otherwise, the route is dropped.
    ///
    /// Returns `true` if the table was changed.
    pub fn add_route(&mut self, route: RouteEntry) -> bool {
        if self.routes.contains(&route) {
            return false;
        }

        if route.protocol() == Protocol::Connected {
            trace!("add connected route {}", route);
            self.routes.push(route);
            return true;
        }

        let subnet = route.subnet();
        let best_ad = self.routes_to(subnet).map(|r| r.administrative_distance()).min();

        match best_ad.map(|ad| route.administrative_distance().cmp(&ad)) {
            None | Some(Ordering::Less) => {
                trace!("install route {}", route);
                self.replace(route);
                true
            }
            Some(Ordering::Equal) => {
                let best_metric = self
                    .routes_to(subnet)
                    .filter(|r| r.administrative_distance() == route.administrative_distance())
                    .map(|r| r.metric())
                    .min()
                    .unwrap_or(u32::MAX);
                match route.metric().cmp(&best_metric) {
                    Ordering::Less => {
                        trace!("replace with better route {}", route);
                        self.replace(route);
                        true
                    }
                    Ordering::Equal if route.protocol().is_ecmp_capable() => {
                        trace!("add ECMP route {}", route);
                        self.routes.push(route);
                        true
                    }
                    _ => false,
                }
            }
            Some(Ordering::Greater) => false,
        }
    }

    /// Iterate over all routes, in no particular order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry> {
        self.routes.iter()
    }

    /// All routes to the given subnet
    pub fn routes_to(&self, subnet: Ipv4Net) -> impl Iterator<Item = &RouteEntry> {
        let subnet = subnet.trunc();
        self.routes.iter().filter(move |r| r.subnet() == subnet)
    }

    /// All routes installed by the given protocol
    pub fn routes_by(&self, protocol: Protocol) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter().filter(move |r| r.protocol() == protocol)
    }

    /// Returns true if the table contains a route to `subnet`.
    pub fn contains_subnet(&self, subnet: Ipv4Net) -> bool {
        self.routes_to(subnet).next().is_some()
    }

    /// All subnets known in the table, in ascending order.
    pub fn subnets(&self) -> Vec<Ipv4Net> {
        self.routes.iter().map(|r| r.subnet()).sorted().dedup().collect()
    }

    /// Number of routes in the table
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if there are no routes in the table
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Canonical representation of the table: all routes, sorted by subnet, protocol, metric,
    /// next hop, and outgoing interface.
    pub fn snapshot(&self) -> Vec<RouteEntry> {
        self.routes.iter().sorted_by(|a, b| a.sort_key().cmp(&b.sort_key())).cloned().collect()
    }

    /// Remove all non-connected routes to the same subnet, and add the new route.
    fn replace(&mut self, route: RouteEntry) {
        let subnet = route.subnet();
        self.routes.retain(|r| r.subnet() != subnet || r.protocol() == Protocol::Connected);
        self.routes.push(route);
    }
}

impl PartialEq for RoutingTable {
    fn eq(&self, other: &Self) -> bool {
        self.routes.len() == other.routes.len() && self.snapshot() == other.snapshot()
    }
}

impl Eq for RoutingTable {}

impl From<RoutingTable> for Vec<RouteEntry> {
    fn from(table: RoutingTable) -> Self {
        table.snapshot()
    }
}

impl<'a> IntoIterator for &'a RoutingTable {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RoutingTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.snapshot())
    }
}
