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

//! # Routing Convergence Simulator
//!
//! The simulation first seeds every routing table with the connected routes of the router (see
//! [`Adjacency`]). Then, it repeatedly passes over all links running OSPF or RIP, and propagates
//! routes in both directions of each link. After every full pass, the tables are compared to the
//! ones before the pass. The simulation stops as soon as a pass does not change anything (fixed
//! point), or after [`MAX_ITERATIONS`] passes.
//!
//! Propagating routes from `from` to `to` over a link running protocol `P` works as follows: every
//! route of `from` that is either learned by `P`, or a connected route tagged with `P`, is
//! advertised to `to`, unless `to` is itself attached to that subnet. The advertised route gets
//! the metric increased by one (a connected subnet is advertised with metric one, the cost of the
//! attached link), the outgoing interface of `to` towards `from`, the address of
//! `from` as next hop, and keeps the link identifier of the original route. `to` then applies the
//! precedence rules of [`RoutingTable::add_route`].
//!
//! Propagation is monotonic and idempotent. Hence, the order in which links are processed does not
//! change the fixed point, only the number of passes needed to reach it.

use crate::routing::route::RouteEntry;
use crate::routing::table::RoutingTable;
use crate::routing::types::{ConvergenceWarning, RoutingError, MAX_ITERATIONS};
use crate::topology::{Adjacency, Hostname, Link, LinkErrors, LinkInput, Protocol};

use log::*;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// Validate all links, and compute the converged routing table of every router.
///
/// If any link is invalid, [`RoutingError::InvalidTopology`] is returned, containing every
/// problem of every invalid link. If the tables do not converge within [`MAX_ITERATIONS`] passes,
/// the result is still returned, but [`RoutingTables::warning`] is set.
///
/// ```rust
/// use labsim::compute_routing_tables;
/// use labsim::topology::{LinkInput, Protocol};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let links = vec![
///     LinkInput::between(("R1", "Gi0/0", "10.0.0.1"), ("R2", "Gi0/0", "10.0.0.2"), 30, "OSPF"),
///     LinkInput::between(("R2", "Gi0/1", "10.0.1.2"), ("R3", "Gi0/0", "10.0.1.1"), 30, "OSPF"),
/// ];
///
/// let tables = compute_routing_tables(&links)?;
/// assert!(tables.warning().is_none());
///
/// let r1 = tables.get("R1").unwrap();
/// let route = r1.routes_to("10.0.1.0/30".parse()?).next().unwrap();
/// assert_eq!(route.protocol(), Protocol::Ospf);
/// assert_eq!(route.metric(), 2);
/// assert_eq!(route.next_hop().to_string(), "10.0.0.2");
/// # Ok(())
/// # }
/// ```
pub fn compute_routing_tables(links: &[LinkInput]) -> Result<RoutingTables, RoutingError> {
    let mut valid: Vec<Link> = Vec::with_capacity(links.len());
    let mut invalid: Vec<LinkErrors> = Vec::new();

    for (index, input) in links.iter().enumerate() {
        match Link::try_from(input) {
            Ok(link) => valid.push(link),
            Err(errors) => invalid.push(LinkErrors {
                index,
                host_a: input.host_a.clone(),
                host_b: input.host_b.clone(),
                errors,
            }),
        }
    }

    if !invalid.is_empty() {
        debug!("{} of {} links are invalid", invalid.len(), links.len());
        return Err(RoutingError::InvalidTopology(invalid));
    }

    Ok(RoutingSimulation::new(valid).converge())
}

/// # Routing Simulation
/// State of a single routing simulation: the links, the adjacency model derived from them, and
/// the current routing table of every router. Every simulation owns its state; nothing is shared
/// between two simulations.
#[derive(Debug, Clone)]
pub struct RoutingSimulation {
    links: Vec<Link>,
    adjacency: Adjacency,
    tables: BTreeMap<Hostname, RoutingTable>,
    iterations: usize,
}

impl RoutingSimulation {
    /// Prepare the simulation. The routing tables are seeded with all connected routes.
    pub fn new(links: Vec<Link>) -> Self {
        let adjacency = Adjacency::from_links(&links);
        let tables = adjacency.seed_tables();
        Self { links, adjacency, tables, iterations: 0 }
    }

    /// Perform a single propagation pass over all links. Returns `true` if any routing table has
    /// changed.
    pub fn step(&mut self) -> bool {
        let previous = self.tables.clone();

        for i in 0..self.links.len() {
            let protocol = self.links[i].protocol;
            if !protocol.is_dynamic() {
                continue;
            }
            let host_a = self.links[i].host_a.clone();
            let host_b = self.links[i].host_b.clone();
            self.propagate(&host_a, &host_b, protocol);
            self.propagate(&host_b, &host_a, protocol);
        }

        self.iterations += 1;
        previous != self.tables
    }

    /// Run propagation passes until a fixed point is reached, or until [`MAX_ITERATIONS`] passes
    /// are performed.
    pub fn converge(mut self) -> RoutingTables {
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            if !self.step() {
                converged = true;
                break;
            }
            debug!("Routing tables changed in pass {}", self.iterations);
        }

        if converged {
            info!("Routing tables converged after {} passes", self.iterations);
        } else {
            warn!(
                "Routing tables did not converge after {} passes. Possible routing loop.",
                self.iterations
            );
        }

        RoutingTables { tables: self.tables, iterations: self.iterations, converged }
    }

    /// Current routing tables
    pub fn tables(&self) -> &BTreeMap<Hostname, RoutingTable> {
        &self.tables
    }

    /// Adjacency model of the simulated topology
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Number of propagation passes performed so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Advertise all routes of `from` that belong to `protocol` to `to`.
    fn propagate(&mut self, from: &str, to: &str, protocol: Protocol) {
        let (interface, peer_ip): (&str, Ipv4Addr) = match self.adjacency.neighbor(to, from) {
            Some(e) => (&e.local_interface, e.peer_ip),
            None => return,
        };

        let candidates: Vec<RouteEntry> = match self.tables.get(from) {
            Some(table) => table
                .iter()
                .filter(|r| r.is_advertised_by(protocol))
                .filter(|r| !self.adjacency.is_directly_connected(to, &r.subnet()))
                .map(|r| {
                    RouteEntry::learned(
                        r.subnet(),
                        protocol,
                        r.advertised_metric().saturating_add(1),
                        interface,
                        peer_ip,
                        r.link_id(),
                    )
                })
                .collect(),
            None => return,
        };

        let table = self.tables.entry(to.to_string()).or_default();
        for route in candidates {
            table.add_route(route);
        }
    }
}

/// # Converged routing tables
/// Result of a routing simulation: the routing table of every router, and whether a fixed point
/// was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutingTables {
    tables: BTreeMap<Hostname, RoutingTable>,
    iterations: usize,
    converged: bool,
}

impl RoutingTables {
    /// Routing table of a router
    pub fn get(&self, host: &str) -> Option<&RoutingTable> {
        self.tables.get(host)
    }

    /// Iterate over all routers and their tables, ordered by hostname.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoutingTable)> {
        self.tables.iter().map(|(h, t)| (h.as_str(), t))
    }

    /// All routers, ordered by hostname
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|h| h.as_str())
    }

    /// Number of propagation passes performed
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns true if a fixed point was reached.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Returns the warning if the simulation stopped before reaching a fixed point.
    pub fn warning(&self) -> Option<ConvergenceWarning> {
        if self.converged {
            None
        } else {
            Some(ConvergenceWarning { iterations: self.iterations })
        }
    }

    /// Take the routing tables out of the result.
    pub fn into_tables(self) -> BTreeMap<Hostname, RoutingTable> {
        self.tables
    }
}
