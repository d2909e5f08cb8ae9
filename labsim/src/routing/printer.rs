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

//! # Helper (printer) functions for routing tables
//! Module containing helper functions to get routing tables formatted like the output of the
//! IOS command `show ip route`, to compare them against the output of the devices by hand.

use crate::routing::route::{NextHop, RouteEntry};
use crate::routing::simulation::RoutingTables;
use crate::routing::table::RoutingTable;

/// Returns the formatted string of a single route, e.g.:
///
/// ```text
/// C    10.0.0.0/30 is directly connected, GigabitEthernet0/0
/// O    10.0.1.0/30 [110/2] via 10.0.0.2, GigabitEthernet0/0
/// ```
pub fn route(route: &RouteEntry) -> String {
    match route.next_hop() {
        NextHop::Directly => format!(
            "{:<5}{} is directly connected, {}",
            route.protocol().code(),
            route.subnet(),
            route.interface()
        ),
        NextHop::Via(ip) => format!(
            "{:<5}{} [{}/{}] via {}, {}",
            route.protocol().code(),
            route.subnet(),
            route.administrative_distance(),
            route.metric(),
            ip,
            route.interface()
        ),
    }
}

/// Get a vector of strings, one for each route of the table, in canonical order.
pub fn routing_table(table: &RoutingTable) -> Vec<String> {
    table.snapshot().iter().map(route).collect()
}

/// Returns the routing tables of all routers as a single string. The table of every router is
/// preceded by its hostname.
pub fn routing_tables(tables: &RoutingTables) -> String {
    let mut result = String::new();
    for (host, table) in tables.iter() {
        result.push_str(&format!("{}:\n", host));
        for line in routing_table(table) {
            result.push_str("    ");
            result.push_str(&line);
            result.push('\n');
        }
    }
    if let Some(warning) = tables.warning() {
        result.push_str(&format!("Warning: {}\n", warning));
    }
    result
}

/// Print the routing table of a router.
pub fn print_routing_table(host: &str, table: &RoutingTable) {
    println!("Routing table of {}", host);
    for line in routing_table(table) {
        println!("{}", line);
    }
}
