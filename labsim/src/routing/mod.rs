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

//! # Routing
//!
//! Simulation of the steady state of the routing tables in a topology of point-to-point links.
//! Every link runs one protocol (`None`, `Static`, `RIP` or `OSPF`). The simulation reproduces
//!
//! - administrative distance precedence (Connected 0, Static 1, OSPF 110, RIP 120),
//! - hop-count metrics, accumulated by one per traversed link,
//! - equal-cost multi-path for OSPF and RIP, and
//! - redistribution boundaries: a connected subnet is only advertised into the protocol that runs
//!   on its own link, and routes of one protocol never leak into another one.
//!
//! The main entry point is [`compute_routing_tables`].

pub mod printer;
mod route;
mod simulation;
mod table;
mod types;

pub use route::{NextHop, RouteEntry};
pub use simulation::{compute_routing_tables, RoutingSimulation, RoutingTables};
pub use table::RoutingTable;
pub use types::{ConvergenceWarning, RoutingError, MAX_ITERATIONS};
