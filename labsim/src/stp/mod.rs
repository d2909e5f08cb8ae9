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

//! # Spanning Tree
//!
//! Computes the converged 802.1D spanning tree of a single VLAN, from the state reported by the
//! switches ([`Switch`]). Ports are grouped into segments ([`segment`]), the root bridge is
//! elected, and every port is assigned its [`PortRole`]. Optionally, the bridge priority of one
//! switch can be replaced, to see how the tree changes.
//!
//! The main entry point is [`compute_stp_roles`].

mod calculator;
pub mod printer;
pub mod segment;
mod switch;
mod types;

pub use calculator::{compute_stp_roles, PortResult, SwitchStpResult};
pub use switch::{BridgeDetail, LldpNeighbor, Port, Switch, Vlan};
pub use types::{
    BridgeId, MacAddress, MacParseError, PortRole, PriorityOverride, StpError,
    DEFAULT_BRIDGE_PRIORITY,
};
