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

//! Module containing the error and warning types of the routing simulation

use crate::topology::LinkErrors;

use itertools::Itertools;
use thiserror::Error;

/// Maximum number of propagation passes, after which the simulation stops, even if the tables
/// still change.
pub const MAX_ITERATIONS: usize = 100;

/// Routing simulation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// At least one link of the input is invalid. No simulation state was built.
    #[error("Invalid topology: {}", .0.iter().join("; "))]
    InvalidTopology(Vec<LinkErrors>),
}

/// The routing tables did not reach a fixed point within [`MAX_ITERATIONS`] passes. The tables
/// of the last pass are still returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Maximum iterations reached ({iterations}). Possible routing loop.")]
pub struct ConvergenceWarning {
    /// Number of propagation passes performed
    pub iterations: usize,
}
