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

//! Module containing all error types

use crate::routing::RoutingError;
use crate::stp::StpError;
use crate::topology::ValidationError;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error propagated from the routing simulation
    #[error("Routing Error: {0}")]
    RoutingError(#[from] RoutingError),
    /// Error propagated from the spanning-tree calculation
    #[error("STP Error: {0}")]
    StpError(#[from] StpError),
    /// A single link is invalid
    #[error("Validation Error: {0}")]
    ValidationError(#[from] ValidationError),
    /// The scenario file cannot be read
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// The scenario file is not valid JSON, or has the wrong structure
    #[cfg(feature = "serde")]
    #[error("Scenario Error: {0}")]
    ScenarioError(#[from] serde_json::Error),
}
