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

//! # Topology
//!
//! Input model of a routing scenario: links between routers as entered in the lab front end
//! ([`LinkInput`]), their validation ([`validate_link`]), and the [`Adjacency`] model derived from
//! the validated [`Link`]s.

pub mod adjacency;
pub mod link;
pub mod subnet;
pub(crate) mod types;
pub mod validator;

pub use adjacency::{Adjacency, AdjacencyEntry};
pub use link::{Link, LinkInput};
pub use subnet::SubnetInfo;
pub use types::{Hostname, LinkErrors, Protocol, ValidationError};
pub use validator::validate_link;
