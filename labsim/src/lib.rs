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

#![deny(missing_docs)]

//! # Labsim: Routing and Spanning-Tree Verification for Network Labs
//! This is a library to compute what the routers and switches of a (small) network lab should
//! show after convergence, such that the actual state of the devices can be compared against it.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`Topology`](topology)**: Links between routers as they are entered in the lab front end,
//!   their [validation](topology::validate_link), and the [adjacency](topology::Adjacency) model
//!   derived from the validated links. Also contains a small [subnet
//!   calculator](topology::SubnetInfo).
//!
//! - **[`Routing`](routing)**: Routing convergence simulator. Every link runs one of the protocols
//!   `None`, `Static`, `RIP` or `OSPF`. The simulator propagates routes until the routing tables
//!   no longer change, respecting administrative distance, hop-count metrics, equal-cost
//!   multi-path and redistribution boundaries. See [`compute_routing_tables`].
//!
//! - **[`STP`](stp)**: Spanning-tree role calculator. Given the switches with their bridge
//!   priority, MAC address and port costs, it elects the root bridge and assigns the role of every
//!   port (root, designated or alternate). See [`compute_stp_roles`].
//!
//! - **[`Scenario`](scenario)**: Reading links and switches from JSON files, as exported by the
//!   front end (only with the feature `serde`).
//!
//! ## Features
//!
//! - *`serde`*: All input and output structures implement `Serialize` (and the input structures
//!   `Deserialize`), and the [`scenario`] module is available.
//!
//! ## Usage
//!
//! ```
//! use labsim::topology::LinkInput;
//! use labsim::routing::printer;
//! use labsim::{compute_routing_tables, Error};
//!
//! fn main() -> Result<(), Error> {
//!     let links = vec![
//!         LinkInput::between(("R1", "Gi0/0", "10.0.0.1"), ("R2", "Gi0/0", "10.0.0.2"), 30, "RIP"),
//!         LinkInput::between(("R2", "Gi0/1", "10.0.1.1"), ("R3", "Gi0/0", "10.0.1.2"), 30, "RIP"),
//!     ];
//!
//!     let tables = compute_routing_tables(&links)?;
//!
//!     // Do something with the result
//!     println!("{}", printer::routing_tables(&tables));
//!
//!     Ok(())
//! }
//! ```

mod error;
pub mod routing;
#[cfg(feature = "serde")]
pub mod scenario;
pub mod stp;
mod test;
pub mod topology;

pub use error::Error;
pub use routing::compute_routing_tables;
pub use stp::compute_stp_roles;
