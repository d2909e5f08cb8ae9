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

//! # Topology Validator
//!
//! Checks a single [`LinkInput`] before it enters the simulation. All problems of a link are
//! collected and reported together, such that the user can fix every one of them at once. The
//! checks are performed in the following order:
//!
//! 1. all required fields are present,
//! 2. both addresses are valid IPv4 addresses,
//! 3. the prefix length is a number between 0 and 32,
//! 4. the protocol is one of `None`, `Static`, `RIP` or `OSPF`,
//! 5. the two addresses are different,
//! 6. no address is the network address or the broadcast address of its subnet (the broadcast
//!    check is skipped for `/31` and `/32`),
//! 7. both addresses are part of the same subnet.
//!
//! A check that requires a parsed value is skipped if that value could not be parsed.

use crate::topology::link::{Link, LinkInput};
use crate::topology::subnet::{is_point_to_point, network_of, parse_address, parse_prefix_len};
use crate::topology::types::{Protocol, ValidationError};

use itertools::Itertools;
use log::*;
use std::net::Ipv4Addr;

/// Validate a link, returning all problems found. An empty vector means that the link is valid.
///
/// ```rust
/// # use labsim::topology::{validate_link, LinkInput, ValidationError};
/// let link = LinkInput::between(
///     ("R1", "Gi0/0", "10.0.0.1"),
///     ("R2", "Gi0/0", "10.0.0.6"),
///     30,
///     "OSPF",
/// );
/// let errors = validate_link(&link);
/// assert_eq!(errors.len(), 1);
/// assert!(matches!(errors[0], ValidationError::DifferentSubnets { .. }));
/// ```
pub fn validate_link(link: &LinkInput) -> Vec<ValidationError> {
    check_link(link).err().unwrap_or_default()
}

/// Validate a link and build the [`Link`] from it.
pub(crate) fn check_link(link: &LinkInput) -> Result<Link, Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();

    // 1. required fields
    let host_a = required(&link.host_a, "hostname1", &mut errors);
    let host_b = required(&link.host_b, "hostname2", &mut errors);
    let ip_a = required(&link.ip_a, "ip1", &mut errors);
    let ip_b = required(&link.ip_b, "ip2", &mut errors);
    let interface_a = required(&link.interface_a, "interface1", &mut errors);
    let interface_b = required(&link.interface_b, "interface2", &mut errors);
    let prefix_len = required(&link.prefix_len, "subnet", &mut errors);
    let protocol = required(&link.protocol, "protocol", &mut errors);

    // 2. addresses
    let ip_a = ip_a.and_then(|s| collect(parse_address(s), &mut errors));
    let ip_b = ip_b.and_then(|s| collect(parse_address(s), &mut errors));

    // 3. prefix length
    let prefix_len = prefix_len.and_then(|s| collect(parse_prefix_len(s), &mut errors));

    // 4. protocol
    let protocol = protocol.and_then(|s| collect(parse_link_protocol(s), &mut errors));

    // 5. - 7. addressing
    let subnet = match (ip_a, ip_b, prefix_len) {
        (Some(a), Some(b), Some(len)) => check_addressing(a, b, len, &mut errors),
        _ => None,
    };

    match (host_a, host_b, ip_a, ip_b, interface_a, interface_b, subnet, protocol) {
        (
            Some(host_a),
            Some(host_b),
            Some(ip_a),
            Some(ip_b),
            Some(interface_a),
            Some(interface_b),
            Some(subnet),
            Some(protocol),
        ) if errors.is_empty() => Ok(Link {
            host_a: host_a.to_string(),
            host_b: host_b.to_string(),
            ip_a,
            ip_b,
            interface_a: interface_a.to_string(),
            interface_b: interface_b.to_string(),
            subnet,
            protocol,
        }),
        _ => {
            debug!(
                "Link {} -> {} is invalid: {}",
                link.host_a.as_deref().unwrap_or("?"),
                link.host_b.as_deref().unwrap_or("?"),
                errors.iter().join(", ")
            );
            Err(errors)
        }
    }
}

/// Checks 5 to 7. Returns the subnet of the link, if both addresses are part of it.
fn check_addressing(
    a: Ipv4Addr,
    b: Ipv4Addr,
    prefix_len: u8,
    errors: &mut Vec<ValidationError>,
) -> Option<ipnet::Ipv4Net> {
    if a == b {
        errors.push(ValidationError::IdenticalAddresses(a));
    }

    let net_a = collect(network_of(a, prefix_len), errors)?;
    let net_b = collect(network_of(b, prefix_len), errors)?;

    for (addr, net) in [(a, net_a), (b, net_b)].iter().unique() {
        if *addr == net.network() {
            errors.push(ValidationError::NetworkAddress { addr: *addr, net: *net });
        } else if !is_point_to_point(prefix_len) && *addr == net.broadcast() {
            errors.push(ValidationError::BroadcastAddress { addr: *addr, net: *net });
        }
    }

    // compare both the network address and the mask
    if net_a.network() != net_b.network() || net_a.netmask() != net_b.netmask() {
        errors.push(ValidationError::DifferentSubnets { a, b, prefix_len });
        None
    } else {
        Some(net_a)
    }
}

fn parse_link_protocol(s: &str) -> Result<Protocol, ValidationError> {
    match s.parse::<Protocol>()? {
        p if p.is_link_protocol() => Ok(p),
        _ => Err(ValidationError::InvalidProtocol(s.to_string())),
    }
}

/// Returns the trimmed value of the field, or pushes `MissingField` if it is absent or empty.
fn required<'a>(
    field: &'a Option<String>,
    name: &'static str,
    errors: &mut Vec<ValidationError>,
) -> Option<&'a str> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            errors.push(ValidationError::MissingField(name));
            None
        }
    }
}

fn collect<T>(result: Result<T, ValidationError>, errors: &mut Vec<ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}
