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

//! Module defining the links of a routing scenario, both as they are received from the lab front
//! end ([`LinkInput`]), and after validation ([`Link`]).

use crate::topology::types::{Hostname, Protocol, ValidationError};
use crate::topology::validator;

use ipnet::Ipv4Net;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// # Unvalidated link
/// Point-to-point link between two routers, as entered by the user. Every field is optional and
/// textual, since nothing is checked yet. Use [`Link::try_from`] or
/// [`validate_link`](crate::topology::validate_link) to check it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LinkInput {
    /// Hostname of the first endpoint
    #[cfg_attr(feature = "serde", serde(rename = "hostname1", default))]
    pub host_a: Option<String>,
    /// Hostname of the second endpoint
    #[cfg_attr(feature = "serde", serde(rename = "hostname2", default))]
    pub host_b: Option<String>,
    /// Address of the first endpoint
    #[cfg_attr(feature = "serde", serde(rename = "ip1", default))]
    pub ip_a: Option<String>,
    /// Address of the second endpoint
    #[cfg_attr(feature = "serde", serde(rename = "ip2", default))]
    pub ip_b: Option<String>,
    /// Interface of the first endpoint
    #[cfg_attr(feature = "serde", serde(rename = "interface1", default))]
    pub interface_a: Option<String>,
    /// Interface of the second endpoint
    #[cfg_attr(feature = "serde", serde(rename = "interface2", default))]
    pub interface_b: Option<String>,
    /// Prefix length of the subnet (e.g., `"30"`)
    #[cfg_attr(
        feature = "serde",
        serde(rename = "subnet", default, deserialize_with = "string_or_number")
    )]
    pub prefix_len: Option<String>,
    /// Routing protocol enabled on the link
    #[cfg_attr(feature = "serde", serde(default))]
    pub protocol: Option<String>,
}

impl LinkInput {
    /// Create a link with all fields present. Each endpoint is given as `(hostname, interface,
    /// address)`.
    ///
    /// ```rust
    /// # use labsim::topology::LinkInput;
    /// let link = LinkInput::between(
    ///     ("R1", "GigabitEthernet0/0", "10.0.0.1"),
    ///     ("R2", "GigabitEthernet0/0", "10.0.0.2"),
    ///     30,
    ///     "OSPF",
    /// );
    /// assert_eq!(link.prefix_len.as_deref(), Some("30"));
    /// ```
    pub fn between(
        a: (&str, &str, &str),
        b: (&str, &str, &str),
        prefix_len: impl ToString,
        protocol: impl ToString,
    ) -> Self {
        Self {
            host_a: Some(a.0.to_string()),
            host_b: Some(b.0.to_string()),
            interface_a: Some(a.1.to_string()),
            interface_b: Some(b.1.to_string()),
            ip_a: Some(a.2.to_string()),
            ip_b: Some(b.2.to_string()),
            prefix_len: Some(prefix_len.to_string()),
            protocol: Some(protocol.to_string()),
        }
    }
}

/// The front end sends the prefix length sometimes as a string, and sometimes as a number.
#[cfg(feature = "serde")]
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// # Validated link
/// Point-to-point link between two routers. A `Link` can only be created by validating a
/// [`LinkInput`], which guarantees that both addresses are distinct host addresses of the same
/// subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub(crate) host_a: Hostname,
    pub(crate) host_b: Hostname,
    pub(crate) ip_a: Ipv4Addr,
    pub(crate) ip_b: Ipv4Addr,
    pub(crate) interface_a: String,
    pub(crate) interface_b: String,
    pub(crate) subnet: Ipv4Net,
    pub(crate) protocol: Protocol,
}

impl Link {
    /// Hostname of the first endpoint
    pub fn host_a(&self) -> &str {
        &self.host_a
    }

    /// Hostname of the second endpoint
    pub fn host_b(&self) -> &str {
        &self.host_b
    }

    /// Address of the first endpoint
    pub fn ip_a(&self) -> Ipv4Addr {
        self.ip_a
    }

    /// Address of the second endpoint
    pub fn ip_b(&self) -> Ipv4Addr {
        self.ip_b
    }

    /// Interface of the first endpoint
    pub fn interface_a(&self) -> &str {
        &self.interface_a
    }

    /// Interface of the second endpoint
    pub fn interface_b(&self) -> &str {
        &self.interface_b
    }

    /// Prefix length of the link subnet
    pub fn prefix_len(&self) -> u8 {
        self.subnet.prefix_len()
    }

    /// Protocol enabled on the link
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Subnet of the link (with all host bits cleared)
    pub fn subnet(&self) -> Ipv4Net {
        self.subnet
    }

    /// Identifier of the link, used to label all routes that originate from it. It always keeps
    /// the order of the input: `"<host_a>-<host_b>"`.
    pub fn link_id(&self) -> String {
        format!("{}-{}", self.host_a, self.host_b)
    }
}

impl TryFrom<&LinkInput> for Link {
    type Error = Vec<ValidationError>;

    fn try_from(input: &LinkInput) -> Result<Self, Self::Error> {
        validator::check_link(input)
    }
}

impl TryFrom<LinkInput> for Link {
    type Error = Vec<ValidationError>;

    fn try_from(input: LinkInput) -> Result<Self, Self::Error> {
        validator::check_link(&input)
    }
}
