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

use crate::routing::printer;
use crate::routing::RouteEntry;
use crate::stp::printer::stp_result;
use crate::stp::{BridgeDetail, Switch};
use crate::topology::{LinkInput, Protocol};
use crate::{compute_routing_tables, compute_stp_roles};

#[test]
fn test_print_route() {
    let connected =
        RouteEntry::connected("10.0.0.0/30".parse().unwrap(), "Gi0/0", "R1-R2", Protocol::Ospf);
    assert_eq!(printer::route(&connected), "C    10.0.0.0/30 is directly connected, Gi0/0");

    let learned = RouteEntry::learned(
        "10.0.1.0/30".parse().unwrap(),
        Protocol::Rip,
        3,
        "Gi0/1",
        "10.0.0.2".parse().unwrap(),
        "R2-R3",
    );
    assert_eq!(printer::route(&learned), "R    10.0.1.0/30 [120/3] via 10.0.0.2, Gi0/1");
}

#[test]
fn test_print_routing_tables() {
    let links = vec![
        LinkInput::between(("R1", "Gi0/0", "10.0.0.1"), ("R2", "Gi0/0", "10.0.0.2"), 30, "OSPF"),
        LinkInput::between(("R2", "Gi0/1", "10.0.1.2"), ("R3", "Gi0/0", "10.0.1.1"), 30, "OSPF"),
    ];
    let tables = compute_routing_tables(&links).unwrap();

    assert_eq!(
        printer::routing_table(tables.get("R1").unwrap()),
        vec![
            "C    10.0.0.0/30 is directly connected, Gi0/0",
            "O    10.0.1.0/30 [110/2] via 10.0.0.2, Gi0/0",
        ]
    );

    let text = printer::routing_tables(&tables);
    assert!(text.starts_with("R1:\n    C    10.0.0.0/30 is directly connected, Gi0/0\n"));
    assert!(text.contains("R3:\n    O    10.0.0.0/30 [110/2] via 10.0.1.2, Gi0/0\n"));
    assert!(!text.contains("Warning"));
}

#[test]
fn test_print_stp() {
    let switches = vec![
        Switch::new("S1").with_vlan(
            1,
            BridgeDetail::new(4096, "0c11.0000.0001")
                .with_linked_port("Gi0/1", 4, "S1-S2")
                .with_linked_port("Gi0/2", 4, "S1-S3"),
        ),
        Switch::new("S2").with_vlan(
            1,
            BridgeDetail::new(32768, "0c11.0000.0002")
                .with_linked_port("Gi0/1", 4, "S1-S2")
                .with_linked_port("Gi0/2", 4, "S2-S3"),
        ),
        Switch::new("S3").with_vlan(
            1,
            BridgeDetail::new(32768, "0c11.0000.0003")
                .with_linked_port("Gi0/1", 4, "S1-S3")
                .with_linked_port("Gi0/2", 4, "S2-S3"),
        ),
    ];
    let results = compute_stp_roles(&switches, 1, None).unwrap();

    assert_eq!(
        stp_result(&results[0])[..2],
        [
            "S1 VLAN0001",
            "  Root ID    Priority 4096, Address 0c11.0000.0001, This bridge is the root",
        ]
    );
    assert_eq!(
        stp_result(&results[2]),
        vec![
            "S3 VLAN0001",
            "  Root ID    Address 0c11.0000.0001, Cost 4, Port Gi0/1",
            "  Bridge ID  Priority 32768, Address 0c11.0000.0003",
            "  Interface        Role Sts Cost  Link",
            "  Gi0/1            Root FWD 4     S1-S3",
            "  Gi0/2            Altn BLK 4     S2-S3",
        ]
    );
}
