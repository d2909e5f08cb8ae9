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

use crate::compute_routing_tables;
use crate::routing::*;
use crate::topology::*;
use ipnet::Ipv4Net;
use maplit::hashset;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

fn net(s: &str) -> Ipv4Net {
    s.parse().unwrap()
}

fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

fn link(a: (&str, &str, &str), b: (&str, &str, &str), protocol: &str) -> LinkInput {
    LinkInput::between(a, b, 30, protocol)
}

/// R1 -- R2 -- R3, all links running the same protocol
fn three_routers(protocol: &str) -> Vec<LinkInput> {
    vec![
        link(("R1", "Gi0/0", "10.0.0.1"), ("R2", "Gi0/0", "10.0.0.2"), protocol),
        link(("R2", "Gi0/1", "10.0.1.2"), ("R3", "Gi0/0", "10.0.1.1"), protocol),
    ]
}

/// Square R1 - R2 - R4 - R3 - R1, and R5 attached to R4. All links run OSPF.
fn ecmp_square() -> Vec<LinkInput> {
    vec![
        link(("R1", "Gi0/0", "10.0.12.1"), ("R2", "Gi0/0", "10.0.12.2"), "OSPF"),
        link(("R1", "Gi0/1", "10.0.13.1"), ("R3", "Gi0/0", "10.0.13.2"), "OSPF"),
        link(("R2", "Gi0/1", "10.0.24.1"), ("R4", "Gi0/0", "10.0.24.2"), "OSPF"),
        link(("R3", "Gi0/1", "10.0.34.1"), ("R4", "Gi0/1", "10.0.34.2"), "OSPF"),
        link(("R4", "Gi0/2", "10.0.45.1"), ("R5", "Gi0/0", "10.0.45.2"), "OSPF"),
    ]
}

/// Chain of `n` routers, `R000 -- R001 -- ...`, all links running OSPF.
fn chain(n: u32) -> Vec<LinkInput> {
    (0..n - 1)
        .map(|i| {
            let base = u32::from(ip("10.0.0.0")) + 4 * i;
            link(
                (&format!("R{:03}", i), "Gi0/1", &Ipv4Addr::from(base + 1).to_string()),
                (&format!("R{:03}", i + 1), "Gi0/0", &Ipv4Addr::from(base + 2).to_string()),
                "OSPF",
            )
        })
        .collect()
}

fn validated(links: &[LinkInput]) -> Vec<Link> {
    links.iter().map(|l| Link::try_from(l).unwrap()).collect()
}

#[test]
fn test_table_precedence() {
    let mut t = RoutingTable::new();
    let connected = RouteEntry::connected(net("10.0.0.0/30"), "Gi0/0", "R1-R2", Protocol::Ospf);
    assert!(t.add_route(connected.clone()));
    assert!(!t.add_route(connected));

    // a learned route never outranks the connected one
    let learned =
        RouteEntry::learned(net("10.0.0.0/30"), Protocol::Ospf, 2, "Gi0/1", ip("10.0.9.2"), "R1-R2");
    assert!(!t.add_route(learned));
    assert_eq!(t.routes_to(net("10.0.0.0/30")).count(), 1);

    let dest = net("10.0.1.0/30");
    let ospf = RouteEntry::learned(dest, Protocol::Ospf, 5, "Gi0/0", ip("10.0.0.2"), "R2-R3");
    let rip = RouteEntry::learned(dest, Protocol::Rip, 1, "Gi0/0", ip("10.0.0.2"), "R2-R3");
    let stat = RouteEntry::learned(dest, Protocol::Static, 9, "Gi0/0", ip("10.0.0.2"), "R2-R3");

    assert!(t.add_route(ospf));
    // lower metric does not matter with a worse administrative distance
    assert!(!t.add_route(rip));
    assert_eq!(t.routes_to(dest).next().unwrap().protocol(), Protocol::Ospf);
    assert!(t.add_route(stat));
    assert_eq!(t.routes_to(dest).count(), 1);
    assert_eq!(t.routes_to(dest).next().unwrap().protocol(), Protocol::Static);
    assert_eq!(t.len(), 2);
}

#[test]
fn test_table_ecmp() {
    let dest = net("10.1.0.0/24");
    let mut t = RoutingTable::new();
    assert!(t.add_route(RouteEntry::learned(dest, Protocol::Ospf, 2, "Gi0/0", ip("10.0.0.2"), "X")));
    assert!(t.add_route(RouteEntry::learned(dest, Protocol::Ospf, 2, "Gi0/1", ip("10.0.1.2"), "X")));
    assert!(!t.add_route(RouteEntry::learned(dest, Protocol::Ospf, 3, "Gi0/2", ip("10.0.2.2"), "X")));
    assert_eq!(t.routes_to(dest).count(), 2);

    // a better metric replaces both
    assert!(t.add_route(RouteEntry::learned(dest, Protocol::Ospf, 1, "Gi0/2", ip("10.0.2.2"), "X")));
    assert_eq!(t.routes_to(dest).count(), 1);
    assert_eq!(t.routes_to(dest).next().unwrap().next_hop(), NextHop::Via(ip("10.0.2.2")));

    // RIP also does ECMP
    let mut t = RoutingTable::new();
    assert!(t.add_route(RouteEntry::learned(dest, Protocol::Rip, 3, "Gi0/0", ip("10.0.0.2"), "X")));
    assert!(t.add_route(RouteEntry::learned(dest, Protocol::Rip, 3, "Gi0/1", ip("10.0.1.2"), "X")));
    assert_eq!(t.routes_by(Protocol::Rip).count(), 2);

    // static routes don't
    let mut t = RoutingTable::new();
    assert!(t.add_route(RouteEntry::learned(dest, Protocol::Static, 1, "Gi0/0", ip("10.0.0.2"), "X")));
    assert!(!t.add_route(RouteEntry::learned(dest, Protocol::Static, 1, "Gi0/1", ip("10.0.1.2"), "X")));
    assert_eq!(t.len(), 1);
}

#[test]
fn test_table_equality() {
    let a = RouteEntry::connected(net("10.0.0.0/30"), "Gi0/0", "R1-R2", Protocol::Rip);
    let b = RouteEntry::learned(net("10.0.1.0/30"), Protocol::Rip, 2, "Gi0/0", ip("10.0.0.2"), "R2-R3");
    let c = RouteEntry::learned(net("10.0.1.0/30"), Protocol::Rip, 2, "Gi0/1", ip("10.0.5.2"), "R2-R3");

    let mut t1 = RoutingTable::new();
    let mut t2 = RoutingTable::new();
    for r in vec![a.clone(), b.clone(), c.clone()] {
        t1.add_route(r);
    }
    for r in vec![c, a, b] {
        t2.add_route(r);
    }
    assert_eq!(t1, t2);
    assert_eq!(t1.snapshot(), t2.snapshot());
    assert_eq!(t1.subnets(), vec![net("10.0.0.0/30"), net("10.0.1.0/30")]);
}

#[test]
fn test_adjacency() {
    let adj = Adjacency::from_links(&validated(&three_routers("OSPF")));

    assert_eq!(
        adj.neighbor("R1", "R2"),
        Some(&AdjacencyEntry { local_interface: "Gi0/0".to_string(), peer_ip: ip("10.0.0.2") })
    );
    assert_eq!(
        adj.neighbor("R2", "R3"),
        Some(&AdjacencyEntry { local_interface: "Gi0/1".to_string(), peer_ip: ip("10.0.1.1") })
    );
    assert_eq!(
        adj.neighbor("R3", "R2"),
        Some(&AdjacencyEntry { local_interface: "Gi0/0".to_string(), peer_ip: ip("10.0.1.2") })
    );
    assert_eq!(adj.neighbor("R1", "R3"), None);
    assert_eq!(adj.neighbors("R2").count(), 2);

    assert!(adj.is_directly_connected("R2", &net("10.0.0.0/30")));
    assert!(adj.is_directly_connected("R2", &net("10.0.1.0/30")));
    assert!(!adj.is_directly_connected("R1", &net("10.0.1.0/30")));
    assert_eq!(adj.hosts().collect::<Vec<_>>(), vec!["R1", "R2", "R3"]);

    let tables = adj.seed_tables();
    assert_eq!(tables["R2"].len(), 2);
    for route in tables["R2"].iter() {
        assert_eq!(route.protocol(), Protocol::Connected);
        assert_eq!(route.next_hop(), NextHop::Directly);
        assert_eq!(route.connected_tag(), Some(Protocol::Ospf));
        assert_eq!(route.metric(), 0);
    }
}

#[test]
fn test_swapped_endpoints() {
    // the first link lists the address and interface of R2 on the side of R1. The second link
    // tells that 10.0.0.2 belongs to R2.
    let links = vec![
        link(("R1", "Gi0/1", "10.0.0.2"), ("R2", "Gi0/0", "10.0.0.1"), "OSPF"),
        link(("R2", "Gi0/1", "10.0.0.2"), ("R1", "Gi0/0", "10.0.0.1"), "OSPF"),
        link(("R2", "Gi0/2", "10.0.1.1"), ("R3", "Gi0/0", "10.0.1.2"), "OSPF"),
    ];
    let adj = Adjacency::from_links(&validated(&links));

    assert_eq!(
        adj.neighbor("R1", "R2"),
        Some(&AdjacencyEntry { local_interface: "Gi0/0".to_string(), peer_ip: ip("10.0.0.2") })
    );
    assert_eq!(
        adj.neighbor("R2", "R1"),
        Some(&AdjacencyEntry { local_interface: "Gi0/1".to_string(), peer_ip: ip("10.0.0.1") })
    );

    let seeded = adj.seed_tables();
    assert!(seeded["R1"].iter().all(|r| r.interface() == "Gi0/0"));
    assert!(seeded["R2"]
        .routes_to(net("10.0.0.0/30"))
        .all(|r| r.interface() == "Gi0/1"));

    let tables = compute_routing_tables(&links).unwrap();
    let learned = tables.get("R1").unwrap().routes_to(net("10.0.1.0/30")).collect::<Vec<_>>();
    assert_eq!(learned.len(), 1);
    assert_eq!(learned[0].next_hop(), NextHop::Via(ip("10.0.0.2")));
    assert_eq!(learned[0].interface(), "Gi0/0");
}

#[test]
fn test_duplicate_links_add_one_connected_route() {
    let mut links = three_routers("RIP");
    links.push(links[0].clone());
    let tables = compute_routing_tables(&links).unwrap();
    assert_eq!(tables.get("R1").unwrap().routes_by(Protocol::Connected).count(), 1);
}

#[test]
fn test_three_routers_ospf() {
    let tables = compute_routing_tables(&three_routers("OSPF")).unwrap();
    assert!(tables.is_converged());
    assert!(tables.warning().is_none());
    assert_eq!(tables.hosts().collect::<Vec<_>>(), vec!["R1", "R2", "R3"]);

    let r1 = tables.get("R1").unwrap();
    assert_eq!(r1.len(), 2);
    let routes = r1.routes_to(net("10.0.1.0/30")).collect::<Vec<_>>();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].protocol(), Protocol::Ospf);
    assert_eq!(routes[0].administrative_distance(), 110);
    assert_eq!(routes[0].metric(), 2);
    assert_eq!(routes[0].next_hop(), NextHop::Via(ip("10.0.0.2")));
    assert_eq!(routes[0].interface(), "Gi0/0");
    assert_eq!(routes[0].link_id(), "R2-R3");

    let r3 = tables.get("R3").unwrap();
    let route = r3.routes_to(net("10.0.0.0/30")).next().unwrap();
    assert_eq!(route.next_hop(), NextHop::Via(ip("10.0.1.2")));
    assert_eq!(route.interface(), "Gi0/0");
    assert_eq!(route.metric(), 2);
    assert_eq!(route.link_id(), "R1-R2");

    // R2 is attached to everything
    let r2 = tables.get("R2").unwrap();
    assert_eq!(r2.len(), 2);
    assert_eq!(r2.routes_by(Protocol::Connected).count(), 2);
}

#[test]
fn test_three_routers_rip() {
    let tables = compute_routing_tables(&three_routers("rip")).unwrap();
    let route = tables.get("R1").unwrap().routes_to(net("10.0.1.0/30")).next().unwrap().clone();
    assert_eq!(route.protocol(), Protocol::Rip);
    assert_eq!(route.administrative_distance(), 120);
    assert_eq!(route.metric(), 2);
}

#[test]
fn test_step_is_idempotent() {
    let mut sim = RoutingSimulation::new(validated(&ecmp_square()));
    let mut passes = 0;
    while sim.step() {
        passes += 1;
        assert!(passes < MAX_ITERATIONS);
    }
    let fixed_point = sim.tables().clone();
    assert!(!sim.step());
    assert_eq!(sim.tables(), &fixed_point);
    assert_eq!(sim.iterations(), passes + 2);
}

#[test]
fn test_connected_routes_survive() {
    let links = ecmp_square();
    let tables = compute_routing_tables(&links).unwrap();
    for (host, table) in tables.iter() {
        let attached = links
            .iter()
            .filter(|l| l.host_a.as_deref() == Some(host) || l.host_b.as_deref() == Some(host))
            .count();
        assert_eq!(table.routes_by(Protocol::Connected).count(), attached, "host {}", host);
        for route in table.routes_by(Protocol::Connected) {
            // the connected route is the only one to its subnet
            assert_eq!(table.routes_to(route.subnet()).count(), 1);
        }
    }
}

#[test]
fn test_ecmp_square() {
    let tables = compute_routing_tables(&ecmp_square()).unwrap();
    let r1 = tables.get("R1").unwrap();

    let routes = r1.routes_to(net("10.0.45.0/30")).collect::<Vec<_>>();
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|r| r.metric() == 3 && r.protocol() == Protocol::Ospf));
    assert_eq!(
        routes.iter().map(|r| r.next_hop()).collect::<HashSet<_>>(),
        hashset! {NextHop::Via(ip("10.0.12.2")), NextHop::Via(ip("10.0.13.2"))}
    );
    assert_eq!(
        routes.iter().map(|r| r.interface()).collect::<HashSet<_>>(),
        hashset! {"Gi0/0", "Gi0/1"}
    );

    // only the shorter path survives
    let routes = r1.routes_to(net("10.0.24.0/30")).collect::<Vec<_>>();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].metric(), 2);
    assert_eq!(routes[0].next_hop(), NextHop::Via(ip("10.0.12.2")));

    // R5 reaches everything over R4
    let r5 = tables.get("R5").unwrap();
    assert_eq!(r5.subnets().len(), 5);
    assert!(r5
        .iter()
        .all(|r| r.protocol() == Protocol::Connected || r.next_hop() == NextHop::Via(ip("10.0.45.1"))));
    let route = r5.routes_to(net("10.0.12.0/30")).next().unwrap();
    assert_eq!(route.metric(), 3);
}

#[test]
fn test_redistribution_boundary() {
    // R1 -RIP- R2 -OSPF- R3 -OSPF- R4
    let links = vec![
        link(("R1", "Gi0/0", "10.0.0.1"), ("R2", "Gi0/0", "10.0.0.2"), "RIP"),
        link(("R2", "Gi0/1", "10.0.1.1"), ("R3", "Gi0/0", "10.0.1.2"), "OSPF"),
        link(("R3", "Gi0/1", "10.0.2.1"), ("R4", "Gi0/0", "10.0.2.2"), "OSPF"),
    ];
    let tables = compute_routing_tables(&links).unwrap();

    // the RIP subnet does not leak into OSPF
    assert!(!tables.get("R3").unwrap().contains_subnet(net("10.0.0.0/30")));
    assert!(!tables.get("R4").unwrap().contains_subnet(net("10.0.0.0/30")));
    // and the OSPF subnets do not leak into RIP
    let r1 = tables.get("R1").unwrap();
    assert_eq!(r1.len(), 1);
    assert_eq!(r1.routes_by(Protocol::Connected).count(), 1);

    let r4 = tables.get("R4").unwrap();
    let route = r4.routes_to(net("10.0.1.0/30")).next().unwrap();
    assert_eq!(route.protocol(), Protocol::Ospf);
    assert_eq!(route.metric(), 2);
    assert_eq!(route.link_id(), "R2-R3");
}

#[test]
fn test_static_and_none_links_do_not_propagate() {
    let links = vec![
        link(("R1", "Gi0/0", "10.0.0.1"), ("R2", "Gi0/0", "10.0.0.2"), "Static"),
        link(("R2", "Gi0/1", "10.0.1.1"), ("R3", "Gi0/0", "10.0.1.2"), "OSPF"),
        link(("R3", "Gi0/1", "10.0.2.1"), ("R4", "Gi0/0", "10.0.2.2"), "None"),
    ];
    let tables = compute_routing_tables(&links).unwrap();
    assert_eq!(tables.get("R1").unwrap().len(), 1);
    assert_eq!(tables.get("R4").unwrap().len(), 1);
    assert_eq!(tables.get("R2").unwrap().len(), 2);
    assert_eq!(tables.get("R3").unwrap().len(), 2);
}

#[test]
fn test_invalid_topology() {
    let mut links = three_routers("OSPF");
    links.push(link(("R3", "Gi0/1", "10.0.2.1"), ("R4", "Gi0/0", "10.0.3.2"), "OSPF"));
    links.push(link(("R4", "Gi0/1", "10.0.4.1"), ("R5", "Gi0/0", "10.0.4.2"), "EIGRP"));

    match compute_routing_tables(&links) {
        Err(RoutingError::InvalidTopology(errors)) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].index, 2);
            assert_eq!(errors[0].host_a.as_deref(), Some("R3"));
            assert_eq!(
                errors[0].errors,
                vec![ValidationError::DifferentSubnets {
                    a: ip("10.0.2.1"),
                    b: ip("10.0.3.2"),
                    prefix_len: 30
                }]
            );
            assert_eq!(errors[1].index, 3);
            assert_eq!(errors[1].errors, vec![ValidationError::InvalidProtocol("EIGRP".into())]);
        }
        r => panic!("Expected an invalid topology, got {:?}", r),
    }
}

#[test]
fn test_chain_does_not_converge() {
    let _ = pretty_env_logger::try_init();
    // every pass only moves routes one hop towards the beginning of the chain
    let tables = compute_routing_tables(&chain(105)).unwrap();
    assert!(!tables.is_converged());
    assert_eq!(tables.iterations(), MAX_ITERATIONS);
    assert_eq!(tables.warning(), Some(ConvergenceWarning { iterations: MAX_ITERATIONS }));
    assert_eq!(
        tables.warning().unwrap().to_string(),
        "Maximum iterations reached (100). Possible routing loop."
    );

    // the end of the chain already knows everything
    assert_eq!(tables.get("R104").unwrap().subnets().len(), 104);
}

#[test]
fn test_short_chain_converges() {
    let tables = compute_routing_tables(&chain(10)).unwrap();
    assert!(tables.is_converged());
    let r0 = tables.get("R000").unwrap();
    assert_eq!(r0.subnets().len(), 9);
    // subnet between R008 and R009
    let route = r0.routes_to(net("10.0.0.32/30")).next().unwrap();
    assert_eq!(route.metric(), 9);
    assert_eq!(route.link_id(), "R008-R009");
}

#[test]
fn test_order_independence() {
    let mut links = ecmp_square();
    links.extend(chain(8));
    let expected = compute_routing_tables(&links).unwrap().into_tables();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        links.shuffle(&mut rng);
        let tables = compute_routing_tables(&links).unwrap();
        assert!(tables.is_converged());
        assert_eq!(tables.into_tables(), expected);
    }
}
