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

//! # Helper (printer) functions for spanning-tree results
//! Formats the result of a switch similar to the IOS command `show spanning-tree vlan <id>`.

use crate::stp::calculator::SwitchStpResult;

/// Returns the formatted spanning-tree state of a switch, e.g.:
///
/// ```text
/// SW2 VLAN0001
///   Root ID    Priority 4096, Address 0c11.0000.0001, Cost 4, Port Gi0/1
///   Bridge ID  Priority 32768, Address 0c11.0000.0002
///   Interface        Role Sts Cost  Link
///   Gi0/1            Root FWD 4     SW1-SW2
/// ```
pub fn stp_result(result: &SwitchStpResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.ports.len() + 4);
    lines.push(format!("{} VLAN{:04}", result.hostname, result.vlan_id));
    if result.is_root {
        lines.push(format!(
            "  Root ID    Priority {}, Address {}, This bridge is the root",
            result.bridge_priority, result.root_mac
        ));
    } else {
        lines.push(format!(
            "  Root ID    Address {}, Cost {}, Port {}",
            result.root_mac,
            result.root_path_cost,
            result.root_port.as_deref().unwrap_or("-")
        ));
    }
    lines.push(format!(
        "  Bridge ID  Priority {}, Address {}",
        result.bridge_priority, result.bridge_mac
    ));
    lines.push(format!("  {:<16} {:<4} {:<3} {:<5} {}", "Interface", "Role", "Sts", "Cost", "Link"));
    for port in result.ports.iter() {
        lines.push(format!(
            "  {:<16} {:<4} {:<3} {:<5} {}",
            port.interface,
            port.role.code(),
            if port.role.is_forwarding() { "FWD" } else { "BLK" },
            port.cost,
            port.link_id
        ));
    }
    lines
}

/// Print the spanning-tree state of all switches.
pub fn print_stp_results(results: &[SwitchStpResult]) {
    for result in results {
        for line in stp_result(result) {
            println!("{}", line);
        }
        println!();
    }
}
