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

use labsim::routing::{printer, RoutingError};
use labsim::scenario::{load_links, load_switches};
use labsim::stp::{self, PriorityOverride};
use labsim::{compute_routing_tables, compute_stp_roles};

use clap::{Parser, Subcommand};
use log::*;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    // initialize the env logger
    pretty_env_logger::init();

    // run clap
    let args = CommandLineArguments::parse();

    // match on the action
    match args.cmd {
        MainCommand::Routing { links, json } => {
            let links = load_links(&links)?;
            info!("Computing the routing tables of {} links", links.len());

            let tables = match compute_routing_tables(&links) {
                Ok(tables) => tables,
                Err(RoutingError::InvalidTopology(errors)) => {
                    for e in errors.iter() {
                        eprintln!("{}", e);
                    }
                    return Err(format!("{} invalid links", errors.len()).into());
                }
            };

            if let Some(warning) = tables.warning() {
                eprintln!("Warning: {}", warning);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                print!("{}", printer::routing_tables(&tables));
            }
        }
        MainCommand::Stp { switches, vlan, override_host, override_priority, json } => {
            let switches = load_switches(&switches)?;
            let priority_override = match (override_host, override_priority) {
                (Some(host), Some(priority)) => Some(PriorityOverride::new(host, priority)),
                (None, None) => None,
                _ => {
                    return Err("--override-host and --override-priority must be used together".into())
                }
            };
            info!("Computing the spanning tree of VLAN {} on {} switches", vlan, switches.len());

            let results = compute_stp_roles(&switches, vlan, priority_override)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                stp::printer::print_stp_results(&results);
            }
        }
    }

    Ok(())
}

/// Compute the routing tables and spanning trees which the devices of a network lab should show
/// after convergence. Scenario files are JSON arrays as exported by the lab front end. Set the
/// environment variable `RUST_LOG` to control the log output.
#[derive(Parser, Debug)]
#[command(name = "labsim", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// Action to perform
    #[command(subcommand)]
    cmd: MainCommand,
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Compute the converged routing table of every router
    #[command(name = "routing")]
    Routing {
        /// JSON file containing all links
        links: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the spanning tree of a VLAN
    #[command(name = "stp")]
    Stp {
        /// JSON file containing all switches
        switches: PathBuf,
        /// VLAN ID
        #[arg(short = 'v', long)]
        vlan: u16,
        /// Switch whose bridge priority is replaced
        #[arg(long)]
        override_host: Option<String>,
        /// New bridge priority of the switch given with `--override-host`
        #[arg(long)]
        override_priority: Option<u32>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}
