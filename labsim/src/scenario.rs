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

//! # Scenario files
//! Read the links of a routing scenario, or the switches of a spanning-tree scenario, from the
//! JSON files exported by the lab front end. Both files contain a JSON array of records.

use crate::stp::Switch;
use crate::topology::LinkInput;
use crate::Error;

use log::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read all links of a routing scenario from a file. The links are not validated.
pub fn load_links<P: AsRef<Path>>(path: P) -> Result<Vec<LinkInput>, Error> {
    let file = File::open(path.as_ref())?;
    let links: Vec<LinkInput> = serde_json::from_reader(BufReader::new(file))?;
    debug!("Read {} links from {}", links.len(), path.as_ref().display());
    Ok(links)
}

/// Parse the links of a routing scenario from a JSON string.
pub fn parse_links(json: &str) -> Result<Vec<LinkInput>, Error> {
    Ok(serde_json::from_str(json)?)
}

/// Read all switches of a spanning-tree scenario from a file.
pub fn load_switches<P: AsRef<Path>>(path: P) -> Result<Vec<Switch>, Error> {
    let file = File::open(path.as_ref())?;
    let switches: Vec<Switch> = serde_json::from_reader(BufReader::new(file))?;
    debug!("Read {} switches from {}", switches.len(), path.as_ref().display());
    Ok(switches)
}

/// Parse the switches of a spanning-tree scenario from a JSON string.
pub fn parse_switches(json: &str) -> Result<Vec<Switch>, Error> {
    Ok(serde_json::from_str(json)?)
}
