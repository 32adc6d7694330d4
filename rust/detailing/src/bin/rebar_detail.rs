// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: detail one concrete element and print a JSON summary
//!
//! The element is detailed against an in-memory host, so the output shows
//! what a host model would receive: one group per pattern, its bar count and
//! total length, and the layer corrections written after the run.
//!
//! Usage:
//!   rebar-detail <descriptor> <length> [options]

use anyhow::{bail, Context, Result};
use rebar_lite_detailing::{
    DetailingConfig, DetailingRun, PartInfo, PatternId, RecordingHost, RunReport,
};
use rebar_lite_geometry::Plane;
use serde::Serialize;
use std::env;
use std::fs;

#[derive(Serialize)]
struct Summary<'a> {
    descriptor: &'a str,
    length: f64,
    #[serde(flatten)]
    report: &'a RunReport,
    commits: usize,
}

fn print_usage() {
    eprintln!("Usage: rebar-detail <descriptor> <length> [options]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <descriptor>          Profile descriptor, e.g. LDG400*300*200");
    eprintln!("  <length>              Element length in mm");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>       Flat JSON object of detailing parameters");
    eprintln!("  --stations <n>        Station count (2 or 3)");
    eprintln!("  --pattern <name>      Detail a single pattern, e.g. Ledge_Stirrups");
    eprintln!("  --default-layer <n>   Layer the host assigns on creation (default: 0)");
    eprintln!();
    eprintln!("Logging is controlled by RUST_LOG (default: info).");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let descriptor = &args[1];
    let length: f64 = args[2]
        .parse()
        .with_context(|| format!("invalid length '{}'", args[2]))?;

    let mut config = DetailingConfig::new();
    let mut stations: Option<usize> = None;
    let mut pattern: Option<PatternId> = None;
    let mut default_layer = 0;

    let mut i = 3;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(path)) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("cannot read config '{}'", path))?;
                config = DetailingConfig::from_json(&json)?;
            }
            ("--stations", Some(n)) => {
                stations = Some(n.parse().with_context(|| format!("invalid stations '{}'", n))?);
            }
            ("--pattern", Some(name)) => {
                pattern = Some(name.parse()?);
            }
            ("--default-layer", Some(n)) => {
                default_layer = n.parse().with_context(|| format!("invalid layer '{}'", n))?;
            }
            (other, _) => {
                print_usage();
                bail!("unknown or incomplete option: {}", other);
            }
        }
        i += 2;
    }

    let mut host = RecordingHost::new().with_default_layer(default_layer);
    let mut info = PartInfo::new(descriptor.as_str(), length, Plane::world());
    if let Some(n) = stations {
        info = info.with_stations(n);
    }
    let part = host.add_part(info);

    let mut run = DetailingRun::new(&mut host, &config);
    let report = match pattern {
        Some(pattern) => run.detail_pattern(part, pattern)?,
        None => run.detail_part(part)?,
    };

    let summary = Summary {
        descriptor,
        length,
        report: &report,
        commits: host.commits(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
