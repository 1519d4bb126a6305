//! Line-oriented network description.
//!
//! One directive per line; blank lines and lines starting with `#` are
//! skipped. The first character selects the directive:
//!
//! ```text
//! # name: servers/capacity/arrivalMin/arrivalMax/serviceMin/serviceMax
//! q1: 1/5/2.0/4.0/3.0/5.0
//! q2: 2/inf/0/0/1.0/2.0
//! d: q1 -> q2/0.7, S/0.3
//! d: q2 -> S/1.0
//! s: 1234, 42
//! r: 100000
//! f: q1/2.0
//! ```
//!
//! Station names must start with `q` or `Q`; `S`/`s`/`exit` in a `d:` line
//! name the system exit. Stations must be declared before they are
//! referenced.

use std::path::Path;

use qnet_core::network::{is_exit_name, NetworkBuilder, NetworkDefinition};
use qnet_core::node::{Capacity, TimeRange};
use tracing::debug;

use crate::validation::validate_station_name;
use crate::ConfigError;

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<NetworkDefinition, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    debug!(path = %path.display(), "loading text network description");
    parse_str(&std::fs::read_to_string(path)?)
}

pub fn parse_str(input: &str) -> Result<NetworkDefinition, ConfigError> {
    let mut builder = NetworkBuilder::new();
    let mut first_arrivals = 0usize;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        let Some(directive) = line.chars().next() else {
            continue;
        };
        match directive {
            '#' => {}
            'q' | 'Q' => parse_station(&mut builder, line, line_no)?,
            'd' => parse_routes(&mut builder, body(line, line_no)?, line_no)?,
            's' => {
                let seeds = split_list(body(line, line_no)?)
                    .map(|s| parse_number::<i64>(s, "seed", line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.seeds(seeds);
            }
            'r' => {
                let budget = parse_number::<u64>(body(line, line_no)?, "random budget", line_no)?;
                builder.random_budget(budget);
            }
            'f' => {
                for entry in split_list(body(line, line_no)?) {
                    let (station, time) = split_pair(entry, line_no)?;
                    known_station(&builder, station, line_no)?;
                    let time = parse_number::<f64>(time, "arrival time", line_no)?;
                    builder.add_first_arrival(station, time);
                    first_arrivals += 1;
                }
            }
            _ => {
                return Err(ConfigError::syntax(
                    line_no,
                    "Non empty line contains invalid syntax.",
                ))
            }
        }
    }

    if first_arrivals == 0 {
        return Err(qnet_core::ModelError::NoFirstArrivals.into());
    }
    Ok(builder.build()?)
}

/// Text after the first `:` of a directive line.
fn body(line: &str, line_no: usize) -> Result<&str, ConfigError> {
    line.split_once(':')
        .map(|(_, rest)| rest.trim())
        .ok_or_else(|| ConfigError::syntax(line_no, "missing ':' after directive"))
}

fn split_list(body: &str) -> impl Iterator<Item = &str> {
    body.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Splits `name/value`.
fn split_pair(entry: &str, line_no: usize) -> Result<(&str, &str), ConfigError> {
    entry
        .split_once('/')
        .map(|(a, b)| (a.trim(), b.trim()))
        .ok_or_else(|| ConfigError::syntax(line_no, format!("expected name/value, got \"{entry}\"")))
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    what: &str,
    line_no: usize,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::syntax(line_no, format!("invalid {what}: \"{value}\"")))
}

fn known_station(builder: &NetworkBuilder, name: &str, line_no: usize) -> Result<(), ConfigError> {
    if builder.contains(name) {
        Ok(())
    } else {
        Err(ConfigError::syntax(
            line_no,
            format!("Queue \"{name}\" does not exist or wasn't previously defined in input file."),
        ))
    }
}

fn parse_station(builder: &mut NetworkBuilder, line: &str, line_no: usize) -> Result<(), ConfigError> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let (name, params) = compact
        .split_once(':')
        .ok_or_else(|| ConfigError::syntax(line_no, "missing ':' after station name"))?;
    validate_station_name(name)
        .map_err(|_| ConfigError::syntax(line_no, format!("invalid station name \"{name}\"")))?;

    let fields: Vec<&str> = params.split('/').collect();
    let [servers, capacity, a_min, a_max, s_min, s_max] = fields.as_slice() else {
        return Err(ConfigError::syntax(
            line_no,
            format!("expected 6 station parameters, got {}", fields.len()),
        ));
    };

    let servers = parse_number::<u32>(servers, "server count", line_no)?;
    let capacity = if capacity.eq_ignore_ascii_case("inf") {
        Capacity::Unbounded
    } else {
        Capacity::Finite(parse_number::<usize>(capacity, "capacity", line_no)?)
    };
    let arrival = TimeRange::new(
        parse_number(a_min, "arrival minimum", line_no)?,
        parse_number(a_max, "arrival maximum", line_no)?,
    );
    let service = TimeRange::new(
        parse_number(s_min, "service minimum", line_no)?,
        parse_number(s_max, "service maximum", line_no)?,
    );

    builder
        .add_station(name, servers, capacity, Some(arrival), service)
        .map_err(|e| ConfigError::syntax(line_no, e.to_string()))?;
    Ok(())
}

fn parse_routes(builder: &mut NetworkBuilder, body: &str, line_no: usize) -> Result<(), ConfigError> {
    let (origin, targets) = body
        .split_once("->")
        .ok_or_else(|| ConfigError::syntax(line_no, "expected \"origin -> destination/probability, ...\""))?;
    let origin = origin.trim();
    known_station(builder, origin, line_no)?;

    for entry in split_list(targets) {
        let (destination, probability) = split_pair(entry, line_no)?;
        if !is_exit_name(destination) {
            known_station(builder, destination, line_no)?;
        }
        let probability = parse_number::<f64>(probability, "probability", line_no)?;
        builder
            .add_route(origin, destination, probability)
            .map_err(|e| ConfigError::syntax(line_no, e.to_string()))?;
    }
    Ok(())
}
