//! ## qnet-core::network
//! **Validated network definitions**
//!
//! A [`NetworkDefinition`] is the only input the simulator accepts. It can
//! only be obtained from [`NetworkBuilder::build`], which resolves station
//! names to [`NodeId`]s and rejects every configuration error up front:
//! unknown stations, routing tables that do not sum to one, missing first
//! arrivals, empty seed lists and so on. Once built, a definition is immutable
//! and can be shared between runs (and threads).

use std::collections::HashMap;

use tracing::debug;

use crate::error::ModelError;
use crate::node::{Capacity, StationSpec, TimeRange};
use crate::routing::{Destination, NodeId, Route, RoutingTable, PROBABILITY_TOLERANCE};

/// Names that refer to the system exit in routing declarations.
pub const EXIT_ALIASES: [&str; 3] = ["S", "s", "exit"];

pub fn is_exit_name(name: &str) -> bool {
    EXIT_ALIASES.contains(&name)
}

/// A seeded external arrival that starts the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstArrival {
    pub node: NodeId,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDefinition {
    stations: Vec<StationSpec>,
    first_arrivals: Vec<FirstArrival>,
    seeds: Vec<i64>,
    random_budget: u64,
}

impl NetworkDefinition {
    pub fn stations(&self) -> &[StationSpec] {
        &self.stations
    }

    pub fn station(&self, id: NodeId) -> &StationSpec {
        &self.stations[id.index()]
    }

    pub fn station_id(&self, name: &str) -> Option<NodeId> {
        self.stations
            .iter()
            .position(|s| s.name == name)
            .map(NodeId)
    }

    pub fn first_arrivals(&self) -> &[FirstArrival] {
        &self.first_arrivals
    }

    pub fn seeds(&self) -> &[i64] {
        &self.seeds
    }

    pub fn random_budget(&self) -> u64 {
        self.random_budget
    }

    /// Replaces the seed list, keeping the definition valid.
    pub fn with_seeds(mut self, seeds: Vec<i64>) -> Result<Self, ModelError> {
        if seeds.is_empty() {
            return Err(ModelError::NoSeeds);
        }
        self.seeds = seeds;
        Ok(self)
    }

    /// Replaces the random-number budget, keeping the definition valid.
    pub fn with_random_budget(mut self, budget: u64) -> Result<Self, ModelError> {
        if budget == 0 {
            return Err(ModelError::ZeroBudget);
        }
        self.random_budget = budget;
        Ok(self)
    }
}

#[derive(Debug, Clone)]
struct StationDraft {
    name: String,
    servers: u32,
    capacity: Capacity,
    arrival: Option<TimeRange>,
    service: TimeRange,
    routes: Vec<(String, f64)>,
}

/// Collects stations, routes and run parameters by name and validates them
/// into a [`NetworkDefinition`].
#[derive(Debug, Default, Clone)]
pub struct NetworkBuilder {
    stations: Vec<StationDraft>,
    index: HashMap<String, usize>,
    first_arrivals: Vec<(String, f64)>,
    seeds: Vec<i64>,
    random_budget: u64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn add_station(
        &mut self,
        name: impl Into<String>,
        servers: u32,
        capacity: Capacity,
        arrival: Option<TimeRange>,
        service: TimeRange,
    ) -> Result<&mut Self, ModelError> {
        let name = name.into();
        if self.index.contains_key(&name) || is_exit_name(&name) {
            return Err(ModelError::DuplicateStation(name));
        }
        self.index.insert(name.clone(), self.stations.len());
        self.stations.push(StationDraft {
            name,
            servers,
            capacity,
            arrival,
            service,
            routes: Vec::new(),
        });
        Ok(self)
    }

    /// Appends a route. The destination may be a station declared later or
    /// one of [`EXIT_ALIASES`].
    pub fn add_route(
        &mut self,
        origin: &str,
        destination: impl Into<String>,
        probability: f64,
    ) -> Result<&mut Self, ModelError> {
        let slot = *self
            .index
            .get(origin)
            .ok_or_else(|| ModelError::UnknownStation(origin.to_string()))?;
        self.stations[slot]
            .routes
            .push((destination.into(), probability));
        Ok(self)
    }

    pub fn add_first_arrival(&mut self, station: impl Into<String>, time: f64) -> &mut Self {
        self.first_arrivals.push((station.into(), time));
        self
    }

    pub fn seeds(&mut self, seeds: impl IntoIterator<Item = i64>) -> &mut Self {
        self.seeds.extend(seeds);
        self
    }

    pub fn random_budget(&mut self, budget: u64) -> &mut Self {
        self.random_budget = budget;
        self
    }

    fn resolve(&self, name: &str) -> Result<Destination, ModelError> {
        if is_exit_name(name) {
            return Ok(Destination::Exit);
        }
        self.index
            .get(name)
            .map(|&i| Destination::Node(NodeId(i)))
            .ok_or_else(|| ModelError::UnknownStation(name.to_string()))
    }

    pub fn build(&self) -> Result<NetworkDefinition, ModelError> {
        let mut stations = Vec::with_capacity(self.stations.len());
        for draft in &self.stations {
            stations.push(self.validate_station(draft)?);
        }

        if self.first_arrivals.is_empty() {
            return Err(ModelError::NoFirstArrivals);
        }
        let mut first_arrivals = Vec::with_capacity(self.first_arrivals.len());
        for (name, time) in &self.first_arrivals {
            let node = match self.resolve(name)? {
                Destination::Node(id) => id,
                Destination::Exit => return Err(ModelError::UnknownStation(name.clone())),
            };
            if !time.is_finite() || *time < 0.0 {
                return Err(ModelError::InvalidArrivalTime {
                    station: name.clone(),
                    time: *time,
                });
            }
            if stations[node.index()].arrival.is_none() {
                return Err(ModelError::MissingArrivalRange(name.clone()));
            }
            first_arrivals.push(FirstArrival { node, time: *time });
        }

        if self.seeds.is_empty() {
            return Err(ModelError::NoSeeds);
        }
        if self.random_budget == 0 {
            return Err(ModelError::ZeroBudget);
        }

        debug!(
            stations = stations.len(),
            first_arrivals = first_arrivals.len(),
            seeds = self.seeds.len(),
            budget = self.random_budget,
            "network definition validated"
        );

        Ok(NetworkDefinition {
            stations,
            first_arrivals,
            seeds: self.seeds.clone(),
            random_budget: self.random_budget,
        })
    }

    fn validate_station(&self, draft: &StationDraft) -> Result<StationSpec, ModelError> {
        let station = || draft.name.clone();

        if draft.servers == 0 {
            return Err(ModelError::NoServers {
                station: station(),
                servers: draft.servers,
            });
        }
        if let Capacity::Finite(capacity) = draft.capacity {
            if capacity < draft.servers as usize {
                return Err(ModelError::CapacityBelowServers {
                    station: station(),
                    capacity,
                    servers: draft.servers,
                });
            }
        }
        if let Some(arrival) = draft.arrival {
            if !arrival.is_valid() {
                return Err(ModelError::InvalidRange {
                    station: station(),
                    kind: "arrival",
                    min: arrival.min,
                    max: arrival.max,
                });
            }
        }
        if !draft.service.is_valid() {
            return Err(ModelError::InvalidRange {
                station: station(),
                kind: "service",
                min: draft.service.min,
                max: draft.service.max,
            });
        }

        if draft.routes.is_empty() {
            return Err(ModelError::NoRoutes(station()));
        }
        let mut routes = Vec::with_capacity(draft.routes.len());
        for (destination, probability) in &draft.routes {
            if !probability.is_finite() || !(0.0..=1.0).contains(probability) {
                return Err(ModelError::InvalidProbability {
                    station: station(),
                    probability: *probability,
                });
            }
            routes.push(Route {
                destination: self.resolve(destination)?,
                probability: *probability,
            });
        }
        let routing = RoutingTable::new(routes);
        let sum = routing.probability_sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ModelError::RoutingSum {
                station: station(),
                sum,
            });
        }

        Ok(StationSpec {
            name: draft.name.clone(),
            servers: draft.servers,
            capacity: draft.capacity,
            arrival: draft.arrival,
            service: draft.service,
            routing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tandem() -> NetworkBuilder {
        let mut b = NetworkBuilder::new();
        b.add_station(
            "Q1",
            2,
            Capacity::Finite(3),
            Some(TimeRange::new(1.0, 4.0)),
            TimeRange::new(3.0, 4.0),
        )
        .unwrap();
        b.add_station("Q2", 1, Capacity::Unbounded, None, TimeRange::new(2.0, 3.0))
            .unwrap();
        b.add_route("Q1", "Q2", 0.8).unwrap();
        b.add_route("Q1", "S", 0.2).unwrap();
        b.add_route("Q2", "exit", 1.0).unwrap();
        b.add_first_arrival("Q1", 1.0)
            .seeds([1, 2, 3])
            .random_budget(1_000);
        b
    }

    #[test]
    fn test_valid_network_builds() {
        let def = tandem().build().unwrap();
        assert_eq!(def.stations().len(), 2);
        assert_eq!(def.station_id("Q2"), Some(NodeId(1)));
        let q1 = def.station(NodeId(0));
        assert_eq!(
            q1.routing.routes()[0].destination,
            Destination::Node(NodeId(1))
        );
        assert_eq!(q1.routing.routes()[1].destination, Destination::Exit);
        assert_eq!(def.first_arrivals()[0].node, NodeId(0));
        assert_eq!(def.seeds(), &[1, 2, 3]);
        assert_eq!(def.random_budget(), 1_000);
    }

    #[test]
    fn test_routing_sum_below_one_rejected() {
        let mut b = NetworkBuilder::new();
        b.add_station(
            "Q1",
            1,
            Capacity::Finite(5),
            Some(TimeRange::new(2.0, 4.0)),
            TimeRange::new(3.0, 5.0),
        )
        .unwrap();
        b.add_route("Q1", "Q1", 0.3).unwrap();
        b.add_route("Q1", "S", 0.3).unwrap();
        b.add_first_arrival("Q1", 2.0).seeds([1]).random_budget(10);
        assert!(matches!(b.build(), Err(ModelError::RoutingSum { .. })));
    }

    #[test]
    fn test_three_way_split_accepted_within_tolerance() {
        let mut b = tandem();
        b.add_station("Q3", 1, Capacity::Unbounded, None, TimeRange::new(1.0, 2.0))
            .unwrap();
        // 0.1 + 0.2 + 0.7 is not exactly 1.0 in binary floating point.
        b.add_route("Q3", "Q1", 0.1).unwrap();
        b.add_route("Q3", "Q2", 0.2).unwrap();
        b.add_route("Q3", "S", 0.7).unwrap();
        assert!(b.build().is_ok());
    }

    #[test]
    fn test_unknown_destination_rejected() {
        let mut b = tandem();
        b.add_route("Q2", "Q9", 0.0).unwrap();
        assert_eq!(
            b.build().unwrap_err(),
            ModelError::UnknownStation("Q9".into())
        );
    }

    #[test]
    fn test_unknown_origin_rejected() {
        let mut b = tandem();
        assert!(b.add_route("Q9", "S", 1.0).is_err());
    }

    #[test]
    fn test_missing_first_arrivals_rejected() {
        let mut b = NetworkBuilder::new();
        b.add_station(
            "Q1",
            1,
            Capacity::Finite(5),
            Some(TimeRange::new(2.0, 4.0)),
            TimeRange::new(3.0, 5.0),
        )
        .unwrap();
        b.add_route("Q1", "S", 1.0).unwrap();
        b.seeds([1]).random_budget(10);
        assert_eq!(b.build().unwrap_err(), ModelError::NoFirstArrivals);
    }

    #[test]
    fn test_first_arrival_needs_arrival_range() {
        let mut b = tandem();
        b.add_first_arrival("Q2", 0.0);
        assert_eq!(
            b.build().unwrap_err(),
            ModelError::MissingArrivalRange("Q2".into())
        );
    }

    #[test]
    fn test_capacity_below_servers_rejected() {
        let mut b = NetworkBuilder::new();
        b.add_station("Q1", 3, Capacity::Finite(2), None, TimeRange::new(1.0, 2.0))
            .unwrap();
        b.add_route("Q1", "S", 1.0).unwrap();
        assert!(matches!(
            b.build(),
            Err(ModelError::CapacityBelowServers { .. })
        ));
    }

    #[test]
    fn test_inverted_service_range_rejected() {
        let mut b = NetworkBuilder::new();
        b.add_station("Q1", 1, Capacity::Unbounded, None, TimeRange::new(5.0, 3.0))
            .unwrap();
        b.add_route("Q1", "S", 1.0).unwrap();
        assert!(matches!(
            b.build(),
            Err(ModelError::InvalidRange { kind: "service", .. })
        ));
    }

    #[test]
    fn test_duplicate_and_reserved_names_rejected() {
        let mut b = tandem();
        assert!(b
            .add_station("Q1", 1, Capacity::Unbounded, None, TimeRange::new(1.0, 2.0))
            .is_err());
        assert!(b
            .add_station("S", 1, Capacity::Unbounded, None, TimeRange::new(1.0, 2.0))
            .is_err());
    }

    #[test]
    fn test_seed_and_budget_overrides() {
        let def = tandem().build().unwrap();
        assert_eq!(def.clone().with_seeds(vec![]), Err(ModelError::NoSeeds));
        assert_eq!(def.clone().with_random_budget(0), Err(ModelError::ZeroBudget));
        let def = def.with_seeds(vec![9]).unwrap().with_random_budget(5).unwrap();
        assert_eq!(def.seeds(), &[9]);
        assert_eq!(def.random_budget(), 5);
    }
}
