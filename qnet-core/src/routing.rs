//! Probabilistic routing between stations.

use serde::{Deserialize, Serialize};

use crate::rng::Lcg48;

/// Tolerance used when checking that a table's probabilities add up to one.
/// Tables such as 0.1/0.2/0.7 pass even though their `f64` sum is not
/// exactly one; 0.3/0.3 does not.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Index of a station inside a [`crate::network::NetworkDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a client goes after service: another station or out of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Node(NodeId),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub destination: Destination,
    pub probability: f64,
}

/// Ordered (destination, probability) pairs of one station.
///
/// Tables are only built by the network builder, which guarantees a non-empty
/// list whose probabilities sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub(crate) fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of draws [`RoutingTable::choose`] consumes: none for a single
    /// destination, one otherwise.
    #[inline]
    pub fn draws_per_choice(&self) -> u64 {
        u64::from(self.routes.len() > 1)
    }

    /// Picks the destination for a departing client.
    ///
    /// Destinations are walked in declaration order; the first one whose
    /// cumulative probability exceeds the draw wins. Rounding can leave the
    /// draw above the final cumulative sum, in which case the last
    /// destination is taken.
    pub fn choose(&self, rng: &mut Lcg48) -> Destination {
        match self.routes.as_slice() {
            [] => Destination::Exit,
            [only] => only.destination,
            [.., last] => {
                let draw = rng.next_f64();
                let mut cumulative = 0.0;
                for route in &self.routes {
                    cumulative += route.probability;
                    if draw < cumulative {
                        return route.destination;
                    }
                }
                last.destination
            }
        }
    }

    pub fn probability_sum(&self) -> f64 {
        self.routes.iter().map(|r| r.probability).sum()
    }
}
