//! Placement strategies used to rank feasible positions inside a bin.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Rule that picks one position among all feasible candidates of a box.
///
/// Candidates that rank equal keep the order in which the bin generated
/// them and the first one wins. Callers must not rely on that order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PlacementStrategy {
    /// Deepest-bottom-left: ascending by `(z, y, x)`.
    #[default]
    #[serde(rename = "DBL", alias = "dbl")]
    DeepestBottomLeft,
    /// Maximum contact: descending by the footprint area resting flush on
    /// boxes whose top equals the candidate height.
    #[serde(rename = "MC", alias = "mc")]
    MaximumContact,
    /// Smallest extrusion: ascending by `(z, z)`.
    ///
    /// The secondary key repeats the primary one, so this behaves like a
    /// plain ascending-height ordering. Kept as is; see DESIGN.md.
    #[serde(rename = "SE", alias = "se")]
    SmallestExtrusion,
    /// Neighbour score: descending by the number of placed boxes whose
    /// projection overlaps the candidate and whose base is not above it.
    #[serde(rename = "NS", alias = "ns")]
    NeighbourScore,
}

impl PlacementStrategy {
    pub const ALL: [PlacementStrategy; 4] = [
        PlacementStrategy::DeepestBottomLeft,
        PlacementStrategy::MaximumContact,
        PlacementStrategy::SmallestExtrusion,
        PlacementStrategy::NeighbourScore,
    ];

    /// Short code as used in configuration and the API.
    pub fn code(&self) -> &'static str {
        match self {
            PlacementStrategy::DeepestBottomLeft => "DBL",
            PlacementStrategy::MaximumContact => "MC",
            PlacementStrategy::SmallestExtrusion => "SE",
            PlacementStrategy::NeighbourScore => "NS",
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown placement strategy '{0}' (expected DBL, MC, SE or NS)")]
pub struct UnknownStrategy(pub String);

impl FromStr for PlacementStrategy {
    type Err = UnknownStrategy;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dbl" | "deepest-bottom-left" => Ok(PlacementStrategy::DeepestBottomLeft),
            "mc" | "maximum-contact" => Ok(PlacementStrategy::MaximumContact),
            "se" | "smallest-extrusion" => Ok(PlacementStrategy::SmallestExtrusion),
            "ns" | "neighbour-score" | "neighbor-score" => Ok(PlacementStrategy::NeighbourScore),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
