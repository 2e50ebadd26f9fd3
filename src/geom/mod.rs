pub mod merge;
pub mod primitives;

use serde::{Deserialize, Serialize};

pub use merge::merge_rings;
pub use primitives::{point_in_ring, rings_overlap, segment_intersection};

/// A geographic point in degrees, as exchanged with the map surface and
/// the zone documents on disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Closed polygon boundary: the segment from the last point back to the
/// first is part of the boundary. Fewer than 3 points is "no polygon".
pub type Ring = Vec<GeoPoint>;

/// Absolute epsilon below which a segment pair is treated as parallel.
///
/// Deliberately not scaled to coordinate magnitude; coordinates here are
/// degrees, so magnitudes stay within a couple of orders of each other.
pub const PARALLEL_TOLERANCE: f64 = 1e-10;

/// Per-axis tolerance used to match a traced point against a recorded
/// ring crossing during a merge walk.
pub const CROSSING_MATCH_TOLERANCE: f64 = 1e-5;
