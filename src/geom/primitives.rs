use super::{GeoPoint, PARALLEL_TOLERANCE};

/// Ray-casting (even-odd) containment test, cast along the latitude axis.
///
/// An edge toggles containment only when its endpoint longitudes lie on
/// *strictly* opposite sides of the test longitude. Edges parallel to the
/// cast ray, and edges with an endpoint exactly at the test longitude,
/// contribute no toggle — a point sitting on such an edge can be reported
/// outside. Known boundary-precision caveat, kept for compatibility with
/// the field app.
#[must_use]
pub fn point_in_ring(point: &GeoPoint, ring: &[GeoPoint]) -> bool {
    let n = ring.len();
    let mut inside = false;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        let straddles = (a.longitude < point.longitude && b.longitude > point.longitude)
            || (a.longitude > point.longitude && b.longitude < point.longitude);
        if !straddles {
            continue;
        }
        let t = (point.longitude - a.longitude) / (b.longitude - a.longitude);
        let latitude_at = a.latitude + t * (b.latitude - a.latitude);
        if point.latitude < latitude_at {
            inside = !inside;
        }
    }
    inside
}

/// Vertex-only overlap predicate: true iff some vertex of one ring lies
/// inside the other.
///
/// Misses overlaps where two shapes cross only along edges without either
/// containing a vertex of the other (a "+"-shaped crossing). The merge
/// zero-crossing fallback assumes this definition, so it stays vertex-only.
#[must_use]
pub fn rings_overlap(a: &[GeoPoint], b: &[GeoPoint]) -> bool {
    a.iter().any(|p| point_in_ring(p, b)) || b.iter().any(|p| point_in_ring(p, a))
}

/// Bounded segment-segment intersection via the determinant form.
///
/// Returns the intersection point of `p1→p2` and `p3→p4`, or `None` when
/// the segments are (near-)parallel or the crossing falls outside either
/// segment. Endpoints count as intersections.
#[must_use]
pub fn segment_intersection(
    p1: &GeoPoint,
    p2: &GeoPoint,
    p3: &GeoPoint,
    p4: &GeoPoint,
) -> Option<GeoPoint> {
    let (x1, y1) = (p1.latitude, p1.longitude);
    let (x2, y2) = (p2.latitude, p2.longitude);
    let (x3, y3) = (p3.latitude, p3.longitude);
    let (x4, y4) = (p4.latitude, p4.longitude);

    let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if d.abs() < PARALLEL_TOLERANCE {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / d;
    let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / d;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(GeoPoint::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1)))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng)
    }

    fn unit_square() -> Vec<GeoPoint> {
        vec![p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0)]
    }

    #[test]
    fn point_inside_square() {
        assert!(point_in_ring(&p(5.0, 5.0), &unit_square()));
    }

    #[test]
    fn point_outside_square() {
        assert!(!point_in_ring(&p(15.0, 5.0), &unit_square()));
        assert!(!point_in_ring(&p(5.0, -1.0), &unit_square()));
    }

    #[test]
    fn containment_invariant_under_ring_rotation() {
        let ring = unit_square();
        let probes = [p(5.0, 5.0), p(15.0, 5.0), p(1.0, 9.0), p(-1.0, -1.0)];
        for start in 0..ring.len() {
            let mut rotated = ring[start..].to_vec();
            rotated.extend_from_slice(&ring[..start]);
            for probe in &probes {
                assert_eq!(
                    point_in_ring(probe, &ring),
                    point_in_ring(probe, &rotated),
                    "rotation start {start} changed containment of {probe:?}"
                );
            }
        }
    }

    #[test]
    fn point_on_ray_parallel_edge_reported_outside() {
        // (5, 0) sits on the lng=0 edge of the square. Both edges touching
        // that longitude fail the strict straddle test, so the point is
        // reported outside. Pinned field-app behaviour, not a bug to fix.
        assert!(!point_in_ring(&p(5.0, 0.0), &unit_square()));
    }

    #[test]
    fn degenerate_ring_contains_nothing() {
        assert!(!point_in_ring(&p(0.0, 0.0), &[]));
        assert!(!point_in_ring(&p(0.5, 0.5), &[p(0.0, 0.0), p(1.0, 1.0)]));
    }

    #[test]
    fn overlap_when_vertex_contained() {
        let a = unit_square();
        let b = vec![p(5.0, 5.0), p(5.0, 15.0), p(15.0, 15.0), p(15.0, 5.0)];
        assert!(rings_overlap(&a, &b));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = unit_square();
        let b = vec![p(5.0, 5.0), p(5.0, 15.0), p(15.0, 15.0), p(15.0, 5.0)];
        let c = vec![p(20.0, 20.0), p(20.0, 25.0), p(25.0, 25.0), p(25.0, 20.0)];
        assert_eq!(rings_overlap(&a, &b), rings_overlap(&b, &a));
        assert_eq!(rings_overlap(&a, &c), rings_overlap(&c, &a));
    }

    #[test]
    fn no_overlap_when_disjoint() {
        let a = unit_square();
        let b = vec![p(20.0, 20.0), p(20.0, 25.0), p(25.0, 25.0), p(25.0, 20.0)];
        assert!(!rings_overlap(&a, &b));
    }

    #[test]
    fn cross_shaped_overlap_is_missed() {
        // Two thin rectangles crossing in a "+": every vertex of each lies
        // outside the other, so the vertex-only predicate reports false.
        // Pinned simplification.
        let horizontal = vec![p(4.0, 0.0), p(4.0, 10.0), p(6.0, 10.0), p(6.0, 0.0)];
        let vertical = vec![p(0.0, 4.0), p(0.0, 6.0), p(10.0, 6.0), p(10.0, 4.0)];
        assert!(!rings_overlap(&horizontal, &vertical));
    }

    #[test]
    fn segments_crossing() {
        let hit = segment_intersection(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0))
            .unwrap();
        assert_relative_eq!(hit.latitude, 1.0);
        assert_relative_eq!(hit.longitude, 1.0);
    }

    #[test]
    fn segments_parallel_returns_none() {
        assert!(
            segment_intersection(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)).is_none()
        );
        // Collinear overlapping segments also hit the parallel guard.
        assert!(
            segment_intersection(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0)).is_none()
        );
    }

    #[test]
    fn segments_meeting_at_endpoint() {
        let hit = segment_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 0.0))
            .unwrap();
        assert_relative_eq!(hit.latitude, 1.0);
        assert_relative_eq!(hit.longitude, 1.0);
    }

    #[test]
    fn segments_crossing_outside_bounds() {
        // Lines cross at (3, 3), beyond the end of the first segment.
        assert!(
            segment_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(0.0, 6.0), &p(6.0, 0.0)).is_none()
        );
    }
}
