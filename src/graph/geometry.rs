//! Slope comparisons and strict segment intersection on *original*
//! coordinates. Slopes are only ever compared, never used as
//! coordinates, so float drift near-vertical is tolerated; an actually
//! vertical edge (`dx == 0`) is a hard construction-time error, checked
//! separately in `graph::mod`.

/// `slope(a -> b)`. Returns `None` when `a.x == b.x` (undefined slope).
pub fn slope(ax: f64, ay: f64, bx: f64, by: f64) -> Option<f64> {
    if ax == bx {
        None
    } else {
        Some((by - ay) / (bx - ax))
    }
}

fn cross(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

fn direction(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    cross(cx - ax, cy - ay, bx - ax, by - ay)
}

/// True iff segment `(e1_source, e1_target)` and `(e2_source, e2_target)`
/// cross at an interior point of both (collinear or endpoint-touching pairs
/// don't count).
#[allow(clippy::too_many_arguments)]
pub fn segments_intersect_strictly(
    e1_source: (f64, f64),
    e1_target: (f64, f64),
    e2_source: (f64, f64),
    e2_target: (f64, f64),
) -> bool {
    let dir1 = direction(e1_source.0, e1_source.1, e1_target.0, e1_target.1, e2_source.0, e2_source.1);
    let dir2 = direction(e1_source.0, e1_source.1, e1_target.0, e1_target.1, e2_target.0, e2_target.1);
    let dir3 = direction(e2_source.0, e2_source.1, e2_target.0, e2_target.1, e1_source.0, e1_source.1);
    let dir4 = direction(e2_source.0, e2_source.1, e2_target.0, e2_target.1, e1_target.0, e1_target.1);

    dir1 * dir2 < 0.0 && dir3 * dir4 < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_undefined_on_shared_x() {
        assert_eq!(slope(1.0, 0.0, 1.0, 5.0), None);
    }

    #[test]
    fn slope_basic() {
        assert_eq!(slope(0.0, 0.0, 2.0, 4.0), Some(2.0));
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect_strictly(
            (0.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (2.0, 0.0),
        ));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(!segments_intersect_strictly(
            (0.0, 0.0),
            (2.0, 0.0),
            (0.0, 1.0),
            (2.0, 1.0),
        ));
    }

    #[test]
    fn touching_endpoints_do_not_count() {
        assert!(!segments_intersect_strictly(
            (0.0, 0.0),
            (2.0, 2.0),
            (2.0, 2.0),
            (4.0, 0.0),
        ));
    }
}
