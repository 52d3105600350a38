//! Orthogonal connector routing.
//!
//! Given two shape-attached endpoints, computes a right-angle-only
//! polyline between their anchor points that avoids both shapes. The
//! router derives ruler lines from the inflated shape edges, partitions
//! the working bounds into a grid, emits candidate waypoints, links the
//! adjacent ones into a [`PointGraph`] and runs a bend-penalized shortest
//! path. Every call builds its own graph, so routing many connectors
//! concurrently is safe.

mod graph;
mod grid;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point, Rect};

use self::graph::PointGraph;
use self::grid::{build_grid, grid_points};

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    /// A point the router needs was never inserted into the candidate
    /// graph. Reaching this from [`route`] is a bug; it is surfaced for
    /// callers driving [`PointGraph`]-level plumbing through the scene
    /// layer.
    #[error("routing point ({x}, {y}) is not in the candidate graph")]
    PointNotFound { x: f32, y: f32 },
}

/// Side of a shape a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Top/bottom anchors pin a vertical ruler (their x); left/right
    /// anchors pin a horizontal one (their y).
    fn pins_vertical_ruler(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// One end of a routing request: a shape, the side the connector leaves
/// from and the normalized position of the anchor along that side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorEndpoint {
    pub shape: Rect,
    pub side: Side,
    /// Position of the anchor along the side, in `[0, 1]`.
    pub distance: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteOptions {
    pub source: ConnectorEndpoint,
    pub target: ConnectorEndpoint,
    /// Clearance kept around each shape. Disabled for a call when the
    /// inflated shapes would overlap.
    pub shape_margin: f32,
    /// Extra margin around the union of both inflated shapes.
    pub global_bounds_margin: f32,
    /// Overall canvas bound the working area is clipped to.
    pub global_bounds: Rect,
}

/// Everything the router computed on the way to the path. Informational
/// only, recomputed from scratch on every call; useful for debug overlays.
#[derive(Debug, Clone, Default)]
pub struct RouteDiagnostics {
    pub v_rulers: Vec<f32>,
    pub h_rulers: Vec<f32>,
    pub spots: Vec<Point>,
    pub grid: Vec<Rect>,
    pub connections: Vec<(Point, Point)>,
    /// Shape margin actually applied; zero when the inflated shapes
    /// overlapped and margining was disabled.
    pub shape_margin: f32,
}

#[derive(Debug, Clone)]
pub struct RouteResult {
    /// Simplified orthogonal path, anchor to anchor. Empty when no route
    /// exists — a valid outcome the caller handles (straight-line
    /// fallback, hiding the edge).
    pub path: Vec<Point>,
    pub diagnostics: RouteDiagnostics,
}

/// Literal coordinate where the connector attaches to the shape boundary.
pub fn anchor_point(endpoint: &ConnectorEndpoint) -> Point {
    let shape = endpoint.shape;
    match endpoint.side {
        Side::Top => Point::new(shape.left + shape.width * endpoint.distance, shape.top),
        Side::Bottom => Point::new(shape.left + shape.width * endpoint.distance, shape.bottom()),
        Side::Left => Point::new(shape.left, shape.top + shape.height * endpoint.distance),
        Side::Right => Point::new(shape.right(), shape.top + shape.height * endpoint.distance),
    }
}

/// Anchor point extruded outward by `margin` along the side normal; the
/// routing origin/destination ("antenna"). Falls back to the anchor
/// itself when the margin is zero.
fn extruded_anchor(endpoint: &ConnectorEndpoint, margin: f32) -> Point {
    let anchor = anchor_point(endpoint);
    match endpoint.side {
        Side::Top => Point::new(anchor.x, anchor.y - margin),
        Side::Right => Point::new(anchor.x + margin, anchor.y),
        Side::Bottom => Point::new(anchor.x, anchor.y + margin),
        Side::Left => Point::new(anchor.x - margin, anchor.y),
    }
}

/// Routes between the two endpoints and returns just the path.
pub fn route(options: &RouteOptions) -> Result<Vec<Point>, RouteError> {
    Ok(route_detailed(options)?.path)
}

/// Routes between the two endpoints, keeping the per-call diagnostics.
pub fn route_detailed(options: &RouteOptions) -> Result<RouteResult, RouteError> {
    let source = &options.source;
    let target = &options.target;
    let anchor_a = anchor_point(source);
    let anchor_b = anchor_point(target);

    let mut margin = options.shape_margin;
    let mut shape_a = source.shape.inflate(margin, margin);
    let mut shape_b = target.shape.inflate(margin, margin);
    // Shapes that are already touching cannot afford clearance; margined
    // routing would enclose one anchor completely.
    if shape_a.intersects(&shape_b) {
        margin = 0.0;
        shape_a = source.shape;
        shape_b = target.shape;
    }

    let outer = shape_a
        .union(&shape_b)
        .inflate(options.global_bounds_margin, options.global_bounds_margin);
    let global = options.global_bounds;
    let bounds = Rect::from_ltrb(
        outer.left.max(global.left),
        outer.top.max(global.top),
        outer.right().min(global.right()),
        outer.bottom().min(global.bottom()),
    );

    let mut verticals = vec![shape_a.left, shape_a.right(), shape_b.left, shape_b.right()];
    let mut horizontals = vec![shape_a.top, shape_a.bottom(), shape_b.top, shape_b.bottom()];
    for endpoint in [source, target] {
        let anchor = anchor_point(endpoint);
        if endpoint.side.pins_vertical_ruler() {
            verticals.push(anchor.x);
        } else {
            horizontals.push(anchor.y);
        }
    }
    verticals.retain(|&x| bounds.left < x && x < bounds.right());
    horizontals.retain(|&y| bounds.top < y && y < bounds.bottom());
    verticals.sort_by(f32::total_cmp);
    horizontals.sort_by(f32::total_cmp);

    let origin = extruded_anchor(source, margin);
    let destination = extruded_anchor(target, margin);

    // Antennas go in first; they sit on the inflated boundary and must
    // survive the obstacle filter applied to grid spots.
    let mut spots = vec![origin, destination];
    let grid = build_grid(&verticals, &horizontals, bounds);
    spots.extend(grid_points(&grid, &[shape_a, shape_b]));

    let (mut point_graph, connections) = build_graph(&spots)?;

    let diagnostics = RouteDiagnostics {
        v_rulers: verticals,
        h_rulers: horizontals,
        grid: grid.rectangles(),
        spots,
        connections,
        shape_margin: margin,
    };

    let raw = point_graph.shortest_path(origin, destination)?;
    let path = if raw.is_empty() {
        Vec::new()
    } else {
        let mut full = Vec::with_capacity(raw.len() + 2);
        full.push(anchor_a);
        full.extend(raw);
        full.push(anchor_b);
        simplify_path(&full)
    };

    Ok(RouteResult { path, diagnostics })
}

/// Links every pair of horizontally- or vertically-adjacent hot
/// coordinates whose points are both present, bidirectionally. Adjacency
/// means consecutive in the sorted unique coordinate lists; a missing
/// point breaks the run rather than being skipped over.
fn build_graph(spots: &[Point]) -> Result<(PointGraph, Vec<(Point, Point)>), RouteError> {
    let mut xs: Vec<f32> = Vec::new();
    let mut ys: Vec<f32> = Vec::new();
    let mut point_graph = PointGraph::new();
    for &spot in spots {
        if !xs.contains(&spot.x) {
            xs.push(spot.x);
        }
        if !ys.contains(&spot.y) {
            ys.push(spot.y);
        }
        point_graph.add(spot);
    }
    xs.sort_by(f32::total_cmp);
    ys.sort_by(f32::total_cmp);

    let mut connections = Vec::new();
    for (yi, &y) in ys.iter().enumerate() {
        for (xi, &x) in xs.iter().enumerate() {
            let current = Point::new(x, y);
            if !point_graph.has(current) {
                continue;
            }
            if xi > 0 {
                let left = Point::new(xs[xi - 1], y);
                if point_graph.has(left) {
                    point_graph.connect(left, current)?;
                    point_graph.connect(current, left)?;
                    connections.push((left, current));
                }
            }
            if yi > 0 {
                let above = Point::new(x, ys[yi - 1]);
                if point_graph.has(above) {
                    point_graph.connect(above, current)?;
                    point_graph.connect(current, above)?;
                    connections.push((above, current));
                }
            }
        }
    }
    Ok((point_graph, connections))
}

/// Drops interior points that continue a straight horizontal or vertical
/// run, keeping the first point, the last point and every bend.
/// Collinearity is exact coordinate equality on x or y; floating-point
/// near-misses are not merged.
pub fn simplify_path(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut simplified = vec![points[0]];
    for i in 1..points.len() - 1 {
        let (prev, current, next) = (points[i - 1], points[i], points[i + 1]);
        let straight = (prev.x == current.x && current.x == next.x)
            || (prev.y == current.y && current.y == next.y);
        if !straight {
            simplified.push(current);
        }
    }
    simplified.push(points[points.len() - 1]);
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(shape: Rect, side: Side, distance: f32) -> ConnectorEndpoint {
        ConnectorEndpoint {
            shape,
            side,
            distance,
        }
    }

    #[test]
    fn anchors_interpolate_along_the_side() {
        let shape = Rect::new(0.0, 0.0, 40.0, 20.0);
        assert_eq!(
            anchor_point(&endpoint(shape, Side::Top, 0.25)),
            Point::new(10.0, 0.0)
        );
        assert_eq!(
            anchor_point(&endpoint(shape, Side::Bottom, 1.0)),
            Point::new(40.0, 20.0)
        );
        assert_eq!(
            anchor_point(&endpoint(shape, Side::Left, 0.5)),
            Point::new(0.0, 10.0)
        );
        assert_eq!(
            anchor_point(&endpoint(shape, Side::Right, 0.0)),
            Point::new(40.0, 0.0)
        );
    }

    #[test]
    fn antennas_extrude_along_the_side_normal() {
        let shape = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert_eq!(
            extruded_anchor(&endpoint(shape, Side::Top, 0.5), 10.0),
            Point::new(20.0, -10.0)
        );
        assert_eq!(
            extruded_anchor(&endpoint(shape, Side::Right, 0.5), 10.0),
            Point::new(50.0, 20.0)
        );
        assert_eq!(
            extruded_anchor(&endpoint(shape, Side::Left, 0.5), 0.0),
            anchor_point(&endpoint(shape, Side::Left, 0.5))
        );
    }

    #[test]
    fn simplify_keeps_bends_only() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 10.0),
        ];
        let simplified = simplify_path(&path);
        assert_eq!(
            simplified,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn simplify_is_idempotent() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(20.0, 5.0),
            Point::new(30.0, 5.0),
            Point::new(30.0, 9.0),
        ];
        let once = simplify_path(&path);
        let twice = simplify_path(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn simplify_preserves_short_paths() {
        let path = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(simplify_path(&path), path.to_vec());
    }

    #[test]
    fn degenerate_shapes_still_route() {
        // Zero-size shapes reduce to point-like anchors.
        let options = RouteOptions {
            source: endpoint(Rect::new(0.0, 0.0, 0.0, 0.0), Side::Right, 0.5),
            target: endpoint(Rect::new(100.0, 0.0, 0.0, 0.0), Side::Left, 0.5),
            shape_margin: 10.0,
            global_bounds_margin: 20.0,
            global_bounds: Rect::new(-200.0, -200.0, 600.0, 600.0),
        };
        let result = route_detailed(&options).unwrap();
        if let (Some(first), Some(last)) = (result.path.first(), result.path.last()) {
            assert_eq!(*first, Point::new(0.0, 0.0));
            assert_eq!(*last, Point::new(100.0, 0.0));
        }
    }
}
