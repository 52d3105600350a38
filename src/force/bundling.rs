use crate::geometry::{Point, distance};

use super::ForceNode;

/// Bundling stiffness; scales the spring constant of every edge.
const DEFAULT_STIFFNESS: f32 = 0.1;
/// Initial displacement step, halved every cycle.
const DEFAULT_STEP_SIZE: f32 = 0.1;
/// Number of refinement cycles.
const DEFAULT_CYCLES: usize = 6;
/// Subdivision seed; doubles every cycle.
const DEFAULT_SUBDIVISIONS: usize = 1;
const DEFAULT_SUBDIVISION_RATE: usize = 2;
/// Iterations in the first cycle, decaying geometrically.
const DEFAULT_ITERATIONS: f32 = 90.0;
const DEFAULT_ITERATION_DECAY: f32 = 2.0 / 3.0;
/// Minimum combined compatibility for two edges to interact.
const DEFAULT_COMPATIBILITY_THRESHOLD: f32 = 0.6;
const EPS: f32 = 1e-6;

/// Edge between two node indices of the caller's node array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleEdge {
    pub source: usize,
    pub target: usize,
}

/// Force-directed edge bundling: iteratively subdivides each edge and
/// lets the subdivision points attract their neighbors on the same edge
/// (spring) and the matching points of compatible edges (electrostatic),
/// so that edges sharing a corridor merge into coherent bundles.
///
/// [`run`](Self::run) recomputes from scratch; there is no incremental
/// update. Rerun it whenever node positions change materially.
pub struct ForceEdgeBundling {
    nodes: Vec<Point>,
    edges: Vec<BundleEdge>,
    stiffness: f32,
    step_size: f32,
    cycles: usize,
    subdivisions: usize,
    subdivision_rate: usize,
    iterations: f32,
    iteration_decay: f32,
    compatibility_threshold: f32,
}

impl Default for ForceEdgeBundling {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            stiffness: DEFAULT_STIFFNESS,
            step_size: DEFAULT_STEP_SIZE,
            cycles: DEFAULT_CYCLES,
            subdivisions: DEFAULT_SUBDIVISIONS,
            subdivision_rate: DEFAULT_SUBDIVISION_RATE,
            iterations: DEFAULT_ITERATIONS,
            iteration_decay: DEFAULT_ITERATION_DECAY,
            compatibility_threshold: DEFAULT_COMPATIBILITY_THRESHOLD,
        }
    }
}

impl ForceEdgeBundling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node positions; only x/y participate in bundling, z is interpolated
    /// afterwards by the caller (see [`interpolate_z`](super::interpolate_z)).
    pub fn nodes(mut self, nodes: &[ForceNode]) -> Self {
        self.nodes = nodes.iter().map(|n| Point::new(n.x, n.y)).collect();
        self
    }

    pub fn points(mut self, points: Vec<Point>) -> Self {
        self.nodes = points;
        self
    }

    pub fn edges(mut self, edges: Vec<BundleEdge>) -> Self {
        self.edges = edges;
        self
    }

    pub fn stiffness(mut self, k: f32) -> Self {
        self.stiffness = k;
        self
    }

    pub fn step_size(mut self, s: f32) -> Self {
        self.step_size = s;
        self
    }

    pub fn cycles(mut self, c: usize) -> Self {
        self.cycles = c;
        self
    }

    pub fn iterations(mut self, i: f32) -> Self {
        self.iterations = i;
        self
    }

    pub fn compatibility_threshold(mut self, t: f32) -> Self {
        self.compatibility_threshold = t;
        self
    }

    /// Runs the bundling and returns, per input edge, the ordered interior
    /// points of the bundled polyline — the true endpoints are excluded
    /// and re-added by the caller. Self-loops and edges whose endpoints
    /// coincide yield an empty list.
    pub fn run(&self) -> Vec<Vec<Point>> {
        // Dense list of workable edges, remembering which input slot each
        // came from.
        let mut dense: Vec<(Point, Point)> = Vec::new();
        let mut slot_of: Vec<Option<usize>> = vec![None; self.edges.len()];
        for (i, edge) in self.edges.iter().enumerate() {
            let (Some(&s), Some(&t)) = (self.nodes.get(edge.source), self.nodes.get(edge.target))
            else {
                continue;
            };
            if (s.x - t.x).abs() < EPS && (s.y - t.y).abs() < EPS {
                continue;
            }
            slot_of[i] = Some(dense.len());
            dense.push((s, t));
        }
        if dense.is_empty() {
            return vec![Vec::new(); self.edges.len()];
        }

        let mut subdivisions: Vec<Vec<Point>> = vec![Vec::new(); dense.len()];
        let compatibility = self.compatibility_lists(&dense);

        let mut step = self.step_size;
        let mut iterations = self.iterations;
        let mut p = self.subdivisions;
        update_edge_divisions(&mut subdivisions, &dense, p);

        for _cycle in 0..self.cycles {
            for _ in 0..iterations.ceil() as usize {
                let forces: Vec<Vec<(f32, f32)>> = (0..dense.len())
                    .map(|e| self.point_forces(&subdivisions, &compatibility, &dense, e, p, step))
                    .collect();
                for (e, edge_forces) in forces.iter().enumerate() {
                    for i in 0..=p {
                        subdivisions[e][i].x += edge_forces[i].0;
                        subdivisions[e][i].y += edge_forces[i].1;
                    }
                }
            }
            step /= 2.0;
            p *= self.subdivision_rate;
            iterations *= self.iteration_decay;
            update_edge_divisions(&mut subdivisions, &dense, p);
        }

        slot_of
            .iter()
            .map(|slot| match slot {
                Some(e) => {
                    let path = &subdivisions[*e];
                    path[1..path.len() - 1].to_vec()
                }
                None => Vec::new(),
            })
            .collect()
    }

    /// Spring + electrostatic force on every subdivision point of edge
    /// `e`, scaled by the current step size. Entries for both endpoints
    /// are zero so they never move.
    fn point_forces(
        &self,
        subdivisions: &[Vec<Point>],
        compatibility: &[Vec<usize>],
        dense: &[(Point, Point)],
        e: usize,
        p: usize,
        step: f32,
    ) -> Vec<(f32, f32)> {
        let (source, target) = dense[e];
        let spring_k = self.stiffness / (edge_length(source, target) * (p as f32 + 1.0));
        let mut forces = Vec::with_capacity(p + 2);
        forces.push((0.0, 0.0));
        for i in 1..=p {
            let own = &subdivisions[e];
            let spring_x = own[i - 1].x - own[i].x + own[i + 1].x - own[i].x;
            let spring_y = own[i - 1].y - own[i].y + own[i + 1].y - own[i].y;

            let mut electro_x = 0.0;
            let mut electro_y = 0.0;
            for &other in &compatibility[e] {
                let fx = subdivisions[other][i].x - own[i].x;
                let fy = subdivisions[other][i].y - own[i].y;
                if fx.abs() > EPS || fy.abs() > EPS {
                    let inv = 1.0 / distance(subdivisions[other][i], own[i]);
                    electro_x += fx * inv;
                    electro_y += fy * inv;
                }
            }
            forces.push((
                step * (spring_k * spring_x + electro_x),
                step * (spring_k * spring_y + electro_y),
            ));
        }
        forces.push((0.0, 0.0));
        forces
    }

    fn compatibility_lists(&self, dense: &[(Point, Point)]) -> Vec<Vec<usize>> {
        let mut lists = vec![Vec::new(); dense.len()];
        for e in 0..dense.len() {
            for other in e + 1..dense.len() {
                if self.compatibility_score(dense[e], dense[other]) >= self.compatibility_threshold
                {
                    lists[e].push(other);
                    lists[other].push(e);
                }
            }
        }
        lists
    }

    fn compatibility_score(&self, p: (Point, Point), q: (Point, Point)) -> f32 {
        angle_compatibility(p, q)
            * scale_compatibility(p, q)
            * position_compatibility(p, q)
            * visibility_compatibility(p, q)
    }
}

fn edge_length(source: Point, target: Point) -> f32 {
    // Degenerate edges get epsilon length so spring constants stay finite.
    if (source.x - target.x).abs() < EPS && (source.y - target.y).abs() < EPS {
        EPS
    } else {
        distance(source, target)
    }
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Resamples every edge's polyline into `p` evenly spaced interior
/// points. For `p == 1` the polyline is reseeded with the edge midpoint.
fn update_edge_divisions(subdivisions: &mut [Vec<Point>], dense: &[(Point, Point)], p: usize) {
    for (e, &(source, target)) in dense.iter().enumerate() {
        if p == 1 {
            subdivisions[e] = vec![source, midpoint(source, target), target];
            continue;
        }
        let divided: f32 = subdivisions[e]
            .windows(2)
            .map(|w| distance(w[0], w[1]))
            .sum();
        let segment = divided / (p as f32 + 1.0);
        let mut remaining = segment;
        let mut resampled = vec![source];
        let old = &subdivisions[e];
        for i in 1..old.len() {
            let mut span = distance(old[i], old[i - 1]);
            while span > remaining {
                let percent = remaining / span;
                resampled.push(Point::new(
                    old[i - 1].x + percent * (old[i].x - old[i - 1].x),
                    old[i - 1].y + percent * (old[i].y - old[i - 1].y),
                ));
                span -= remaining;
                remaining = segment;
            }
            remaining -= span;
        }
        resampled.push(target);
        // Accumulated float error can land the resampling one point short
        // of (or past) the target count; the force pass indexes 0..=p+1.
        while resampled.len() < p + 2 {
            let idx = resampled.len() - 1;
            resampled.insert(idx, resampled[idx - 1]);
        }
        while resampled.len() > p + 2 {
            let idx = resampled.len() - 2;
            resampled.remove(idx);
        }
        subdivisions[e] = resampled;
    }
}

fn angle_compatibility(p: (Point, Point), q: (Point, Point)) -> f32 {
    let pv = (p.1.x - p.0.x, p.1.y - p.0.y);
    let qv = (q.1.x - q.0.x, q.1.y - q.0.y);
    let dot = pv.0 * qv.0 + pv.1 * qv.1;
    (dot / (edge_length(p.0, p.1) * edge_length(q.0, q.1))).abs()
}

fn scale_compatibility(p: (Point, Point), q: (Point, Point)) -> f32 {
    let lp = edge_length(p.0, p.1);
    let lq = edge_length(q.0, q.1);
    let lavg = (lp + lq) / 2.0;
    2.0 / (lavg / lp.min(lq) + lp.max(lq) / lavg)
}

fn position_compatibility(p: (Point, Point), q: (Point, Point)) -> f32 {
    let lavg = (edge_length(p.0, p.1) + edge_length(q.0, q.1)) / 2.0;
    lavg / (lavg + distance(midpoint(p.0, p.1), midpoint(q.0, q.1)))
}

fn project_onto(point: Point, line: (Point, Point)) -> Point {
    let l = distance(line.0, line.1);
    let r = ((line.0.y - point.y) * (line.0.y - line.1.y)
        - (line.0.x - point.x) * (line.1.x - line.0.x))
        / (l * l);
    Point::new(
        line.0.x + r * (line.1.x - line.0.x),
        line.0.y + r * (line.1.y - line.0.y),
    )
}

fn visibility(p: (Point, Point), q: (Point, Point)) -> f32 {
    let i0 = project_onto(q.0, p);
    let i1 = project_onto(q.1, p);
    let mid_i = midpoint(i0, i1);
    let mid_p = midpoint(p.0, p.1);
    (1.0 - 2.0 * distance(mid_p, mid_i) / distance(i0, i1)).max(0.0)
}

fn visibility_compatibility(p: (Point, Point), q: (Point, Point)) -> f32 {
    visibility(p, q).min(visibility(q, p))
}
