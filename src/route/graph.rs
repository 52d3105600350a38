use std::collections::HashMap;

use crate::geometry::{Point, distance};

use super::RouteError;

/// Orientation of a grid edge. Only compared for equality when scoring
/// direction changes, so the labels themselves carry no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

fn orientation_of(a: Point, b: Point) -> Option<Orientation> {
    if a.y == b.y {
        Some(Orientation::Horizontal)
    } else if a.x == b.x {
        Some(Orientation::Vertical)
    } else {
        None
    }
}

/// Exact-equality coordinate key. Coordinates are compared by bit pattern
/// with `-0.0` folded onto `0.0`, so both spellings of zero address the
/// same node. Rulers come straight from shape edges, which makes exact
/// matching the intended semantics; no epsilon is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PointKey(u32, u32);

impl PointKey {
    pub(crate) fn of(p: Point) -> Self {
        let x = if p.x == 0.0 { 0.0 } else { p.x };
        let y = if p.y == 0.0 { 0.0 } else { p.y };
        PointKey(x.to_bits(), y.to_bits())
    }
}

#[derive(Debug)]
struct PointNode {
    point: Point,
    /// Tentative shortest-path cost from the origin.
    cost: f32,
    /// Predecessor on the current best path from the origin.
    prev: Option<usize>,
    adjacent: Vec<(usize, f32)>,
}

/// Sparse graph of candidate routing points. One graph is built per
/// `route` call; shortest-path state never leaks across calls.
#[derive(Debug, Default)]
pub(crate) struct PointGraph {
    nodes: Vec<PointNode>,
    index: HashMap<PointKey, usize>,
}

impl PointGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a point; repeated insertions at the same coordinate are
    /// idempotent.
    pub(crate) fn add(&mut self, p: Point) {
        let key = PointKey::of(p);
        if self.index.contains_key(&key) {
            return;
        }
        self.nodes.push(PointNode {
            point: p,
            cost: f32::INFINITY,
            prev: None,
            adjacent: Vec::new(),
        });
        self.index.insert(key, self.nodes.len() - 1);
    }

    pub(crate) fn has(&self, p: Point) -> bool {
        self.index.contains_key(&PointKey::of(p))
    }

    fn get(&self, p: Point) -> Option<usize> {
        self.index.get(&PointKey::of(p)).copied()
    }

    /// Adds a directed edge from `a` to `b` weighted by their Euclidean
    /// distance. Both points must have been inserted beforehand.
    pub(crate) fn connect(&mut self, a: Point, b: Point) -> Result<(), RouteError> {
        let ai = self.get(a).ok_or(RouteError::PointNotFound { x: a.x, y: a.y })?;
        let bi = self.get(b).ok_or(RouteError::PointNotFound { x: b.x, y: b.y })?;
        let weight = distance(a, b);
        self.nodes[ai].adjacent.push((bi, weight));
        Ok(())
    }

    /// Dijkstra over the candidate points with an extra penalty of
    /// `(weight + 1)²` whenever an edge changes direction relative to the
    /// edge that reached the current node. Candidate point counts stay in
    /// the tens to low hundreds, so the unsettled set is scanned linearly;
    /// the first node holding the minimum wins, which makes insertion
    /// order the tie-break.
    ///
    /// The returned sequence starts at the origin and ends at the node
    /// preceding the destination. It is empty when the destination was
    /// never reached or coincides with the origin.
    pub(crate) fn shortest_path(
        &mut self,
        origin: Point,
        destination: Point,
    ) -> Result<Vec<Point>, RouteError> {
        let source = self.get(origin).ok_or(RouteError::PointNotFound {
            x: origin.x,
            y: origin.y,
        })?;
        let goal = self.get(destination).ok_or(RouteError::PointNotFound {
            x: destination.x,
            y: destination.y,
        })?;

        self.nodes[source].cost = 0.0;
        let mut settled = vec![false; self.nodes.len()];
        let mut queued = vec![false; self.nodes.len()];
        let mut unsettled = vec![source];
        queued[source] = true;

        while !unsettled.is_empty() {
            let slot = lowest_cost_slot(&self.nodes, &unsettled);
            let current = unsettled.remove(slot);
            queued[current] = false;
            let edges = self.nodes[current].adjacent.clone();
            for (neighbor, weight) in edges {
                if settled[neighbor] {
                    continue;
                }
                self.relax(neighbor, weight, current);
                if !queued[neighbor] {
                    unsettled.push(neighbor);
                    queued[neighbor] = true;
                }
            }
            settled[current] = true;
        }

        let mut path = Vec::new();
        let mut cursor = self.nodes[goal].prev;
        while let Some(idx) = cursor {
            path.push(self.nodes[idx].point);
            cursor = self.nodes[idx].prev;
        }
        path.reverse();
        Ok(path)
    }

    fn relax(&mut self, target: usize, weight: f32, via: usize) {
        let via_point = self.nodes[via].point;
        let coming = self.nodes[via]
            .prev
            .and_then(|p| orientation_of(self.nodes[p].point, via_point));
        let going = orientation_of(via_point, self.nodes[target].point);
        let penalty = match (coming, going) {
            (Some(c), Some(g)) if c != g => (weight + 1.0).powi(2),
            _ => 0.0,
        };
        let candidate = self.nodes[via].cost + weight + penalty;
        if candidate < self.nodes[target].cost {
            self.nodes[target].cost = candidate;
            self.nodes[target].prev = Some(via);
        }
    }

    #[cfg(test)]
    fn cost_of(&self, p: Point) -> Option<f32> {
        self.get(p).map(|idx| self.nodes[idx].cost)
    }
}

fn lowest_cost_slot(nodes: &[PointNode], unsettled: &[usize]) -> usize {
    let mut best_slot = 0;
    let mut best_cost = f32::INFINITY;
    for (slot, &idx) in unsettled.iter().enumerate() {
        if nodes[idx].cost < best_cost {
            best_cost = nodes[idx].cost;
            best_slot = slot;
        }
    }
    best_slot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder() -> PointGraph {
        // 3x3 unit lattice, fully connected along rows and columns.
        let mut graph = PointGraph::new();
        for y in 0..3 {
            for x in 0..3 {
                graph.add(Point::new(x as f32, y as f32));
            }
        }
        for y in 0..3 {
            for x in 0..3 {
                let p = Point::new(x as f32, y as f32);
                if x > 0 {
                    let left = Point::new(x as f32 - 1.0, y as f32);
                    graph.connect(left, p).unwrap();
                    graph.connect(p, left).unwrap();
                }
                if y > 0 {
                    let up = Point::new(x as f32, y as f32 - 1.0);
                    graph.connect(up, p).unwrap();
                    graph.connect(p, up).unwrap();
                }
            }
        }
        graph
    }

    #[test]
    fn source_cost_is_zero() {
        let mut graph = ladder();
        graph
            .shortest_path(Point::new(0.0, 0.0), Point::new(2.0, 2.0))
            .unwrap();
        assert_eq!(graph.cost_of(Point::new(0.0, 0.0)), Some(0.0));
    }

    #[test]
    fn costs_are_non_negative() {
        let mut graph = ladder();
        graph
            .shortest_path(Point::new(0.0, 0.0), Point::new(2.0, 2.0))
            .unwrap();
        for y in 0..3 {
            for x in 0..3 {
                let cost = graph.cost_of(Point::new(x as f32, y as f32)).unwrap();
                assert!(cost >= 0.0);
            }
        }
    }

    #[test]
    fn straight_run_beats_zigzag() {
        // Along the top row the path 0,0 -> 2,0 is straight; every
        // alternative detours and bends, so its cost must be at least the
        // straight cost.
        let mut graph = ladder();
        graph
            .shortest_path(Point::new(0.0, 0.0), Point::new(2.0, 0.0))
            .unwrap();
        let straight = graph.cost_of(Point::new(2.0, 0.0)).unwrap();
        assert_eq!(straight, 2.0);
        let corner = graph.cost_of(Point::new(2.0, 2.0)).unwrap();
        assert!(corner > straight);
    }

    #[test]
    fn path_runs_from_origin_to_predecessor_of_goal() {
        let mut graph = ladder();
        let path = graph
            .shortest_path(Point::new(0.0, 0.0), Point::new(2.0, 0.0))
            .unwrap();
        assert_eq!(path, vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
    }

    #[test]
    fn missing_endpoint_is_an_error() {
        let mut graph = ladder();
        let err = graph
            .shortest_path(Point::new(9.0, 9.0), Point::new(0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, RouteError::PointNotFound { x: 9.0, y: 9.0 });
    }

    #[test]
    fn connect_requires_known_points() {
        let mut graph = PointGraph::new();
        graph.add(Point::new(0.0, 0.0));
        let err = graph
            .connect(Point::new(0.0, 0.0), Point::new(1.0, 0.0))
            .unwrap_err();
        assert_eq!(err, RouteError::PointNotFound { x: 1.0, y: 0.0 });
    }

    #[test]
    fn add_is_idempotent_and_zero_signs_collapse() {
        let mut graph = PointGraph::new();
        graph.add(Point::new(0.0, 0.0));
        graph.add(Point::new(-0.0, 0.0));
        graph.add(Point::new(0.0, -0.0));
        assert!(graph.has(Point::new(-0.0, -0.0)));
        assert_eq!(graph.nodes.len(), 1);
    }

    #[test]
    fn unreachable_goal_yields_empty_path() {
        let mut graph = PointGraph::new();
        graph.add(Point::new(0.0, 0.0));
        graph.add(Point::new(5.0, 5.0));
        let path = graph
            .shortest_path(Point::new(0.0, 0.0), Point::new(5.0, 5.0))
            .unwrap();
        assert!(path.is_empty());
    }
}
