use super::ForceNode;

/// Default per-node confinement strength.
const DEFAULT_STRENGTH: f32 = 0.1;
/// Substituted for exactly-zero axis deltas to keep the correction finite.
const ZERO_EPSILON: f32 = 1e-6;

type Accessor = Box<dyn Fn(&ForceNode, usize) -> f32 + Send + Sync>;

/// Velocity perturbation that pulls each node toward a target radius from
/// an attractor point, measured in Manhattan distance. Nodes farther out
/// than their radius drift inward, nodes closer drift outward, scaled by
/// the simulation's `alpha` cooling factor and a per-node strength.
///
/// The Manhattan metric is cheaper than Euclidean and yields a
/// diamond-shaped confinement region, which is what the attached viewers
/// expect.
pub struct BoundedForce {
    radius: Accessor,
    strength: Accessor,
    x: f32,
    y: f32,
    z: f32,
    dimensions: u8,
    radii: Vec<f32>,
    strengths: Vec<f32>,
    stale: bool,
}

impl BoundedForce {
    /// Confinement at a constant radius around the origin.
    pub fn new(radius: f32) -> Self {
        Self {
            radius: Box::new(move |_, _| radius),
            strength: Box::new(|_, _| DEFAULT_STRENGTH),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            dimensions: 2,
            radii: Vec::new(),
            strengths: Vec::new(),
            stale: true,
        }
    }

    /// Confinement at each node's own `radial_distance`. Nodes without
    /// one resolve to a `NaN` radius and are excluded (strength zero).
    pub fn from_radial_distance() -> Self {
        Self::new(0.0).radius(|node, _| node.radial_distance.unwrap_or(f32::NAN))
    }

    pub fn radius(mut self, accessor: impl Fn(&ForceNode, usize) -> f32 + Send + Sync + 'static) -> Self {
        self.radius = Box::new(accessor);
        self.stale = true;
        self
    }

    pub fn constant_radius(self, radius: f32) -> Self {
        self.radius(move |_, _| radius)
    }

    pub fn strength(
        mut self,
        accessor: impl Fn(&ForceNode, usize) -> f32 + Send + Sync + 'static,
    ) -> Self {
        self.strength = Box::new(accessor);
        self.stale = true;
        self
    }

    pub fn constant_strength(self, strength: f32) -> Self {
        self.strength(move |_, _| strength)
    }

    pub fn x(mut self, v: f32) -> Self {
        self.x = v;
        self
    }

    pub fn y(mut self, v: f32) -> Self {
        self.y = v;
        self
    }

    pub fn z(mut self, v: f32) -> Self {
        self.z = v;
        self
    }

    /// Precomputes the per-node radius and strength tables. Called by the
    /// simulation driver whenever the node set or dimensionality changes;
    /// [`apply`](Self::apply) also re-runs it lazily when configuration
    /// changed or the node count no longer matches, so the tables always
    /// agree with the node array.
    pub fn initialize(&mut self, nodes: &[ForceNode], num_dimensions: u8) {
        self.dimensions = num_dimensions;
        self.radii = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (self.radius)(node, i))
            .collect();
        self.strengths = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                if self.radii[i].is_nan() {
                    0.0
                } else {
                    (self.strength)(node, i)
                }
            })
            .collect();
        self.stale = false;
    }

    /// One tick of the force: adds the radial correction to each node's
    /// velocity, gated by the simulation dimensionality.
    pub fn apply(&mut self, nodes: &mut [ForceNode], alpha: f32) {
        if self.stale || self.radii.len() != nodes.len() {
            let dimensions = self.dimensions;
            self.initialize(nodes, dimensions);
        }
        for (i, node) in nodes.iter_mut().enumerate() {
            // Excluded nodes carry a NaN radius; skipping them keeps the
            // NaN out of the velocity sums.
            if self.strengths[i] == 0.0 {
                continue;
            }
            let dx = non_zero(node.x - self.x);
            let dy = non_zero(node.y - self.y);
            let dz = non_zero(node.z - self.z);
            let r = dx.abs() + dy.abs() + dz.abs();
            let k = (self.radii[i] - r) * self.strengths[i] * alpha / r;
            node.vx += dx * k;
            if self.dimensions > 1 {
                node.vy += dy * k;
            }
            if self.dimensions > 2 {
                node.vz += dz * k;
            }
        }
    }
}

fn non_zero(v: f32) -> f32 {
    if v == 0.0 { ZERO_EPSILON } else { v }
}
